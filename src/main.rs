//! # Insignia CLI
//!
//! Command-line interface for rendering certificates and ID cards.
//!
//! ## Usage
//!
//! ```bash
//! # Render the default certificate design to SVG
//! insignia render --content alice.json --output alice.svg
//!
//! # Render the back of an ID card from a stored design
//! insignia render --design card.json --mode card --side back --output back.svg
//!
//! # Dump the composed layer tree as JSON
//! insignia render --format json
//!
//! # Page geometry and print CSS
//! insignia page --mode card
//!
//! # Display scale for a 1280x720 container
//! insignia fit 1280 720 --orientation landscape
//!
//! # Run the HTTP API
//! insignia serve --listen 127.0.0.1:8080 --design-dir ./designs
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use insignia::{
    DesignStore, EngineConfig, InsigniaError,
    design::Orientation,
    document::{CardSide, DocumentContent, Mode, PageGeometry},
    logging::{LogConfig, LogFormat, init_logging},
    render::{ComposeOptions, compose_with, svg, viewport},
    server::{ServerConfig, serve},
};

/// Insignia - Certificate and ID-card design engine
#[derive(Parser, Debug)]
#[command(name = "insignia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    /// Engine configuration file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a document and write it as SVG or a JSON layer tree
    Render {
        /// Design patch (JSON) applied over the default design
        #[arg(long, value_name = "FILE")]
        design: Option<PathBuf>,

        /// Document content (JSON)
        #[arg(long, value_name = "FILE")]
        content: Option<PathBuf>,

        /// Holder name, overrides the content file
        #[arg(long)]
        name: Option<String>,

        /// Document ID, overrides the content file
        #[arg(long)]
        id: Option<String>,

        #[arg(long, value_enum, default_value_t = Mode::Certificate)]
        mode: Mode,

        #[arg(long, value_enum, default_value_t = CardSide::Front)]
        side: CardSide,

        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print page geometry and print CSS
    Page {
        #[arg(long, value_enum, default_value_t = Mode::Certificate)]
        mode: Mode,

        #[arg(long, value_enum, default_value_t = Orientation::Portrait)]
        orientation: Orientation,
    },

    /// Compute the display scale for a container size
    Fit {
        /// Container width in px
        width: f32,

        /// Container height in px
        height: f32,

        #[arg(long, value_enum, default_value_t = Mode::Certificate)]
        mode: Mode,

        #[arg(long, value_enum, default_value_t = Orientation::Portrait)]
        orientation: Orientation,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Directory holding stored designs
        #[arg(long, default_value = "designs")]
        design_dir: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), InsigniaError> {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format))?;
    let engine = EngineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            design,
            content,
            name,
            id,
            mode,
            side,
            format,
            output,
        } => {
            let mut store = DesignStore::default();
            if let Some(path) = design {
                let patch: serde_json::Value = read_json(&path)?;
                store.replace(&patch)?;
            }

            let mut content: DocumentContent = match content {
                Some(path) => read_json(&path)?,
                None => DocumentContent::default(),
            };
            if let Some(name) = name {
                content.name = name;
            }
            if let Some(id) = id {
                content.id = id;
            }

            let options = ComposeOptions::from(&engine);
            let layers = compose_with(store.current(), &content, mode, side, &options);
            let page = PageGeometry::for_mode(mode, store.current().orientation);
            debug!(layers = layers.len(), page = page.name, "composed");

            let body = match format {
                OutputFormat::Svg => svg::render_svg(&layers, &page)?,
                OutputFormat::Json => serde_json::to_string_pretty(&layers)?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, body)?;
                    info!("wrote {}", path.display());
                }
                None => println!("{}", body),
            }
        }

        Commands::Page { mode, orientation } => {
            let page = PageGeometry::for_mode(mode, orientation);
            println!("{}", page.name);
            println!("  physical: {} x {} mm", page.width_mm, page.height_mm);
            println!("  logical:  {} x {} units", page.width, page.height);
            println!("  {}", page.print_css());
        }

        Commands::Fit {
            width,
            height,
            mode,
            orientation,
        } => {
            let page = PageGeometry::for_mode(mode, orientation);
            let scale =
                viewport::fit_with_margin(width, height, page.width, page.height, engine.viewport_margin);
            println!(
                "scale {:.4} ({:.1} x {:.1} px)",
                scale,
                page.width * scale,
                page.height * scale
            );
        }

        Commands::Serve { listen, design_dir } => {
            let config = ServerConfig {
                listen_addr: listen,
                design_dir,
                engine,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(config))?;
        }
    }

    Ok(())
}

/// Read and deserialize a JSON file.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InsigniaError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
