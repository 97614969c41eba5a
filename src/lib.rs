//! # Insignia - Certificate and ID-Card Design Engine
//!
//! Insignia holds the editable design of a certificate or ID card and turns
//! it into an ordered list of visual layers. It provides:
//!
//! - **Design state**: a flat parameter record with JSON merge-patch updates
//! - **History**: bounded undo/redo with gesture coalescing
//! - **Compositing**: a pure, deterministic `(design, content, mode, side) → layers`
//! - **Patterns**: guilloche rosettes, overlay textures, security motifs
//! - **Positioning**: asset placement with rotation about the visual center
//! - **Viewport**: scale-to-fit for on-screen preview
//!
//! ## Quick Start
//!
//! ```
//! use insignia::{
//!     DesignStore,
//!     document::{CardSide, DocumentContent, Mode, PageGeometry},
//!     render::{compose, svg},
//! };
//! use serde_json::json;
//!
//! let mut store = DesignStore::default();
//! store.replace(&json!({"guillocheComplexity": 3, "ribbonEnabled": true}))?;
//!
//! let content = DocumentContent {
//!     name: "Ada Lovelace".into(),
//!     id: "CERT-1815".into(),
//!     ..Default::default()
//! };
//!
//! let layers = compose(store.current(), &content, Mode::Certificate, CardSide::Front);
//! assert_eq!(layers[0].name, "background");
//!
//! let page = PageGeometry::for_mode(Mode::Certificate, store.current().orientation);
//! let markup = svg::render_svg(&layers, &page)?;
//! assert!(markup.starts_with("<svg"));
//! # Ok::<(), insignia::InsigniaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`design`] | Design record, valid ranges, and the store |
//! | [`history`] | Undo/redo snapshots |
//! | [`editor`] | Store, history, assets, and persistence wired together |
//! | [`render`] | Layer model, compositor, SVG output, viewport |
//! | [`art`] | Pattern generators |
//! | [`position`] | Asset placement and transforms |
//! | [`document`] | Content record and page geometry |
//! | [`ingest`] | Asset bytes to data URIs |
//! | [`persistence`] | Design repositories |
//! | [`server`] | HTTP API |
//! | [`config`] | Engine configuration |
//! | [`logging`] | Tracing subscriber setup |
//! | [`error`] | Error types |

pub mod art;
pub mod config;
pub mod design;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod ingest;
pub mod logging;
pub mod persistence;
pub mod position;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use config::EngineConfig;
pub use design::{DesignState, DesignStore};
pub use editor::DesignEditor;
pub use error::InsigniaError;
pub use history::History;
pub use render::{Layer, compose};
