//! # Rendering Module
//!
//! Turns a design and a content record into an ordered layer tree, and the
//! layer tree into SVG.
//!
//! ## Modules
//!
//! - [`compose`](mod@compose): the layer compositor (stacking order, shared stages)
//! - [`layer`]: the layer tree types
//! - [`blend`]: blend modes
//! - [`paint`]: gradient presets and the hologram sweep
//! - [`text`]: typography and word wrap
//! - [`symbols`]: barcode and QR encoding
//! - [`svg`]: SVG serialization
//! - [`viewport`]: fit-to-container scaling
//!
//! ## Usage Example
//!
//! ```
//! use insignia::design::DesignState;
//! use insignia::document::{CardSide, DocumentContent, Mode, PageGeometry};
//! use insignia::render::{compose, svg};
//!
//! let content = DocumentContent { name: "Ada Lovelace".into(), ..Default::default() };
//! let layers = compose(&DesignState::default(), &content, Mode::Certificate, CardSide::Front);
//! let doc = svg::render_svg(&layers, &PageGeometry::A4_PORTRAIT).unwrap();
//! assert!(doc.contains("Ada Lovelace"));
//! ```

pub mod blend;
mod card;
mod certificate;
pub mod compose;
pub mod layer;
pub mod paint;
pub mod svg;
pub mod symbols;
pub mod text;
pub mod viewport;

pub use blend::BlendMode;
pub use certificate::CONTENT_MARGIN_MM;
pub use compose::{ComposeOptions, compose, compose_with};
pub use layer::{Layer, LayerContent, LayerKind, Rect};
pub use viewport::{Viewport, fit};
