//! # Design Model
//!
//! The design-parameter record ([`DesignState`]), the store that owns the
//! current value ([`DesignStore`]), and the per-field valid ranges.
//!
//! ```
//! use insignia::design::DesignStore;
//! use serde_json::json;
//!
//! let mut store = DesignStore::default();
//! let design = store.replace(&json!({"primaryColor": "#111111"})).unwrap();
//! assert_eq!(design.primary_color, "#111111");
//! ```

pub mod ranges;
mod store;
pub mod types;

pub use store::DesignStore;
pub use types::*;
