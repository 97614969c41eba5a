//! # Error Types
//!
//! This module defines error types used throughout the insignia library.

use thiserror::Error;

/// Main error type for insignia operations
#[derive(Debug, Error)]
pub enum InsigniaError {
    /// A design patch could not be merged into a complete design state
    #[error("Invalid design patch: {0}")]
    InvalidPatch(String),

    /// Asset file could not be read or converted to a data URI
    #[error("Asset error: {0}")]
    Asset(String),

    /// Design persistence failed (load or save)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Barcode or QR symbol encoding failed
    #[error("Symbol error: {0}")]
    Symbol(String),

    /// Server-level errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Configuration file could not be used
    #[error("Config error: {0}")]
    Config(String),

    /// JSON (de)serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
