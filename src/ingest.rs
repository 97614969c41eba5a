//! # Asset Ingestion
//!
//! Converts image files into data URIs for the design's asset slots.
//!
//! Reading is async and may finish out of order, so each slot hands out
//! generation tickets: only the most recently started ingestion for a slot
//! may commit its result. A stale completion is dropped and the slot keeps
//! whatever value it had.
//!
//! ```text
//! begin(slot) ──► ticket g      read file ──► data URI
//! begin(slot) ──► ticket g+1    read file ──► data URI
//!                                  │
//!               complete(g)   ✗ stale, dropped
//!               complete(g+1) ✓ committed
//! ```

use std::collections::HashMap;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, warn};

use crate::design::AssetSlot;
use crate::error::InsigniaError;

/// Proof that an ingestion was started for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: AssetSlot,
    generation: u64,
}

/// Per-slot generation counters.
#[derive(Debug, Clone, Default)]
pub struct AssetGuard {
    generations: HashMap<AssetSlot, u64>,
}

impl AssetGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an ingestion for `slot`, superseding any in flight.
    pub fn begin(&mut self, slot: AssetSlot) -> Ticket {
        let generation = self.generations.entry(slot).or_insert(0);
        *generation += 1;
        Ticket {
            slot,
            generation: *generation,
        }
    }

    /// Whether `ticket` is still the newest for its slot.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generations.get(&ticket.slot) == Some(&ticket.generation)
    }

    /// Accept or reject a finished ingestion. Returns `true` if the caller
    /// may commit the result.
    pub fn complete(&self, ticket: Ticket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!(slot = ticket.slot.name(), "dropping stale asset completion");
        }
        current
    }
}

/// MIME type for image bytes, by content sniffing first and file name second.
pub fn sniff_mime(bytes: &[u8], name_hint: Option<&Path>) -> Option<String> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type().to_string());
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some("image/svg+xml".to_string());
    }
    name_hint
        .and_then(|p| mime_guess::from_path(p).first_raw())
        .filter(|m| m.starts_with("image/"))
        .map(str::to_string)
}

/// Encode image bytes as a `data:` URI.
pub fn data_uri(bytes: &[u8], name_hint: Option<&Path>, max_bytes: u64) -> Result<String, InsigniaError> {
    if bytes.is_empty() {
        return Err(InsigniaError::Asset("empty file".to_string()));
    }
    if bytes.len() as u64 > max_bytes {
        return Err(InsigniaError::Asset(format!(
            "file is {} bytes, limit is {}",
            bytes.len(),
            max_bytes
        )));
    }
    let mime = sniff_mime(bytes, name_hint)
        .ok_or_else(|| InsigniaError::Asset("not a recognized image".to_string()))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Read an image file and encode it as a data URI.
pub async fn read_data_uri(path: &Path, max_bytes: u64) -> Result<String, InsigniaError> {
    let meta = tokio::fs::metadata(path).await.map_err(|e| {
        InsigniaError::Asset(format!("Failed to read {}: {}", path.display(), e))
    })?;
    if meta.len() > max_bytes {
        warn!(path = %path.display(), size = meta.len(), max_bytes, "asset too large");
        return Err(InsigniaError::Asset(format!(
            "{} is {} bytes, limit is {}",
            path.display(),
            meta.len(),
            max_bytes
        )));
    }
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        InsigniaError::Asset(format!("Failed to read {}: {}", path.display(), e))
    })?;
    data_uri(&bytes, Some(path), max_bytes)
}
