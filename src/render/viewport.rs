//! # Viewport Scaler
//!
//! Fits a fixed-size logical document into a variable-size container.
//!
//! ```text
//! scale = min((cw − margin) / dw, (ch − margin) / dh, 1.0)
//! ```
//!
//! The document is never upscaled, and the scaled document always fits the
//! container. When the container is smaller than the margin the inset is
//! dropped for that axis so the scale stays positive.

use crate::design::Orientation;
use crate::document::{Mode, PageGeometry};

/// Display inset around the document, in container px.
pub const DEFAULT_MARGIN: f32 = 32.0;

/// Returned for degenerate (non-positive or non-finite) input.
pub const MIN_SCALE: f32 = 0.01;

fn available(container: f32, margin: f32) -> f32 {
    if container > margin {
        container - margin
    } else {
        container
    }
}

/// Scale factor for a document of `dw × dh` in a `cw × ch` container.
pub fn fit(cw: f32, ch: f32, dw: f32, dh: f32) -> f32 {
    fit_with_margin(cw, ch, dw, dh, DEFAULT_MARGIN)
}

/// [`fit`] with an explicit margin.
pub fn fit_with_margin(cw: f32, ch: f32, dw: f32, dh: f32, margin: f32) -> f32 {
    let inputs = [cw, ch, dw, dh];
    if inputs.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return MIN_SCALE;
    }
    let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };

    let sx = available(cw, margin) / dw;
    let sy = available(ch, margin) / dh;
    let scale = sx.min(sy).min(1.0);
    if scale > 0.0 { scale } else { MIN_SCALE }
}

/// Tracks container size and current document, recomputing the scale
/// whenever either changes.
#[derive(Debug, Clone)]
pub struct Viewport {
    container: (f32, f32),
    page: PageGeometry,
    margin: f32,
    scale: f32,
}

impl Viewport {
    pub fn new(container_width: f32, container_height: f32, page: PageGeometry) -> Self {
        Self::with_margin(container_width, container_height, page, DEFAULT_MARGIN)
    }

    pub fn with_margin(
        container_width: f32,
        container_height: f32,
        page: PageGeometry,
        margin: f32,
    ) -> Self {
        let mut viewport = Self {
            container: (container_width, container_height),
            page,
            margin,
            scale: 1.0,
        };
        viewport.recompute();
        viewport
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn page(&self) -> PageGeometry {
        self.page
    }

    /// Displayed document size in container px.
    pub fn display_size(&self) -> (f32, f32) {
        (self.page.width * self.scale, self.page.height * self.scale)
    }

    /// Container resized.
    pub fn resize(&mut self, width: f32, height: f32) -> f32 {
        self.container = (width, height);
        self.recompute()
    }

    /// Mode, orientation, or tab changed.
    pub fn set_document(&mut self, mode: Mode, orientation: Orientation) -> f32 {
        self.page = PageGeometry::for_mode(mode, orientation);
        self.recompute()
    }

    fn recompute(&mut self) -> f32 {
        self.scale = fit_with_margin(
            self.container.0,
            self.container.1,
            self.page.width,
            self.page.height,
            self.margin,
        );
        self.scale
    }
}
