//! # Pattern Generators
//!
//! Pure, deterministic geometric motifs. Each generator returns primitive
//! shapes; the compositor wraps them into layers.
//!
//! | Module        | Motif                                   | Parameter      |
//! |---------------|-----------------------------------------|----------------|
//! | [`guilloche`] | concentric rotated ellipses             | complexity 0–10|
//! | [`overlay`]   | tiled textures, one per overlay shape   | shape enum     |
//! | [`security`]  | fibers, microtext, card line patterns   | bounds         |

pub mod guilloche;
pub mod overlay;
pub mod security;
