//! The design state store: single source of truth for one editor session.
//!
//! There is exactly one writer path per kind of change:
//!
//! - [`DesignStore::replace`] merges a JSON merge patch (what UI controls and
//!   the HTTP API send),
//! - [`DesignStore::update`] applies a typed closure to a draft copy,
//! - [`DesignStore::set`] swaps in a whole snapshot (history navigation,
//!   persistence load).
//!
//! Every path builds a new value and swaps it in; the previous value is
//! never edited in place. No range validation happens here, but a non-finite
//! number is never stored: it falls back to the value it would replace.

use serde_json::{Map, Value};
use tracing::warn;

use super::ranges::repair_non_finite;
use super::types::DesignState;
use crate::error::InsigniaError;

/// Holds the current [`DesignState`] and a revision counter.
#[derive(Debug, Clone, Default)]
pub struct DesignStore {
    current: DesignState,
    revision: u64,
}

impl DesignStore {
    pub fn new(mut initial: DesignState) -> Self {
        repair_non_finite(&mut initial, &DesignState::default());
        Self {
            current: initial,
            revision: 0,
        }
    }

    /// The current design.
    pub fn current(&self) -> &DesignState {
        &self.current
    }

    /// Incremented on every successful write, including no-op writes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge `patch` over the current design and make the result current.
    ///
    /// `patch` follows JSON merge-patch rules: objects merge recursively,
    /// any other value replaces, and `null` clears an optional field (e.g. an
    /// asset's `src`). A patch that would leave the record incomplete or
    /// ill-typed is rejected and the store is left unchanged.
    pub fn replace(&mut self, patch: &Value) -> Result<&DesignState, InsigniaError> {
        if !patch.is_object() {
            return Err(InsigniaError::InvalidPatch(
                "patch must be a JSON object".to_string(),
            ));
        }

        let mut merged = serde_json::to_value(&self.current)?;
        merge_patch(&mut merged, patch);

        let next: DesignState = serde_json::from_value(merged)
            .map_err(|e| InsigniaError::InvalidPatch(e.to_string()))?;
        Ok(self.set(next))
    }

    /// Apply a typed edit to a copy of the current design.
    pub fn update(&mut self, edit: impl FnOnce(&mut DesignState)) -> &DesignState {
        let mut draft = self.current.clone();
        edit(&mut draft);
        self.set(draft)
    }

    /// Replace the whole design.
    pub fn set(&mut self, mut next: DesignState) -> &DesignState {
        let repaired = repair_non_finite(&mut next, &self.current);
        if repaired > 0 {
            warn!(repaired, "non-finite design values kept their previous value");
        }
        self.current = next;
        self.revision += 1;
        &self.current
    }
}

/// RFC 7386 merge patch.
fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::types::{BorderStyle, OverlayShape};
    use serde_json::json;

    #[test]
    fn test_replace_merges_top_level_fields() {
        let mut store = DesignStore::default();
        let next = store
            .replace(&json!({"primaryColor": "#111111", "overlayShape": "hexagons"}))
            .unwrap();
        assert_eq!(next.primary_color, "#111111");
        assert_eq!(next.overlay_shape, OverlayShape::Hexagons);
        // Untouched fields keep their value.
        assert_eq!(next.border_style, BorderStyle::Solid);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_replace_merges_nested_groups() {
        let mut store = DesignStore::default();
        store
            .replace(&json!({"logo": {"scale": 2.0}, "card": {"chipX": 50.0}}))
            .unwrap();
        let design = store.current();
        assert_eq!(design.logo.scale, 2.0);
        assert_eq!(design.logo.opacity, 1.0);
        assert_eq!(design.card.chip_x, 50.0);
        assert_eq!(design.card.chip_y, 38.0);
    }

    #[test]
    fn test_replace_null_clears_asset_source() {
        let mut store = DesignStore::default();
        store
            .replace(&json!({"logo": {"src": "data:image/png;base64,AAAA"}}))
            .unwrap();
        assert!(store.current().logo.src.is_some());
        store.replace(&json!({"logo": {"src": null}})).unwrap();
        assert!(store.current().logo.src.is_none());
    }

    #[test]
    fn test_invalid_patch_leaves_store_unchanged() {
        let mut store = DesignStore::default();
        let before = store.current().clone();

        assert!(store.replace(&json!({"overlayShape": "spirals"})).is_err());
        assert!(store.replace(&json!({"primaryColor": null})).is_err());
        assert!(store.replace(&json!(["not", "an", "object"])).is_err());

        assert_eq!(store.current(), &before);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_does_not_touch_previous_snapshot() {
        let mut store = DesignStore::default();
        let snapshot = store.current().clone();
        store.update(|d| d.ribbon_enabled = true);
        assert!(store.current().ribbon_enabled);
        assert!(!snapshot.ribbon_enabled);
    }

    #[test]
    fn test_non_finite_update_keeps_previous_value() {
        let mut store = DesignStore::default();
        store.update(|d| d.overlay_opacity = 0.4);
        store.update(|d| {
            d.overlay_opacity = f32::NAN;
            d.logo.scale = f32::INFINITY;
            d.ribbon_enabled = true;
        });

        let design = store.current();
        assert_eq!(design.overlay_opacity, 0.4);
        assert_eq!(design.logo.scale, DesignState::default().logo.scale);
        assert!(design.ribbon_enabled);
        assert_eq!(design, &design.clone());

        store.replace(&json!({"primaryColor": "#222222"})).unwrap();
        assert_eq!(store.current().primary_color, "#222222");
        assert_eq!(store.current().overlay_opacity, 0.4);
    }

    #[test]
    fn test_new_repairs_non_finite_initial_design() {
        let mut initial = DesignState::default();
        initial.shadow_blur = f32::NAN;
        let store = DesignStore::new(initial);
        assert_eq!(store.current(), &DesignState::default());
    }
}
