//! # Design Editor Session
//!
//! Wires one [`DesignStore`], one [`History`], a persistence key and the
//! asset guard together:
//!
//! ```text
//! control ──► store write ──► history.record_if_changed ──► save_design
//!                 ▲                      │
//!                 └── undo / redo ◄──────┘ (snapshot written back, echo consumed)
//! ```
//!
//! Every successful write is saved under the session key. Save failures are
//! logged and editing continues.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::design::{AssetSlot, DesignState, DesignStore};
use crate::document::{CardSide, DocumentContent, Mode};
use crate::error::InsigniaError;
use crate::history::{History, Recorded};
use crate::ingest::{self, AssetGuard, Ticket};
use crate::persistence::{self, DesignRepository};
use crate::render::compose::{ComposeOptions, compose_with};
use crate::render::layer::Layer;

pub struct DesignEditor<R: DesignRepository> {
    key: String,
    store: DesignStore,
    history: History<DesignState>,
    repository: R,
    assets: AssetGuard,
    options: ComposeOptions,
    max_asset_bytes: u64,
}

impl<R: DesignRepository> DesignEditor<R> {
    /// Open the design stored under `key`, or the default design if there is
    /// none (or it cannot be read). The loaded design is the history origin.
    pub fn open(repository: R, key: impl Into<String>, config: &EngineConfig) -> Self {
        let key = key.into();
        let initial = persistence::load_or_default(&repository, &key);
        debug!(key = %key, "opened design session");
        Self {
            store: DesignStore::new(initial.clone()),
            history: History::with_cap(initial, config.history_cap),
            key,
            repository,
            assets: AssetGuard::new(),
            options: ComposeOptions::from(config),
            max_asset_bytes: config.max_asset_bytes,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn design(&self) -> &DesignState {
        self.store.current()
    }

    pub fn history(&self) -> &History<DesignState> {
        &self.history
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Merge a JSON patch into the design. On error nothing changes.
    pub fn replace(&mut self, patch: &Value) -> Result<&DesignState, InsigniaError> {
        self.store.replace(patch)?;
        self.observe();
        Ok(self.store.current())
    }

    /// Apply a typed edit.
    pub fn update(&mut self, edit: impl FnOnce(&mut DesignState)) -> &DesignState {
        self.store.update(edit);
        self.observe();
        self.store.current()
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Return to the session's starting design, keeping redo entries.
    pub fn reset(&mut self) {
        let origin = self.history.reset_to_origin().clone();
        self.restore(origin);
    }

    /// Start a continuous-input gesture (e.g. slider drag).
    pub fn begin_gesture(&mut self) {
        self.history.begin_gesture();
    }

    /// End the gesture; its final value becomes one history entry.
    pub fn end_gesture(&mut self) -> Recorded {
        self.history.end_gesture()
    }

    /// Start ingesting an asset for `slot`; superseded by any later call.
    pub fn begin_asset(&mut self, slot: AssetSlot) -> Ticket {
        self.assets.begin(slot)
    }

    /// Commit a finished ingestion.
    ///
    /// Returns `Ok(false)` for a stale ticket (dropped silently) and the
    /// ingestion error for a failed read; in both cases the slot is unchanged.
    pub fn finish_asset(
        &mut self,
        ticket: Ticket,
        result: Result<String, InsigniaError>,
    ) -> Result<bool, InsigniaError> {
        if !self.assets.complete(ticket) {
            return Ok(false);
        }
        let uri = result.inspect_err(|e| {
            warn!(slot = ticket.slot.name(), error = %e, "asset ingestion failed");
        })?;
        self.update(|d| d.asset_mut(ticket.slot).src = Some(uri));
        Ok(true)
    }

    /// Read `path` into `slot`.
    pub async fn ingest_asset(&mut self, slot: AssetSlot, path: &Path) -> Result<bool, InsigniaError> {
        let ticket = self.begin_asset(slot);
        let result = ingest::read_data_uri(path, self.max_asset_bytes).await;
        self.finish_asset(ticket, result)
    }

    pub fn clear_asset(&mut self, slot: AssetSlot) {
        self.update(|d| d.asset_mut(slot).src = None);
    }

    /// Compose the current design.
    pub fn layers(&self, content: &DocumentContent, mode: Mode, side: CardSide) -> Vec<Layer> {
        compose_with(self.design(), content, mode, side, &self.options)
    }

    /// Save now, reporting failure.
    pub fn save(&self) -> Result<(), InsigniaError> {
        self.repository.save_design(&self.key, self.store.current())
    }

    fn restore(&mut self, snapshot: DesignState) {
        self.store.set(snapshot);
        self.observe();
    }

    fn observe(&mut self) {
        let recorded = self.history.record_if_changed(self.store.current());
        debug!(?recorded, index = self.history.index(), "design changed");
        if let Err(e) = self.save() {
            warn!(key = %self.key, error = %e, "failed to save design");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryRepository;
    use serde_json::json;

    fn editor() -> DesignEditor<MemoryRepository> {
        DesignEditor::open(MemoryRepository::new(), "test", &EngineConfig::default())
    }

    #[test]
    fn test_replace_undo_redo() {
        let mut ed = editor();
        ed.replace(&json!({"primaryColor": "#ff0000"})).unwrap();
        assert_eq!(ed.history().len(), 2);

        assert!(ed.undo());
        assert_eq!(ed.design().primary_color, "#1e3a8a");
        assert!(ed.can_redo());
        assert_eq!(ed.history().len(), 2);

        assert!(ed.redo());
        assert_eq!(ed.design().primary_color, "#ff0000");
        assert!(!ed.redo());
    }

    #[test]
    fn test_invalid_patch_changes_nothing() {
        let mut ed = editor();
        assert!(ed.replace(&json!({"guillocheComplexity": "lots"})).is_err());
        assert_eq!(ed.history().len(), 1);
        assert_eq!(ed.design(), &DesignState::default());
    }

    #[test]
    fn test_gesture_is_one_entry() {
        let mut ed = editor();
        ed.begin_gesture();
        for i in 0..20 {
            ed.update(|d| d.overlay_opacity = i as f32 / 100.0);
        }
        assert_eq!(ed.history().len(), 1);
        assert_eq!(ed.end_gesture(), Recorded::Appended);
        assert_eq!(ed.history().len(), 2);
        assert_eq!(ed.design().overlay_opacity, 0.19);
    }

    #[test]
    fn test_changes_are_saved() {
        let mut ed = editor();
        ed.update(|d| d.bilingual = true);
        let saved = ed.repository().load_design("test").unwrap().unwrap();
        assert!(saved.bilingual);
    }

    #[test]
    fn test_reopen_loads_saved_design() {
        let repo = MemoryRepository::new();
        let mut design = DesignState::default();
        design.watermark_text = "COPY".into();
        repo.save_design("k", &design).unwrap();

        let ed = DesignEditor::open(repo, "k", &EngineConfig::default());
        assert_eq!(ed.design().watermark_text, "COPY");
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_stale_asset_is_dropped() {
        let mut ed = editor();
        let slow = ed.begin_asset(AssetSlot::Logo);
        let fast = ed.begin_asset(AssetSlot::Logo);
        assert!(ed.finish_asset(fast, Ok("data:image/png;base64,B".into())).unwrap());
        assert!(!ed.finish_asset(slow, Ok("data:image/png;base64,A".into())).unwrap());
        assert_eq!(ed.design().logo.src.as_deref(), Some("data:image/png;base64,B"));
    }

    #[test]
    fn test_failed_asset_keeps_previous() {
        let mut ed = editor();
        let t = ed.begin_asset(AssetSlot::Stamp);
        ed.finish_asset(t, Ok("data:image/png;base64,OLD".into())).unwrap();
        let t = ed.begin_asset(AssetSlot::Stamp);
        let err = ed
            .finish_asset(t, Err(InsigniaError::Asset("unreadable".into())))
            .unwrap_err();
        assert!(matches!(err, InsigniaError::Asset(_)));
        assert_eq!(ed.design().stamp.src.as_deref(), Some("data:image/png;base64,OLD"));
    }

    #[test]
    fn test_reset_returns_to_origin() {
        let mut ed = editor();
        ed.update(|d| d.border_width = 2.0);
        ed.update(|d| d.border_width = 4.0);
        ed.reset();
        assert_eq!(ed.design(), &DesignState::default());
        assert!(ed.can_redo());
    }

    #[test]
    fn test_non_finite_update_does_not_grow_history() {
        let mut ed = editor();
        ed.update(|d| d.overlay_opacity = f32::NAN);
        let len = ed.history().len();
        ed.update(|_| {});
        ed.update(|_| {});
        assert_eq!(ed.history().len(), len);
        assert!(ed.design().overlay_opacity.is_finite());
    }

    #[test]
    fn test_undo_during_drag_keeps_store_and_history_in_step() {
        let mut ed = editor();
        ed.replace(&json!({"primaryColor": "#111111"})).unwrap();

        ed.begin_gesture();
        ed.update(|d| d.overlay_opacity = 0.2);
        ed.update(|d| d.overlay_opacity = 0.3);
        assert!(ed.undo());
        ed.end_gesture();

        assert_eq!(ed.history().len(), 2);
        assert_eq!(ed.design(), &DesignState::default());
        assert!(ed.redo());
        assert_eq!(ed.design().primary_color, "#111111");
        assert_eq!(ed.design().overlay_opacity, DesignState::default().overlay_opacity);
    }
}
