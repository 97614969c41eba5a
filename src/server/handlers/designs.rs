//! Design storage API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::design::{AssetSlot, DesignState, DesignStore};
use crate::ingest::{self, Ticket};
use crate::persistence::{self, validate_key};

use super::super::state::AppState;
use super::error_response;

/// Response from the create endpoint.
#[derive(Debug, Serialize)]
pub struct CreatedDesign {
    pub key: String,
    pub design: DesignState,
}

fn checked_key(key: &str) -> Result<(), (StatusCode, String)> {
    validate_key(key).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

fn save(state: &AppState, key: &str, design: &DesignState) -> Result<(), (StatusCode, String)> {
    state
        .repository
        .save_design(key, design)
        .map_err(error_response)
}

/// GET /api/designs/:key - Fetch a stored design.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<DesignState>, (StatusCode, String)> {
    checked_key(&key)?;
    match state.repository.load_design(&key).map_err(error_response)? {
        Some(design) => Ok(Json(design)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("No design stored under '{}'", key),
        )),
    }
}

/// PUT /api/designs/:key - Merge a JSON patch into the stored (or default) design.
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(patch): Json<Value>,
) -> Result<Json<DesignState>, (StatusCode, String)> {
    checked_key(&key)?;
    let _write = state.lock_key(&key).await;
    let mut store = DesignStore::new(persistence::load_or_default(state.repository.as_ref(), &key));
    store.replace(&patch).map_err(error_response)?;
    save(&state, &key, store.current())?;
    Ok(Json(store.current().clone()))
}

/// POST /api/designs - Store a new design under a fresh key.
///
/// The body is an optional patch over the default design.
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedDesign>), (StatusCode, String)> {
    let mut store = DesignStore::default();
    if !body.is_empty() {
        let patch: Value = serde_json::from_slice(&body)
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e)))?;
        store.replace(&patch).map_err(error_response)?;
    }
    let key = Uuid::new_v4().to_string();
    save(&state, &key, store.current())?;
    info!(key = %key, "created design");
    Ok((
        StatusCode::CREATED,
        Json(CreatedDesign {
            key,
            design: store.current().clone(),
        }),
    ))
}

/// PUT /api/designs/:key/assets/:slot - Upload raw image bytes into a slot.
///
/// A later upload into the same slot supersedes this one; if it lands first
/// this request is answered with 409 and the slot keeps the newer image.
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    Path((key, slot)): Path<(String, AssetSlot)>,
    body: Bytes,
) -> Result<Json<DesignState>, (StatusCode, String)> {
    checked_key(&key)?;
    let ticket = state.begin_upload(&key, slot);
    let uri = ingest::data_uri(&body, None, state.config.engine.max_asset_bytes)
        .map_err(error_response)?;
    commit_upload(&state, &key, ticket, uri).await.map(Json)
}

/// Write a finished upload if its ticket is still current.
async fn commit_upload(
    state: &AppState,
    key: &str,
    ticket: Ticket,
    uri: String,
) -> Result<DesignState, (StatusCode, String)> {
    let _write = state.lock_key(key).await;
    if !state.upload_is_current(key, ticket) {
        debug!(key, slot = ticket.slot.name(), "superseded upload dropped");
        return Err((
            StatusCode::CONFLICT,
            format!("A newer upload replaced this {} image", ticket.slot.name()),
        ));
    }
    let mut store = DesignStore::new(persistence::load_or_default(state.repository.as_ref(), key));
    store.update(|d| d.asset_mut(ticket.slot).src = Some(uri));
    save(state, key, store.current())?;
    Ok(store.current().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::persistence::MemoryRepository;
    use crate::server::ServerConfig;
    use serde_json::json;

    fn state() -> Arc<AppState> {
        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".into(),
            design_dir: std::env::temp_dir(),
            engine: EngineConfig::default(),
        };
        Arc::new(AppState::with_repository(
            config,
            Arc::new(MemoryRepository::new()),
        ))
    }

    #[tokio::test]
    async fn test_missing_design_is_404() {
        let err = get(State(state()), Path("nothing".into())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_then_get() {
        let state = state();
        let Json(design) = patch(
            State(state.clone()),
            Path("cert".into()),
            Json(json!({"guillocheComplexity": 3})),
        )
        .await
        .unwrap();
        assert_eq!(design.guilloche_complexity, 3);

        let Json(loaded) = get(State(state), Path("cert".into())).await.unwrap();
        assert_eq!(loaded, design);
    }

    #[tokio::test]
    async fn test_bad_patch_is_400() {
        let err = patch(
            State(state()),
            Path("cert".into()),
            Json(json!({"borderWidth": "wide"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_key_is_400() {
        let err = get(State(state()), Path("../x".into())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_assigns_key() {
        let state = state();
        let (status, Json(created)) = create(
            State(state.clone()),
            Bytes::from_static(br##"{"primaryColor":"#000000"}"##),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.design.primary_color, "#000000");
        assert!(state.repository.load_design(&created.key).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upload_asset() {
        let state = state();
        let png = Bytes::from_static(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");
        let Json(design) = upload_asset(
            State(state),
            Path(("cert".into(), AssetSlot::Signature)),
            png,
        )
        .await
        .unwrap();
        assert!(
            design
                .signature
                .src
                .as_deref()
                .is_some_and(|s| s.starts_with("data:image/png;base64,"))
        );
    }

    #[tokio::test]
    async fn test_superseded_upload_is_409() {
        let state = state();
        let slow = state.begin_upload("cert", AssetSlot::Logo);
        let fast = state.begin_upload("cert", AssetSlot::Logo);

        let design = commit_upload(&state, "cert", fast, "data:image/png;base64,B".into())
            .await
            .unwrap();
        assert_eq!(design.logo.src.as_deref(), Some("data:image/png;base64,B"));

        let err = commit_upload(&state, "cert", slow, "data:image/png;base64,A".into())
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);

        let stored = state.repository.load_design("cert").unwrap().unwrap();
        assert_eq!(stored.logo.src.as_deref(), Some("data:image/png;base64,B"));
    }

    #[tokio::test]
    async fn test_uploads_to_other_slots_do_not_conflict() {
        let state = state();
        let logo = state.begin_upload("cert", AssetSlot::Logo);
        let stamp = state.begin_upload("cert", AssetSlot::Stamp);
        commit_upload(&state, "cert", stamp, "data:image/png;base64,S".into())
            .await
            .unwrap();
        let design = commit_upload(&state, "cert", logo, "data:image/png;base64,L".into())
            .await
            .unwrap();
        assert!(design.logo.src.is_some());
        assert!(design.stamp.src.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_patches_are_not_lost() {
        let state = state();
        let mut tasks = Vec::new();
        for (i, field) in ["primaryColor", "secondaryColor", "accentColor", "borderColor"]
            .into_iter()
            .enumerate()
        {
            let state = state.clone();
            tasks.push(tokio::spawn(async move {
                patch(
                    State(state),
                    Path("shared".into()),
                    Json(json!({ field: format!("#00000{}", i) })),
                )
                .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = state.repository.load_design("shared").unwrap().unwrap();
        assert_eq!(stored.primary_color, "#000000");
        assert_eq!(stored.secondary_color, "#000001");
        assert_eq!(stored.accent_color, "#000002");
        assert_eq!(stored.border_color, "#000003");
    }
}
