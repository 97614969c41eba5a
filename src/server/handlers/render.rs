//! Compose / preview API handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::design::{DesignState, DesignStore, Orientation};
use crate::document::{CardSide, DocumentContent, Mode, PageGeometry};
use crate::persistence::{self, validate_key};
use crate::render::{Layer, compose_with, svg, viewport};

use super::super::state::AppState;
use super::error_response;

/// Request body for the compose endpoints.
///
/// The design is the one stored under `key` (or the default design),
/// with `design` merged over it as a patch.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub design: Option<Value>,
    #[serde(default)]
    pub content: DocumentContent,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub side: CardSide,
}

#[derive(Debug, Serialize)]
pub struct LayersResponse {
    pub page: PageGeometry,
    pub layers: Vec<Layer>,
}

/// Query parameters for the page endpoint.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page: PageGeometry,
    pub print_css: String,
}

/// Query parameters for the fit endpoint.
#[derive(Debug, Deserialize)]
pub struct FitQuery {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Serialize)]
pub struct FitResponse {
    pub scale: f32,
    pub width: f32,
    pub height: f32,
}

fn resolve_design(state: &AppState, req: &RenderRequest) -> Result<DesignState, (StatusCode, String)> {
    let base = match &req.key {
        Some(key) => {
            validate_key(key).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
            persistence::load_or_default(state.repository.as_ref(), key)
        }
        None => DesignState::default(),
    };
    let mut store = DesignStore::new(base);
    if let Some(patch) = &req.design {
        store.replace(patch).map_err(error_response)?;
    }
    Ok(store.current().clone())
}

fn layers_for(state: &AppState, req: &RenderRequest) -> Result<(PageGeometry, Vec<Layer>), (StatusCode, String)> {
    let design = resolve_design(state, req)?;
    let page = PageGeometry::for_mode(req.mode, design.orientation);
    let layers = compose_with(&design, &req.content, req.mode, req.side, &state.options);
    Ok((page, layers))
}

/// POST /api/render/layers - Compose and return the layer tree.
pub async fn layers(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<LayersResponse>, (StatusCode, String)> {
    let (page, layers) = layers_for(&state, &req)?;
    Ok(Json(LayersResponse { page, layers }))
}

/// POST /api/render/svg - Compose and render to SVG.
pub async fn svg(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (page, layers) = layers_for(&state, &req)?;
    let body = svg::render_svg(&layers, &page).map_err(error_response)?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    ))
}

/// GET /api/page - Page geometry and print CSS for a mode.
pub async fn page(Query(q): Query<PageQuery>) -> Json<PageResponse> {
    let page = PageGeometry::for_mode(q.mode, q.orientation);
    Json(PageResponse {
        print_css: page.print_css(),
        page,
    })
}

/// GET /api/fit - Display scale for a container.
pub async fn fit(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FitQuery>,
) -> Json<FitResponse> {
    let page = PageGeometry::for_mode(q.mode, q.orientation);
    let scale = viewport::fit_with_margin(
        q.width,
        q.height,
        page.width,
        page.height,
        state.config.engine.viewport_margin,
    );
    Json(FitResponse {
        scale,
        width: page.width * scale,
        height: page.height * scale,
    })
}
