// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Web UI for scan results

pub mod templates;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::aggregator::{compute_summary, ScanResultAggregator, ScanResultView};
use crate::areas::{AreaMeta, AREAS};
use crate::config::AppConfig;
use crate::models::{AreaKey, ScanPayload};
use crate::store::PayloadStore;
use crate::{CatScanError, Result};

/// Shared application state
pub struct AppState {
    pub store: PayloadStore,
    pub config: AppConfig,
    pub templates: Environment<'static>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            store: PayloadStore::new(PathBuf::from(&config.store.path)),
            templates: templates::environment()?,
            config,
        })
    }

    /// Derive the result view of a stored scan, optionally selecting an area
    pub fn scan_view(&self, id: u64, area: Option<&str>) -> Result<ScanResultView> {
        let payload = self.store.find(id)?.ok_or(CatScanError::SessionNotFound(id))?;
        let session = payload.session()?;

        let mut aggregator = ScanResultAggregator::new()
            .with_fallback_image(&self.config.display.fallback_image);
        if let Some(area) = area {
            aggregator.set_active_area(AreaKey::from(area));
        }
        Ok(aggregator.view(session, payload.result.as_ref()))
    }
}

/// Error response for handlers
pub struct WebError(CatScanError);

impl From<CatScanError> for WebError {
    fn from(err: CatScanError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CatScanError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            CatScanError::MissingSession => {
                error!("Refusing to render a result view without a session");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            other => {
                error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.0.to_string()).into_response()
    }
}

type WebResult<T> = std::result::Result<T, WebError>;

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(index_page))
        .route("/scans/:id", get(scan_page))
        // API endpoints
        .route("/api/scans", get(api_list_scans))
        .route("/api/scans/:id/view", get(api_scan_view))
        .route("/api/areas", get(api_areas))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct AreaQuery {
    area: Option<String>,
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct IndexRow {
    id: u64,
    status: String,
    scan_type: Option<String>,
    abnormal_count: usize,
    created_at: Option<String>,
}

// === Page Handlers ===

async fn index_page(State(state): State<Arc<AppState>>) -> WebResult<Html<String>> {
    let payloads = state.store.latest(state.config.display.recent_limit)?;

    let rows: Vec<IndexRow> = payloads
        .iter()
        .filter_map(|p| {
            let session = p.session.as_ref()?;
            Some(IndexRow {
                id: session.id,
                status: session.status.to_string(),
                scan_type: session.scan_type.clone(),
                abnormal_count: compute_summary(p.result.as_ref()).abnormal_count,
                created_at: session.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            })
        })
        .collect();

    let html = state
        .templates
        .get_template("index.html")
        .and_then(|t| t.render(context! { rows => rows }))
        .map_err(CatScanError::from)?;
    Ok(Html(html))
}

async fn scan_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<AreaQuery>,
) -> WebResult<Html<String>> {
    let view = state.scan_view(id, query.area.as_deref())?;

    let html = state
        .templates
        .get_template("scan.html")
        .and_then(|t| t.render(context! { view => view }))
        .map_err(CatScanError::from)?;
    Ok(Html(html))
}

// === API Handlers ===

async fn api_list_scans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> WebResult<Json<Vec<ScanPayload>>> {
    let limit = query.limit.unwrap_or(state.config.display.recent_limit);
    Ok(Json(state.store.latest(limit)?))
}

async fn api_scan_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(query): Query<AreaQuery>,
) -> WebResult<Json<ScanResultView>> {
    Ok(Json(state.scan_view(id, query.area.as_deref())?))
}

async fn api_areas() -> Json<&'static [AreaMeta]> {
    Json(&AREAS)
}

/// Start the web server
pub async fn start_server(config: AppConfig) -> Result<()> {
    let addr = format!("{}:{}", config.web.host, config.web.port);
    let state = Arc::new(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Result pages available at http://{}", addr);
    info!("Payload store: {:?}", state.store.path());

    let router = create_router(state);
    axum::serve(listener, router).await?;

    Ok(())
}
