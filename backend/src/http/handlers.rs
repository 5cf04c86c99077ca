//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Table loading and page rendering run on the blocking pool.

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::dto::{
    HealthResponse, PageListResponse, PageQuery, SessionCreatedResponse, WidgetListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Page, PageInfo, PageView, SessionId};
use crate::models::Tables;
use crate::services::{declare_widgets, render_page};
use crate::store::checksum::{content_etag, etag_matches};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Media type of the downloadable notebook.
pub const NOTEBOOK_CONTENT_TYPE: &str = "application/x-ipynb+json";

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Navigation
// =============================================================================

/// GET /v1/pages
pub async fn list_pages() -> HandlerResult<PageListResponse> {
    Ok(Json(PageListResponse {
        pages: Page::ALL.into_iter().map(PageInfo::from).collect(),
        initial: Page::initial().key().to_string(),
    }))
}

// =============================================================================
// Sessions
// =============================================================================

fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    raw.parse::<SessionId>()
        .map_err(|e| AppError::BadRequest(format!("Invalid session id '{}': {}", raw, e)))
}

/// Tables of a session, loading them on the blocking pool on first use.
async fn session_tables(state: &AppState, raw_id: &str) -> Result<Arc<Tables>, AppError> {
    let id = parse_session_id(raw_id)?;
    let cache = state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;
    let source = state.source.clone();

    let tables = tokio::task::spawn_blocking(move || cache.tables(source.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;
    Ok(tables)
}

/// POST /v1/sessions
///
/// Open a session. Tables are loaded on the first page or widget request.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), AppError> {
    let id = state.sessions.create();
    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: id.to_string(),
            initial_page: Page::initial().key().to_string(),
        }),
    ))
}

/// DELETE /v1/sessions/{session_id}
///
/// End a session and drop its cached tables.
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&session_id)?;
    if state.sessions.end(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {} not found", id)))
    }
}

/// GET /v1/sessions/{session_id}/widgets
///
/// Sidebar widgets with defaults derived from the session's tables.
pub async fn get_widgets(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<WidgetListResponse> {
    let tables = session_tables(&state, &session_id).await?;
    Ok(Json(WidgetListResponse {
        widgets: declare_widgets(&tables),
    }))
}

/// GET /v1/sessions/{session_id}/pages/{page}
///
/// Render one page for the widget values in the query string.
pub async fn get_page(
    State(state): State<AppState>,
    Path((session_id, page)): Path<(String, String)>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HandlerResult<PageView> {
    let page = page
        .parse::<Page>()
        .map_err(AppError::NotFound)?;
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter_state = query.try_into_filter_state()?;

    let tables = session_tables(&state, &session_id).await?;
    let config = state.config.clone();
    let view = tokio::task::spawn_blocking(move || {
        render_page(&tables, &filter_state, page, &config.charts)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(view))
}

// =============================================================================
// Notebook download
// =============================================================================

/// GET /v1/notebook
///
/// Serve the analysis notebook verbatim as an attachment. Honours
/// `If-None-Match` with the content hash as entity tag.
pub async fn download_notebook(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = state.config.data.notebook_path();
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "Notebook {} not found",
                path.display()
            )))
        }
        Err(e) => {
            return Err(AppError::Internal(format!(
                "Failed to read notebook {}: {}",
                path.display(),
                e
            )))
        }
    };

    let etag = content_etag(&content);
    let etag_header = HeaderValue::from_str(&etag)
        .map_err(|e| AppError::Internal(format!("Invalid entity tag: {}", e)))?;

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| etag_matches(v, &etag));
    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_header)]).into_response());
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("notebook.ipynb")
        .replace('"', "");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .map_err(|e| AppError::Internal(format!("Invalid file name: {}", e)))?;

    tracing::debug!(bytes = content.len(), "Serving notebook {}", path.display());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(NOTEBOOK_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
            (header::ETAG, etag_header),
        ],
        Body::from(content),
    )
        .into_response())
}
