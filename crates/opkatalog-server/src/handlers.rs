//! HTTP handlers, one per API operation.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use opkatalog_core::{DEFAULT_USER_ID, OperationDraft, OperationRecord};

use crate::error::ApiError;
use crate::state::AppState;

/// `user_id` query parameter, shared by the list, delete, and clear
/// endpoints.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl UserQuery {
    fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: i32,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkImportResponse {
    pub success: bool,
    pub imported: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub deleted: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub operations: Vec<OperationDraft>,
}

/// `GET /api/health`
///
/// Always answers 200; database trouble is reported as a field value, not
/// as an HTTP error.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.storage() {
        Ok(storage) => match storage.ping().await {
            Ok(()) => "connected".to_string(),
            Err(err) => format!("error: {err}"),
        },
        Err(_) => format!(
            "error: {}",
            state.config_error().unwrap_or("storage not configured")
        ),
    };

    Json(HealthResponse {
        status: "ok",
        database,
        timestamp: Utc::now().naive_utc(),
    })
}

/// `GET /api/operations?user_id=<id>`
pub async fn list_operations(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<OperationRecord>>, ApiError> {
    let records = state.storage()?.list(query.user_id()).await?;
    Ok(Json(records))
}

/// `POST /api/operations`
pub async fn create_operation(
    State(state): State<AppState>,
    Json(draft): Json<OperationDraft>,
) -> Result<Json<CreateResponse>, ApiError> {
    let id = state.storage()?.create(draft.user_id(), &draft).await?;
    Ok(Json(CreateResponse { id, success: true }))
}

/// `PUT /api/operations/{id}`
///
/// The response does not distinguish "matched and updated" from "no
/// matching row"; a cross-tenant or nonexistent id silently affects zero
/// rows. The match count is recorded at debug level.
pub async fn update_operation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(draft): Json<OperationDraft>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let matched = state
        .storage()?
        .update(id, draft.user_id(), &draft)
        .await?;
    debug!(id, matched, "update handled");
    Ok(Json(SuccessResponse { success: true }))
}

/// `DELETE /api/operations/{id}?user_id=<id>`
pub async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<UserQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.storage()?.delete(id, query.user_id()).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// `POST /api/operations/bulk`
///
/// All-or-nothing import; an empty batch is rejected before the store is
/// touched.
pub async fn bulk_import(
    State(state): State<AppState>,
    Json(request): Json<BulkImportRequest>,
) -> Result<Json<BulkImportResponse>, ApiError> {
    if request.operations.is_empty() {
        return Err(ApiError::bad_request("No operations provided"));
    }

    let user_id = request.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    let imported = state
        .storage()?
        .bulk_import(user_id, &request.operations)
        .await?;
    Ok(Json(BulkImportResponse {
        success: true,
        imported,
    }))
}

/// `DELETE /api/operations/clear?user_id=<id>`
pub async fn clear_operations(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ClearResponse>, ApiError> {
    let deleted = state.storage()?.clear(query.user_id()).await?;
    Ok(Json(ClearResponse {
        success: true,
        deleted,
    }))
}
