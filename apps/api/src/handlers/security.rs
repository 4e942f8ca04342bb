use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use finguard_core::UserIdentity;

use crate::dto::{SecurityMetricsResponse, UnblockUserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct SecurityMetricsQuery {
    pub user_id: Option<String>,
}

pub async fn security_metrics_handler(
    State(state): State<AppState>,
    Query(query): Query<SecurityMetricsQuery>,
) -> ApiResult<Json<SecurityMetricsResponse>> {
    let metrics = state
        .admission_guard
        .detector()
        .security_metrics(query.user_id.as_deref());

    Ok(Json(SecurityMetricsResponse::from(metrics)))
}

pub async fn unblock_user_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UnblockUserResponse>> {
    let reset = state
        .admission_guard
        .detector()
        .reset_user(user_id.as_str(), admin.subject());

    Ok(Json(UnblockUserResponse { user_id, reset }))
}
