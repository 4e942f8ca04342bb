use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use finguard_core::UserIdentity;

use crate::dto::{ChangePasswordRequest, SetPasswordRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn set_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .profile_service
        .set_initial_password(&user, payload.password.as_str())
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .profile_service
        .change_password(
            &user,
            payload.current_password.as_str(),
            payload.new_password.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
