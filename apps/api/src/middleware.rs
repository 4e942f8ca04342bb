use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use finguard_core::{AppError, NonEmptyString, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the subject verified by the upstream auth provider.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Optional header carrying the verified email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Header carrying the admin token for the security surface.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub async fn require_identity(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(AppError::Forbidden("admin surface is disabled".to_owned()).into());
    };

    let provided = header_value(request.headers(), ADMIN_TOKEN_HEADER).unwrap_or_default();
    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        return Err(AppError::Forbidden("admin token is invalid".to_owned()).into());
    }

    Ok(next.run(request).await)
}

pub fn identity_from_headers(headers: &HeaderMap) -> Result<UserIdentity, AppError> {
    let subject = header_value(headers, USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
        .and_then(|value| {
            NonEmptyString::new(value)
                .map_err(|_| AppError::Unauthorized("authentication required".to_owned()))
        })?;
    let email = header_value(headers, USER_EMAIL_HEADER).map(str::to_owned);

    Ok(UserIdentity::new(String::from(subject), email))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
        == 0
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::{USER_EMAIL_HEADER, USER_ID_HEADER, constant_time_eq, identity_from_headers};

    #[test]
    fn identity_requires_non_empty_subject() {
        let mut headers = HeaderMap::new();
        assert!(identity_from_headers(&headers).is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("   "));
        assert!(identity_from_headers(&headers).is_err());
    }

    #[test]
    fn identity_reads_subject_and_email() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("user-42"));
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("ana@example.com"));

        let identity = identity_from_headers(&headers).ok();
        assert_eq!(identity.as_ref().map(|identity| identity.subject()), Some("user-42"));
        assert_eq!(
            identity.as_ref().and_then(|identity| identity.email()),
            Some("ana@example.com")
        );
    }

    #[test]
    fn token_comparison_requires_exact_match() {
        assert!(constant_time_eq(b"secret-token", b"secret-token"));
        assert!(!constant_time_eq(b"secret-token", b"secret-tokex"));
        assert!(!constant_time_eq(b"secret", b"secret-token"));
    }
}
