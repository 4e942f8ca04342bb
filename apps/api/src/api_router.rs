mod cors;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use finguard_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let protected_routes = Router::new()
        .route(
            "/api/transactions",
            get(handlers::list_transactions_handler).post(handlers::create_transaction_handler),
        )
        .route(
            "/api/profile/password",
            post(handlers::set_password_handler).put(handlers::change_password_handler),
        )
        .route_layer(from_fn(middleware::require_identity));

    // Layers run bottom-up: identity first, then the admin token.
    let admin_routes = Router::new()
        .route(
            "/api/security/metrics",
            get(handlers::security_metrics_handler),
        )
        .route(
            "/api/security/users/{user_id}/unblock",
            post(handlers::unblock_user_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin,
        ))
        .route_layer(from_fn(middleware::require_identity));

    Ok(Router::new()
        .route("/health", get(handlers::health_handler))
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
