use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::user_service::UserService;

use crate::openapi::ApiDoc;

pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: user endpoints, health and the OpenAPI document.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // Literal segments (`search`, `new`) win over `:username`.
    // `get()` would also answer HEAD, so HEAD is routed to the 405 handler explicitly.
    let user_routes = Router::new()
        .route(
            "/api/v1.0/users/",
            get(users::list_users).head(users::method_not_allowed).fallback(users::method_not_allowed),
        )
        .route(
            "/api/v1.0/users/search/",
            get(users::search_users).head(users::method_not_allowed).fallback(users::method_not_allowed),
        )
        .route("/api/v1.0/users/new/", post(users::create_user).fallback(users::method_not_allowed))
        .route(
            "/api/v1.0/users/:username/",
            get(users::get_user).head(users::method_not_allowed).fallback(users::method_not_allowed),
        )
        .route("/api/v1.0/users/:username/edit/", put(users::update_user).fallback(users::method_not_allowed))
        .route(
            "/api/v1.0/users/:username/remove/",
            delete(users::delete_user).fallback(users::delete_method_not_allowed),
        );

    public
        .merge(user_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
