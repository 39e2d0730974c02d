use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin::metrics;
use super::handlers::admin::reset;
use super::handlers::create_chirp::create_chirp;
use super::handlers::create_user::create_user;
use super::handlers::delete_chirp::delete_chirp;
use super::handlers::get_chirp::get_chirp;
use super::handlers::healthz::healthz;
use super::handlers::list_chirps::list_chirps;
use super::handlers::login::login;
use super::handlers::payment_webhook::payment_webhook;
use super::handlers::refresh::refresh;
use super::handlers::revoke::revoke;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::count_hits;
use crate::config::DEV_PLATFORM;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::metrics::HitCounter;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub chirp_service: Arc<dyn ChirpServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub hits: Arc<HitCounter>,
    pub platform: String,
}

impl AppState {
    pub fn is_dev_platform(&self) -> bool {
        self.platform == DEV_PLATFORM
    }
}

pub fn create_router(state: AppState, filepath_root: &str) -> Router {
    let public_routes = Router::new()
        .route("/api/healthz", get(healthz))
        .route("/api/users", post(create_user))
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/:chirp_id", get(get_chirp))
        .route("/api/polka/webhooks", post(payment_webhook))
        .route("/admin/metrics", get(metrics))
        .route("/admin/reset", post(reset));

    // Method routers merge, so GET /api/chirps stays public
    let protected_routes = Router::new()
        .route("/api/users", put(update_user))
        .route("/api/chirps", post(create_chirp))
        .route("/api/chirps/:chirp_id", delete(delete_chirp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let file_server = Router::new()
        .nest_service("/app", ServeDir::new(filepath_root))
        .layer(middleware::from_fn_with_state(state.clone(), count_hits));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers stay out of the span; they carry credentials
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(file_server)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
