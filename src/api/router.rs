use crate::api::handlers::{auth, event, health, live, profile};
use crate::api::middleware::rate_limit::{build_rate_limiter, rate_limit};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let rate_limiter = build_rate_limiter(state.config.rate_limit_per_minute);

    Router::new()
        .route("/health", get(health::health_check))

        // Accounts
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/profile", put(profile::update_profile).delete(profile::delete_profile))

        // Events
        .route("/events", post(event::create_event))
        .route("/events/{id}", put(event::update_event).delete(event::cancel_event))
        .route("/events/{id}/register", post(event::register_for_event))
        .route("/events/{id}/cancel-registration", post(event::cancel_registration))

        // Live updates
        .route("/live", get(live::live_updates))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit))
        .with_state(state)
}
