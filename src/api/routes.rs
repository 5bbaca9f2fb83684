use crate::api::handlers::{health, metadata, views};
use crate::services::QueryService;
use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::Level;

pub fn create_router(service: QueryService) -> Router {
    let public_routes = Router::new().route("/health", get(health::health));

    // Callers arrive with a resolved home_id; identity is handled upstream
    let api_routes = Router::new()
        .route("/api/v1/homes", get(metadata::list_homes))
        .route("/api/v1/appliances", get(metadata::list_appliances))
        .route("/api/v1/live/home", get(views::live_home))
        .route("/api/v1/timeseries/home-daily", get(views::home_daily))
        .route(
            "/api/v1/timeseries/appliance-daily",
            get(views::appliance_daily),
        )
        .route(
            "/api/v1/timeseries/all-appliances-daily",
            get(views::all_appliances_daily),
        )
        .route("/api/v1/cost/peak-offpeak-daily", get(views::tou_daily))
        .route("/api/v1/views/{view}", get(views::by_name));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(service)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::INFO,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                )
                .on_failure(
                    |_error: tower_http::classify::ServerErrorsFailureClass,
                     _latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::ERROR, "request failed");
                    },
                ),
        )
}
