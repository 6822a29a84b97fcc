use axum::{Router, routing::post};
use axum::http::{header, HeaderName, Method};
use crate::handler::lead_handler::relay_lead_handler;
use crate::service::lead_relay_service::LeadRelayServiceImpl;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};


pub fn lead_router(service: Arc<LeadRelayServiceImpl>) -> Router {
    // The form posts from the public site, so any origin may call in
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/leads", post(relay_lead_handler))
        .layer(cors)
        .with_state(service)
}
