mod routes;
mod types;

use crate::ai::AiProvider;
use crate::config::AppConfig;
use crate::http::routes::*;
use crate::whatsapp::MessageSender;
use axum::http::{HeaderName, HeaderValue};
use axum::routing::get;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<AppConfig>,
    pub ai: Arc<dyn AiProvider>,
    pub sender: Arc<dyn MessageSender>,
}

pub fn create_app(
    config: AppConfig,
    ai: Arc<dyn AiProvider>,
    sender: Arc<dyn MessageSender>,
) -> axum::Router {
    let state = HttpState {
        config: Arc::new(config),
        ai,
        sender,
    };

    axum::Router::new()
        .route("/", get(liveness))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-version"),
            HeaderValue::from_static(crate::VERSION),
        ))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}
