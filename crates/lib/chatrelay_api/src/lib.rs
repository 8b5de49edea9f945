//! # chatrelay_api
//!
//! HTTP API library for the chat relay.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use chatrelay_core::RelayResult;
use chatrelay_core::client::ChatClient;
use chatrelay_core::process::TextProcessor;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{chat, home};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Upstream chat API client.
    pub client: ChatClient,
    /// Reply post-processor.
    pub processor: Arc<TextProcessor>,
}

impl AppState {
    /// Builds the upstream client and processor from `config`.
    pub fn new(config: ApiConfig) -> RelayResult<Self> {
        let client = ChatClient::new(config.chat.clone())?;
        let processor = TextProcessor::default().with_escape_html(config.escape_html);
        Ok(Self {
            config,
            client,
            processor: Arc::new(processor),
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home::landing_page).post(chat::chat_handler))
        .layer(cors)
        .with_state(state)
}
