mod config;
mod db;
mod fal;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::fal::ImageGenerator;
use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to read .env");
        }
    }

    let config = config::ServerConfig::from_env();

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");

    // Generation collaborators are optional: missing credentials disable the
    // generation routes (503) but leave CRUD running.
    let images: Option<Arc<dyn ImageGenerator>> = match fal::FalClient::from_env() {
        Ok(client) => {
            tracing::info!(endpoint = client.endpoint(), "image generation enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "image generation not configured; generation disabled");
            None
        }
    };
    let llm: Option<Arc<dyn LlmChat>> = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; variations disabled");
            None
        }
    };

    let state = state::AppState::new(pool, images, llm);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, database = %config.database_url, "canvas server listening");
    axum::serve(listener, app).await.expect("server failed");
}
