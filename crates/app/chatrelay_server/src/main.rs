//! Chat relay server binary.
//!
//! Serves the landing page on `GET /` and relays prompts on `POST /`.

use std::time::Duration;

use chatrelay_api::config::ApiConfig;
use chatrelay_core::client::{DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use clap::Parser;
use tracing::info;

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_server", about = "Chat relay HTTP server")]
struct Args {
    /// Bearer credential for the upstream chat API.
    #[arg(long, env = "COHERE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Upstream chat endpoint.
    #[arg(long, env = "CHAT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Model identifier sent upstream.
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// System instruction prepended to every prompt.
    #[arg(long, env = "CHAT_SYSTEM_PROMPT", default_value = DEFAULT_SYSTEM_PROMPT)]
    system_prompt: String,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Embed reply text without HTML escaping.
    #[arg(long, env = "NO_ESCAPE_HTML")]
    no_escape_html: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,chatrelay_api=debug,chatrelay_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::new(args.api_key);
    config.bind_addr = format!("{}:{}", args.host, args.port);
    config.chat.api_url = args.api_url;
    config.chat.model = args.model;
    config.chat.system_prompt = args.system_prompt;
    config.chat.timeout = Duration::from_secs(args.timeout_secs);
    config.escape_html = !args.no_escape_html;

    info!(
        version = chatrelay_core::version(),
        api_url = %config.chat.api_url,
        model = %config.chat.model,
        timeout_secs = args.timeout_secs,
        escape_html = config.escape_html,
        "starting chatrelay_server"
    );

    let state = chatrelay_api::AppState::new(config.clone())?;
    let app = chatrelay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, "relay listening");

    axum::serve(listener, app).await?;

    Ok(())
}
