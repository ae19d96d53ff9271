//! parley: HTTP relay between clients and a generative language model.
//!
//! Accepts questions over HTTP, forwards them to the model as turns of a
//! single ongoing conversation, and keeps an ordered, prunable history of
//! every answered question.

mod cli;
mod error;
mod handlers;
mod server;
mod state;

#[cfg(test)]
mod tests;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use parley_ai::{ConversationSession, GeminiClient, GeminiConfig};
use parley_common::ParleyError;
use parley_config::{ConfigSource, ParleyConfig};
use parley_history::HistoryLedger;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::state::AppState;

fn init_logging(level: &str) {
    let directive = format!("parley={level},tower_http={level}");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();
}

/// Build the conversation session from the model section and the resolved key.
fn build_session(config: &ParleyConfig, api_key: String) -> Result<ConversationSession, ParleyError> {
    let model = &config.model;
    let client = GeminiClient::new(
        GeminiConfig::new(api_key)
            .with_model(&model.name)
            .with_api_base(&model.api_base)
            .with_max_tokens(model.max_tokens)
            .with_temperature(model.temperature),
    )
    .map_err(|e| ParleyError::Ai(e.to_string()))?;

    let mut session = ConversationSession::new(Arc::new(client))
        .with_streaming(model.stream)
        .with_turn_timeout(Duration::from_secs(u64::from(model.request_timeout_secs)));
    if let Some(ref prompt) = model.system_prompt {
        session = session.with_system_prompt(prompt);
    }
    Ok(session)
}

async fn run(args: Args, mut config: ParleyConfig) -> Result<(), ParleyError> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = u32::from(port);
    }
    tracing::debug!("Effective config: {}", parley_config::config_to_json(&config));

    // No credential, no server.
    let api_key = parley_config::resolve_api_key(&config.model.api_key_env)?;
    let session = build_session(&config, api_key)?;
    tracing::info!(
        model = %config.model.name,
        streaming = config.model.stream,
        "Conversation session ready"
    );

    let state = AppState::new(session, HistoryLedger::new());
    let app = server::router(state.clone(), config.server.cors_permissive);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ParleyError::Server(format!("failed to bind {addr}: {e}")))?;

    server::run_server(listener, app, server::shutdown_signal()).await?;

    tracing::info!(
        turns = state.session.turn_count().await,
        history = state.ledger.len().await,
        "Shutdown complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = parley_config::load_dotenv();
    let args = cli::parse();
    let config = parley_config::load_config(args.config.as_deref());

    let level = args.log_level.clone().unwrap_or_else(|| {
        config
            .as_ref()
            .map(|(c, _)| c.logging.level)
            .unwrap_or_default()
            .as_directive()
            .to_string()
    });
    init_logging(&level);

    tracing::info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(Some(path)) => tracing::info!("Loaded environment from {}", path.display()),
        Ok(None) => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("{e}"),
    }

    let config = match config {
        Ok((config, ConfigSource::File(path))) => {
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        Ok((config, ConfigSource::CreatedDefault(path))) => {
            tracing::info!("Created default config at {}", path.display());
            config
        }
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {e}");
            ExitCode::FAILURE
        }
    }
}
