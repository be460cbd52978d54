// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_query_tool::{
    build_router, AppError, AppState, CommandLineInput, NotionHttpClient, Relay, ServerConfig,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(config: &ServerConfig) -> Result<(), AppError> {
    let log_level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if config.verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&config.log_file)?;

    let log_config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )
        .map_err(|e| AppError::Logging(e.to_string()))?;

    log4rs::init_config(log_config).map_err(|e| AppError::Logging(e.to_string()))?;
    log::info!("Logging initialized. Log file: {}", config.log_file.display());
    Ok(())
}

/// Wires the relay, templates, and router together and serves until shutdown.
async fn serve(config: ServerConfig) -> Result<(), AppError> {
    let bind_addr = config.bind_addr;

    let client = NotionHttpClient::new(config.notion_base_url.clone())?;
    log::info!("Relaying queries to {}", client.base_url());
    if let Some(public) = &config.public_base_url {
        log::info!("Generated links use {}", public);
    }
    if !config.accept_legacy_token_param {
        log::info!("Legacy 'sak' token parameter is disabled");
    }

    let relay = Relay::new(Arc::new(client));
    let state = AppState::new(config, relay)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    log::info!("🚀 Notion Query Tool listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();
    let config = ServerConfig::resolve(cli)?;

    setup_logging(&config)?;
    log::debug!("Resolved configuration: {:?}", config);

    if let Err(e) = serve(config).await {
        log::error!("❌ Server stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
