// src/config.rs
use crate::constants::{DEFAULT_BIND_ADDR, NOTION_API_BASE_URL};
use crate::error::AppError;
use crate::types::{ValidatedUrl, ValidationError};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default log file location inside the system temp dir.
fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("notion_query_tool.log")
}

/// Parsed command-line input.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Address to listen on (defaults to 0.0.0.0:$PORT when PORT is set, else 127.0.0.1:9002)
    #[arg(long)]
    pub bind: Option<String>,

    /// Root of the Notion API (defaults to $NOTION_API_BASE_URL, else https://api.notion.com/v1)
    #[arg(long)]
    pub notion_base_url: Option<String>,

    /// Absolute origin used when generating shareable links (links are relative otherwise)
    #[arg(long)]
    pub public_base_url: Option<String>,

    /// Log file path (defaults to the system temp dir)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Reject the deprecated `sak` token query parameter
    #[arg(long, default_value_t = false)]
    pub no_legacy_token_param: bool,
}

/// Resolved server configuration, validated and ready to serve.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub notion_base_url: ValidatedUrl,
    pub public_base_url: Option<ValidatedUrl>,
    pub log_file: PathBuf,
    pub verbose: bool,
    /// Whether `sak` is still accepted as an alias for `api_key`.
    pub accept_legacy_token_param: bool,
}

impl ServerConfig {
    /// Resolves a complete server configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with_env(cli, |name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::resolve`] with an injectable environment lookup.
    pub fn resolve_with_env<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = resolve_bind_addr(cli.bind.as_deref(), env("PORT").as_deref())?;

        let notion_base_url = cli
            .notion_base_url
            .or_else(|| env("NOTION_API_BASE_URL").filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| NOTION_API_BASE_URL.to_string());
        let notion_base_url = ValidatedUrl::parse(notion_base_url.trim())?;

        let public_base_url = cli
            .public_base_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ValidatedUrl::parse)
            .transpose()?;

        Ok(ServerConfig {
            bind_addr,
            notion_base_url,
            public_base_url,
            log_file: cli
                .log_file
                .map(PathBuf::from)
                .unwrap_or_else(default_log_file),
            verbose: cli.verbose,
            accept_legacy_token_param: !cli.no_legacy_token_param,
        })
    }
}

fn resolve_bind_addr(bind: Option<&str>, port: Option<&str>) -> Result<SocketAddr, AppError> {
    let candidate = match (bind, port.map(str::trim).filter(|p| !p.is_empty())) {
        (Some(addr), _) => addr.trim().to_string(),
        (None, Some(port)) => format!("0.0.0.0:{}", port),
        (None, None) => DEFAULT_BIND_ADDR.to_string(),
    };

    candidate.parse::<SocketAddr>().map_err(|e| {
        AppError::from(ValidationError::InvalidBindAddress {
            addr: candidate.clone(),
            reason: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve_with_env(CommandLineInput::default(), no_env).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9002");
        assert_eq!(config.notion_base_url.as_str(), "https://api.notion.com/v1");
        assert!(config.public_base_url.is_none());
        assert!(config.accept_legacy_token_param);
        assert!(config.log_file.ends_with("notion_query_tool.log"));
    }

    #[test]
    fn test_port_env_binds_all_interfaces() {
        let config = ServerConfig::resolve_with_env(CommandLineInput::default(), |name| {
            (name == "PORT").then(|| "8080".to_string())
        })
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_flags_win_over_env() {
        let cli = CommandLineInput {
            bind: Some("127.0.0.1:3000".into()),
            notion_base_url: Some("http://localhost:4010/v1".into()),
            no_legacy_token_param: true,
            ..Default::default()
        };
        let config = ServerConfig::resolve_with_env(cli, |name| match name {
            "PORT" => Some("8080".into()),
            "NOTION_API_BASE_URL" => Some("https://proxy.example.com".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.notion_base_url.as_str(), "http://localhost:4010/v1");
        assert!(!config.accept_legacy_token_param);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let cli = CommandLineInput {
            bind: Some("nowhere".into()),
            ..Default::default()
        };
        assert!(ServerConfig::resolve_with_env(cli, no_env).is_err());

        let cli = CommandLineInput {
            public_base_url: Some("ftp://example.com".into()),
            ..Default::default()
        };
        assert!(ServerConfig::resolve_with_env(cli, no_env).is_err());
    }
}
