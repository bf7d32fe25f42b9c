//! Server configuration from the environment

use std::net::SocketAddr;

use anyhow::Context;
use soulcard::CompletionConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub completion: CompletionConfig,
}

impl ServerConfig {
    /// Reads `SOULCARD_BIND_ADDR` plus the completion variables.
    /// A missing API key is not fatal: every model-backed call then reports a config error.
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = std::env::var("SOULCARD_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw
            .parse()
            .with_context(|| format!("invalid SOULCARD_BIND_ADDR: {raw}"))?;

        let completion = CompletionConfig::from_env();
        if !completion.has_api_key() {
            tracing::warn!("⚠️  No DEEPSEEK_API_KEY set - model-backed endpoints will fail");
        }

        Ok(Self {
            bind_addr,
            completion,
        })
    }
}
