mod cli;
mod client_ip;
mod config;
mod emails;
mod error;
mod models;
mod routes;
mod services;
mod stats_cache;
#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::Config;
use services::turnstile::TurnstileClient;
use services::upstream::UpstreamClient;
use stats_cache::StatsCache;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<UpstreamClient>,
    pub captcha: Arc<TurnstileClient>,
    pub stats: Arc<StatsCache>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config.upstream_base_url, config.credentials.clone())?;
        let captcha = TurnstileClient::new(
            config.turnstile_secret_key.clone(),
            config.turnstile_verify_url.clone(),
        )?;
        let stats = StatsCache::new(Duration::from_secs(config.stats_cache_ttl_secs));

        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            captcha: Arc::new(captcha),
            stats: Arc::new(stats),
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    if !config.credentials.is_complete() {
        tracing::warn!("ACCOUNT_ID or AUTHORIZATION_TOKEN is not set; upstream calls will be rejected");
    }

    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(config).await;
            ExitCode::SUCCESS
        }
        Command::Invite { emails } => cli::invite(&config, &emails).await,
        Command::Status => cli::status(&config).await,
    }
}

async fn serve(config: Config) {
    if config.turnstile_secret_key.is_empty() {
        tracing::warn!("CF_TURNSTILE_SECRET_KEY is not set; every invite will fail verification");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config).expect("failed to build HTTP clients");
    let app = routes::app(state);

    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
