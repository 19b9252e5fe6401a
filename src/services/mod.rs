use std::time::Duration;

use reqwest::{Client, Error as ReqwestError};

pub mod turnstile;
pub mod upstream;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Outbound calls are single-shot, bounded by `timeout` end to end.
pub fn create_service_client(timeout: Duration) -> Result<Client, ReqwestError> {
    reqwest::ClientBuilder::new()
        .user_agent(BROWSER_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(1))
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
}
