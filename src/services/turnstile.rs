//! Cloudflare Turnstile server-side verification.
//!
//! <https://developers.cloudflare.com/turnstile/get-started/server-side-validation/>

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    #[error("Request Error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize)]
struct VerifyParameters<'a> {
    secret: &'a str,
    response: &'a str,
    remoteip: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawVerifyResponse {
    #[serde(default)]
    success: bool,

    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

pub struct TurnstileClient {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
}

impl TurnstileClient {
    pub fn new(secret: String, verify_url: String) -> Result<TurnstileClient, reqwest::Error> {
        Self::with_timeout(secret, verify_url, VERIFY_TIMEOUT)
    }

    pub fn with_timeout(
        secret: String,
        verify_url: String,
        timeout: Duration,
    ) -> Result<TurnstileClient, reqwest::Error> {
        Ok(TurnstileClient {
            client: super::create_service_client(timeout)?,
            secret,
            verify_url,
        })
    }

    /// True only when the challenge service explicitly reports success.
    ///
    /// Missing tokens, transport failures and unparseable replies all count
    /// as a failed verification.
    pub async fn verify(&self, token: Option<&str>, remote_ip: &str) -> bool {
        let token = match token.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => {
                tracing::debug!("Turnstile token missing");
                return false;
            }
        };

        match self.try_verify(token, remote_ip).await {
            Ok(success) => success,
            Err(e) => {
                tracing::warn!("Turnstile verification errored: {e}");
                false
            }
        }
    }

    async fn try_verify(&self, token: &str, remote_ip: &str) -> Result<bool, CaptchaError> {
        tracing::debug!("Sending Turnstile verification");

        let params = VerifyParameters {
            secret: &self.secret,
            response: token,
            remoteip: remote_ip,
        };

        let full = self
            .client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await?
            .bytes()
            .await?;

        let response: RawVerifyResponse = serde_json::from_slice(&full)?;

        if !response.success && !response.error_codes.is_empty() {
            tracing::debug!("Turnstile error codes: {:?}", response.error_codes);
        }

        Ok(response.success)
    }
}
