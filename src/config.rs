use std::env;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://chatgpt.com/backend-api";
pub const DEFAULT_STATS_CACHE_TTL_SECS: u64 = 60;
pub const MAX_STATS_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

pub const DEFAULT_TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Account and token used on every upstream call.
#[derive(Clone)]
pub struct UpstreamCredentials {
    pub account_id: String,
    pub authorization_token: String,
}

impl UpstreamCredentials {
    pub fn is_complete(&self) -> bool {
        !self.account_id.trim().is_empty() && !self.authorization_token.trim().is_empty()
    }
}

// Tokens must not end up in logs.
impl std::fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("account_id", &self.account_id)
            .field("authorization_token", &"<redacted>")
            .finish()
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub credentials: UpstreamCredentials,
    pub upstream_base_url: String,
    pub turnstile_secret_key: String,
    pub turnstile_site_key: String,
    pub turnstile_verify_url: String,
    pub stats_cache_ttl_secs: u64,
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(39001),
            credentials: UpstreamCredentials {
                account_id: env::var("ACCOUNT_ID").unwrap_or_default(),
                authorization_token: env::var("AUTHORIZATION_TOKEN").unwrap_or_default(),
            },
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            turnstile_secret_key: env::var("CF_TURNSTILE_SECRET_KEY").unwrap_or_default(),
            turnstile_site_key: env::var("CF_TURNSTILE_SITE_KEY").unwrap_or_default(),
            turnstile_verify_url: env::var("TURNSTILE_VERIFY_URL")
                .unwrap_or_else(|_| DEFAULT_TURNSTILE_VERIFY_URL.to_string()),
            stats_cache_ttl_secs: stats_cache_ttl_secs(
                env::var("STATS_CACHE_TTL_SECS").ok().as_deref(),
            ),
            static_dir: env::var("STATIC_DIR").ok(),
        }
    }
}

/// Unparseable values fall back to the default; oversized ones are clamped.
fn stats_cache_ttl_secs(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return DEFAULT_STATS_CACHE_TTL_SECS;
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > MAX_STATS_CACHE_TTL_SECS => {
            tracing::warn!(
                "STATS_CACHE_TTL_SECS={secs} exceeds {MAX_STATS_CACHE_TTL_SECS}, clamping"
            );
            MAX_STATS_CACHE_TTL_SECS
        }
        Ok(secs) => secs,
        Err(e) => {
            tracing::warn!(
                "Invalid STATS_CACHE_TTL_SECS {raw:?} ({e}), using {DEFAULT_STATS_CACHE_TTL_SECS}"
            );
            DEFAULT_STATS_CACHE_TTL_SECS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_when_unset_or_invalid() {
        assert_eq!(stats_cache_ttl_secs(None), DEFAULT_STATS_CACHE_TTL_SECS);
        assert_eq!(stats_cache_ttl_secs(Some("soon")), DEFAULT_STATS_CACHE_TTL_SECS);
        assert_eq!(stats_cache_ttl_secs(Some("-5")), DEFAULT_STATS_CACHE_TTL_SECS);
    }

    #[test]
    fn ttl_is_read_and_clamped() {
        assert_eq!(stats_cache_ttl_secs(Some(" 0 ")), 0);
        assert_eq!(stats_cache_ttl_secs(Some("120")), 120);
        assert_eq!(
            stats_cache_ttl_secs(Some("18446744073709551615")),
            MAX_STATS_CACHE_TTL_SECS
        );
    }
}
