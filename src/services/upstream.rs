use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::UpstreamCredentials;
use crate::models::invite::{CreateInvitesPayload, InviteOutcome};
use crate::models::stats::{InvitesPage, Subscription, SubscriptionStats};

pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

const WEB_ORIGIN: &str = "https://chatgpt.com";
const WEB_REFERER: &str = "https://chatgpt.com/";
const ACCOUNT_ID_HEADER: HeaderName = HeaderName::from_static("chatgpt-account-id");

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Request Error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// Client for the team administration API.
///
/// Every call is attempted exactly once; failures are handed back as-is.
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    credentials: UpstreamCredentials,
}

impl UpstreamClient {
    pub fn new(
        base_url: &str,
        credentials: UpstreamCredentials,
    ) -> Result<UpstreamClient, reqwest::Error> {
        Self::with_timeout(base_url, credentials, UPSTREAM_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        credentials: UpstreamCredentials,
        timeout: Duration,
    ) -> Result<UpstreamClient, reqwest::Error> {
        Ok(UpstreamClient {
            client: super::create_service_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.credentials.account_id
    }

    fn base_headers(&self) -> Result<HeaderMap, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9"),
        );
        let mut auth = HeaderValue::from_str(&bearer(&self.credentials.authorization_token))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            ACCOUNT_ID_HEADER,
            HeaderValue::from_str(&self.credentials.account_id)?,
        );
        Ok(headers)
    }

    fn invite_headers(&self) -> Result<HeaderMap, UpstreamError> {
        let mut headers = self.base_headers()?;
        headers.insert(header::ORIGIN, HeaderValue::from_static(WEB_ORIGIN));
        headers.insert(header::REFERER, HeaderValue::from_static(WEB_REFERER));
        headers.insert(
            HeaderName::from_static("sec-ch-ua"),
            HeaderValue::from_static(
                r#""Chromium";v="135", "Not)A;Brand";v="99", "Google Chrome";v="135""#,
            ),
        );
        headers.insert(
            HeaderName::from_static("sec-ch-ua-mobile"),
            HeaderValue::from_static("?0"),
        );
        headers.insert(
            HeaderName::from_static("sec-ch-ua-platform"),
            HeaderValue::from_static(r#""Windows""#),
        );
        Ok(headers)
    }

    /// GET `/subscriptions?account_id=..`. Non-2xx is an error.
    pub async fn fetch_subscription(&self) -> Result<Subscription, UpstreamError> {
        let req = self
            .client
            .get(format!("{}/subscriptions", self.base_url))
            .headers(self.base_headers()?)
            .query(&[("account_id", self.account_id())]);

        get_json(req).await
    }

    /// Reads `total` from the invites listing; asks for a single row only.
    pub async fn fetch_pending_invite_count(&self) -> Result<Option<Value>, UpstreamError> {
        let req = self
            .client
            .get(self.invites_url())
            .headers(self.base_headers()?)
            .query(&[("offset", "0"), ("limit", "1"), ("query", "")]);

        let page: InvitesPage = get_json(req).await?;
        Ok(page.total)
    }

    /// Subscription and pending invite count merged into one record.
    pub async fn fetch_stats(&self) -> Result<SubscriptionStats, UpstreamError> {
        let sub = self.fetch_subscription().await?;
        let pending = self.fetch_pending_invite_count().await?;
        Ok(SubscriptionStats::merge(sub, pending))
    }

    /// POST the invites. Any HTTP status is returned to the caller; only
    /// transport failures are errors.
    pub async fn send_invite(&self, emails: &[String]) -> Result<InviteOutcome, UpstreamError> {
        let res = self
            .client
            .post(self.invites_url())
            .headers(self.invite_headers()?)
            .json(&CreateInvitesPayload::new(emails))
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(InviteOutcome { status, body })
    }

    fn invites_url(&self) -> String {
        format!("{}/accounts/{}/invites", self.base_url, self.account_id())
    }
}

fn bearer(token: &str) -> String {
    let token = token.trim();
    if token.starts_with("Bearer") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

async fn get_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, UpstreamError> {
    let res = ensure_success(req.send().await?).await?;
    let full = res.bytes().await?;
    Ok(serde_json::from_slice(&full)?)
}

async fn ensure_success(res: Response) -> Result<Response, UpstreamError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "Upstream rejected request: {body}");

    Err(UpstreamError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: &str) -> UpstreamClient {
        UpstreamClient::new(
            "http://localhost/backend-api/",
            UpstreamCredentials {
                account_id: "acct-1".into(),
                authorization_token: token.into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn bearer_prefix_is_added_once() {
        assert_eq!(bearer("abc"), "Bearer abc");
        assert_eq!(bearer("Bearer abc"), "Bearer abc");
        assert_eq!(bearer("  abc "), "Bearer abc");
    }

    #[test]
    fn base_headers_carry_credentials() {
        let headers = client("tok").base_headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer tok");
        assert_eq!(headers["chatgpt-account-id"], "acct-1");
        assert_eq!(headers[header::ACCEPT], "*/*");
    }

    #[test]
    fn invite_headers_extend_base_headers() {
        let headers = client("tok").invite_headers().unwrap();
        assert_eq!(headers[header::ORIGIN], WEB_ORIGIN);
        assert_eq!(headers[header::REFERER], WEB_REFERER);
        assert_eq!(headers["sec-ch-ua-mobile"], "?0");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn invalid_token_is_a_header_error() {
        let err = client("bad\ntoken").base_headers().unwrap_err();
        assert!(matches!(err, UpstreamError::Header(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(
            client("tok").invites_url(),
            "http://localhost/backend-api/accounts/acct-1/invites"
        );
    }
}
