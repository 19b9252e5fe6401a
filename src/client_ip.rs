use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Originating address of the caller, as best it can be told.
///
/// Proxy headers win over the socket peer; `unknown` when nothing is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn from_parts(parts: &Parts) -> Self {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(ip) = header(CF_CONNECTING_IP) {
            return ClientIp(ip.to_string());
        }

        if let Some(first) = header(X_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return ClientIp(first.to_string());
        }

        match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => ClientIp(addr.ip().to_string()),
            None => ClientIp("unknown".to_string()),
        }
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn cloudflare_header_wins() {
        let p = parts(&[("CF-Connecting-IP", "1.1.1.1"), ("X-Forwarded-For", "2.2.2.2")]);
        assert_eq!(ClientIp::from_parts(&p).as_str(), "1.1.1.1");
    }

    #[test]
    fn first_forwarded_hop_is_used() {
        let p = parts(&[("X-Forwarded-For", " 3.3.3.3 , 10.0.0.1")]);
        assert_eq!(ClientIp::from_parts(&p).as_str(), "3.3.3.3");
    }

    #[test]
    fn socket_peer_then_unknown() {
        let mut p = parts(&[]);
        assert_eq!(ClientIp::from_parts(&p).as_str(), "unknown");

        p.extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 5000))));
        assert_eq!(ClientIp::from_parts(&p).as_str(), "192.168.1.9");
    }
}
