//! Client connection metadata extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Best-effort client metadata recorded alongside check-ins.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Resolve the client IP from proxy headers. The first entry of
    /// `X-Forwarded-For` is the original client when behind a proxy chain.
    fn ip_from_headers(parts: &Parts) -> Option<String> {
        if let Some(forwarded) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let trimmed = first.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }

        parts
            .headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip_address = Self::ip_from_headers(parts);
        let user_agent = parts
            .headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Ok(ClientInfo {
            ip_address,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> ClientInfo {
        let (mut parts, _) = request.into_parts();
        ClientInfo::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_forwarded_for_first_entry_wins() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header("x-real-ip", "10.0.0.1")
            .body(())
            .unwrap();

        let info = extract(request).await;
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.9"));
    }

    #[tokio::test]
    async fn test_falls_back_to_real_ip() {
        let request = Request::builder()
            .header("x-real-ip", "198.51.100.7")
            .body(())
            .unwrap();

        let info = extract(request).await;
        assert_eq!(info.ip_address.as_deref(), Some("198.51.100.7"));
    }

    #[tokio::test]
    async fn test_captures_user_agent() {
        let request = Request::builder()
            .header("user-agent", "Mozilla/5.0")
            .body(())
            .unwrap();

        let info = extract(request).await;
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_absent_headers_yield_none() {
        let request = Request::builder().body(()).unwrap();
        let info = extract(request).await;
        assert!(info.ip_address.is_none());
        assert!(info.user_agent.is_none());
    }
}
