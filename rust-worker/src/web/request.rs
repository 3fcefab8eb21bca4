//! Immutable view of one inbound HTTP call.

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{HeaderMap, HeaderValue, Method},
};
use tracing::warn;

/// Method, headers and the exact body bytes of a webhook delivery.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    headers: HeaderMap,
    body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            headers,
            body,
        }
    }

    /// Build a request by reading `body` in full.
    ///
    /// A body that cannot be read (transport error, over `limit`) is treated
    /// as empty.
    pub async fn read(method: Method, headers: HeaderMap, body: Body, limit: usize) -> Self {
        let body = match to_bytes(body, limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, limit, "webhook_body_unreadable");
                Bytes::new()
            }
        };
        Self::new(method, headers, body)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw body exactly as received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// First value of a header. Repeated headers keep their order.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get_all(name).iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_body() {
        let request = InboundRequest::read(
            Method::POST,
            HeaderMap::new(),
            Body::from(r#"{"event":"x"}"#),
            1024,
        )
        .await;

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.body(), br#"{"event":"x"}"#);
    }

    #[tokio::test]
    async fn test_oversized_body_is_empty() {
        let request =
            InboundRequest::read(Method::POST, HeaderMap::new(), Body::from("0123456789"), 4).await;

        assert!(request.body().is_empty());
    }

    #[test]
    fn test_repeated_header_uses_first_value() {
        let mut headers = HeaderMap::new();
        headers.append("X-Hub-Signature", HeaderValue::from_static("sha1=aa"));
        headers.append("X-Hub-Signature", HeaderValue::from_static("sha1=bb"));
        let request = InboundRequest::new(Method::POST, headers, Bytes::new());

        assert_eq!(
            request.header("x-hub-signature"),
            Some(&HeaderValue::from_static("sha1=aa"))
        );
        assert_eq!(request.header("X-Other"), None);
    }
}
