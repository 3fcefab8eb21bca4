//! Request classification.
//!
//! Rejects anything that is not a POST with a strictly valid JSON body. The
//! raw bytes stay on the request for signature verification.

use axum::http::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::WebhookError;
use crate::web::request::InboundRequest;

/// Decode the body of a POST request.
pub fn classify(request: &InboundRequest) -> Result<Value, WebhookError> {
    if request.method() != Method::POST {
        debug!(method = %request.method(), "webhook_method_rejected");
        return Err(WebhookError::MethodNotAllowed);
    }

    serde_json::from_slice(request.body()).map_err(|e| {
        warn!(
            error = %e,
            body_length = request.body().len(),
            "webhook_json_invalid"
        );
        WebhookError::InvalidJson(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderMap;
    use serde_json::json;

    fn request(method: Method, body: &'static str) -> InboundRequest {
        InboundRequest::new(method, HeaderMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn test_non_post_is_rejected() {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::HEAD, Method::PATCH] {
            let result = classify(&request(method, r#"{"event":"x"}"#));
            assert!(matches!(result, Err(WebhookError::MethodNotAllowed)));
        }
    }

    #[test]
    fn test_valid_json() {
        let document = classify(&request(Method::POST, r#"{"event":"x","project_id":1}"#)).unwrap();
        assert_eq!(document, json!({"event": "x", "project_id": 1}));
    }

    #[test]
    fn test_invalid_json() {
        for body in ["", "{", "{\"event\":}", "{} trailing", "not json"] {
            let result = classify(&request(Method::POST, body));
            assert!(
                matches!(result, Err(WebhookError::InvalidJson(_))),
                "body {body:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_object_json_is_accepted() {
        assert_eq!(classify(&request(Method::POST, "[1,2]")).unwrap(), json!([1, 2]));
    }
}
