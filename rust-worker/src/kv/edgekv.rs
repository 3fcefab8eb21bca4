//! EdgeKV HTTP client.
//!
//! Items are written with
//! `PUT {base}/api/v1/namespaces/{namespace}/groups/{group}/items/{item}`
//! and a `text/plain` body, the same addressing the edge-side EdgeKV helper uses.
//! When a namespace token is configured it is sent as `X-Akamai-EdgeDB-Auth`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use tracing::{info, warn};

use super::{KvError, KvStore};
use crate::config::EdgeKvToken;

/// Header carrying the namespace access token.
pub const TOKEN_HEADER: &str = "X-Akamai-EdgeDB-Auth";

/// EdgeKV client bound to one namespace and group.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct EdgeKvClient {
    inner: Arc<EdgeKvInner>,
}

struct EdgeKvInner {
    client: Client,
    base_url: Url,
    namespace: String,
    group: String,
    token: Option<EdgeKvToken>,
}

impl EdgeKvClient {
    /// Create a client for `namespace`/`group` under `base_url`.
    pub fn new(
        base_url: &str,
        namespace: impl Into<String>,
        group: impl Into<String>,
        token: Option<EdgeKvToken>,
        timeout: Duration,
    ) -> Result<Self, KvError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| KvError::Config(format!("EdgeKV URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(KvError::Config(format!(
                "EdgeKV URL {base_url} cannot carry a path"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(EdgeKvInner {
                client,
                base_url,
                namespace: namespace.into(),
                group: group.into(),
                token,
            }),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn group(&self) -> &str {
        &self.inner.group
    }

    pub fn has_token(&self) -> bool {
        self.inner.token.is_some()
    }

    /// URL of a single item. The key is percent-encoded as one path segment.
    fn item_url(&self, key: &str) -> Result<Url, KvError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| KvError::Config("EdgeKV URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "v1",
                "namespaces",
                self.inner.namespace.as_str(),
                "groups",
                self.inner.group.as_str(),
                "items",
                key,
            ]);
        Ok(url)
    }
}

#[async_trait]
impl KvStore for EdgeKvClient {
    async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let url = self.item_url(key)?;

        let mut request = self
            .inner
            .client
            .put(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(value.to_string());
        if let Some(token) = &self.inner.token {
            request = request.header(TOKEN_HEADER, token.as_str());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                key = %key,
                status = status.as_u16(),
                namespace = %self.inner.namespace,
                group = %self.inner.group,
                "edgekv_put_rejected"
            );
            return Err(KvError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            key = %key,
            value_length = value.len(),
            namespace = %self.inner.namespace,
            group = %self.inner.group,
            "edgekv_put_complete"
        );

        Ok(())
    }
}
