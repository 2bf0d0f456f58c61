use std::time::Duration;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use shared::protocol::KEYS_API;
use shared::types::StoredNode;
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Successful reply of the v2 keys API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetResponse {
    #[allow(dead_code)]
    action: String,
    node: StoredNode,
    #[serde(default)]
    prev_node: Option<StoredNode>,
}

/// Error document returned with 4xx/5xx statuses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error_code: u32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    cause: String,
}

/// etcd v2 keys API client. Holds one pooled HTTP client for all writes.
#[derive(Debug, Clone)]
pub struct EtcdClient {
    http: Client,
    base: Url,
}

impl EtcdClient {
    /// `peer` is the base URL of one etcd member, e.g. `http://127.0.0.1:4001`.
    /// Each request is bounded by `timeout`.
    pub fn new(peer: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base = Url::parse(peer).map_err(|e| StoreError::InvalidAddress {
            addr: peer.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidAddress {
                addr: peer.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base })
    }

    /// `/v2/keys/<key>` under the peer URL, one percent-encoded segment per key part
    fn key_url(&self, key: &str) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| StoreError::InvalidAddress {
                addr: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?;
            segments.pop_if_empty();
            segments.extend(KEYS_API);
            segments.extend(key.split('/').filter(|part| !part.is_empty()));
        }
        Ok(url)
    }
}

impl KeyValueStore for EtcdClient {
    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<StoredNode, StoreError> {
        let url = self.key_url(key)?;
        let ttl = ttl.to_string();

        tracing::debug!("PUT {} value={} ttl={}", url, value, ttl);

        let response = self
            .http
            .put(url)
            .form(&[("value", value), ("ttl", ttl.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::OK || status == StatusCode::CREATED {
            let reply: SetResponse = serde_json::from_str(&body).map_err(|_| StoreError::InvalidResponse {
                status: status.as_u16(),
                body: body.clone(),
            })?;
            if let Some(prev) = &reply.prev_node {
                tracing::trace!("Replaced previous value {:?} of {}", prev.value, prev.key);
            }
            return Ok(reply.node);
        }

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => Err(StoreError::Rejected {
                status: status.as_u16(),
                error_code: err.error_code,
                message: err.message,
                cause: err.cause,
            }),
            Err(_) => Err(StoreError::InvalidResponse {
                status: status.as_u16(),
                body,
            }),
        }
    }
}
