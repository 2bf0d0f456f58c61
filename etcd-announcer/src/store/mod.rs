pub mod etcd;

use shared::types::StoredNode;
use crate::error::StoreError;

/// Write side of the coordination store
pub trait KeyValueStore: Send + Sync {
    /// Set `key` to `value`, expiring `ttl` seconds after this write.
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: u64,
    ) -> impl std::future::Future<Output = Result<StoredNode, StoreError>> + Send;
}
