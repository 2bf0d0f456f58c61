use shared::types::{Announcement, StoredNode};
use crate::config::{AnnounceConfig, AnnounceMode};
use crate::error::AnnounceError;
use crate::net::resolver::{resolve_address, InterfaceSource};
use crate::store::KeyValueStore;

/// Writes the service record to the store, one set per call.
pub struct Announcer<S, I> {
    store: S,
    interfaces: I,
    key: String,
    ttl: u64,
    mode: AnnounceMode,
}

impl<S: KeyValueStore, I: InterfaceSource> Announcer<S, I> {
    pub fn new(config: &AnnounceConfig, store: S, interfaces: I) -> Self {
        Self {
            store,
            interfaces,
            key: config.key(),
            ttl: config.ttl,
            mode: config.mode.clone(),
        }
    }

    /// Build this tick's announcement. Network mode resolves the interface anew.
    pub fn announcement(&self) -> Result<Announcement, AnnounceError> {
        let value = match &self.mode {
            AnnounceMode::Message(msg) => msg.clone(),
            AnnounceMode::Network { interface } => resolve_address(&self.interfaces, interface)?,
        };

        Ok(Announcement {
            key: self.key.clone(),
            value,
            ttl: self.ttl,
        })
    }

    /// Perform one set and print `Announced <key>: <value>` with what the store kept.
    pub async fn announce_once(&self) -> Result<StoredNode, AnnounceError> {
        let announcement = self.announcement()?;

        let node = self
            .store
            .set(&announcement.key, &announcement.value, announcement.ttl)
            .await?;

        println!("Announced {}: {}", node.key, node.value);
        tracing::debug!(
            key = %node.key,
            ttl = ?node.ttl,
            expiration = ?node.expiration.map(|t| t.to_rfc3339()),
            "Announcement stored"
        );

        Ok(node)
    }
}
