use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use keyhole_core::error::{Result, StorageError};
use keyhole_core::repository::{LinkRepository, ReadLinkRepository};
use keyhole_core::{Link, LinkKey, NewLink, SecretKey};

/// In-memory implementation of the repository contract using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Records are keyed by public key; secret-key
/// lookups scan the map, which is fine for the table sizes this backend
/// is meant for (tests and small single-process deployments).
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    links: DashMap<String, Link>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl ReadLinkRepository for InMemoryRepository {
    async fn find_by_key(&self, key: &LinkKey) -> Result<Option<Link>> {
        Ok(self
            .links
            .get(key.as_str())
            .filter(|link| link.is_active)
            .map(|link| link.value().clone()))
    }

    async fn find_by_secret(&self, secret: &SecretKey) -> Result<Option<Link>> {
        Ok(self
            .links
            .iter()
            .find(|entry| entry.secret_key == *secret && entry.is_active)
            .map(|entry| entry.value().clone()))
    }

    async fn key_exists(&self, key: &LinkKey) -> Result<bool> {
        // Deactivated records count too: keys are never reused.
        Ok(self.links.contains_key(key.as_str()))
    }
}

#[async_trait]
impl LinkRepository for InMemoryRepository {
    async fn insert(&self, link: NewLink) -> Result<Link> {
        let stored = Link {
            key: link.key.clone(),
            secret_key: link.secret_key,
            target_url: link.target_url,
            is_active: true,
            clicks: 0,
            created_at: Timestamp::now(),
        };

        match self.links.entry(link.key.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::KeyConflict(link.key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn increment_clicks(&self, key: &LinkKey) -> Result<Link> {
        let Some(mut entry) = self.links.get_mut(key.as_str()) else {
            return Err(StorageError::Operation(format!(
                "no record for key: {key}"
            )));
        };

        entry.clicks += 1;
        Ok(entry.value().clone())
    }

    async fn deactivate(&self, secret: &SecretKey) -> Result<Option<Link>> {
        for mut entry in self.links.iter_mut() {
            if entry.secret_key == *secret && entry.is_active {
                entry.is_active = false;
                return Ok(Some(entry.value().clone()));
            }
        }

        Ok(None)
    }
}
