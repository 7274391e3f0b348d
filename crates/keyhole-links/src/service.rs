use crate::error::{Result, StoreError};
use crate::store::LinkStore;
use async_trait::async_trait;
use keyhole_core::{Link, LinkKey, LinkRepository, NewLink, SecretKey, StorageError};
use keyhole_keygen::KeyGenerator;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_MAX_KEY_ATTEMPTS: usize = 16;

/// A concrete implementation of the [`LinkStore`] trait.
///
/// This service wraps a `LinkRepository` and a `KeyGenerator` to handle:
/// - Candidate key drawing with collision redraw (rejection sampling)
/// - Secret key derivation
/// - Click recording and deactivation pass-through
///
/// Generated candidates are checked against storage before insertion, but
/// the storage layer's unique constraint is the authority: an insert that
/// loses a race to a concurrent writer feeds back into the redraw loop.
/// The loop is bounded; exceeding the cap fails with
/// [`StoreError::KeySpaceExhausted`].
#[derive(Debug, Clone)]
pub struct LinkService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    max_key_attempts: usize,
}

impl<R: LinkRepository, G: KeyGenerator> LinkService<R, G> {
    /// Creates a new `LinkService` with the default retry cap.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
        }
    }

    /// Overrides the number of candidate keys drawn before creation fails
    /// with [`StoreError::KeySpaceExhausted`].
    pub fn with_max_key_attempts(mut self, attempts: usize) -> Self {
        self.max_key_attempts = attempts;
        self
    }
}

#[async_trait]
impl<R: LinkRepository, G: KeyGenerator> LinkStore for LinkService<R, G> {
    async fn create(&self, target_url: String) -> Result<Link> {
        for attempt in 1..=self.max_key_attempts {
            let key = self.generator.candidate();

            // Cheap pre-filter. The unique constraint behind `insert` is
            // what actually guarantees uniqueness.
            if self.repository.key_exists(&key).await? {
                debug!(%key, attempt, "candidate key taken, redrawing");
                continue;
            }

            let secret_key = SecretKey::derive(&key, &self.generator.secret_suffix());
            let link = NewLink {
                key: key.clone(),
                secret_key,
                target_url: target_url.clone(),
            };

            match self.repository.insert(link).await {
                Ok(stored) => {
                    info!(key = %stored.key, "created link");
                    return Ok(stored);
                }
                Err(StorageError::KeyConflict(_)) => {
                    // Lost the race to a concurrent writer.
                    debug!(%key, attempt, "insert hit key conflict, redrawing");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(StoreError::KeySpaceExhausted {
            attempts: self.max_key_attempts,
        })
    }

    async fn resolve_by_key(&self, key: &LinkKey) -> Result<Option<Link>> {
        Ok(self.repository.find_by_key(key).await?)
    }

    async fn resolve_by_secret(&self, secret: &SecretKey) -> Result<Option<Link>> {
        Ok(self.repository.find_by_secret(secret).await?)
    }

    async fn record_click(&self, link: &Link) -> Result<Link> {
        Ok(self.repository.increment_clicks(&link.key).await?)
    }

    async fn deactivate(&self, secret: &SecretKey) -> Result<Option<Link>> {
        let link = self.repository.deactivate(secret).await?;
        if let Some(link) = &link {
            info!(key = %link.key, "deactivated link");
        }
        Ok(link)
    }
}
