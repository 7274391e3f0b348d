use crate::error::Result;
use async_trait::async_trait;
use keyhole_core::{Link, LinkKey, SecretKey};

/// The link store contract: create shortened links, resolve them, count
/// visits, and deactivate them.
///
/// Absent and deactivated records are indistinguishable to callers; both
/// surface as `Ok(None)`. Target URLs are stored verbatim — validating
/// their format belongs to an outer schema layer.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Creates a link for `target_url` under a freshly generated key and
    /// returns the stored record, including the generated keys.
    async fn create(&self, target_url: String) -> Result<Link>;

    /// Resolves a public key to its active record.
    async fn resolve_by_key(&self, key: &LinkKey) -> Result<Option<Link>>;

    /// Resolves a secret key to its active record. Used for administrative
    /// actions so the public key alone cannot trigger them.
    async fn resolve_by_secret(&self, secret: &SecretKey) -> Result<Option<Link>>;

    /// Records one visit against a previously resolved link and returns the
    /// refreshed record.
    ///
    /// The link's activity state is not re-checked here; callers are
    /// expected to hold a link they just resolved.
    async fn record_click(&self, link: &Link) -> Result<Link>;

    /// Deactivates the active link matching `secret` and returns the
    /// updated record.
    ///
    /// Not idempotent: repeat calls return `None`, the same as a secret
    /// that never existed.
    async fn deactivate(&self, secret: &SecretKey) -> Result<Option<Link>>;
}
