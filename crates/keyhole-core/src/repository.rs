use crate::error::Result;
use crate::key::{LinkKey, SecretKey};
use crate::link::{Link, NewLink};
use async_trait::async_trait;

/// A read-only view of a link repository.
///
/// This trait provides only the lookup operations from [`LinkRepository`],
/// allowing resolution-only components to have read-only access.
#[async_trait]
pub trait ReadLinkRepository: Send + Sync + 'static {
    /// Retrieves the active record for a given public key.
    /// Returns `None` if no record exists or the record is deactivated.
    async fn find_by_key(&self, key: &LinkKey) -> Result<Option<Link>>;

    /// Retrieves the active record for a given secret key.
    /// Returns `None` if no record exists or the record is deactivated.
    async fn find_by_secret(&self, secret: &SecretKey) -> Result<Option<Link>>;

    /// Checks whether any record, active or inactive, holds the given key.
    ///
    /// Deactivated records count: a key is never reused once assigned.
    async fn key_exists(&self, key: &LinkKey) -> Result<bool>;
}

#[async_trait]
pub trait LinkRepository: ReadLinkRepository {
    /// Persists a new record with `clicks = 0` and `is_active = true`,
    /// returning the stored record.
    ///
    /// Returns `Err(KeyConflict)` if the key is already taken by any record,
    /// active or not.
    async fn insert(&self, link: NewLink) -> Result<Link>;

    /// Adds exactly 1 to the record's click counter and returns the
    /// refreshed record.
    ///
    /// The record's activity state is not re-checked. A key with no record
    /// at all is a storage fault, not an absent result.
    async fn increment_clicks(&self, key: &LinkKey) -> Result<Link>;

    /// Deactivates the active record matching the given secret key and
    /// returns the refreshed record.
    ///
    /// Returns `None` when no active match exists, whether the record is
    /// already inactive or was never created.
    async fn deactivate(&self, secret: &SecretKey) -> Result<Option<Link>>;
}
