use crate::key::{LinkKey, SecretKey};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored link record.
///
/// Records are soft-deleted: `is_active = false` excludes a record from all
/// lookups while the row itself is retained, so a key is never handed out
/// twice over the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Public short identifier.
    pub key: LinkKey,
    /// Administrative identifier granting stats and deactivation access.
    pub secret_key: SecretKey,
    /// The destination the short key redirects to.
    pub target_url: String,
    /// False once the link has been deactivated.
    pub is_active: bool,
    /// Number of recorded resolutions.
    pub clicks: u64,
    /// When the record was created.
    pub created_at: Timestamp,
}

/// Payload for inserting a new link.
///
/// The repository fills in the remaining fields: `clicks = 0`,
/// `is_active = true`, and the creation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLink {
    pub key: LinkKey,
    pub secret_key: SecretKey,
    pub target_url: String,
}
