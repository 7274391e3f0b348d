use keyhole_core::StorageError;
use thiserror::Error;

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Every candidate key drawn during creation collided with an existing
    /// record. With a healthy key space this indicates the table has grown
    /// close to the alphabet's capacity.
    #[error("key space exhausted after {attempts} attempts")]
    KeySpaceExhausted { attempts: usize },
    /// A backend failure, propagated unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
