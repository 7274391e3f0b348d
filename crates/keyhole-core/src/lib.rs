//! Core types and traits for the Keyhole link store.
//!
//! This crate provides the shared entity and repository contracts used by
//! the storage backends and the link store service.

pub mod error;
pub mod key;
pub mod link;
pub mod repository;

pub use error::StorageError;
pub use key::{LinkKey, SecretKey};
pub use link::{Link, NewLink};
pub use repository::{LinkRepository, ReadLinkRepository};
