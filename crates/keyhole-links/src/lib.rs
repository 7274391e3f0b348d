//! Link store service implementation.
//!
//! This crate provides the [`LinkStore`] contract and its implementation,
//! [`LinkService`], which composes a repository with a key generator.
//! Core types are re-exported from `keyhole_core`.

pub mod error;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use service::LinkService;
pub use store::LinkStore;
