use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The public identifier of a shortened link.
///
/// Keys are short random strings drawn from a URL-safe alphabet. They are
/// produced by a generator and made unique by the storage layer; this type
/// itself performs no validation so that arbitrary caller input can be used
/// for lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkKey(String);

impl LinkKey {
    /// Wraps a raw key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl Display for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The administrative identifier of a shortened link.
///
/// A secret key is always the public key plus an underscore plus an
/// independently drawn random suffix, so it can never equal the public key
/// and collides with another record's secret only if both draws collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wraps a raw secret string, e.g. one received from a caller.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Derives the secret for `key` from an independent random suffix.
    pub fn derive(key: &LinkKey, suffix: &str) -> Self {
        Self(format!("{}_{}", key.as_str(), suffix))
    }

    /// Returns the secret as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
