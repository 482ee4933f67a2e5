//! Credential store trait.

use std::fmt;

use crate::Result;

/// Durable string key-value storage for credentials.
///
/// Operations are synchronous. `set_all` and `remove_all` must apply every
/// entry or none of them: the session manager relies on this to never expose
/// an access token without its refresh token.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries as one atomic update.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys as one atomic update. Missing keys are ignored.
    fn remove_all(&self, keys: &[&str]) -> Result<()>;

    /// Write a single entry.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_all(&[(key, value)])
    }

    /// Remove a single key.
    fn remove(&self, key: &str) -> Result<()> {
        self.remove_all(&[key])
    }
}
