//! Token pair persistence on top of a [`CredentialStore`].

use std::sync::Arc;

use edtecg_core::{AccessToken, CredentialStore, RefreshToken, Result, TokenPair};

pub(crate) const ACCESS_TOKEN_KEY: &str = "accessToken";
pub(crate) const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Reads and writes the token pair under its two well-known keys.
///
/// A missing or empty value means "no token".
#[derive(Debug, Clone)]
pub(crate) struct TokenVault {
    store: Arc<dyn CredentialStore>,
}

impl TokenVault {
    pub(crate) fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get(key)?.filter(|value| !value.is_empty()))
    }

    pub(crate) fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self.read(ACCESS_TOKEN_KEY)?.map(AccessToken::new))
    }

    pub(crate) fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self.read(REFRESH_TOKEN_KEY)?.map(RefreshToken::new))
    }

    pub(crate) fn store(&self, pair: &TokenPair) -> Result<()> {
        self.store.set_all(&[
            (ACCESS_TOKEN_KEY, pair.access_token.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh_token.as_str()),
        ])
    }

    pub(crate) fn clear(&self) -> Result<()> {
        self.store.remove_all(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
    }
}
