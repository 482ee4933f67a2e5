//! Authentication endpoint paths and wire types.

use serde::{Deserialize, Serialize};

/// POST: username/password → token pair.
pub(crate) const LOGIN: &str = "auth/login";

/// POST: account data → confirmation.
pub(crate) const REGISTER: &str = "auth/register";

/// POST: refresh token → token pair.
pub(crate) const REFRESH_TOKEN: &str = "auth/refresh-token";

/// Endpoints whose 401 means "bad credentials", never "expired token".
pub(crate) fn is_auth_endpoint(endpoint: &str) -> bool {
    matches!(endpoint, LOGIN | REGISTER | REFRESH_TOKEN)
}

/// Request body for the refresh endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_endpoints() {
        assert!(is_auth_endpoint("auth/login"));
        assert!(is_auth_endpoint("auth/register"));
        assert!(is_auth_endpoint("auth/refresh-token"));
        assert!(!is_auth_endpoint("flashcard/collections"));
        assert!(!is_auth_endpoint("auth/login/extra"));
    }
}
