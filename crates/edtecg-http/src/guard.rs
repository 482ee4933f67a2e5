//! Route guard for protected views.

use tracing::debug;

use crate::session::SessionManager;

/// Where unauthenticated users are sent.
pub const LOGIN_ROUTE: &str = "/auth";

/// Outcome of a [`RouteGuard::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Lets a view render only when a session exists.
///
/// Public routes (by default just [`LOGIN_ROUTE`]) are always allowed. A
/// route matches a public route if it is equal to it or continues it after a
/// `/`, so `/auth/register` is public while `/authors` is not.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionManager,
    public_routes: Vec<String>,
}

impl RouteGuard {
    pub fn new(session: SessionManager) -> Self {
        Self {
            session,
            public_routes: vec![LOGIN_ROUTE.to_string()],
        }
    }

    pub fn with_public_route(mut self, route: impl Into<String>) -> Self {
        self.public_routes.push(route.into());
        self
    }

    /// Decide whether `route` may be shown.
    pub fn check(&self, route: &str) -> GuardDecision {
        if self.is_public(route) || self.session.is_authenticated() {
            return GuardDecision::Allow;
        }
        debug!(route, "Not authenticated, redirecting to login");
        GuardDecision::Redirect(LOGIN_ROUTE.to_string())
    }

    fn is_public(&self, route: &str) -> bool {
        let route = route.split(['?', '#']).next().unwrap_or(route);
        self.public_routes.iter().any(|public| {
            route
                .strip_prefix(public.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use edtecg_core::{ApiUrl, CredentialStore};
    use edtecg_store::MemoryStore;

    use super::*;
    use crate::config::ClientConfig;
    use crate::transport::HttpTransport;

    fn guard(store: Arc<MemoryStore>) -> RouteGuard {
        let transport = HttpTransport::new(ClientConfig::new(
            ApiUrl::new("http://localhost:8000").unwrap(),
        ))
        .unwrap();
        RouteGuard::new(SessionManager::new(Arc::new(transport), store))
    }

    #[test]
    fn redirects_when_logged_out() {
        let guard = guard(Arc::new(MemoryStore::new()));
        assert_eq!(
            guard.check("/flashcards"),
            GuardDecision::Redirect("/auth".to_string())
        );
    }

    #[test]
    fn public_routes_always_allowed() {
        let guard = guard(Arc::new(MemoryStore::new())).with_public_route("/about");
        assert_eq!(guard.check("/auth"), GuardDecision::Allow);
        assert_eq!(guard.check("/auth/register?next=/mocks"), GuardDecision::Allow);
        assert_eq!(guard.check("/about"), GuardDecision::Allow);
        assert_ne!(guard.check("/authors"), GuardDecision::Allow);
    }

    #[test]
    fn follows_session_state() {
        let store = Arc::new(MemoryStore::new());
        let guard = guard(store.clone());

        store.set("accessToken", "A1").unwrap();
        assert_eq!(guard.check("/mocks/3"), GuardDecision::Allow);

        store.remove("accessToken").unwrap();
        assert_ne!(guard.check("/mocks/3"), GuardDecision::Allow);
    }
}
