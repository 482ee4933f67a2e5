//! Session management: token attachment and single-flight refresh.

mod refresh;
mod vault;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use edtecg_core::error::{AuthError, Error};
use edtecg_core::{
    AccessToken, ApiRequest, ApiResponse, CredentialStore, Interceptor, LoginReason,
    LoginRequest, RefreshToken, RegisterRequest, Result, SessionEvent, TokenPair, Transport,
};

use crate::endpoints::{self, RefreshTokenRequest};

use refresh::{FlightGuard, RefreshFlight, Ticket};
use vault::TokenVault;

const EVENT_CAPACITY: usize = 16;

/// The client-side authentication session.
///
/// A `SessionManager` owns the stored token pair. Installed as the
/// [`Interceptor`] of an [`crate::ApiClient`] it attaches the access token to
/// every request and turns a 401 into at most one refresh-and-replay. When
/// several requests fail at once, exactly one refresh call is made and every
/// request shares its outcome.
///
/// Construct one per running client and hand clones to whoever needs it;
/// clones share state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use edtecg_core::{ApiUrl, LoginRequest};
/// use edtecg_http::{ClientConfig, HttpTransport, SessionManager};
/// use edtecg_store::MemoryStore;
///
/// # async fn example() -> Result<(), edtecg_core::Error> {
/// let transport = Arc::new(HttpTransport::new(ClientConfig::new(
///     ApiUrl::new("http://localhost:8000")?,
/// ))?);
/// let session = SessionManager::new(transport, Arc::new(MemoryStore::new()));
///
/// session.login(&LoginRequest::new("alice", "secret")).await?;
/// assert!(session.is_authenticated());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn Transport>,
    vault: TokenVault,
    flight: RefreshFlight,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a session over a raw transport and a credential store.
    ///
    /// `transport` is used for the login, register and refresh calls and must
    /// not itself be instrumented by this manager.
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn CredentialStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                transport,
                vault: TokenVault::new(store),
                flight: RefreshFlight::default(),
                events,
            }),
        }
    }

    /// Subscribe to session events, including the "navigate to login" signal.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Returns true if an access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Returns the stored access token.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.inner.vault.access_token().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read access token");
            None
        })
    }

    /// Returns the stored refresh token.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner.vault.refresh_token().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read refresh token");
            None
        })
    }

    /// Returns true while a refresh call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.inner.flight.is_in_flight()
    }

    /// Set `Authorization: Bearer <token>` if an access token is stored.
    ///
    /// Without a token the request is left untouched and goes out
    /// unauthenticated.
    pub fn attach_credentials(&self, request: &mut ApiRequest) {
        if let Some(token) = self.access_token() {
            request.set_bearer(&token);
        }
    }

    /// Authenticate and store the returned token pair.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] on 401/403; any other failure is
    /// returned unchanged. Login failures never trigger a refresh.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<ApiResponse> {
        info!("Logging in");

        let request = ApiRequest::post(endpoints::LOGIN).json(credentials)?;
        let response = self
            .inner
            .transport
            .send(&request)
            .await
            .map_err(|e| match e.status() {
                Some(401) | Some(403) => Error::Auth(AuthError::InvalidCredentials),
                _ => e,
            })?;

        let pair = response.json::<TokenPair>()?.validate()?;
        self.inner.vault.store(&pair)?;
        self.emit(SessionEvent::LoggedIn);

        debug!("Logged in");
        Ok(response)
    }

    /// Create an account. Stores no tokens.
    ///
    /// # Errors
    ///
    /// [`AuthError::UsernameTaken`] on 409, [`AuthError::ValidationFailed`]
    /// on 400/422; any other failure is returned unchanged.
    #[instrument(skip(self, data), fields(username = %data.username()))]
    pub async fn register(&self, data: &RegisterRequest) -> Result<ApiResponse> {
        info!("Registering account");

        let request = ApiRequest::post(endpoints::REGISTER).json(data)?;
        self.inner
            .transport
            .send(&request)
            .await
            .map_err(|e| match e {
                Error::Api(ref api) if api.status == 409 => Error::Auth(AuthError::UsernameTaken),
                Error::Api(ref api) if api.status == 400 || api.status == 422 => {
                    Error::Auth(AuthError::ValidationFailed {
                        message: api
                            .detail()
                            .unwrap_or("registration rejected")
                            .to_string(),
                    })
                }
                other => other,
            })
    }

    /// Clear the stored credentials and signal "navigate to login".
    ///
    /// Idempotent; never fails.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        info!("Logging out");
        self.end_session(LoginReason::LoggedOut);
    }

    /// Refresh the token pair now.
    ///
    /// Joins the in-flight refresh if there is one.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        match self.inner.flight.join() {
            Ticket::Leader(guard) => self.run_refresh(guard).await,
            Ticket::Waiter(rx) => RefreshFlight::wait(rx).await,
        }
    }

    /// Recover from a failed request, or return the failure unchanged.
    ///
    /// A refresh-and-replay is attempted only for a 401 on a request that
    /// has not been replayed yet and does not target an auth endpoint. The
    /// replay goes through `transport` with freshly attached credentials.
    #[instrument(
        skip(self, request, error, transport),
        fields(method = %request.method(), endpoint = request.endpoint())
    )]
    pub async fn handle_failure(
        &self,
        mut request: ApiRequest,
        error: Error,
        transport: &dyn Transport,
    ) -> Result<ApiResponse> {
        if !Self::should_refresh(&request, &error) {
            return Err(error);
        }

        match self.inner.flight.join() {
            Ticket::Waiter(rx) => {
                debug!("Refresh in flight, queueing request");
                RefreshFlight::wait(rx).await?;
            }
            Ticket::Leader(guard) => {
                if self.carries_stale_token(&request) {
                    debug!("Token rotated while request was in flight");
                    guard.settle(Ok(()));
                } else if self.session_ended_in_flight(&request) {
                    debug!("Session ended while request was in flight");
                    let err = self
                        .inner
                        .flight
                        .last_failure()
                        .unwrap_or(Error::Auth(AuthError::SessionExpired));
                    guard.settle(Err(err.clone()));
                    return Err(err);
                } else {
                    request.mark_retried();
                    self.run_refresh(guard).await?;
                }
            }
        }

        request.mark_retried();
        self.replay(request, transport).await
    }

    fn should_refresh(request: &ApiRequest, error: &Error) -> bool {
        error.is_unauthorized()
            && !request.is_retried()
            && !endpoints::is_auth_endpoint(request.endpoint())
    }

    /// True if a newer access token has been stored since `request` was sent.
    fn carries_stale_token(&self, request: &ApiRequest) -> bool {
        match self.access_token() {
            Some(current) => request.bearer_token() != Some(current.as_str()),
            None => false,
        }
    }

    /// True if `request` was sent with a token but the session has since
    /// been cleared. The clearing already signalled "login required".
    fn session_ended_in_flight(&self, request: &ApiRequest) -> bool {
        request.bearer_token().is_some() && self.access_token().is_none()
    }

    /// Lead one refresh cycle to completion and release its waiters.
    async fn run_refresh(&self, guard: FlightGuard<'_>) -> Result<()> {
        let refresh_token = match self.inner.vault.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("No refresh token stored, session expired");
                self.end_session(LoginReason::SessionExpired);
                let err = Error::Auth(AuthError::SessionExpired);
                guard.settle(Err(err.clone()));
                return Err(err);
            }
            Err(e) => return Err(self.fail_refresh(guard, e)),
        };

        match self.exchange(&refresh_token).await {
            Ok(()) => {
                let released = guard.settle(Ok(()));
                debug!(released, "Refresh succeeded");
                Ok(())
            }
            Err(e) => Err(self.fail_refresh(guard, e)),
        }
    }

    /// Swap the refresh token for a new pair and store it.
    async fn exchange(&self, refresh_token: &RefreshToken) -> Result<()> {
        info!("Refreshing session");

        let body = RefreshTokenRequest {
            refresh_token: refresh_token.as_str(),
        };
        let request = ApiRequest::post(endpoints::REFRESH_TOKEN).json(&body)?;

        let response = self.inner.transport.send(&request).await?;
        let pair = response.json::<TokenPair>()?.validate()?;
        self.inner.vault.store(&pair)?;
        self.emit(SessionEvent::Refreshed);
        Ok(())
    }

    fn fail_refresh(&self, guard: FlightGuard<'_>, cause: Error) -> Error {
        warn!(error = %cause, "Refresh failed, clearing session");
        self.end_session(LoginReason::RefreshFailed);
        let err = Error::Auth(AuthError::RefreshFailed(Box::new(cause)));
        let released = guard.settle(Err(err.clone()));
        debug!(released, "Released waiters with refresh failure");
        err
    }

    async fn replay(&self, mut request: ApiRequest, transport: &dyn Transport) -> Result<ApiResponse> {
        self.attach_credentials(&mut request);
        debug!("Replaying request");
        transport.send(&request).await
    }

    fn end_session(&self, reason: LoginReason) {
        if let Err(e) = self.inner.vault.clear() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.emit(SessionEvent::LoginRequired { reason });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}

#[async_trait]
impl Interceptor for SessionManager {
    fn before_send(&self, request: &mut ApiRequest) {
        self.attach_credentials(request);
    }

    async fn on_failure(
        &self,
        request: ApiRequest,
        error: Error,
        transport: &dyn Transport,
    ) -> Result<ApiResponse> {
        self.handle_failure(request, error, transport).await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("transport", &self.inner.transport)
            .field("authenticated", &self.is_authenticated())
            .field("refreshing", &self.is_refreshing())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use edtecg_core::error::ApiError;
    use edtecg_store::MemoryStore;

    use super::*;

    /// Transport answering from a fixed script, recording what it was sent.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        sent: Mutex<Vec<ApiRequest>>,
        refresh_status: u16,
        api_status: u16,
    }

    impl ScriptedTransport {
        fn new(refresh_status: u16, api_status: u16) -> Self {
            Self {
                refresh_status,
                api_status,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<ApiRequest> {
            self.sent.lock().unwrap().clone()
        }

        fn count(&self, endpoint: &str) -> usize {
            self.sent()
                .iter()
                .filter(|r| r.endpoint() == endpoint)
                .count()
        }
    }

    fn respond(status: u16, body: serde_json::Value) -> Result<ApiResponse> {
        if (200..300).contains(&status) {
            Ok(ApiResponse::new(status, BTreeMap::new(), body.to_string().into_bytes()))
        } else {
            Err(Error::Api(ApiError::new(status, None, None)))
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
            self.sent.lock().unwrap().push(request.clone());
            match request.endpoint() {
                "auth/refresh-token" => respond(
                    self.refresh_status,
                    serde_json::json!({"accessToken": "A2", "refreshToken": "R2"}),
                ),
                _ => respond(self.api_status, serde_json::json!([])),
            }
        }
    }

    fn session_with(
        transport: Arc<ScriptedTransport>,
        entries: &[(&str, &str)],
    ) -> SessionManager {
        let store = MemoryStore::with_entries(entries.iter().copied());
        SessionManager::new(transport, Arc::new(store))
    }

    fn unauthorized() -> Error {
        Error::Api(ApiError::new(401, None, None))
    }

    fn sent_with(token: &str, path: &str) -> ApiRequest {
        let mut request = ApiRequest::get(path);
        request.set_bearer(&AccessToken::new(token));
        request
    }

    #[test]
    fn attach_sets_bearer_only_with_token() {
        let transport = Arc::new(ScriptedTransport::default());

        let anonymous = session_with(transport.clone(), &[]);
        let mut request = ApiRequest::get("mock/all");
        anonymous.attach_credentials(&mut request);
        assert_eq!(request.bearer_token(), None);

        let session = session_with(transport, &[("accessToken", "A1")]);
        session.attach_credentials(&mut request);
        assert_eq!(request.bearer_token(), Some("A1"));
    }

    #[tokio::test]
    async fn non_401_is_returned_unchanged() {
        let transport = Arc::new(ScriptedTransport::new(200, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1"), ("refreshToken", "R1")]);

        let err = session
            .handle_failure(
                sent_with("A1", "mock/all"),
                Error::Api(ApiError::new(500, None, None)),
                transport.as_ref(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn auth_endpoints_never_refresh() {
        let transport = Arc::new(ScriptedTransport::new(200, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1"), ("refreshToken", "R1")]);

        for path in ["auth/login", "/auth/register", "auth/refresh-token"] {
            let err = session
                .handle_failure(ApiRequest::post(path), unauthorized(), transport.as_ref())
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
        }
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn retried_request_is_not_retried_again() {
        let transport = Arc::new(ScriptedTransport::new(200, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1"), ("refreshToken", "R1")]);

        let mut request = sent_with("A1", "mock/all");
        request.mark_retried();

        let err = session
            .handle_failure(request, unauthorized(), transport.as_ref())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn refresh_then_replay_with_new_token() {
        let transport = Arc::new(ScriptedTransport::new(200, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1"), ("refreshToken", "R1")]);
        let mut events = session.subscribe();

        let response = session
            .handle_failure(sent_with("A1", "mock/all"), unauthorized(), transport.as_ref())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].endpoint(), "auth/refresh-token");
        assert_eq!(
            sent[0].body(),
            &edtecg_core::RequestBody::Json(serde_json::json!({"refreshToken": "R1"}))
        );
        assert_eq!(sent[1].bearer_token(), Some("A2"));
        assert!(sent[1].is_retried());

        assert_eq!(session.access_token(), Some(AccessToken::new("A2")));
        assert_eq!(session.refresh_token(), Some(RefreshToken::new("R2")));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
        assert!(!session.is_refreshing());
    }

    #[tokio::test]
    async fn missing_refresh_token_expires_session() {
        let transport = Arc::new(ScriptedTransport::new(200, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1")]);
        let mut events = session.subscribe();

        let err = session
            .handle_failure(sent_with("A1", "mock/all"), unauthorized(), transport.as_ref())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::SessionExpired)));
        assert!(!session.is_authenticated());
        assert!(transport.sent().is_empty());
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::LoginRequired {
                reason: LoginReason::SessionExpired
            }
        );
        assert!(!session.is_refreshing());
    }

    #[tokio::test]
    async fn rejected_refresh_clears_both_tokens() {
        let transport = Arc::new(ScriptedTransport::new(401, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1"), ("refreshToken", "R1")]);

        let err = session
            .handle_failure(sent_with("A1", "mock/all"), unauthorized(), transport.as_ref())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Auth(AuthError::RefreshFailed(_))));
        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(transport.count("mock/all"), 0);
    }

    #[tokio::test]
    async fn late_401_after_failed_refresh_reuses_its_error() {
        let transport = Arc::new(ScriptedTransport::new(401, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A1"), ("refreshToken", "R1")]);
        let mut events = session.subscribe();

        let first = session
            .handle_failure(sent_with("A1", "mock/all"), unauthorized(), transport.as_ref())
            .await
            .unwrap_err();
        let late = session
            .handle_failure(sent_with("A1", "files/all"), unauthorized(), transport.as_ref())
            .await
            .unwrap_err();

        assert!(matches!(first, Error::Auth(AuthError::RefreshFailed(_))));
        assert!(matches!(late, Error::Auth(AuthError::RefreshFailed(_))));
        assert_eq!(transport.count("auth/refresh-token"), 1);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::LoginRequired {
                reason: LoginReason::RefreshFailed
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_token_replays_without_refresh() {
        let transport = Arc::new(ScriptedTransport::new(200, 200));
        let session = session_with(transport.clone(), &[("accessToken", "A2"), ("refreshToken", "R2")]);

        session
            .handle_failure(sent_with("A1", "mock/all"), unauthorized(), transport.as_ref())
            .await
            .unwrap();

        assert_eq!(transport.count("auth/refresh-token"), 0);
        assert_eq!(transport.sent()[0].bearer_token(), Some("A2"));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let transport = Arc::new(ScriptedTransport::default());
        let session = session_with(transport, &[("accessToken", "A1"), ("refreshToken", "R1")]);
        let mut events = session.subscribe();

        session.logout();
        session.logout();

        assert!(!session.is_authenticated());
        for _ in 0..2 {
            assert_eq!(
                events.try_recv().unwrap(),
                SessionEvent::LoginRequired {
                    reason: LoginReason::LoggedOut
                }
            );
        }
    }
}
