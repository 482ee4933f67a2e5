//! Instrumented API client and the assembled [`Client`] facade.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use edtecg_core::{ApiRequest, ApiResponse, CredentialStore, Interceptor, Result, Transport};

use crate::api::{Files, Flashcards, Mocks};
use crate::config::ClientConfig;
use crate::guard::RouteGuard;
use crate::session::SessionManager;
use crate::transport::HttpTransport;

/// A transport with an optional request interceptor.
///
/// [`execute`](Self::execute) runs the interceptor's pre-send hook, sends the
/// request and, on failure, hands request and error to the interceptor, which
/// may replay the request through the same transport.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl ApiClient {
    /// Create a client without an interceptor.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            interceptor: None,
        }
    }

    /// Install `interceptor` on every request.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send a request through the interceptor pipeline.
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = request.endpoint()))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let Some(interceptor) = &self.interceptor else {
            return self.transport.send(&request).await;
        };

        interceptor.before_send(&mut request);
        match self.transport.send(&request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                debug!(error = %error, "Request failed, consulting interceptor");
                interceptor
                    .on_failure(request, error, self.transport.as_ref())
                    .await
            }
        }
    }

    /// Send a request and decode the JSON response body.
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(request).await?.json()
    }

    /// Send a request and discard the response body.
    pub async fn unit(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    /// `GET path`, decoded as JSON.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.json(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body, decoded as JSON.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(ApiRequest::post(path).json(body)?).await
    }

    /// `PUT path` with a JSON body, decoded as JSON.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(ApiRequest::put(path).json(body)?).await
    }

    /// `PATCH path` with a JSON body, decoded as JSON.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(ApiRequest::patch(path).json(body)?).await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.unit(ApiRequest::delete(path)).await
    }
}

/// Everything a front end needs, wired together.
///
/// One [`SessionManager`] is shared by the instrumented [`ApiClient`] and the
/// [`RouteGuard`]. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Client {
    session: SessionManager,
    api: ApiClient,
    guard: RouteGuard,
}

impl Client {
    /// Build a client over HTTP.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport, store))
    }

    /// Build a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, store: Arc<dyn CredentialStore>) -> Self {
        let session = SessionManager::new(transport.clone(), store);
        let api = ApiClient::new(transport).with_interceptor(Arc::new(session.clone()));
        let guard = RouteGuard::new(session.clone());
        Self {
            session,
            api,
            guard,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn flashcards(&self) -> Flashcards<'_> {
        Flashcards::new(&self.api)
    }

    pub fn files(&self) -> Files<'_> {
        Files::new(&self.api)
    }

    pub fn mocks(&self) -> Mocks<'_> {
        Mocks::new(&self.api)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use edtecg_core::error::{ApiError, Error};

    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        seen: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
            self.seen
                .lock()
                .unwrap()
                .push(request.header("x-tag").map(str::to_string));
            if request.endpoint() == "broken" {
                return Err(Error::Api(ApiError::new(500, None, None)));
            }
            Ok(ApiResponse::new(200, BTreeMap::new(), b"{\"ok\":true}".to_vec()))
        }
    }

    #[derive(Debug)]
    struct Tagger;

    #[async_trait]
    impl Interceptor for Tagger {
        fn before_send(&self, request: &mut ApiRequest) {
            request.set_header("x-tag", "tagged");
        }

        async fn on_failure(
            &self,
            mut request: ApiRequest,
            _error: Error,
            transport: &dyn Transport,
        ) -> Result<ApiResponse> {
            request.set_header("x-tag", "replayed");
            Ok(transport.send(&request).await.unwrap_or_else(|_| {
                ApiResponse::new(200, BTreeMap::new(), b"{\"ok\":false}".to_vec())
            }))
        }
    }

    #[tokio::test]
    async fn without_interceptor_sends_as_is() {
        let transport = Arc::new(Recorder::default());
        let client = ApiClient::new(transport.clone());

        let value: serde_json::Value = client.get("anything").await.unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(*transport.seen.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn interceptor_runs_before_send_and_on_failure() {
        let transport = Arc::new(Recorder::default());
        let client = ApiClient::new(transport.clone()).with_interceptor(Arc::new(Tagger));

        let value: serde_json::Value = client.get("broken").await.unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(
            *transport.seen.lock().unwrap(),
            vec![Some("tagged".to_string()), Some("replayed".to_string())]
        );
    }
}
