//! reqwest-backed transport.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::{debug, instrument, trace};

use edtecg_core::error::{ApiError, Error, InvalidInputError, TransportError};
use edtecg_core::{ApiRequest, ApiResponse, ApiUrl, FormPart, Method, RequestBody, Result, Transport};

use crate::config::ClientConfig;
use crate::endpoints::ErrorResponse;

/// HTTP transport for the EDTECG API.
///
/// Sends [`ApiRequest`]s as-is: it attaches no credentials and never retries.
/// Instrumentation lives in [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport for the configured API.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| map_reqwest(e, &config))?;

        Ok(Self { client, config })
    }

    /// Returns the API base URL this transport talks to.
    pub fn api_url(&self) -> &ApiUrl {
        &self.config.api_url
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder> {
        let url = self.config.api_url.endpoint(request.path());
        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }

        let mut headers = HeaderMap::new();
        for (name, value) in request.headers() {
            let invalid = || InvalidInputError::Header { name: name.clone() };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(name, value);
        }
        builder = builder.headers(headers);

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        Ok(builder)
    }

    /// Turn a non-success response into an [`ApiError`].
    async fn parse_error_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => ApiError::new(status, body.error, body.message),
            Err(_) => {
                let text = text.trim();
                let message = (!text.is_empty()).then(|| text.to_string());
                ApiError::new(status, None, message)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = request.endpoint()))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        debug!(retried = request.is_retried(), "Sending request");
        trace!(?request, "request descriptor");

        let response = self
            .build(request)?
            .send()
            .await
            .map_err(|e| map_reqwest(e, &self.config))?;

        let status = response.status();
        trace!(status = %status, "Response received");

        if !status.is_success() {
            let error = Self::parse_error_response(response).await;
            debug!(status = error.status, "Request failed");
            return Err(Error::Api(error));
        }

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest(e, &self.config))?;

        Ok(ApiResponse::new(status.as_u16(), headers, body.to_vec()))
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(content_type) = content_type {
                    file = file.mime_str(content_type).map_err(|e| {
                        Error::InvalidInput(InvalidInputError::Other {
                            message: format!("invalid content type '{}': {}", content_type, e),
                        })
                    })?;
                }
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

fn map_reqwest(err: reqwest::Error, config: &ClientConfig) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: config.timeout.as_millis() as u64,
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}
