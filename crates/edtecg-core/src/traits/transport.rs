//! Transport and interceptor traits.

use std::fmt;

use async_trait::async_trait;

use crate::request::{ApiRequest, ApiResponse};
use crate::{Error, Result};

/// Sends a request descriptor to the API.
///
/// Non-success statuses are returned as [`Error::Api`]; failures without a
/// response as [`Error::Transport`]. Sending the same descriptor twice is a
/// replay.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Hooks around every request sent through an instrumented client.
#[async_trait]
pub trait Interceptor: Send + Sync + fmt::Debug {
    /// Called once before each send; may rewrite headers.
    fn before_send(&self, request: &mut ApiRequest);

    /// Called once for each failed send.
    ///
    /// Returning `Err(error)` propagates the failure unchanged; an
    /// implementation may instead recover and replay through `transport`.
    async fn on_failure(
        &self,
        request: ApiRequest,
        error: Error,
        transport: &dyn Transport,
    ) -> Result<ApiResponse>;
}
