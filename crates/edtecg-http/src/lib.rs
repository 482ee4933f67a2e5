//! edtecg-http - HTTP client for the EDTECG flashcard API.
//!
//! All calls flow through an [`ApiClient`] instrumented by a
//! [`SessionManager`]: the manager attaches the stored access token to every
//! request and recovers from a 401 by refreshing the token pair once, with a
//! single refresh shared by every request that failed concurrently.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use edtecg_core::{ApiUrl, CredentialStore, LoginRequest};
//! use edtecg_http::{Client, ClientConfig};
//!
//! # async fn example(store: Arc<dyn CredentialStore>) -> Result<(), edtecg_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("http://localhost:8000")?);
//! let client = Client::new(config, store)?;
//!
//! client.session().login(&LoginRequest::new("alice", "secret")).await?;
//! for collection in client.flashcards().collections().await? {
//!     println!("{}: {} cards", collection.name, collection.number_of_flashcards);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
mod config;
mod endpoints;
mod guard;
mod session;
mod transport;

pub use client::{ApiClient, Client};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use guard::{GuardDecision, LOGIN_ROUTE, RouteGuard};
pub use session::SessionManager;
pub use transport::HttpTransport;
