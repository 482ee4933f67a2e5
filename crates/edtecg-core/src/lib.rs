//! edtecg-core - Core types and traits for the EDTECG flashcard client.
//!
//! This crate holds everything that does not depend on a concrete HTTP stack
//! or storage backend: token and credential types, replayable request
//! descriptors, the unified error type, and the trait seams
//! ([`CredentialStore`], [`Transport`], [`Interceptor`]) the session layer is
//! written against.

pub mod credentials;
pub mod error;
pub mod events;
pub mod request;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::{LoginRequest, RegisterRequest};
pub use error::Error;
pub use events::{LoginReason, SessionEvent};
pub use request::{ApiRequest, ApiResponse, FormPart, Method, RequestBody};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{CredentialStore, Interceptor, Transport};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
