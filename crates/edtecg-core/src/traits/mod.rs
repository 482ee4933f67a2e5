//! Trait seams between the session layer and its collaborators.

mod store;
mod transport;

pub use store::CredentialStore;
pub use transport::{Interceptor, Transport};
