//! edtecg-store - Credential stores for the EDTECG client.
//!
//! [`MemoryStore`] keeps credentials for the lifetime of the process and is
//! what tests use. [`FileStore`] persists them as a small JSON document so a
//! session survives restarts.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
