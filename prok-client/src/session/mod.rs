//! Authenticated session state and the storage it persists to.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{ACCESS_TOKEN_KEY, SessionError, SessionStore, USER_KEY};
