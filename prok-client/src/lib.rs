#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]
//! Client core for the Prok networking service: the authenticated session,
//! the HTTP gateway, and the form controllers that drive it.

pub mod api;
pub mod forms;
pub mod routes;
pub mod session;

pub use api::{ApiClient, ApiOutcome, GatewayError};
pub use routes::Route;
pub use session::{FileStorage, MemoryStorage, SessionError, SessionStore, Storage};
