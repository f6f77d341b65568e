//! HTTP gateway to the remote API.

mod client;
mod outcome;

pub use client::ApiClient;
pub use outcome::{ApiOutcome, GatewayError};
