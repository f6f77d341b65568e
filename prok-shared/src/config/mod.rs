//! # Configuration
//!
//! Client configuration: where the API lives, where the session is persisted,
//! how long success messages linger before navigation, and how logs look.

pub mod client;
