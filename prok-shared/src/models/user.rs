use serde::{Deserialize, Serialize};

/// Identity of the authenticated account, as returned by the auth endpoints
/// and persisted by the client under the `user` storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    /// Server-side user identifier.
    pub id: i64,

    /// The user's username.
    pub username: String,

    /// The user's email address.
    pub email: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email address; the server matches either.
    pub username_or_email: String,

    /// The user's password.
    pub password: String,
}

/// Successful body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Human readable confirmation from the server.
    #[serde(default)]
    pub message: Option<String>,

    /// Bearer credential for subsequent authenticated calls.
    pub access_token: String,

    /// The account that was signed in.
    pub user: SessionUser,
}

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    /// Desired username.
    pub username: String,

    /// Email address for the new account.
    pub email: String,

    /// Chosen password.
    pub password: String,
}

/// Successful body of `POST /api/auth/signup`.
///
/// The server does not always issue a credential on signup; when it does the
/// client signs the new account in straight away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub access_token: Option<String>,

    pub user: SessionUser,
}
