use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::models::LoginRequest;
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use super::{
    state::{FormController, FormState, Submission, resolve},
    validation::validate_required,
};
use crate::{api::ApiClient, routes::Route};

/// Shown when sign-in fails without a server message.
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
/// Confirmation after signing in.
pub const LOGIN_SUCCESS: &str = "Login successful!";

/// Fields of [`LoginForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum LoginField {
    #[strum(serialize = "usernameOrEmail")]
    UsernameOrEmail,
    #[strum(serialize = "password")]
    Password,
}

/// Sign-in form. On success the session holds the returned user.
#[derive(Debug, Default)]
pub struct LoginForm {
    state: FormState<LoginField>,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormController for LoginForm {
    type Field = LoginField;

    fn state(&self) -> &FormState<LoginField> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState<LoginField> {
        &mut self.state
    }

    fn check(&self) -> BTreeMap<LoginField, String> {
        let mut errors = BTreeMap::new();
        if validate_required(self.state.value(LoginField::UsernameOrEmail)).is_err() {
            errors.insert(
                LoginField::UsernameOrEmail,
                "Username or Email is required".to_string(),
            );
        }
        if validate_required(self.state.value(LoginField::Password)).is_err() {
            errors.insert(LoginField::Password, "Password is required".to_string());
        }
        errors
    }

    async fn perform(&mut self, api: &ApiClient) -> Submission {
        let request = LoginRequest {
            username_or_email: self.state.trimmed(LoginField::UsernameOrEmail).to_string(),
            password: self.state.value(LoginField::Password).to_string(),
        };

        let response = match resolve(api.login(&request).await, LOGIN_FAILED) {
            Ok(response) => response,
            Err(submission) => return submission,
        };

        if let Err(err) = api
            .session()
            .establish(response.user, &response.access_token)
        {
            warn!(error = %err, "could not store the new session");
            return Submission::Failed(LOGIN_FAILED.to_string());
        }

        Submission::succeeded(LOGIN_SUCCESS, Some(Route::Profile))
    }
}
