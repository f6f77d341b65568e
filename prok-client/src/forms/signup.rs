use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::models::SignupRequest;
use strum::{Display, EnumIter, EnumString};
use tracing::{info, warn};

use super::{
    state::{FormController, FormState, Submission, resolve},
    validation::{
        MIN_PASSWORD_LENGTH, ValidationError, validate_confirm_password, validate_email,
        validate_password, validate_required,
    },
};
use crate::{api::ApiClient, routes::Route};

/// Shown when signup fails without a server message.
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
/// Confirmation when signup also signed the user in.
pub const SIGNUP_SIGNED_IN: &str = "Account created!";
/// Confirmation when the new account still has to sign in.
pub const SIGNUP_LOGIN_NEXT: &str = "Account created! Please log in.";

/// Fields of [`SignupForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum SignupField {
    #[strum(serialize = "username")]
    Username,
    #[strum(serialize = "email")]
    Email,
    #[strum(serialize = "password")]
    Password,
    #[strum(serialize = "confirm_password")]
    ConfirmPassword,
}

/// Optional password rules for new accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupRules {
    /// Minimum password length; `None` accepts any non-empty password.
    pub min_password_length: Option<usize>,
    /// Whether `confirm_password` is required and must match.
    pub require_confirmation: bool,
}

impl Default for SignupRules {
    fn default() -> Self {
        Self {
            min_password_length: Some(MIN_PASSWORD_LENGTH),
            require_confirmation: true,
        }
    }
}

impl SignupRules {
    /// Only required fields and the email format are checked.
    #[must_use]
    pub fn basic() -> Self {
        Self {
            min_password_length: None,
            require_confirmation: false,
        }
    }
}

/// Account creation form.
#[derive(Debug, Default)]
pub struct SignupForm {
    state: FormState<SignupField>,
    rules: SignupRules,
}

impl SignupForm {
    #[must_use]
    pub fn new(rules: SignupRules) -> Self {
        Self {
            state: FormState::new(),
            rules,
        }
    }

    #[must_use]
    pub fn rules(&self) -> SignupRules {
        self.rules
    }
}

#[async_trait]
impl FormController for SignupForm {
    type Field = SignupField;

    fn state(&self) -> &FormState<SignupField> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState<SignupField> {
        &mut self.state
    }

    fn check(&self) -> BTreeMap<SignupField, String> {
        let mut errors = BTreeMap::new();
        let password = self.state.value(SignupField::Password);

        if validate_required(self.state.value(SignupField::Username)).is_err() {
            errors.insert(SignupField::Username, "Username is required".to_string());
        }

        match validate_email(self.state.value(SignupField::Email)) {
            Ok(()) => {}
            Err(ValidationError::Required) => {
                errors.insert(SignupField::Email, "Email is required".to_string());
            }
            Err(_) => {
                errors.insert(
                    SignupField::Email,
                    "Please enter a valid email address".to_string(),
                );
            }
        }

        match validate_password(password, self.rules.min_password_length) {
            Ok(()) => {}
            Err(ValidationError::PasswordTooShort { min }) => {
                errors.insert(
                    SignupField::Password,
                    format!("Password must be at least {min} characters"),
                );
            }
            Err(_) => {
                errors.insert(SignupField::Password, "Password is required".to_string());
            }
        }

        if self.rules.require_confirmation {
            match validate_confirm_password(self.state.value(SignupField::ConfirmPassword), password)
            {
                Ok(()) => {}
                Err(ValidationError::PasswordsDoNotMatch) => {
                    errors.insert(
                        SignupField::ConfirmPassword,
                        "Passwords do not match".to_string(),
                    );
                }
                Err(_) => {
                    errors.insert(
                        SignupField::ConfirmPassword,
                        "Please confirm your password".to_string(),
                    );
                }
            }
        }

        errors
    }

    async fn perform(&mut self, api: &ApiClient) -> Submission {
        let request = SignupRequest {
            username: self.state.trimmed(SignupField::Username).to_string(),
            email: self.state.trimmed(SignupField::Email).to_string(),
            password: self.state.value(SignupField::Password).to_string(),
        };

        let response = match resolve(api.signup(&request).await, SIGNUP_FAILED) {
            Ok(response) => response,
            Err(submission) => return submission,
        };

        match response.access_token.filter(|token| !token.trim().is_empty()) {
            Some(token) => {
                if let Err(err) = api.session().establish(response.user, &token) {
                    warn!(error = %err, "could not store the new session");
                    return Submission::succeeded(SIGNUP_LOGIN_NEXT, Some(Route::Login));
                }
                Submission::succeeded(SIGNUP_SIGNED_IN, Some(Route::CompleteProfile))
            }
            None => {
                info!(username = %response.user.username, "account created without a session");
                Submission::succeeded(SIGNUP_LOGIN_NEXT, Some(Route::Login))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut SignupForm, values: &[(SignupField, &str)]) {
        for (field, value) in values {
            form.on_field_change(*field, (*value).to_string());
        }
    }

    #[test]
    fn empty_form_reports_every_field() {
        let mut form = SignupForm::new(SignupRules::default());
        assert!(!form.validate());

        let state = form.state();
        assert_eq!(state.error(SignupField::Username), Some("Username is required"));
        assert_eq!(state.error(SignupField::Email), Some("Email is required"));
        assert_eq!(state.error(SignupField::Password), Some("Password is required"));
        assert_eq!(
            state.error(SignupField::ConfirmPassword),
            Some("Please confirm your password")
        );
    }

    #[test]
    fn basic_rules_report_email_only() {
        let mut form = SignupForm::new(SignupRules::basic());
        fill(
            &mut form,
            &[
                (SignupField::Username, "a"),
                (SignupField::Email, ""),
                (SignupField::Password, "x"),
            ],
        );

        assert!(!form.validate());
        let errors = form.state().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(&SignupField::Email).map(String::as_str), Some("Email is required"));
    }

    #[test]
    fn default_rules_enforce_length_and_confirmation() {
        let mut form = SignupForm::new(SignupRules::default());
        fill(
            &mut form,
            &[
                (SignupField::Username, "ada"),
                (SignupField::Email, "ada.example.com"),
                (SignupField::Password, "short"),
                (SignupField::ConfirmPassword, "shorter"),
            ],
        );

        assert!(!form.validate());
        let state = form.state();
        assert_eq!(
            state.error(SignupField::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            state.error(SignupField::Password),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            state.error(SignupField::ConfirmPassword),
            Some("Passwords do not match")
        );
        assert_eq!(state.error(SignupField::Username), None);
    }

    #[test]
    fn valid_input_passes() {
        let mut form = SignupForm::new(SignupRules::default());
        fill(
            &mut form,
            &[
                (SignupField::Username, "ada"),
                (SignupField::Email, "ada@example.com"),
                (SignupField::Password, "long enough"),
                (SignupField::ConfirmPassword, "long enough"),
            ],
        );
        assert!(form.validate());
    }

    #[test]
    fn changing_a_field_clears_only_its_error() {
        let mut form = SignupForm::new(SignupRules::default());
        form.validate();
        form.on_field_change(SignupField::Email, "ada@example.com".to_string());

        assert_eq!(form.state().error(SignupField::Email), None);
        assert!(form.state().error(SignupField::Username).is_some());
        assert_eq!(form.state().errors().len(), 3);
    }
}
