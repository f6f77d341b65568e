use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    api::{ApiClient, ApiOutcome},
    routes::Route,
};

/// Shown for every transport failure.
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// Default pause between a success message and the navigation it announces.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// A named input of a form.
pub trait FormField:
    Copy + Ord + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
}

impl<T> FormField for T where
    T: Copy + Ord + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
}

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Validating,
    Submitting,
    /// A confirmation is showing; `redirect` follows after the delay.
    Success {
        message: String,
        redirect: Option<Route>,
    },
    Navigating(Route),
}

/// Why a submit request was not carried out.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("a submission is already in progress")]
    Busy,
    #[error("the form has validation errors")]
    Invalid,
}

/// What a finished request means for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Succeeded {
        message: String,
        redirect: Option<Route>,
    },
    Failed(String),
    AuthRequired,
}

impl Submission {
    /// Success with an optional follow-up route.
    #[must_use]
    pub fn succeeded(message: impl Into<String>, redirect: Option<Route>) -> Self {
        Self::Succeeded {
            message: message.into(),
            redirect,
        }
    }
}

/// Unwrap a gateway outcome or turn it into the matching [`Submission`].
///
/// Application errors are shown verbatim; transport failures use
/// [`NETWORK_ERROR`]; anything else uses `fallback`.
///
/// # Errors
/// Returns the [`Submission`] the form should apply when the call did not succeed.
pub fn resolve<T>(outcome: ApiOutcome<T>, fallback: &str) -> Result<T, Submission> {
    match outcome {
        ApiOutcome::Ok(value) => Ok(value),
        ApiOutcome::Application(message) => Err(Submission::Failed(message)),
        ApiOutcome::AuthRequired => Err(Submission::AuthRequired),
        ApiOutcome::Failed(err) if err.is_network() => {
            warn!(error = %err, "request failed");
            Err(Submission::Failed(NETWORK_ERROR.to_string()))
        }
        ApiOutcome::Failed(err) => {
            warn!(error = %err, "request failed");
            Err(Submission::Failed(fallback.to_string()))
        }
    }
}

/// Field values, validation messages and submit status of one form.
#[derive(Debug, Clone)]
pub struct FormState<F: FormField> {
    values: BTreeMap<F, String>,
    errors: BTreeMap<F, String>,
    api_error: Option<String>,
    status: FormStatus,
}

impl<F: FormField> Default for FormState<F> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            api_error: None,
            status: FormStatus::Idle,
        }
    }
}

impl<F: FormField> FormState<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `field`; empty when never set.
    #[must_use]
    pub fn value(&self, field: F) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    /// Trimmed value of `field`.
    #[must_use]
    pub fn trimmed(&self, field: F) -> &str {
        self.value(field).trim()
    }

    /// Set a value without touching errors, for loading fetched data.
    pub fn set_value(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Record user input: store the value, clear that field's message and
    /// any prior API error.
    pub fn on_field_change(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
        self.errors.remove(&field);
        self.api_error = None;
    }

    #[must_use]
    pub fn error(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Flag a single field outside of a full validation pass.
    pub fn set_error(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<F, String> {
        &self.errors
    }

    #[must_use]
    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    /// Show a top-level error outside of a submit cycle.
    pub fn set_api_error(&mut self, message: impl Into<String>) {
        self.api_error = Some(message.into());
    }

    #[must_use]
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// Success message currently on display, if any.
    #[must_use]
    pub fn success_message(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Success { message, .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn navigation(&self) -> Option<Route> {
        match self.status {
            FormStatus::Navigating(route) => Some(route),
            _ => None,
        }
    }

    /// Replace the error mapping with `errors`; true when there are none.
    pub fn apply_validation(&mut self, errors: BTreeMap<F, String>) -> bool {
        self.status = FormStatus::Validating;
        self.errors = errors;
        let valid = self.errors.is_empty();
        if !valid {
            debug!(errors = self.errors.len(), "validation failed");
            self.status = FormStatus::Idle;
        }
        valid
    }

    /// Enter the submitting state.
    ///
    /// # Errors
    /// [`FormError::Busy`] while a submission is in flight and
    /// [`FormError::Invalid`] while validation messages are showing.
    pub fn begin_submit(&mut self) -> Result<(), FormError> {
        if self.is_busy() {
            return Err(FormError::Busy);
        }
        if !self.errors.is_empty() {
            return Err(FormError::Invalid);
        }
        self.api_error = None;
        self.status = FormStatus::Submitting;
        Ok(())
    }

    /// Apply the result of a request.
    pub fn finish(&mut self, submission: Submission) {
        match submission {
            Submission::Succeeded { message, redirect } => {
                self.status = FormStatus::Success { message, redirect };
            }
            Submission::Failed(message) => {
                self.api_error = Some(message);
                self.status = FormStatus::Idle;
            }
            Submission::AuthRequired => {
                self.api_error = None;
                self.status = FormStatus::Navigating(Route::Login);
            }
        }
    }

    /// Go straight to `route`.
    pub fn navigate(&mut self, route: Route) {
        self.status = FormStatus::Navigating(route);
    }

    /// Wait out `delay` after a success and move on to its redirect.
    ///
    /// Returns the route now being navigated to, if any.
    pub async fn complete_redirect(&mut self, delay: Duration) -> Option<Route> {
        match &self.status {
            FormStatus::Success {
                redirect: Some(route),
                ..
            } => {
                let route = *route;
                tokio::time::sleep(delay).await;
                self.status = FormStatus::Navigating(route);
                Some(route)
            }
            FormStatus::Navigating(route) => Some(*route),
            _ => None,
        }
    }
}

/// A form that validates locally and submits through the [`ApiClient`].
#[async_trait]
pub trait FormController: Send {
    type Field: FormField;

    fn state(&self) -> &FormState<Self::Field>;

    fn state_mut(&mut self) -> &mut FormState<Self::Field>;

    /// Run every local rule; an empty map means the input is acceptable.
    fn check(&self) -> BTreeMap<Self::Field, String>;

    /// Issue the request for already validated input.
    async fn perform(&mut self, api: &ApiClient) -> Submission;

    fn on_field_change(&mut self, field: Self::Field, value: String) {
        self.state_mut().on_field_change(field, value);
    }

    /// Replace the error mapping with the result of [`check`](Self::check).
    fn validate(&mut self) -> bool {
        let errors = self.check();
        self.state_mut().apply_validation(errors)
    }

    /// Validate and, when valid, submit.
    ///
    /// # Errors
    /// [`FormError::Busy`] when a submission is already in flight and
    /// [`FormError::Invalid`] when validation fails. Request failures are
    /// not errors here; they land in the form state.
    async fn submit(&mut self, api: &ApiClient) -> Result<FormStatus, FormError> {
        if self.state().is_busy() {
            return Err(FormError::Busy);
        }
        if !self.validate() {
            return Err(FormError::Invalid);
        }
        self.state_mut().begin_submit()?;
        let submission = self.perform(api).await;
        self.state_mut().finish(submission);
        Ok(self.state().status().clone())
    }
}
