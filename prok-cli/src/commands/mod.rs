//! Command handlers. Each drives a client controller and prints the result.

pub mod auth;
pub mod completion;
pub mod config;
pub mod feed;
pub mod post;
pub mod profile;

use std::{fs, path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use client::{
    ApiClient, FileStorage, Route, SessionStore,
    forms::{FormController, FormError, FormStatus, Submission},
};
use colored::Colorize;
use shared::{config::client::Config, models::MediaAttachment};
use tracing::debug;

use crate::views::render_form_errors;

pub const SESSION_EXPIRED: &str =
    "Your session has expired. Run `prok login` to sign in again.";

/// Everything a command needs: resolved configuration and a gateway over the
/// persisted session.
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub api: ApiClient,
}

impl App {
    /// Restore the session from `config.storage_dir` and build the gateway.
    ///
    /// # Errors
    /// Fails when the API base URL cannot be used.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Arc::new(FileStorage::new(&config.storage_dir));
        let session = SessionStore::initialize(storage);
        let base = config
            .api_base()
            .with_context(|| format!("invalid API base URL '{}'", config.api_base_url))?;
        let api = ApiClient::new(base, session).context("failed to build the API client")?;
        debug!(api = %api.base_url(), storage = %config.storage_dir.display(), "client ready");
        Ok(Self { config, api })
    }

    pub fn redirect_delay(&self) -> Duration {
        self.config.redirect_delay()
    }

    /// Refuse to show `route` without a session.
    ///
    /// # Errors
    /// Fails when the route needs a session and there is none.
    pub fn require(&self, route: Route) -> Result<()> {
        if route.guard(self.api.session().is_authenticated()) == route {
            Ok(())
        } else {
            bail!(
                "Please log in first: {} requires a session. Run `prok login`.",
                route.title()
            )
        }
    }
}

/// The command that shows `route`.
pub fn command_for(route: Route) -> &'static str {
    match route {
        Route::Login => "prok login",
        Route::Signup => "prok signup",
        Route::Profile => "prok profile show",
        Route::ProfileEdit => "prok profile edit",
        Route::CompleteProfile => "prok profile complete",
        Route::Feed | Route::Posts => "prok feed",
        Route::CreatePost => "prok post create",
        Route::Jobs => "prok jobs",
        Route::Messages => "prok messages",
    }
}

/// Turn a failed request into the error a command reports.
pub fn submission_error(submission: Submission) -> anyhow::Error {
    match submission {
        Submission::AuthRequired => anyhow!(SESSION_EXPIRED),
        Submission::Failed(message) => anyhow!(message),
        Submission::Succeeded { message, .. } => anyhow!(message),
    }
}

/// Report the result of `form.submit`: print the success message and follow
/// the redirect, or fail with what the form is showing.
///
/// # Errors
/// Fails on validation errors, request failures and expired sessions.
pub async fn conclude<C: FormController>(
    form: &mut C,
    submitted: Result<FormStatus, FormError>,
    delay: Duration,
) -> Result<()> {
    match submitted {
        Err(FormError::Invalid) => {
            eprint!("{}", render_form_errors(form.state()));
            bail!("Please correct the errors above.");
        }
        Err(FormError::Busy) => bail!("A submission is already in progress."),
        Ok(FormStatus::Success { message, .. }) => {
            println!("{}", message.green());
            if let Some(route) = form.state_mut().complete_redirect(delay).await {
                println!("Next: {}", command_for(route));
            }
            Ok(())
        }
        Ok(FormStatus::Navigating(Route::Login)) => bail!(SESSION_EXPIRED),
        Ok(_) => {
            let message = form
                .state()
                .api_error()
                .unwrap_or("The request did not complete.");
            bail!("{message}")
        }
    }
}

/// Read a file for upload, typing it by extension.
///
/// # Errors
/// Fails when the file cannot be read.
pub fn read_attachment(path: &Path) -> Result<MediaAttachment> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(MediaAttachment {
        mime_type: mime_type_for(path).to_string(),
        file_name,
        bytes,
    })
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn attachment_is_typed_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Photo.JPG");
        fs::write(&path, b"jpeg").unwrap();

        let file = read_attachment(&path).unwrap();

        assert_eq!(file.file_name, "Photo.JPG");
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.bytes, b"jpeg");
    }

    #[test]
    fn unknown_extension_is_opaque() {
        assert_eq!(mime_type_for(Path::new("notes.pdf")), "application/octet-stream");
        assert_eq!(mime_type_for(Path::new("clip.webm")), "video/webm");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_attachment(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn every_route_has_a_command() {
        for route in Route::all() {
            assert!(command_for(route).starts_with("prok "));
        }
    }

    #[test]
    fn anonymous_app_is_refused_protected_routes() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_defaults();
        config.storage_dir = dir.path().to_path_buf();
        let app = App::open(config).unwrap();

        assert!(app.require(Route::Login).is_ok());
        let err = app.require(Route::Feed).unwrap_err();
        assert!(err.to_string().contains("Please log in first"));
    }
}
