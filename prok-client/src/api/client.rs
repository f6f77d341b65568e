use reqwest::{
    Client, RequestBuilder, StatusCode,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    AvatarUploadResponse, CreatePostResponse, ErrorResponse, FeedResponse, LoginRequest,
    LoginResponse, MediaAttachment, NewPost, Profile, ProfileUpdate, ProfileUpdateResponse,
    SignupRequest, SignupResponse,
};
use tracing::{debug, instrument, warn};
use url::Url;

use super::outcome::{ApiOutcome, GatewayError};
use crate::session::SessionStore;

const AVATAR_PATH: &str = "uploads/profile_images/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Authenticated,
}

/// Thin wrappers over the remote REST API.
///
/// Authenticated calls carry the session's bearer token. A 401 or 422 on one
/// of them clears the session and yields [`ApiOutcome::AuthRequired`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client for the API served at `base` (origin, without `/api`).
    ///
    /// # Errors
    /// Returns [`GatewayError::Network`] when the HTTP client cannot be built.
    pub fn new(mut base: Url, session: SessionStore) -> Result<Self, GatewayError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = Client::builder()
            .user_agent(concat!("prok-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Network)?;
        Ok(Self {
            http,
            base,
            session,
        })
    }

    /// Session this client reads its token from and clears on rejection.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Base URL every request path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn api_url(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self
            .base
            .join(&format!("api/{}", path.trim_start_matches('/')))?)
    }

    /// Public URL of an uploaded avatar.
    ///
    /// # Errors
    /// Fails when `filename` cannot form a valid URL.
    pub fn avatar_url(&self, filename: &str) -> Result<Url, url::ParseError> {
        self.base
            .join(AVATAR_PATH)?
            .join(filename.trim().trim_start_matches('/'))
    }

    /// Resolve a server-relative media path such as `/uploads/post_media/a.png`.
    ///
    /// Paths resolve under the base URL, keeping any base path prefix.
    /// Absolute URLs are returned unchanged.
    ///
    /// # Errors
    /// Fails when `path` cannot form a valid URL.
    pub fn asset_url(&self, path: &str) -> Result<Url, url::ParseError> {
        let path = path.trim();
        match Url::parse(path) {
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.base.join(path.trim_start_matches('/'))
            }
            parsed => parsed,
        }
    }

    async fn dispatch<T>(&self, access: Access, request: RequestBuilder) -> ApiOutcome<T>
    where
        T: DeserializeOwned,
    {
        let request = match (access, self.session.access_token()) {
            (Access::Authenticated, Some(token)) => request.bearer_auth(token),
            _ => request,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "request failed before a response arrived");
                return ApiOutcome::Failed(GatewayError::Network(err));
            }
        };

        let status = response.status();
        debug!(%status, url = %response.url(), "received response");

        if access == Access::Authenticated && rejects_credential(status) {
            warn!(%status, "credential rejected, clearing session");
            self.session.logout();
            return ApiOutcome::AuthRequired;
        }

        match response.text().await {
            Ok(text) => interpret(status, &text),
            Err(err) => {
                warn!(error = %err, "failed to read response body");
                ApiOutcome::Failed(GatewayError::Network(err))
            }
        }
    }

    /// `POST /api/auth/login`
    #[instrument(skip_all, fields(user = %request.username_or_email))]
    pub async fn login(&self, request: &LoginRequest) -> ApiOutcome<LoginResponse> {
        let url = match self.api_url("auth/login") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        self.dispatch(Access::Public, self.http.post(url).json(request))
            .await
    }

    /// `POST /api/auth/signup`
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn signup(&self, request: &SignupRequest) -> ApiOutcome<SignupResponse> {
        let url = match self.api_url("auth/signup") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        self.dispatch(Access::Public, self.http.post(url).json(request))
            .await
    }

    /// `GET /api/profile`
    #[instrument(skip_all)]
    pub async fn get_profile(&self) -> ApiOutcome<Profile> {
        let url = match self.api_url("profile") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        self.dispatch(Access::Authenticated, self.http.get(url))
            .await
    }

    /// `PUT /api/profile`
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> ApiOutcome<ProfileUpdateResponse> {
        let url = match self.api_url("profile") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        self.dispatch(Access::Authenticated, self.http.put(url).json(update))
            .await
    }

    /// `POST /api/profile/image`, multipart field `image`.
    #[instrument(skip_all, fields(file = %image.file_name, bytes = image.size()))]
    pub async fn upload_avatar(&self, image: MediaAttachment) -> ApiOutcome<AvatarUploadResponse> {
        let url = match self.api_url("profile/image") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        let part = match file_part(image) {
            Ok(part) => part,
            Err(err) => return err.into(),
        };
        let form = Form::new().part("image", part);
        self.dispatch(Access::Authenticated, self.http.post(url).multipart(form))
            .await
    }

    /// `GET /api/feed`
    #[instrument(skip_all)]
    pub async fn get_feed(&self) -> ApiOutcome<FeedResponse> {
        let url = match self.api_url("feed") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        self.dispatch(Access::Authenticated, self.http.get(url))
            .await
    }

    /// `GET /api/feed/user/:id`
    #[instrument(skip(self))]
    pub async fn get_user_feed(&self, user_id: i64) -> ApiOutcome<FeedResponse> {
        let url = match self.api_url(&format!("feed/user/{user_id}")) {
            Ok(url) => url,
            Err(err) => return err.into(),
        };
        self.dispatch(Access::Authenticated, self.http.get(url))
            .await
    }

    /// `POST /api/posts`, multipart fields `content`, `media`, `is_public`,
    /// `allow_comments`.
    #[instrument(skip_all, fields(has_media = post.media.is_some()))]
    pub async fn create_post(&self, post: NewPost) -> ApiOutcome<CreatePostResponse> {
        let url = match self.api_url("posts") {
            Ok(url) => url,
            Err(err) => return err.into(),
        };

        let mut form = Form::new()
            .text("content", post.content)
            .text("is_public", post.is_public.to_string())
            .text("allow_comments", post.allow_comments.to_string());
        if let Some(media) = post.media {
            match file_part(media) {
                Ok(part) => form = form.part("media", part),
                Err(err) => return err.into(),
            }
        }

        self.dispatch(Access::Authenticated, self.http.post(url).multipart(form))
            .await
    }
}

fn rejects_credential(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY
}

fn file_part(file: MediaAttachment) -> Result<Part, GatewayError> {
    Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(&file.mime_type)
        .map_err(|err| GatewayError::Decode(format!("invalid media type: {err}")))
}

/// Turn a status and raw body into an outcome.
///
/// An `error` field wins over the status; a non-success status without one
/// is a [`GatewayError::Status`].
pub(super) fn interpret<T>(status: StatusCode, text: &str) -> ApiOutcome<T>
where
    T: DeserializeOwned,
{
    let body = serde_json::from_str::<Value>(text).ok();

    if let Some(error) = body.as_ref().and_then(ErrorResponse::from_body) {
        debug!(%status, message = %error.error, "application error");
        return ApiOutcome::Application(error.error);
    }

    if !status.is_success() {
        warn!(%status, "request failed without an error body");
        return ApiOutcome::Failed(GatewayError::Status {
            status,
            body: text.to_string(),
        });
    }

    let Some(body) = body else {
        return ApiOutcome::Failed(GatewayError::Decode(
            "response body is not JSON".to_string(),
        ));
    };

    match serde_json::from_value(body) {
        Ok(value) => ApiOutcome::Ok(value),
        Err(err) => {
            warn!(error = %err, "unexpected response shape");
            ApiOutcome::Failed(GatewayError::Decode(err.to_string()))
        }
    }
}
