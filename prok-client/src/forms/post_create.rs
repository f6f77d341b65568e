use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::models::{MediaAttachment, NewPost};
use strum::{Display, EnumIter, EnumString};

use super::{
    state::{FormController, FormState, Submission, resolve},
    validation::{ValidationError, validate_post_media, validate_required},
};
use crate::{api::ApiClient, routes::Route};

/// Shown when publishing fails without a server message.
pub const POST_FAILED: &str = "Failed to create post.";
/// Confirmation after publishing.
pub const POST_CREATED: &str = "Post created!";
/// Shown when either title or content is blank.
pub const TITLE_AND_CONTENT_REQUIRED: &str = "Title and content are required.";
/// Refusal for attachments over 10 MiB.
pub const MEDIA_TOO_LARGE: &str = "File size exceeds 10MB.";
/// Refusal for attachments that are neither image nor video.
pub const MEDIA_UNSUPPORTED: &str = "Please select an image or video file.";

/// Fields of [`PostCreateForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum PostField {
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "content")]
    Content,
    #[strum(serialize = "media")]
    Media,
}

/// Kind of attachment shown in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// What the post will look like once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPreview {
    pub title: String,
    pub content: String,
    pub media: Option<(String, MediaKind)>,
    pub comments_label: &'static str,
    pub visibility_label: &'static str,
}

/// New post composer.
#[derive(Debug)]
pub struct PostCreateForm {
    state: FormState<PostField>,
    media: Option<MediaAttachment>,
    is_public: bool,
    allow_comments: bool,
}

impl Default for PostCreateForm {
    fn default() -> Self {
        Self {
            state: FormState::new(),
            media: None,
            is_public: true,
            allow_comments: true,
        }
    }
}

impl PostCreateForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `file` when it passes the media rules; otherwise keep the
    /// previous attachment and show why.
    pub fn select_media(&mut self, file: MediaAttachment) -> bool {
        match validate_post_media(&file) {
            Ok(()) => {
                self.state.on_field_change(PostField::Media, file.file_name.clone());
                self.media = Some(file);
                true
            }
            Err(err) => {
                self.state.set_error(PostField::Media, media_message(err));
                false
            }
        }
    }

    /// Drop the attachment and its error.
    pub fn clear_media(&mut self) {
        self.media = None;
        self.state.on_field_change(PostField::Media, String::new());
    }

    /// The accepted attachment, if any.
    #[must_use]
    pub fn media(&self) -> Option<&MediaAttachment> {
        self.media.as_ref()
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    pub fn set_allow_comments(&mut self, allow_comments: bool) {
        self.allow_comments = allow_comments;
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    #[must_use]
    pub fn allow_comments(&self) -> bool {
        self.allow_comments
    }

    /// Body sent to the server: the title as a heading, then the content.
    #[must_use]
    pub fn composed_content(&self) -> String {
        format!(
            "<h2>{}</h2>\n{}",
            self.state.trimmed(PostField::Title),
            self.state.trimmed(PostField::Content)
        )
    }

    #[must_use]
    pub fn preview(&self) -> PostPreview {
        PostPreview {
            title: self.state.trimmed(PostField::Title).to_string(),
            content: self.state.trimmed(PostField::Content).to_string(),
            media: self.media.as_ref().map(|file| {
                let kind = if file.is_video() {
                    MediaKind::Video
                } else {
                    MediaKind::Image
                };
                (file.file_name.clone(), kind)
            }),
            comments_label: if self.allow_comments {
                "Comments Allowed"
            } else {
                "Comments Disabled"
            },
            visibility_label: if self.is_public { "Public" } else { "Private" },
        }
    }
}

fn media_message(err: ValidationError) -> &'static str {
    match err {
        ValidationError::FileTooLarge { .. } => MEDIA_TOO_LARGE,
        _ => MEDIA_UNSUPPORTED,
    }
}

#[async_trait]
impl FormController for PostCreateForm {
    type Field = PostField;

    fn state(&self) -> &FormState<PostField> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState<PostField> {
        &mut self.state
    }

    fn check(&self) -> BTreeMap<PostField, String> {
        let mut errors = BTreeMap::new();
        for field in [PostField::Title, PostField::Content] {
            if validate_required(self.state.value(field)).is_err() {
                errors.insert(field, TITLE_AND_CONTENT_REQUIRED.to_string());
            }
        }
        if let Some(Err(err)) = self.media.as_ref().map(validate_post_media) {
            errors.insert(PostField::Media, media_message(err).to_string());
        }
        errors
    }

    async fn perform(&mut self, api: &ApiClient) -> Submission {
        let post = NewPost {
            content: self.composed_content(),
            media: self.media.clone(),
            is_public: self.is_public,
            allow_comments: self.allow_comments,
        };
        match resolve(api.create_post(post).await, POST_FAILED) {
            Ok(_) => Submission::succeeded(POST_CREATED, Some(Route::Posts)),
            Err(submission) => submission,
        }
    }
}
