use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::models::MediaAttachment;
use strum::{Display, EnumIter, EnumString};

use super::{
    state::{FormController, FormState, Submission, resolve},
    validation::{ValidationError, validate_avatar},
};
use crate::api::ApiClient;

/// Shown when the upload fails without a server message.
pub const AVATAR_FAILED: &str = "Failed to upload image. Please try again.";
/// Confirmation after a new photo is stored.
pub const AVATAR_UPDATED: &str = "Profile photo updated successfully!";
/// Refusal for files that are not JPEG, PNG or GIF.
pub const AVATAR_INVALID_TYPE: &str = "Please select a valid image file (JPG, PNG, GIF)";
/// Refusal for images over 5 MiB.
pub const AVATAR_TOO_LARGE: &str = "File size must be less than 5MB";

/// Fields of [`AvatarForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum AvatarField {
    #[strum(serialize = "image")]
    Image,
}

/// Profile photo upload. Success replaces the avatar reference in place.
#[derive(Debug, Default)]
pub struct AvatarForm {
    state: FormState<AvatarField>,
    selected: Option<MediaAttachment>,
    avatar: String,
    image_url: Option<String>,
}

impl AvatarForm {
    /// Start from the profile's current avatar filename.
    #[must_use]
    pub fn new(avatar: impl Into<String>) -> Self {
        Self {
            avatar: avatar.into(),
            ..Self::default()
        }
    }

    /// Choose the image to upload. Validation happens on submit.
    pub fn select(&mut self, file: MediaAttachment) {
        self.state
            .on_field_change(AvatarField::Image, file.file_name.clone());
        self.selected = Some(file);
    }

    /// The image waiting to be uploaded.
    #[must_use]
    pub fn selected(&self) -> Option<&MediaAttachment> {
        self.selected.as_ref()
    }

    /// Current avatar filename; empty when none.
    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    /// Server-relative path of the last uploaded image.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

#[async_trait]
impl FormController for AvatarForm {
    type Field = AvatarField;

    fn state(&self) -> &FormState<AvatarField> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState<AvatarField> {
        &mut self.state
    }

    fn check(&self) -> BTreeMap<AvatarField, String> {
        let message = match self.selected.as_ref().map(validate_avatar) {
            Some(Ok(())) => return BTreeMap::new(),
            Some(Err(ValidationError::FileTooLarge { .. })) => AVATAR_TOO_LARGE,
            Some(Err(_)) | None => AVATAR_INVALID_TYPE,
        };
        BTreeMap::from([(AvatarField::Image, message.to_string())])
    }

    async fn perform(&mut self, api: &ApiClient) -> Submission {
        let Some(file) = self.selected.clone() else {
            return Submission::Failed(AVATAR_INVALID_TYPE.to_string());
        };
        match resolve(api.upload_avatar(file).await, AVATAR_FAILED) {
            Ok(response) => {
                self.avatar = response.filename;
                self.image_url = Some(response.image_url);
                self.selected = None;
                Submission::succeeded(AVATAR_UPDATED, None)
            }
            Err(submission) => submission,
        }
    }
}
