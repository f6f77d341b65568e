use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{
    profile_draft::{ProfileDraft, ProfileField},
    state::{FormController, FormState, Submission, resolve},
    validation::validate_optional_email,
};
use crate::{api::ApiClient, routes::Route};

/// Shown when saving fails without a server message.
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile. Please try again.";
/// Confirmation after saving the profile.
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
/// Validation message for a malformed contact email.
pub const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Edits an existing profile and saves it wholesale.
#[derive(Debug, Clone, Default)]
pub struct ProfileEditForm {
    draft: ProfileDraft,
}

impl ProfileEditForm {
    /// Edit an already loaded draft.
    #[must_use]
    pub fn new(draft: ProfileDraft) -> Self {
        Self { draft }
    }

    /// Load the current profile. Empty education or experience lists start
    /// with one blank entry.
    pub async fn load(api: &ApiClient) -> Self {
        Self::new(ProfileDraft::fetch(api, true).await)
    }

    /// The profile being edited.
    #[must_use]
    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    /// Mutable access for entry-level edits.
    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }
}

#[async_trait]
impl FormController for ProfileEditForm {
    type Field = ProfileField;

    fn state(&self) -> &FormState<ProfileField> {
        &self.draft.state
    }

    fn state_mut(&mut self) -> &mut FormState<ProfileField> {
        &mut self.draft.state
    }

    fn check(&self) -> BTreeMap<ProfileField, String> {
        let mut errors = BTreeMap::new();
        if validate_optional_email(self.draft.state.value(ProfileField::ContactEmail)).is_err() {
            errors.insert(ProfileField::ContactEmail, INVALID_EMAIL.to_string());
        }
        errors
    }

    async fn perform(&mut self, api: &ApiClient) -> Submission {
        let update = self.draft.to_update();
        match resolve(api.update_profile(&update).await, PROFILE_UPDATE_FAILED) {
            Ok(_) => Submission::succeeded(PROFILE_UPDATED, Some(Route::Profile)),
            Err(submission) => submission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Profile;

    #[test]
    fn contact_email_is_optional_but_checked() {
        let mut form = ProfileEditForm::new(ProfileDraft::from_profile(&Profile::default(), true));
        assert!(form.validate());

        form.on_field_change(ProfileField::ContactEmail, "not-an-email".to_string());
        assert!(!form.validate());
        assert_eq!(
            form.state().error(ProfileField::ContactEmail),
            Some(INVALID_EMAIL)
        );

        form.on_field_change(ProfileField::ContactEmail, "me@example.com".to_string());
        assert!(form.validate());
    }

    #[test]
    fn list_edits_go_through_the_draft() {
        let mut form = ProfileEditForm::new(ProfileDraft::from_profile(&Profile::default(), true));
        assert_eq!(form.draft().experience().len(), 1);

        form.draft_mut().add_experience();
        form.draft_mut().remove_experience(0);
        assert_eq!(form.draft().experience().len(), 1);
    }
}
