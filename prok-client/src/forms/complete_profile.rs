use std::collections::BTreeMap;

use async_trait::async_trait;
use shared::models::Profile;

use super::{
    profile_draft::{PROFILE_LOAD_FAILED, ProfileDraft, ProfileField},
    profile_edit::{INVALID_EMAIL, PROFILE_UPDATE_FAILED},
    state::{FormController, FormState, Submission, resolve},
    validation::{validate_optional_email, validate_required},
};
use crate::{api::ApiClient, routes::Route};

/// Confirmation after first-run profile setup.
pub const PROFILE_COMPLETED: &str = "Profile completed!";

const REQUIRED: [(ProfileField, &str); 3] = [
    (ProfileField::Name, "Full Name is required"),
    (ProfileField::Title, "Professional Title is required"),
    (ProfileField::Bio, "Professional Summary is required"),
];

/// First-run profile setup for a new account.
#[derive(Debug, Clone, Default)]
pub struct CompleteProfileForm {
    draft: ProfileDraft,
}

impl CompleteProfileForm {
    /// Start from `profile`, or from nothing when it is still blank.
    #[must_use]
    pub fn new(profile: &Profile) -> Self {
        let draft = if profile.is_blank() {
            ProfileDraft::from_profile(
                &Profile {
                    avatar: profile.avatar.clone(),
                    ..Profile::default()
                },
                true,
            )
        } else {
            ProfileDraft::from_profile(profile, true)
        };
        Self { draft }
    }

    /// Fetch the profile; a failed load starts blank with the error showing.
    pub async fn load(api: &ApiClient) -> Self {
        match resolve(api.get_profile().await, PROFILE_LOAD_FAILED) {
            Ok(profile) => Self::new(&profile),
            Err(submission) => Self {
                draft: ProfileDraft::from_fetched(Err(submission), true),
            },
        }
    }

    /// The profile being filled in.
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
impl FormController for CompleteProfileForm {
    type Field = ProfileField;

    fn state(&self) -> &FormState<ProfileField> {
        &self.draft.state
    }

    fn state_mut(&mut self) -> &mut FormState<ProfileField> {
        &mut self.draft.state
    }

    fn check(&self) -> BTreeMap<ProfileField, String> {
        let mut errors: BTreeMap<_, _> = REQUIRED
            .iter()
            .filter(|(field, _)| validate_required(self.draft.state.value(*field)).is_err())
            .map(|(field, message)| (*field, (*message).to_string()))
            .collect();
        if validate_optional_email(self.draft.state.value(ProfileField::ContactEmail)).is_err() {
            errors.insert(ProfileField::ContactEmail, INVALID_EMAIL.to_string());
        }
        errors
    }

    async fn perform(&mut self, api: &ApiClient) -> Submission {
        let update = self.draft.to_update();
        match resolve(api.update_profile(&update).await, PROFILE_UPDATE_FAILED) {
            Ok(_) => Submission::succeeded(PROFILE_COMPLETED, Some(Route::Profile)),
            Err(submission) => submission,
        }
    }
}
