//! Editable copy of a profile shared by the edit and completion forms.

use shared::models::{
    ContactInfo, EducationItem, ExperienceItem, Profile, ProfileUpdate, join_skills, split_skills,
};
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

use super::state::{FormState, Submission, resolve};
use crate::{api::ApiClient, routes::Route};

/// Shown when the profile cannot be fetched.
pub const PROFILE_LOAD_FAILED: &str = "Failed to load profile";

/// Scalar fields of a [`ProfileDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum ProfileField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "location")]
    Location,
    #[strum(serialize = "bio")]
    Bio,
    /// Comma-separated.
    #[strum(serialize = "skills")]
    Skills,
    #[strum(serialize = "contact.email")]
    ContactEmail,
    #[strum(serialize = "contact.phone")]
    ContactPhone,
    #[strum(serialize = "contact.location")]
    ContactLocation,
}

/// Columns of an education entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum EducationField {
    #[strum(serialize = "institution")]
    Institution,
    #[strum(serialize = "degree")]
    Degree,
    #[strum(serialize = "period")]
    Period,
}

/// Columns of an experience entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum ExperienceField {
    #[strum(serialize = "company")]
    Company,
    #[strum(serialize = "role")]
    Role,
    #[strum(serialize = "period")]
    Period,
    #[strum(serialize = "description")]
    Description,
}

/// Scalar fields live in a [`FormState`]; education and experience are
/// ordered lists addressed by position.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub(super) state: FormState<ProfileField>,
    education: Vec<EducationItem>,
    experience: Vec<ExperienceItem>,
    avatar: String,
}

impl ProfileDraft {
    /// Copy `profile` into a draft. With `seed_blank_entries`, an empty
    /// education or experience list starts with one blank entry.
    #[must_use]
    pub fn from_profile(profile: &Profile, seed_blank_entries: bool) -> Self {
        let mut state = FormState::new();
        state.set_value(ProfileField::Name, profile.name.clone());
        state.set_value(ProfileField::Title, profile.title.clone());
        state.set_value(ProfileField::Location, profile.location.clone());
        state.set_value(ProfileField::Bio, profile.bio.clone());
        state.set_value(ProfileField::Skills, join_skills(&profile.skills));
        state.set_value(ProfileField::ContactEmail, profile.contact.email.clone());
        state.set_value(ProfileField::ContactPhone, profile.contact.phone.clone());
        state.set_value(ProfileField::ContactLocation, profile.contact.location.clone());

        let mut education = profile.education.clone();
        let mut experience = profile.experience.clone();
        if seed_blank_entries {
            if education.is_empty() {
                education.push(EducationItem::default());
            }
            if experience.is_empty() {
                experience.push(ExperienceItem::default());
            }
        }

        Self {
            state,
            education,
            experience,
            avatar: profile.avatar.clone(),
        }
    }

    /// Fetch the profile for editing.
    ///
    /// A rejected credential yields a draft already navigating to login; any
    /// other failure yields an empty draft carrying the error message.
    pub async fn fetch(api: &ApiClient, seed_blank_entries: bool) -> Self {
        Self::from_fetched(
            resolve(api.get_profile().await, PROFILE_LOAD_FAILED),
            seed_blank_entries,
        )
    }

    pub(super) fn from_fetched(
        fetched: Result<Profile, Submission>,
        seed_blank_entries: bool,
    ) -> Self {
        match fetched {
            Ok(profile) => Self::from_profile(&profile, seed_blank_entries),
            Err(submission) => {
                let mut draft = Self::from_profile(&Profile::default(), seed_blank_entries);
                match submission {
                    Submission::AuthRequired => draft.state.navigate(Route::Login),
                    Submission::Failed(message) => {
                        warn!(%message, "editing an empty profile after a failed load");
                        draft.state.set_api_error(message);
                    }
                    Submission::Succeeded { .. } => {}
                }
                draft
            }
        }
    }

    /// Field values and the load error, if any.
    #[must_use]
    pub fn state(&self) -> &FormState<ProfileField> {
        &self.state
    }

    /// Skills split on commas, blanks dropped.
    #[must_use]
    pub fn skills(&self) -> Vec<String> {
        split_skills(self.state.value(ProfileField::Skills))
    }

    /// Stored avatar filename; empty when none.
    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn set_avatar(&mut self, filename: impl Into<String>) {
        self.avatar = filename.into();
    }

    #[must_use]
    pub fn education(&self) -> &[EducationItem] {
        &self.education
    }

    /// Append a blank entry.
    pub fn add_education(&mut self) {
        self.education.push(EducationItem::default());
    }

    /// Drop the entry at `index`; out-of-range indices leave the list alone.
    pub fn remove_education(&mut self, index: usize) {
        self.education = remove_at(std::mem::take(&mut self.education), index);
    }

    /// Returns false when `index` is out of range.
    pub fn update_education(
        &mut self,
        index: usize,
        field: EducationField,
        value: impl Into<String>,
    ) -> bool {
        let Some(entry) = self.education.get_mut(index) else {
            return false;
        };
        let slot = match field {
            EducationField::Institution => &mut entry.institution,
            EducationField::Degree => &mut entry.degree,
            EducationField::Period => &mut entry.period,
        };
        *slot = value.into();
        true
    }

    #[must_use]
    pub fn experience(&self) -> &[ExperienceItem] {
        &self.experience
    }

    /// Append a blank entry.
    pub fn add_experience(&mut self) {
        self.experience.push(ExperienceItem::default());
    }

    /// Drop the entry at `index`; out-of-range indices leave the list alone.
    pub fn remove_experience(&mut self, index: usize) {
        self.experience = remove_at(std::mem::take(&mut self.experience), index);
    }

    /// Returns false when `index` is out of range.
    pub fn update_experience(
        &mut self,
        index: usize,
        field: ExperienceField,
        value: impl Into<String>,
    ) -> bool {
        let Some(entry) = self.experience.get_mut(index) else {
            return false;
        };
        let slot = match field {
            ExperienceField::Company => &mut entry.company,
            ExperienceField::Role => &mut entry.role,
            ExperienceField::Period => &mut entry.period,
            ExperienceField::Description => &mut entry.description,
        };
        *slot = value.into();
        true
    }

    /// The wholesale update body for this draft.
    #[must_use]
    pub fn to_update(&self) -> ProfileUpdate {
        let text = |field: ProfileField| self.state.trimmed(field).to_string();
        ProfileUpdate {
            name: text(ProfileField::Name),
            title: text(ProfileField::Title),
            location: text(ProfileField::Location),
            bio: text(ProfileField::Bio),
            skills: self.skills(),
            education: self.education.clone(),
            experience: self.experience.clone(),
            contact: ContactInfo {
                email: text(ProfileField::ContactEmail),
                phone: text(ProfileField::ContactPhone),
                location: text(ProfileField::ContactLocation),
            },
        }
    }
}

fn remove_at<T>(items: Vec<T>, index: usize) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| (position != index).then_some(item))
        .collect()
}
