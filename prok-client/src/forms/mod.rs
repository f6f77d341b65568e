//! Form state controllers.
//!
//! Each form keeps its input in a [`FormState`], validates locally, and
//! submits through the [`ApiClient`](crate::api::ApiClient). Outcomes land in
//! the state: an API error to show, a success message with a pending
//! redirect, or a navigation.

mod avatar;
mod complete_profile;
mod login;
mod post_create;
mod profile_draft;
mod profile_edit;
mod signup;
mod state;
pub mod validation;

pub use avatar::{
    AVATAR_FAILED, AVATAR_INVALID_TYPE, AVATAR_TOO_LARGE, AVATAR_UPDATED, AvatarField, AvatarForm,
};
pub use complete_profile::{CompleteProfileForm, PROFILE_COMPLETED};
pub use login::{LOGIN_FAILED, LOGIN_SUCCESS, LoginField, LoginForm};
pub use post_create::{
    MEDIA_TOO_LARGE, MEDIA_UNSUPPORTED, MediaKind, POST_CREATED, POST_FAILED, PostCreateForm,
    PostField, PostPreview, TITLE_AND_CONTENT_REQUIRED,
};
pub use profile_draft::{
    EducationField, ExperienceField, PROFILE_LOAD_FAILED, ProfileDraft, ProfileField,
};
pub use profile_edit::{INVALID_EMAIL, PROFILE_UPDATE_FAILED, PROFILE_UPDATED, ProfileEditForm};
pub use signup::{
    SIGNUP_FAILED, SIGNUP_LOGIN_NEXT, SIGNUP_SIGNED_IN, SignupField, SignupForm, SignupRules,
};
pub use state::{
    DEFAULT_REDIRECT_DELAY, FormController, FormError, FormField, FormState, FormStatus,
    NETWORK_ERROR, Submission, resolve,
};
