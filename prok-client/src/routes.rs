//! Navigation targets.
//!
//! Controllers never navigate themselves; they report a [`Route`] and the
//! driver decides what to show next.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Every view the client can show, keyed by its path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Route {
    #[default]
    #[strum(to_string = "/login", serialize = "/")]
    Login,
    #[strum(to_string = "/signup")]
    Signup,
    #[strum(to_string = "/profile")]
    Profile,
    #[strum(to_string = "/profile/edit")]
    ProfileEdit,
    #[strum(to_string = "/profile/complete")]
    CompleteProfile,
    #[strum(to_string = "/feed")]
    Feed,
    #[strum(to_string = "/posts")]
    Posts,
    #[strum(to_string = "/posts/create")]
    CreatePost,
    #[strum(to_string = "/jobs")]
    Jobs,
    #[strum(to_string = "/messages")]
    Messages,
}

impl Route {
    /// Parse a path, ignoring any query string, fragment or trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        normalized.parse().ok()
    }

    /// Whether the view needs a signed-in session.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::Login | Self::Signup)
    }

    /// Views that are rendered as "coming soon".
    #[must_use]
    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::Jobs | Self::Messages)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
            Self::Profile => "Profile",
            Self::ProfileEdit => "Edit Profile",
            Self::CompleteProfile => "Complete Your Profile",
            Self::Feed => "Feed",
            Self::Posts => "Posts",
            Self::CreatePost => "Create Post",
            Self::Jobs => "Jobs",
            Self::Messages => "Messages",
        }
    }

    /// Where an unauthenticated visit ends up.
    #[must_use]
    pub fn guard(self, authenticated: bool) -> Self {
        if self.requires_auth() && !authenticated {
            Self::Login
        } else {
            self
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}
