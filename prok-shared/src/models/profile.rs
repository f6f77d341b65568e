//! Profile models.
//!
//! The server is loose about shapes: fields may be missing or `null`, `skills`
//! travels as one comma-separated string, and `activity` is `{}` rather than
//! `[]` when empty. Everything here reads leniently into empty defaults.

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{DeserializeOwned, Error as _},
};
use serde_json::Value;

/// One education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EducationItem {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
}

/// One experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Contact block shown on the profile card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

impl ContactInfo {
    /// True when no contact detail is filled in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.trim().is_empty()
            && self.phone.trim().is_empty()
            && self.location.trim().is_empty()
    }
}

/// External profile links. Each one is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl SocialLinks {
    /// Present links as `(label, url)` pairs in display order, skipping blanks.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("LinkedIn", self.linkedin.as_deref()),
            ("Twitter", self.twitter.as_deref()),
            ("GitHub", self.github.as_deref()),
            ("Website", self.website.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| {
            url.map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|url| (label, url))
        })
        .collect()
    }
}

/// A recent-activity line on the profile card.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActivityItem {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
}

/// The client's transient copy of a profile, as served by `GET /api/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(
        deserialize_with = "skills_from_wire",
        serialize_with = "skills_to_wire"
    )]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "list_or_empty")]
    pub education: Vec<EducationItem>,
    #[serde(deserialize_with = "list_or_empty")]
    pub experience: Vec<ExperienceItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: ContactInfo,
    /// Stored filename of the uploaded avatar; empty when none.
    #[serde(deserialize_with = "null_as_default")]
    pub avatar: String,
    #[serde(deserialize_with = "null_as_default")]
    pub social: SocialLinks,
    #[serde(deserialize_with = "list_or_empty")]
    pub activity: Vec<ActivityItem>,
}

impl Profile {
    /// A profile with nothing filled in that identifies the person.
    ///
    /// New accounts come back this way and are routed to profile completion.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.title.trim().is_empty() && self.bio.trim().is_empty()
    }

    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        let avatar = self.avatar.trim();
        (!avatar.is_empty()).then_some(avatar)
    }
}

/// Body of `PUT /api/profile`. The profile is submitted wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub title: String,
    pub location: String,
    pub bio: String,
    #[serde(
        deserialize_with = "skills_from_wire",
        serialize_with = "skills_to_wire"
    )]
    pub skills: Vec<String>,
    pub education: Vec<EducationItem>,
    pub experience: Vec<ExperienceItem>,
    pub contact: ContactInfo,
}

/// Successful body of `PUT /api/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileUpdateResponse {
    pub message: Option<String>,
    pub profile: Option<Profile>,
}

/// Successful body of `POST /api/profile/image`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvatarUploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Server-relative path of the stored image.
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Filename that becomes the profile's avatar reference.
    pub filename: String,
}

/// Split the comma-separated wire form of skills into trimmed, non-empty entries.
#[must_use]
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join skills into their wire form.
#[must_use]
pub fn join_skills(skills: &[String]) -> String {
    skills.join(", ")
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn skills_from_wire<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => split_skills(&raw),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

#[allow(clippy::ptr_arg)]
fn skills_to_wire<S>(skills: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_skills(skills))
}

fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Array(_) => serde_json::from_value(value).map_err(D::Error::custom),
        _ => Ok(Vec::new()),
    }
}
