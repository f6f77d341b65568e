use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

/// A post as returned by `POST /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    /// The server echoes the token identity here, which may be a string.
    #[serde(rename = "user_id", deserialize_with = "number_or_numeric_string")]
    pub author_id: i64,
    /// Rich-text (HTML) body.
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default = "default_true")]
    pub allow_comments: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Post {
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_server_timestamp)
    }
}

/// Successful body of `POST /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePostResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub post: Post,
}

/// One entry of the feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedItem {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub media_url: Option<String>,
}

impl FeedItem {
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_server_timestamp(&self.created_at)
    }
}

/// Body of `GET /api/feed` and `GET /api/feed/user/:id`, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedResponse {
    #[serde(default)]
    pub feed: Vec<FeedItem>,
}

/// Multipart payload for `POST /api/posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Final HTML content (title heading plus body).
    pub content: String,
    pub media: Option<MediaAttachment>,
    pub is_public: bool,
    pub allow_comments: bool,
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaAttachment {
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    #[must_use]
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// Best-effort parse of the timestamps the server emits.
///
/// Feed entries use naive ISO-8601 (`2024-06-01T10:00:00.123456`, UTC);
/// freshly created posts use RFC 2822 (`Sat, 01 Jun 2024 10:00:00 GMT`).
#[must_use]
pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

const fn default_true() -> bool {
    true
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("identifier out of range: {number}"))),
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("identifier is not numeric: {text}"))),
        other => Err(D::Error::custom(format!("unexpected identifier: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;
    use test_case::test_case;

    #[test_case("2024-06-01T10:15:30.123456" ; "naive iso with fraction")]
    #[test_case("2024-06-01T10:15:30" ; "naive iso")]
    #[test_case("2024-06-01T10:15:30Z" ; "rfc3339")]
    #[test_case("Sat, 01 Jun 2024 10:15:30 GMT" ; "rfc2822")]
    fn parses_server_timestamps(raw: &str) {
        let parsed = parse_server_timestamp(raw).unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 6);
        assert_eq!(parsed.day(), 1);
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.minute(), 15);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_server_timestamp("").is_none());
        assert!(parse_server_timestamp("yesterday").is_none());
    }

    #[test]
    fn parses_feed_body() {
        let body = json!({
            "feed": [
                {"id": 2, "user_id": 5, "content": "<h2>Hi</h2>\nthere", "created_at": "2024-06-01T10:00:00", "likes": 0, "media_url": null},
                {"id": 1, "user_id": 5, "content": "first", "created_at": "", "likes": 3, "media_url": "/uploads/post_media/a.png"}
            ]
        });

        let feed: FeedResponse = serde_json::from_value(body).unwrap();
        assert_eq!(feed.feed.len(), 2);
        assert!(feed.feed[0].created_at_utc().is_some());
        assert!(feed.feed[1].created_at_utc().is_none());
        assert_eq!(feed.feed[1].media_url.as_deref(), Some("/uploads/post_media/a.png"));
    }

    #[test]
    fn parses_create_post_body() {
        let body = json!({
            "message": "Post created successfully",
            "post": {
                "id": 11,
                "user_id": "4",
                "content": "<h2>T</h2>\nC",
                "media_url": null,
                "created_at": "Sat, 01 Jun 2024 10:00:00 GMT",
                "is_public": false,
                "allow_comments": true
            }
        });

        let response: CreatePostResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.post.author_id, 4);
        assert!(!response.post.is_public);
        assert!(response.post.allow_comments);
        assert!(response.post.created_at_utc().is_some());

        let body = json!({
            "post": {"id": 12, "user_id": 4, "content": "x"}
        });
        let response: CreatePostResponse = serde_json::from_value(body).unwrap();
        assert!(response.post.is_public);
        assert!(response.post.created_at_utc().is_none());

        let body = json!({"post": {"id": 13, "user_id": "four", "content": "x"}});
        assert!(serde_json::from_value::<CreatePostResponse>(body).is_err());
    }

    #[test]
    fn media_kind_follows_mime_type() {
        let image = MediaAttachment {
            file_name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0; 4],
        };
        assert!(image.is_image());
        assert!(!image.is_video());
        assert_eq!(image.size(), 4);
    }
}
