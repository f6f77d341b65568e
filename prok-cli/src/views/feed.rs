//! Feed listing.

use std::{borrow::Cow, fmt::Write as _, sync::LazyLock};

use colored::Colorize;
use regex::Regex;
use shared::models::FeedItem;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"));

/// Plain text of rich post content: tags removed, common entities decoded.
pub fn strip_tags(html: &str) -> String {
    let text = TAG.replace_all(html, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}

/// Entries whose text contains `query`, ignoring case.
pub fn filter_feed<'a>(items: &'a [FeedItem], query: Option<&str>) -> Vec<&'a FeedItem> {
    let query = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);
    items
        .iter()
        .filter(|item| match &query {
            Some(query) => strip_tags(&item.content).to_lowercase().contains(query),
            None => true,
        })
        .collect()
}

fn display_date(item: &FeedItem) -> Cow<'_, str> {
    match item.created_at_utc() {
        Some(at) => Cow::Owned(at.format("%b %-d, %Y %H:%M").to_string()),
        None => Cow::Borrowed(item.created_at.as_str()),
    }
}

/// Render feed entries newest first, as the server ordered them.
///
/// `media_base` turns server-relative media paths into full links.
pub fn render_feed(items: &[&FeedItem], media_base: impl Fn(&str) -> String) -> String {
    if items.is_empty() {
        return "No posts found.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{} {}",
            format!("User {}", item.user_id).bold(),
            display_date(item).dimmed()
        );
        let _ = writeln!(out, "{}", strip_tags(&item.content));
        if let Some(media) = item.media_url.as_deref().filter(|m| !m.is_empty()) {
            let _ = writeln!(out, "Media: {}", media_base(media));
        }
        let _ = writeln!(out, "♥ {}\n", item.likes);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, content: &str) -> FeedItem {
        FeedItem {
            id,
            user_id: 3,
            content: content.to_string(),
            created_at: "2024-06-01T10:05:00.123456".to_string(),
            likes: 4,
            media_url: None,
        }
    }

    #[test]
    fn tags_are_stripped_and_entities_decoded() {
        assert_eq!(
            strip_tags("<h2>Launch</h2>\n<p>Fish &amp; chips&nbsp;today</p>"),
            "Launch\nFish & chips today"
        );
    }

    #[test]
    fn search_matches_text_not_markup() {
        let items = [item(1, "<h2>Rust</h2> jobs"), item(2, "<b>Go</b> meetup")];
        let hits = filter_feed(&items, Some("RUST"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        assert!(filter_feed(&items, Some("h2")).is_empty());
        assert_eq!(filter_feed(&items, Some("  ")).len(), 2);
        assert_eq!(filter_feed(&items, None).len(), 2);
    }

    #[test]
    fn entries_show_author_date_media_and_likes() {
        colored::control::set_override(false);
        let mut entry = item(1, "<p>Hello</p>");
        entry.media_url = Some("/uploads/posts/a.png".to_string());

        let out = render_feed(&[&entry], |path| format!("http://api{path}"));

        assert_eq!(
            out,
            "User 3 Jun 1, 2024 10:05\nHello\nMedia: http://api/uploads/posts/a.png\n♥ 4\n\n"
        );
    }

    #[test]
    fn empty_feed_says_so() {
        assert_eq!(render_feed(&[], str::to_string), "No posts found.\n");
    }
}
