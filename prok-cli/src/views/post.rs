//! Post preview.

use std::fmt::Write as _;

use client::forms::{MediaKind, PostPreview};
use colored::Colorize;

pub fn render_preview(preview: &PostPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Preview".blue().bold());
    let title = if preview.title.is_empty() {
        "(untitled)"
    } else {
        preview.title.as_str()
    };
    let _ = writeln!(out, "{}", title.bold());
    if !preview.content.is_empty() {
        let _ = writeln!(out, "{}", preview.content);
    }
    if let Some((name, kind)) = &preview.media {
        let kind = match kind {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
        };
        let _ = writeln!(out, "{kind}: {name}");
    }
    let _ = writeln!(
        out,
        "{} · {}",
        preview.visibility_label, preview.comments_label
    );
    out
}
