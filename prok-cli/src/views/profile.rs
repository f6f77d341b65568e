//! Profile card.

use std::fmt::Write as _;

use colored::Colorize;
use shared::models::Profile;
use url::Url;

/// Render `profile` as a card. Empty sections are left out.
pub fn render_profile(profile: &Profile, avatar_url: Option<&Url>) -> String {
    let mut out = String::new();

    let name = if profile.name.trim().is_empty() {
        "Unnamed"
    } else {
        profile.name.trim()
    };
    let _ = writeln!(out, "{}", name.bold());
    for line in [&profile.title, &profile.location] {
        if !line.trim().is_empty() {
            let _ = writeln!(out, "{}", line.trim());
        }
    }
    if let Some(url) = avatar_url {
        let _ = writeln!(out, "Photo: {url}");
    }

    if !profile.bio.trim().is_empty() {
        section(&mut out, "About");
        let _ = writeln!(out, "{}", profile.bio.trim());
    }

    if !profile.skills.is_empty() {
        section(&mut out, "Skills");
        let _ = writeln!(out, "{}", profile.skills.join(" · "));
    }

    if !profile.experience.is_empty() {
        section(&mut out, "Experience");
        for item in &profile.experience {
            let _ = writeln!(out, "- {} at {}", item.role, item.company);
            if !item.period.is_empty() {
                let _ = writeln!(out, "  {}", item.period.dimmed());
            }
            if !item.description.is_empty() {
                let _ = writeln!(out, "  {}", item.description);
            }
        }
    }

    if !profile.education.is_empty() {
        section(&mut out, "Education");
        for item in &profile.education {
            let _ = writeln!(out, "- {}, {}", item.degree, item.institution);
            if !item.period.is_empty() {
                let _ = writeln!(out, "  {}", item.period.dimmed());
            }
        }
    }

    if !profile.contact.is_empty() {
        section(&mut out, "Contact");
        for (label, value) in [
            ("Email", &profile.contact.email),
            ("Phone", &profile.contact.phone),
            ("Location", &profile.contact.location),
        ] {
            if !value.is_empty() {
                let _ = writeln!(out, "{label}: {value}");
            }
        }
    }

    let links = profile.social.entries();
    if !links.is_empty() {
        section(&mut out, "Links");
        for (label, url) in links {
            let _ = writeln!(out, "{label}: {url}");
        }
    }

    if !profile.activity.is_empty() {
        section(&mut out, "Recent Activity");
        for item in &profile.activity {
            let _ = writeln!(out, "- {} {}", item.content, item.date.dimmed());
        }
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.blue().bold());
}
