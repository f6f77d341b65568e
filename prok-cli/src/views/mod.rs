//! Terminal renderers. Each takes state and returns the text to print.

pub mod feed;
pub mod placeholder;
pub mod post;
pub mod profile;

use std::fmt::Write as _;

use client::forms::{FormField, FormState};
use colored::Colorize;

/// Field errors and the API error of `state`, one per line.
pub fn render_form_errors<F: FormField>(state: &FormState<F>) -> String {
    let mut out = String::new();
    for (field, message) in state.errors() {
        let _ = writeln!(out, "{} {message}", format!("{field}:").red());
    }
    if let Some(message) = state.api_error() {
        let _ = writeln!(out, "{}", message.red());
    }
    out
}
