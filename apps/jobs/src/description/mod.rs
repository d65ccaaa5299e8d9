//! Job description pipeline: sanitize raw HTML, segment it into sections,
//! and build the short preview shown on a collapsed card.
//!
//! Runs lazily per card; the fetch path never touches descriptions.

pub mod emphasis;
pub mod formatter;
pub mod sanitizer;

use serde::{Deserialize, Serialize};

pub use emphasis::{split_emphasis, Span};
pub use formatter::{format_sections, Section};
pub use sanitizer::sanitize;

pub const NO_DESCRIPTION: &str = "No description available";
pub const PREVIEW_CHARS: usize = 200;

/// A description ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedDescription {
    pub sections: Vec<Section>,
    /// Flattened text of every section; clip with `truncate_preview`.
    pub preview: String,
}

impl PreparedDescription {
    /// Whether the collapsed card needs a "Show More" toggle.
    pub fn is_truncated(&self) -> bool {
        self.preview.chars().count() > PREVIEW_CHARS
    }

    pub fn short_preview(&self) -> String {
        truncate_preview(&self.preview, PREVIEW_CHARS)
    }
}

/// Sanitizes and formats a raw provider description.
pub fn prepare(raw: &str) -> PreparedDescription {
    let cleaned = sanitize(raw);
    let mut sections = format_sections(&cleaned);

    if sections.is_empty() {
        sections.push(Section {
            title: None,
            content: vec![NO_DESCRIPTION.to_string()],
            is_list: false,
        });
    }

    let preview = preview_text(&sections);
    PreparedDescription { sections, preview }
}

/// Joins section titles and content into one line of text.
pub fn preview_text(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| match &section.title {
            Some(title) => format!("{} {}", title, section.content.join(" ")),
            None => section.content.join(" "),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clips `text` to `max_chars`, appending `...` when anything was cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let cleaned = text.trim();
    match cleaned.char_indices().nth(max_chars) {
        None => cleaned.to_string(),
        Some((cut, _)) => format!("{}...", cleaned[..cut].trim_end()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_empty_description_shows_placeholder() {
        let prepared = prepare("");
        assert_eq!(prepared.sections.len(), 1);
        assert_eq!(prepared.sections[0].content, vec![NO_DESCRIPTION]);
        assert_eq!(prepared.preview, NO_DESCRIPTION);
    }

    #[test]
    fn test_prepare_html_into_titled_list() {
        let raw = "<p>Join a small platform team.</p>\
                   <h3>Requirements:</h3><ul><li>Rust</li><li><b>Postgres</b> tuning</li></ul>";
        let prepared = prepare(raw);

        assert_eq!(prepared.sections.len(), 2);
        assert_eq!(prepared.sections[0].content, vec!["Join a small platform team."]);
        let list = &prepared.sections[1];
        assert_eq!(list.title.as_deref(), Some("Requirements"));
        assert!(list.is_list);
        assert_eq!(list.content, vec!["Rust", "**Postgres** tuning"]);
        assert_eq!(
            prepared.preview,
            "Join a small platform team. Requirements Rust **Postgres** tuning"
        );
    }

    #[test]
    fn test_truncate_preview_short_text_untouched() {
        assert_eq!(truncate_preview("  short  ", 200), "short");
    }

    #[test]
    fn test_truncate_preview_appends_ellipsis() {
        let text = "a".repeat(250);
        let clipped = truncate_preview(&text, PREVIEW_CHARS);
        assert_eq!(clipped.chars().count(), PREVIEW_CHARS + 3);
        assert!(clipped.ends_with("..."));
    }

    #[test]
    fn test_long_description_is_marked_truncated() {
        let raw = "Build distributed systems. ".repeat(20);
        let prepared = prepare(&raw);
        assert!(prepared.is_truncated());
        assert!(prepared.short_preview().ends_with("..."));
    }
}
