//! Description Formatter: segments sanitized text into titled or untitled
//! sections, detecting bullet lists and likely section headers.
//!
//! Best-effort heuristics: a short keyword line in the middle of a paragraph
//! may be taken for a header. The only hard guarantee is that no non-header
//! line's text is dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lines starting with one of these (case-insensitive) may be headers.
const HEADER_KEYWORDS: &[&str] = &[
    "responsibilities",
    "requirements",
    "qualifications",
    "skills",
    "benefits",
    "perks",
    "what we offer",
    "what you'll do",
    "about the role",
    "about you",
    "required",
    "preferred",
    "we are looking for",
    "your profile",
    "nice to have",
    "education",
    "experience",
    "technologies",
    "tech stack",
];

const MAX_HEADER_CHARS: usize = 60;

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s").expect("numbered item pattern must compile"));

static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-*]\s*").expect("bullet pattern must compile"));

static NUMBER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s*").expect("number marker pattern must compile"));

/// One block of a formatted description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: Option<String>,
    pub content: Vec<String>,
    pub is_list: bool,
}

impl Section {
    fn titled(title: &str) -> Self {
        Section {
            title: Some(title.strip_suffix(':').unwrap_or(title).to_string()),
            ..Section::default()
        }
    }
}

/// Splits sanitized text into sections.
pub fn format_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::default();
    let mut previous_blank = false;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !current.content.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            previous_blank = true;
            continue;
        }

        if is_likely_header(trimmed, index > 0 && previous_blank) {
            if !current.content.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            current = Section::titled(trimmed);
        } else if is_list_item(trimmed) {
            current.is_list = true;
            current.content.push(strip_list_marker(trimmed).to_string());
        } else {
            current.content.push(trimmed.to_string());
        }
        previous_blank = false;
    }

    if !current.content.is_empty() {
        sections.push(current);
    }

    sections
}

fn is_likely_header(line: &str, follows_blank: bool) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS.iter().any(|kw| lower.starts_with(kw))
        && line.chars().count() < MAX_HEADER_CHARS
        && (line.ends_with(':') || line.ends_with('?') || follows_blank)
}

/// `**` opens bold text, not a bullet.
fn is_list_item(line: &str) -> bool {
    if line.starts_with("**") {
        return false;
    }
    line.starts_with('•')
        || line.starts_with('-')
        || line.starts_with('*')
        || NUMBERED_ITEM.is_match(line)
}

/// Strips a leading bullet, then a leading number, so `• 1. Foo` is `Foo`.
fn strip_list_marker(line: &str) -> &str {
    let line = BULLET_MARKER
        .find(line)
        .map_or(line, |marker| &line[marker.end()..]);
    NUMBER_MARKER
        .find(line)
        .map_or(line, |marker| &line[marker.end()..])
}
