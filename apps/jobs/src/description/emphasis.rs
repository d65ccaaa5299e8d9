use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern must compile"));

/// A run of text, rendered as strong emphasis when `strong` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub strong: bool,
}

/// Splits `**bold**` runs out of a line. Unpaired markers stay as plain text.
pub fn split_emphasis(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span {
                text: text[cursor..whole.start()].to_string(),
                strong: false,
            });
        }
        spans.push(Span {
            text: inner.as_str().to_string(),
            strong: true,
        });
        cursor = whole.end();
    }

    if cursor < text.len() {
        spans.push(Span {
            text: text[cursor..].to_string(),
            strong: false,
        });
    }

    spans
}
