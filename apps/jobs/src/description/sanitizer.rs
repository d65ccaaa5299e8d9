//! HTML Sanitizer: turns raw job-posting HTML into clean plain text.
//!
//! Pipeline: parse → extract visible text → normalize whitespace →
//! strip boilerplate phrases → drop boilerplate paragraphs → truncate,
//! repeated until the text is stable.
//! Every stage is total: malformed markup degrades to best-effort text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Hard cap on sanitized output, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2500;
/// A sentence or line break past this point is a good enough place to cut.
const MIN_CLEAN_CUT_CHARS: usize = 2000;

/// Continues a match to the next paragraph break or end of text.
const TO_PARAGRAPH_END: &str = r"(?:[^\n]|\n[^\n])*";

/// Ordered phrase patterns. Later patterns see the output of earlier ones.
const BOILERPLATE_PHRASES: &[&str] = &[
    // Equal-opportunity and legal notices
    r"\b(?:we are|is|are) (?:a |an )?(?:proud )?equal (?:employment )?opportunity",
    r"without regard to (?:race|color|religion|sex|gender|age|national origin|sexual orientation)",
    // Accommodation requests
    r"if you (?:need|require) (?:a |an )?(?:reasonable )?accommodation",
    r"we (?:are committed to|will) provid(?:e|ing) reasonable accommodations?",
    // Salary-disclaimer legalese
    r"actual (?:salary|pay|compensation) (?:will|may) (?:vary|be determined|depend)",
    r"(?:in compliance with|pursuant to) (?:applicable )?(?:state |local )?pay transparency",
    r"the (?:salary|pay|compensation) range (?:displayed|listed|posted|provided) (?:is|reflects|represents)",
    // Generic apply prompts
    r"(?:apply now|click (?:here|apply|the apply button)|ready to apply\?|interested\? apply)",
    // Marketing slogans and social tags
    r"join (?:us|our team) (?:and|to) (?:help )?(?:shape|build|change|create|make)",
    r"follow us on (?:linkedin|twitter|instagram|facebook)",
    r"#li-[a-z0-9]+",
];

/// Any paragraph containing one of these (lowercased) is dropped outright.
const BOILERPLATE_MARKERS: &[&str] = &[
    "equal opportunity employer",
    "equal employment opportunity",
    "reasonable accommodation",
    "affirmative action",
    "e-verify",
    "fair chance ordinance",
    "criminal histories",
    "pay transparency",
    "privacy notice",
    "#li-",
];

static BOILERPLATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    BOILERPLATE_PHRASES
        .iter()
        .map(|phrase| {
            Regex::new(&format!("(?i){phrase}{TO_PARAGRAPH_END}"))
                .expect("boilerplate pattern must compile")
        })
        .collect()
});

static ANY_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));

static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").expect("whitespace pattern must compile"));

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern must compile"));

/// Upper bound on cleaning passes. Entity-escaped markup (`&lt;b&gt;`)
/// decodes into real markup on one pass and is cleaned on the next.
const MAX_PASSES: usize = 4;

/// Sanitizes a raw provider description. Empty input yields an empty string.
///
/// Passes repeat until the text stops changing, so the output is a fixed
/// point: sanitizing it again returns it unchanged.
pub fn sanitize(raw: &str) -> String {
    let mut text = clean_pass(raw);
    for _ in 1..MAX_PASSES {
        let next = clean_pass(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text
}

fn clean_pass(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = normalize_whitespace(&extract_text(raw));
    let text = normalize_whitespace(&strip_boilerplate_phrases(&text));
    let text = drop_boilerplate_paragraphs(&text);

    truncate_description(&text)
}

// ────────────────────────────────────────────────────────────────────────────
// Text extraction
// ────────────────────────────────────────────────────────────────────────────

fn extract_text(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let root = fragment.root_element();

    // Plain-text descriptions keep their line structure; inside markup,
    // source newlines are just whitespace.
    let has_markup = root.children().any(|child| child.value().is_element());
    let mut extractor = TextExtractor {
        out: String::with_capacity(raw.len()),
        preserve_newlines: !has_markup,
    };
    extractor.walk_element(root);
    extractor.out
}

struct TextExtractor {
    out: String,
    preserve_newlines: bool,
}

impl TextExtractor {
    fn walk_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    if self.preserve_newlines {
                        self.out.push_str(text);
                    } else {
                        self.out.push_str(&ANY_WS.replace_all(text, " "));
                    }
                }
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.walk_element(child_element);
                    }
                }
                _ => {}
            }
        }
    }

    fn walk_element(&mut self, element: ElementRef<'_>) {
        match element.value().name() {
            "script" | "style" | "noscript" | "template" | "head" => {}
            "br" => self.out.push('\n'),
            "li" => {
                self.break_lines(1);
                self.out.push_str("• ");
                self.walk_children(element);
                self.break_lines(1);
            }
            "strong" | "b" => {
                let mut inner = TextExtractor {
                    out: String::new(),
                    preserve_newlines: self.preserve_newlines,
                };
                inner.walk_children(element);
                let text = inner.out.trim();
                if !text.is_empty() {
                    if inner.out.starts_with(char::is_whitespace) {
                        self.out.push(' ');
                    }
                    self.out.push_str("**");
                    self.out.push_str(text);
                    self.out.push_str("**");
                    if inner.out.ends_with(char::is_whitespace) {
                        self.out.push(' ');
                    }
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.break_lines(2);
                self.walk_children(element);
                self.break_lines(1);
            }
            "div" | "tr" => {
                self.break_lines(1);
                self.walk_children(element);
                self.break_lines(1);
            }
            "p" | "section" | "article" | "header" | "footer" | "ul" | "ol" | "table"
            | "blockquote" | "pre" | "hr" => {
                self.break_lines(2);
                self.walk_children(element);
                self.break_lines(2);
            }
            _ => self.walk_children(element),
        }
    }

    /// Ends the output with at least `count` newlines, ignoring trailing
    /// horizontal whitespace. No-op at the start of the text.
    fn break_lines(&mut self, count: usize) {
        if self.out.trim().is_empty() {
            return;
        }
        let existing = self
            .out
            .chars()
            .rev()
            .take_while(|c| c.is_whitespace())
            .filter(|c| *c == '\n')
            .count();
        for _ in existing..count {
            self.out.push('\n');
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cleanup stages
// ────────────────────────────────────────────────────────────────────────────

/// Collapses horizontal whitespace, trims every line, and caps blank runs
/// at one empty line.
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| HORIZONTAL_WS.replace_all(line, " ").trim().to_string())
        .collect();

    EXCESS_NEWLINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn strip_boilerplate_phrases(text: &str) -> String {
    BOILERPLATE_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, pattern| {
            pattern.replace_all(&acc, "").into_owned()
        })
}

fn drop_boilerplate_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .filter(|paragraph| {
            let lower = paragraph.to_lowercase();
            !BOILERPLATE_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Caps output at `MAX_DESCRIPTION_CHARS`, preferring a sentence or line
/// boundary when one falls late enough.
fn truncate_description(text: &str) -> String {
    let Some((limit, _)) = text.char_indices().nth(MAX_DESCRIPTION_CHARS) else {
        return text.trim().to_string();
    };

    let head = &text[..limit];
    let clean_cut = head
        .rfind(|c: char| c == '.' || c == '\n')
        .filter(|&pos| head[..pos].chars().count() > MIN_CLEAN_CUT_CHARS)
        .map(|pos| {
            if head[pos..].starts_with('.') {
                &head[..pos + 1]
            } else {
                &head[..pos]
            }
        });

    clean_cut.unwrap_or(head).trim().to_string()
}
