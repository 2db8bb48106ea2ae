//! Canonical subsection recognition for noisy heading text.
//!
//! Models write the same heading many ways (`### Resources`, `**Recommended
//! Resources:**`, `- Tasks/Activities`). Lines are normalized, then matched
//! against an ordered pattern table; the first match wins. Synonyms are
//! added as new alternatives, never by renaming a canonical title.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::SubsectionTitle;

static HEADING_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#{1,6}\s*").expect("valid heading marker regex"));

static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]\s+|\d+[.)]\s+)").expect("valid list marker regex"));

static TRAILING_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s:\-–—*_.]+$").expect("valid trailing punctuation regex"));

static PLAIN_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+•]\s+|\d+[.)]\s+)[^*_\s]").expect("valid plain item regex")
});

static RESOURCES_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\brecommended\s+resources\b").expect("valid resources phrase regex")
});

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static PATTERNS: Lazy<Vec<(Regex, SubsectionTitle)>> = Lazy::new(|| {
    [
        (
            r"^(?:estimated\s+)?duration$|^time\s+commitment$",
            SubsectionTitle::Duration,
        ),
        (
            r"^(?:learning\s+)?objectives?$|^goals$",
            SubsectionTitle::Objectives,
        ),
        (
            r"^(?:concrete\s+)?tasks(?:\s*(?:/|and|&)\s*activities)?$|^activities$",
            SubsectionTitle::ConcreteTasks,
        ),
        (
            r"^(?:suggested\s+)?projects?(?:\s+ideas?)?$|^(?:suggested\s+)?project\s+ideas?$",
            SubsectionTitle::ProjectIdeas,
        ),
        (
            r"^(?:recommended\s+)?resources$",
            SubsectionTitle::RecommendedResources,
        ),
        (
            r"^tips(?:\s+(?:for|to)\s+(?:stay(?:ing)?\s+)?(?:consistent|consistency|motivated|on\s+track))?$",
            SubsectionTitle::Tips,
        ),
        (
            r"^(?:how\s+to\s+)?(?:measure|track)\s+(?:your\s+)?progress$|^(?:measuring|tracking)\s+(?:your\s+)?progress$|^progress(?:\s+(?:tracking|measurement|checks?))?$",
            SubsectionTitle::MeasureProgress,
        ),
        (
            r"^(?:recommended\s+)?next\s+steps?$",
            SubsectionTitle::NextStep,
        ),
    ]
    .into_iter()
    .map(|(pattern, title)| {
        (
            Regex::new(pattern).expect("valid subsection pattern"),
            title,
        )
    })
    .collect()
});

/// A recognized subsection heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    pub title: SubsectionTitle,
    /// Inline content after a `Label:` prefix, e.g. `2 weeks` in
    /// `**Duration:** 2 weeks`
    pub remainder: Option<String>,
}

/// Classify one line as a canonical subsection heading.
pub fn classify_subsection(line: &str) -> Option<SubsectionTitle> {
    recognize(line).map(|m| m.title)
}

/// Like [`classify_subsection`], but also returns content that shares the
/// heading's line.
pub fn recognize(line: &str) -> Option<HeadingMatch> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(title) = match_title(trimmed, false) {
        return Some(HeadingMatch {
            title,
            remainder: None,
        });
    }

    // Unbolded list items are content unless they spell a title exactly
    if PLAIN_ITEM_RE.is_match(trimmed) {
        return None;
    }

    if let Some((head, rest)) = trimmed.split_once(':') {
        if let Some(title) = match_title(head, true) {
            let rest = rest
                .trim_start_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
                .trim_end();
            return Some(HeadingMatch {
                title,
                remainder: (!rest.is_empty()).then(|| rest.to_string()),
            });
        }
    }

    match_title(trimmed, true).map(|title| HeadingMatch {
        title,
        remainder: None,
    })
}

/// Strip heading markers, list markers, bold markers and decorative leading
/// symbols, keeping the original casing and trailing punctuation.
pub fn strip_markup(line: &str) -> String {
    let text = HEADING_MARKER_RE.replace(line, "");
    let text = LIST_MARKER_RE.replace(&text, "");
    let text = text.replace("**", "").replace("__", "");
    text.trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string()
}

/// Normalized form used for matching: markup stripped, trailing colons and
/// dashes removed, whitespace collapsed, lower-cased.
pub fn normalize_heading(line: &str) -> String {
    let text = strip_markup(line);
    let text = TRAILING_PUNCT_RE.replace(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").to_lowercase()
}

/// Markdown heading level of a `#`-prefixed line.
pub fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    let rest = &trimmed[hashes..];
    if (1..=6).contains(&hashes) && rest.starts_with(char::is_whitespace) {
        Some(hashes)
    } else {
        None
    }
}

/// Match against the pattern table. With `phrase` set, a heading that
/// mentions "recommended resources" (`Recommended Resources for Rust`) also
/// counts.
fn match_title(text: &str, phrase: bool) -> Option<SubsectionTitle> {
    let normalized = normalize_heading(text);
    if normalized.is_empty() {
        return None;
    }
    PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(&normalized))
        .map(|(_, title)| *title)
        .or_else(|| {
            (phrase && RESOURCES_PHRASE_RE.is_match(&normalized))
                .then_some(SubsectionTitle::RecommendedResources)
        })
}
