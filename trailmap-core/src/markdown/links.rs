//! Link sanitizing.
//!
//! The prompt asks the model to keep links inside "Recommended Resources",
//! but models do not reliably comply. These functions enforce that rule
//! deterministically on whatever text comes back.

use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::recognize;
use super::segment::parse_section_heading;
use crate::models::SubsectionTitle;

static MARKDOWN_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[([^\]\n]*)\]\(\s*https?://[^)\s]*\s*\)").expect("valid markdown link regex")
});

static AUTOLINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<https?://[^>\s]*>").expect("valid autolink regex"));

static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://[^\s)]*").expect("valid bare url regex"));

static SPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid space run regex"));

static NEWLINE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline run regex"));

/// Remove network links from markdown text.
///
/// `[label](https://..)` keeps its label, `<https://..>` autolinks and bare
/// URLs are dropped, then leftover whitespace runs are collapsed.
pub fn strip_links(text: &str) -> String {
    let text = MARKDOWN_LINK_RE.replace_all(text, "$1");
    let text = AUTOLINK_RE.replace_all(&text, "");
    let text = BARE_URL_RE.replace_all(&text, "");
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    let text = NEWLINE_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Strip links everywhere except inside a Recommended Resources region.
///
/// A resources heading opens the region and is kept verbatim, lines inside
/// it pass through byte-for-byte, and any other subsection or section
/// heading closes it.
pub fn strip_links_except_resources(text: &str) -> String {
    let mut in_resources = false;

    text.split('\n')
        .map(|line| {
            match region_marker(line) {
                Some(Region::Resources) => {
                    in_resources = true;
                    return line.to_string();
                }
                Some(Region::Other) => in_resources = false,
                None => {}
            }
            if in_resources {
                line.to_string()
            } else {
                strip_links(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

enum Region {
    Resources,
    Other,
}

fn region_marker(line: &str) -> Option<Region> {
    if parse_section_heading(line).is_some() {
        return Some(Region::Other);
    }
    match recognize(line)?.title {
        SubsectionTitle::RecommendedResources => Some(Region::Resources),
        _ => Some(Region::Other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_links(""), "");
        assert_eq!(strip_links_except_resources(""), "");
    }

    #[test]
    fn test_markdown_link_keeps_label() {
        assert_eq!(
            strip_links("Read [the book](https://doc.rust-lang.org/book/) first"),
            "Read the book first"
        );
    }

    #[test]
    fn test_autolinks_and_bare_urls_removed() {
        assert_eq!(strip_links("see <https://a.example/x> now"), "see now");
        assert_eq!(strip_links("go to http://b.example/y, then rest"), "go to then rest");
        assert_eq!(strip_links("(https://c.example)"), "()");
    }

    #[test]
    fn test_url_labels_do_not_survive() {
        let out = strip_links("[https://a.example](https://a.example)");
        assert!(!out.contains("https://"));
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(strip_links("a  \t b\n\n\n\nc"), "a b\n\nc");
    }

    #[test]
    fn test_region_aware_sanitizing() {
        let input = "### Objectives\n- Learn [X](https://x.example)\n### Recommended Resources\n- [Docs](https://example.com)\n  <https://raw.example>\n### Tips\n- Visit https://tips.example";
        let output = strip_links_except_resources(input);
        let lines: Vec<_> = output.split('\n').collect();

        assert_eq!(lines[0], "### Objectives");
        assert_eq!(lines[1], "- Learn X");
        assert_eq!(lines[2], "### Recommended Resources");
        assert_eq!(lines[3], "- [Docs](https://example.com)");
        assert_eq!(lines[4], "  <https://raw.example>");
        assert_eq!(lines[5], "### Tips");
        assert_eq!(lines[6], "- Visit");
    }

    #[test]
    fn test_resources_region_survives_content_bullets() {
        let input = "### Recommended Resources for Rust\n- [Book](https://doc.rust-lang.org/book/)\n- Tips and tricks blog: [Blog](https://blog.example.com)\n- Projects: [Awesome](https://awesome.example)\n### Tips\n- https://drop.example";
        let output = strip_links_except_resources(input);
        let lines: Vec<_> = output.split('\n').collect();

        assert_eq!(lines[1], "- [Book](https://doc.rust-lang.org/book/)");
        assert_eq!(lines[2], "- Tips and tricks blog: [Blog](https://blog.example.com)");
        assert_eq!(lines[3], "- Projects: [Awesome](https://awesome.example)");
        assert!(!output.contains("https://drop.example"));

        let output = strip_links_except_resources("Recommended Resources (free)\n- https://keep.example");
        assert!(output.contains("https://keep.example"));
    }

    #[test]
    fn test_phase_heading_closes_region() {
        let input = "Resources\n- https://keep.example\n## Phase 2: Next\n- https://drop.example";
        let output = strip_links_except_resources(input);
        assert!(output.contains("https://keep.example"));
        assert!(!output.contains("https://drop.example"));
    }

    #[test]
    fn test_no_urls_survive_outside_resources() {
        let lines = [
            "Check https://a.example and http://b.example/path?q=1",
            "- [label](http://c.example) plus <https://d.example>",
            "**Duration:** 2 weeks, see https://e.example)",
            "[nested https://f.example](https://f.example)",
        ];
        for line in lines {
            let out = strip_links_except_resources(line);
            assert!(!out.contains("http://"), "{out}");
            assert!(!out.contains("https://"), "{out}");
        }
    }
}
