//! Context-free markdown fragment renderer.
//!
//! Handles the subset of markdown roadmaps actually use: headings, emphasis,
//! links, bullet/numbered items and paragraphs. It never looks outside the
//! fragment it is given, which is why segmentation happens first.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+)$").expect("valid heading regex"));

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[-*][ \t]+(.+)$").expect("valid bullet regex"));

static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\d+\.[ \t]+(.+)$").expect("valid numbered regex"));

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[([^\]]+)\]\((https?://[^)\s"*]+)\)"#).expect("valid link regex")
});

static BOLD_ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("valid bold-italic regex"));

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));

// Content may not start or end with whitespace, so a `* item` bullet marker
// is never mistaken for an opening emphasis delimiter.
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^*\s](?:[^*]*?[^*\s])?)\*").expect("valid italic regex")
});

/// Render a markdown fragment to HTML.
///
/// Total over any input; empty or whitespace-only input yields an empty
/// string. Bulleted and numbered items both end up in a `<ul>`.
pub fn render_inline(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let escaped = escape_text(markdown);
    let mut out: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();

    for raw in escaped.lines() {
        let line = render_spans(raw);

        if let Some(item) = list_item(&line) {
            items.push(format!("<li>{}</li>", item.trim()));
            continue;
        }
        flush_list(&mut out, &mut items);

        if let Some(heading) = heading(&line) {
            out.push(heading);
        } else if !line.trim().is_empty() {
            out.push(format!("<p>{}</p>", line.trim()));
        }
    }
    flush_list(&mut out, &mut items);

    out.join("\n")
}

/// Neutralize raw HTML before any markdown is reinterpreted as markup.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_spans(line: &str) -> String {
    let line = LINK_RE.replace_all(
        line,
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
    );
    let line = BOLD_ITALIC_RE.replace_all(&line, "<strong><em>$1</em></strong>");
    let line = BOLD_RE.replace_all(&line, "<strong>$1</strong>");
    ITALIC_RE.replace_all(&line, "<em>$1</em>").into_owned()
}

fn heading(line: &str) -> Option<String> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps[1].len();
    Some(format!("<h{level}>{}</h{level}>", caps[2].trim()))
}

fn list_item(line: &str) -> Option<String> {
    BULLET_RE
        .captures(line)
        .or_else(|| NUMBERED_RE.captures(line))
        .map(|caps| caps[1].to_string())
}

fn flush_list(out: &mut Vec<String>, items: &mut Vec<String>) {
    if items.is_empty() {
        return;
    }
    out.push("<ul>".to_string());
    out.append(items);
    out.push("</ul>".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(render_inline(""), "");
        assert_eq!(render_inline("  \n\t\n"), "");
    }

    #[test]
    fn test_mixed_fragment() {
        let html = render_inline("# Title\n\nSome **bold** text\n- one\n- two");
        insta::assert_snapshot!(html, @r"
        <h1>Title</h1>
        <p>Some <strong>bold</strong> text</p>
        <ul>
        <li>one</li>
        <li>two</li>
        </ul>
        ");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(render_inline("###### Deep"), "<h6>Deep</h6>");
        assert_eq!(render_inline("## Mid"), "<h2>Mid</h2>");
        // Seven hashes is not a heading
        assert_eq!(render_inline("####### Nope"), "<p>####### Nope</p>");
        // Headings only match at line start
        assert_eq!(render_inline("see # this"), "<p>see # this</p>");
    }

    #[test]
    fn test_emphasis_order() {
        assert_eq!(
            render_inline("***both*** **bold** *italic*"),
            "<p><strong><em>both</em></strong> <strong>bold</strong> <em>italic</em></p>"
        );
    }

    #[test]
    fn test_star_bullets_are_not_italic() {
        assert_eq!(
            render_inline("* first *note*\n* second"),
            "<ul>\n<li>first <em>note</em></li>\n<li>second</li>\n</ul>"
        );
    }

    #[test]
    fn test_numbered_items_share_unordered_wrapper() {
        assert_eq!(
            render_inline("1. one\n2. two"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_list_runs_are_split_by_other_content() {
        let html = render_inline("- a\nbetween\n- b");
        assert_eq!(html, "<ul>\n<li>a</li>\n</ul>\n<p>between</p>\n<ul>\n<li>b</li>\n</ul>");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_inline("<script>alert('x')</script> & more");
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert('x')&lt;/script&gt; &amp; more</p>"
        );
    }

    #[test]
    fn test_links_become_anchors() {
        let html = render_inline("- [Docs](https://example.com/a?b=1&c=2)");
        assert_eq!(
            html,
            "<ul>\n<li><a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" rel=\"noopener noreferrer\">Docs</a></li>\n</ul>"
        );
    }

    #[test]
    fn test_non_http_links_stay_text() {
        assert_eq!(
            render_inline("[x](javascript:alert(1))"),
            "<p>[x](javascript:alert(1))</p>"
        );
    }

    #[test]
    fn test_whitespace_lines_produce_no_paragraph() {
        assert_eq!(render_inline("a\n   \nb"), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let md = "## Phase 1: Basics\n- **Learn** things\n\nDone.";
        assert_eq!(render_inline(md), render_inline(md));
    }
}
