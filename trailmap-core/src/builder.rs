//! Collapsible roadmap document builder.
//!
//! Composes segmented sections into nested `<details>` cards: one block per
//! phase (ascending by number), then roadmap-level sections, then YT
//! Tutorials. Exactly one card, the first in display order, starts open.

use crate::markdown::html_escape;
use crate::markdown::inline::render_inline;
use crate::markdown::links::{strip_links, strip_links_except_resources};
use crate::markdown::segment::{segment, split_subsections};
use crate::models::{Section, SectionKind, SegmentedDocument, SubsectionTitle};

const EMPTY_PLACEHOLDER: &str = "<p class=\"roadmap-empty\">No details available.</p>";
const DETAILS_TITLE: &str = "Details";

/// Whether a card body keeps its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkPolicy {
    Strip,
    Keep,
}

/// Render a whole roadmap document to HTML.
///
/// Documents without any Phase or YT Tutorials heading fall back to the plain
/// inline renderer with no collapsible structure. Never fails, including on
/// strict prefixes of a document.
pub fn build_html(document: &str) -> String {
    let segmented = segment(document);
    if !segmented.is_structured() {
        return render_inline(document);
    }
    RoadmapBuilder::new(&segmented).build()
}

/// Builds the collapsible HTML for one segmented document.
pub struct RoadmapBuilder<'a> {
    document: &'a SegmentedDocument,
    opened: bool,
}

impl<'a> RoadmapBuilder<'a> {
    pub fn new(document: &'a SegmentedDocument) -> Self {
        Self {
            document,
            opened: false,
        }
    }

    pub fn build(mut self) -> String {
        let mut html = vec!["<div class=\"roadmap\">".to_string()];

        let intro = render_inline(&self.document.intro_text());
        if !intro.is_empty() {
            html.push(format!("<div class=\"roadmap-intro\">\n{intro}\n</div>"));
        }

        for section in self.document.display_order() {
            let block = match section.kind {
                SectionKind::Phase => self.phase_block(section),
                SectionKind::Other => self.extra_block(section, "roadmap-other", LinkPolicy::Strip),
                SectionKind::YtTutorials => {
                    self.extra_block(section, "roadmap-tutorials", LinkPolicy::Strip)
                }
            };
            html.push(block);
        }

        html.push("</div>".to_string());
        html.join("\n")
    }

    fn phase_block(&mut self, section: &Section) -> String {
        let number = section.phase_number.unwrap_or(u32::MAX);
        let mut html = vec![
            format!("<section class=\"roadmap-phase\" data-phase=\"{number}\">"),
            format!(
                "<h2 class=\"roadmap-phase-title\">{}</h2>",
                html_escape(&section.title)
            ),
        ];

        let split = split_subsections(&section.lines);
        if split.subsections.is_empty() {
            html.push(self.card(DETAILS_TITLE, "details", &section.content(), LinkPolicy::Strip));
        } else {
            let preface = render_inline(&strip_links_except_resources(&split.preface.join("\n")));
            if !preface.is_empty() {
                html.push(format!("<div class=\"roadmap-preface\">\n{preface}\n</div>"));
            }
            for subsection in &split.subsections {
                let policy = match subsection.title {
                    SubsectionTitle::RecommendedResources => LinkPolicy::Keep,
                    _ => LinkPolicy::Strip,
                };
                html.push(self.card(
                    subsection.title.as_str(),
                    subsection.title.slug(),
                    &subsection.content(),
                    policy,
                ));
            }
        }

        html.push("</section>".to_string());
        html.join("\n")
    }

    fn extra_block(&mut self, section: &Section, class: &str, policy: LinkPolicy) -> String {
        let card = self.card(&section.title, class, &section.content(), policy);
        format!("<section class=\"roadmap-section {class}\">\n{card}\n</section>")
    }

    fn card(&mut self, title: &str, key: &str, content: &str, policy: LinkPolicy) -> String {
        let open = if self.opened { "" } else { " open" };
        self.opened = true;

        let content = match policy {
            LinkPolicy::Keep => content.to_string(),
            LinkPolicy::Strip => strip_links(content),
        };
        let body = if content.trim().is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            render_inline(&content)
        };

        format!(
            "<details class=\"roadmap-card\" data-subsection=\"{key}\"{open}>\n<summary class=\"roadmap-card-title\">{}</summary>\n<div class=\"roadmap-card-body\">\n{body}\n</div>\n</details>",
            html_escape(title)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "## Phase 1: Foundation\nObjectives\n- Learn X\n\nRecommended Resources\n- [Docs](https://example.com)\n\n## Phase 2: Build\nDuration\n2 weeks";

    fn cards(html: &str) -> Vec<&str> {
        html.split("<details").skip(1).collect()
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(build_html(""), "");
    }

    #[test]
    fn test_unstructured_document_falls_back_to_inline() {
        for doc in [
            "# Learning plan\n\nJust **some** text\n- with a list",
            "## Tips for staying consistent\n- sleep",
            "Visit https://example.com",
        ] {
            assert_eq!(build_html(doc), render_inline(doc));
        }
    }

    #[test]
    fn test_scenario_phases_and_links() {
        let html = build_html(SCENARIO);

        let first = html.find("data-phase=\"1\"").unwrap();
        let second = html.find("data-phase=\"2\"").unwrap();
        assert!(first < second);

        let cards = cards(&html);
        assert_eq!(cards.len(), 3);
        assert!(cards[0].contains(">Objectives</summary>"));
        assert!(!cards[0].contains("https://example.com"));
        assert!(cards[1].contains(">Recommended Resources</summary>"));
        assert!(cards[1].contains("https://example.com"));
        assert!(cards[2].contains(">Duration</summary>"));
        assert!(cards[2].contains("<p>2 weeks</p>"));
    }

    #[test]
    fn test_phases_sorted_by_number() {
        let html = build_html("## Phase 3: C\nx\n## Phase 1: A\ny\n## Phase 2: B\nz");
        let positions: Vec<usize> = ["Phase 1: A", "Phase 2: B", "Phase 3: C"]
            .iter()
            .map(|t| html.find(t).unwrap())
            .collect();
        assert!(positions[0] < positions[1] && positions[1] < positions[2]);
    }

    #[test]
    fn test_exactly_one_card_open() {
        let html = build_html(
            "Intro\n## YT Tutorials\n- video\n## Phase 2: B\nObjectives\n- b\nTips\n- t\n## Phase 1: A\nDuration\n1 week\n## Next Steps\n- go",
        );
        let cards = cards(&html);
        let open: Vec<_> = cards.iter().filter(|c| c.contains(" open>")).collect();
        assert_eq!(open.len(), 1);
        // First subsection of the lowest-numbered phase
        assert!(open[0].contains(">Duration</summary>"));
    }

    #[test]
    fn test_open_card_falls_back_to_tutorials() {
        let html = build_html("## YT Tutorials\n- [Intro](https://youtube.com/watch?v=1)");
        let cards = cards(&html);
        assert_eq!(cards.len(), 1);
        assert!(cards[0].contains(" open>"));
        // Tutorial titles stay, their links do not
        assert!(cards[0].contains("Intro"));
        assert!(!cards[0].contains("youtube.com"));
        assert!(!cards[0].contains("href"));
    }

    #[test]
    fn test_resources_heading_with_suffix_keeps_links() {
        let html = build_html(
            "## Phase 1: A\nObjectives\n- o\n### Recommended Resources for Rust\n- [Book](https://doc.rust-lang.org/book/)",
        );
        let cards = cards(&html);
        assert_eq!(cards.len(), 2);
        assert!(cards[1].contains("data-subsection=\"resources\""));
        assert!(cards[1].contains("href=\"https://doc.rust-lang.org/book/\""));
    }

    #[test]
    fn test_content_bullets_stay_in_resources() {
        let html = build_html(
            "## Phase 1: A\nRecommended Resources\n- [Book](https://doc.rust-lang.org/book/)\n- Tips and tricks blog: [Blog](https://blog.example.com)\n- Projects: [Awesome Rust](https://github.com/rust-unofficial/awesome-rust)",
        );
        let cards = cards(&html);
        assert_eq!(cards.len(), 1);
        assert!(cards[0].contains("data-subsection=\"resources\""));
        assert!(cards[0].contains("https://blog.example.com"));
        assert!(cards[0].contains("https://github.com/rust-unofficial/awesome-rust"));
        assert!(!html.contains("data-subsection=\"tips\""));
        assert!(!html.contains("data-subsection=\"projects\""));
    }

    #[test]
    fn test_strip_policy_removes_every_link() {
        // A resources-looking line inside a stripped card must not reopen links
        let html = build_html(
            "## Phase 1: A\n- a\n## Tips for staying consistent\nRecommended Resources\n- [Docs](https://example.com)",
        );
        assert!(html.contains("roadmap-other"));
        assert!(html.contains("Docs"));
        assert!(!html.contains("https://example.com"));
    }

    #[test]
    fn test_other_sections_render_between_phases_and_tutorials() {
        let html = build_html(
            "## YT Tutorials\n- v\n## Phase 1: A\n- a\n## Tips for staying consistent\n- t",
        );
        let phase = html.find("roadmap-phase").unwrap();
        let other = html.find("roadmap-other").unwrap();
        let tutorials = html.find("roadmap-tutorials").unwrap();
        assert!(phase < other && other < tutorials);
    }

    #[test]
    fn test_details_card_and_placeholder() {
        let html = build_html("## Phase 1: Start\n- read a book https://x.example\n## Phase 2: Empty");
        let cards = cards(&html);
        assert_eq!(cards.len(), 2);
        assert!(cards[0].contains(">Details</summary>"));
        assert!(!cards[0].contains("https://x.example"));
        assert!(cards[1].contains("No details available."));
    }

    #[test]
    fn test_preface_is_sanitized() {
        let html = build_html("## Phase 1: A\nSee https://pre.example first\nObjectives\n- o");
        assert!(html.contains("roadmap-preface"));
        assert!(!html.contains("https://pre.example"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = build_html("## Phase 1: <b>bold</b>\n- x");
        assert!(html.contains("Phase 1: &lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_prefixes_never_panic() {
        let lines: Vec<&str> = SCENARIO.split('\n').collect();
        for end in 0..=lines.len() {
            let prefix = lines[..end].join("\n");
            let _ = build_html(&prefix);
        }
        for end in 0..=SCENARIO.len() {
            if SCENARIO.is_char_boundary(end) {
                let _ = build_html(&SCENARIO[..end]);
            }
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        assert_eq!(build_html(SCENARIO), build_html(SCENARIO));
    }
}
