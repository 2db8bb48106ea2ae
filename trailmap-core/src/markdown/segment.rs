//! Document segmentation into sections and subsections.
//!
//! Only `Phase N:` and `YT Tutorials` markers open top-level sections, plus
//! roadmap-level headings (Tips / Progress / Next Step) that sit at or above
//! the current phase's heading level. Any other heading stays inside the
//! section it appears in and is left to the subsection classifier.

use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::{heading_level, normalize_heading, recognize, strip_markup};
use super::title_case;
use crate::models::{Section, SectionKind, SegmentedDocument, Subsection, SubsectionSplit};

static PHASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^phase\s+(\d+)\s*(\([^)]*\))?\s*(?:[:.\-–—]\s*(.*))?$")
        .expect("valid phase regex")
});

static TUTORIALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:yt|youtube)\s+(?:video\s+)?tutorials?(?:\s+for\s+.+)?$")
        .expect("valid tutorials regex")
});

// Headings without a `#` marker are compared as if they were `##`.
const DEFAULT_PHASE_LEVEL: usize = 2;

/// A line recognized as opening a top-level section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    pub kind: SectionKind,
    pub phase_number: Option<u32>,
    pub title: String,
}

/// Recognize `Phase N:` and `YT Tutorials` section markers.
///
/// Works on markdown headings, bold lines and bulleted pseudo-headings alike.
pub fn parse_section_heading(line: &str) -> Option<SectionHeading> {
    let stripped = strip_markup(line);
    if stripped.is_empty() {
        return None;
    }

    if let Some(caps) = PHASE_RE.captures(&stripped) {
        // Absurdly long numbers still sort after every real phase
        let number = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        let mut title = format!("Phase {number}");
        if let Some(note) = caps.get(2) {
            title.push(' ');
            title.push_str(note.as_str());
        }
        let name = caps
            .get(3)
            .map(|m| m.as_str().trim().trim_end_matches([':', '*', '_']).trim())
            .unwrap_or("");
        if !name.is_empty() {
            title.push_str(": ");
            title.push_str(&title_case(name));
        }
        return Some(SectionHeading {
            kind: SectionKind::Phase,
            phase_number: Some(number),
            title,
        });
    }

    if TUTORIALS_RE.is_match(&normalize_heading(line)) {
        return Some(SectionHeading {
            kind: SectionKind::YtTutorials,
            phase_number: None,
            title: "YT Tutorials".to_string(),
        });
    }

    None
}

/// Split a roadmap document into its intro run and top-level sections.
///
/// Total over any input, including strict prefixes of a document; every
/// line ends up either in the intro or in exactly one section.
pub fn segment(document: &str) -> SegmentedDocument {
    document
        .lines()
        .fold(SegmentedDocument::default(), |mut doc, line| {
            match open_section(line, doc.sections.last()) {
                Some(section) => doc.sections.push(section),
                None => match doc.sections.last_mut() {
                    Some(current) => current.lines.push(line.to_string()),
                    None => doc.intro.push(line.to_string()),
                },
            }
            doc
        })
}

fn open_section(line: &str, current: Option<&Section>) -> Option<Section> {
    let level = heading_level(line);

    if let Some(heading) = parse_section_heading(line) {
        return Some(Section {
            kind: heading.kind,
            phase_number: heading.phase_number,
            title: heading.title,
            heading: line.to_string(),
            heading_level: level,
            lines: Vec::new(),
        });
    }

    // Roadmap-level sections need a real `#` heading with no inline content
    let level = level?;
    let matched = recognize(line).filter(|m| m.remainder.is_none())?;
    if !matched.title.is_roadmap_level() {
        return None;
    }
    if let Some(section) = current {
        if section.kind == SectionKind::Phase
            && level > section.heading_level.unwrap_or(DEFAULT_PHASE_LEVEL)
        {
            return None;
        }
    }

    Some(Section {
        kind: SectionKind::Other,
        phase_number: None,
        title: matched.title.as_str().to_string(),
        heading: line.to_string(),
        heading_level: Some(level),
        lines: Vec::new(),
    })
}

/// Split section content into a preface run and canonical subsections,
/// preserving first-appearance order.
pub fn split_subsections(lines: &[String]) -> SubsectionSplit {
    lines
        .iter()
        .fold(SubsectionSplit::default(), |mut split, line| {
            match recognize(line) {
                Some(matched) => split.subsections.push(Subsection {
                    title: matched.title,
                    lines: matched.remainder.into_iter().collect(),
                }),
                None => match split.subsections.last_mut() {
                    Some(current) => current.lines.push(line.clone()),
                    None => split.preface.push(line.clone()),
                },
            }
            split
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubsectionTitle;

    const SCENARIO: &str = "## Phase 1: Foundation\nObjectives\n- Learn X\n\nRecommended Resources\n- [Docs](https://example.com)\n\n## Phase 2: Build\nDuration\n2 weeks";

    #[test]
    fn test_phase_heading_variants() {
        for (line, number, title) in [
            ("## Phase 1: Foundation", 1, "Phase 1: Foundation"),
            ("**Phase 2: core concepts**", 2, "Phase 2: Core Concepts"),
            ("### phase 3 - build projects", 3, "Phase 3: Build Projects"),
            ("Phase 4", 4, "Phase 4"),
            ("#### Phase 5 (Weeks 9-12): Polish", 5, "Phase 5 (Weeks 9-12): Polish"),
        ] {
            let heading = parse_section_heading(line).expect(line);
            assert_eq!(heading.kind, SectionKind::Phase);
            assert_eq!(heading.phase_number, Some(number));
            assert_eq!(heading.title, title);
        }
    }

    #[test]
    fn test_phase_prose_is_not_a_heading() {
        assert_eq!(parse_section_heading("Phase 1 will teach you the basics"), None);
        assert_eq!(parse_section_heading("In phase 2: we build"), None);
    }

    #[test]
    fn test_tutorials_heading_variants() {
        for line in ["## YT Tutorials", "YT Tutorials:", "**YouTube Tutorials**", "### yt tutorials for each phase"] {
            let heading = parse_section_heading(line).expect(line);
            assert_eq!(heading.kind, SectionKind::YtTutorials);
            assert_eq!(heading.title, "YT Tutorials");
        }
    }

    #[test]
    fn test_segment_scenario() {
        let doc = segment(SCENARIO);
        assert!(doc.intro.is_empty());
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].phase_number, Some(1));
        assert_eq!(doc.sections[1].phase_number, Some(2));

        let split = split_subsections(&doc.sections[0].lines);
        let titles: Vec<_> = split.subsections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![SubsectionTitle::Objectives, SubsectionTitle::RecommendedResources]
        );
        assert_eq!(split.subsections[0].lines, vec!["- Learn X", ""]);
    }

    #[test]
    fn test_intro_lines_before_first_section() {
        let doc = segment("Welcome!\n\n## Overview\nstuff\n## Phase 1: Start\nbody");
        assert_eq!(doc.intro, vec!["Welcome!", "", "## Overview", "stuff"]);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].lines, vec!["body"]);
    }

    #[test]
    fn test_every_line_is_kept() {
        let text = "intro\n## Phase 2: B\nx\n### Tips\ny\n## Phase 1: A\nz\n## Tips for staying consistent\nw\n## YT Tutorials\nv";
        let doc = segment(text);
        let total: usize = doc.intro.len()
            + doc
                .sections
                .iter()
                .map(|s| s.lines.len() + 1)
                .sum::<usize>();
        assert_eq!(total, text.lines().count());
    }

    #[test]
    fn test_nested_tips_stay_in_phase_but_sibling_tips_open_section() {
        let doc = segment("## Phase 1: A\n### Tips\nkeep going\n## Tips for staying consistent\nsleep");
        let kinds: Vec<_> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Phase, SectionKind::Other]);
        assert_eq!(doc.sections[0].lines, vec!["### Tips", "keep going"]);
        assert_eq!(doc.sections[1].title, "Tips For Staying Consistent");
    }

    #[test]
    fn test_stray_headings_stay_in_phase() {
        let doc = segment("## Phase 1: A\n## Random Heading\ntext");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].lines, vec!["## Random Heading", "text"]);
    }

    #[test]
    fn test_split_preface_and_remainders() {
        let lines: Vec<String> = [
            "This phase is about basics.",
            "**Duration:** 2 weeks",
            "- **Objectives:**",
            "- Understand ownership",
            "Resources",
            "- [Book](https://doc.rust-lang.org/book/)",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let split = split_subsections(&lines);
        assert_eq!(split.preface, vec!["This phase is about basics."]);
        assert_eq!(split.subsections.len(), 3);
        assert_eq!(split.subsections[0].title, SubsectionTitle::Duration);
        assert_eq!(split.subsections[0].lines, vec!["2 weeks"]);
        assert_eq!(split.subsections[1].lines, vec!["- Understand ownership"]);
        assert_eq!(split.subsections[2].title, SubsectionTitle::RecommendedResources);
    }

    #[test]
    fn test_empty_document() {
        let doc = segment("");
        assert!(doc.intro.is_empty());
        assert!(doc.sections.is_empty());
        assert!(!doc.is_structured());
    }
}
