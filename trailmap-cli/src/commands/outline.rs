//! Outline command: print the segmented structure of a roadmap document.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use trailmap_core::{segment, split_subsections, SectionKind, SegmentedDocument, SubsectionTitle};

use super::read_input;

#[derive(Debug, Serialize)]
struct Outline {
    /// False when the document would render as plain markdown
    structured: bool,
    intro_lines: usize,
    sections: Vec<OutlineSection>,
}

#[derive(Debug, Serialize)]
struct OutlineSection {
    kind: SectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase_number: Option<u32>,
    title: String,
    preface_lines: usize,
    subsections: Vec<SubsectionTitle>,
}

pub fn outline_file(input: &Path, json: bool) -> Result<()> {
    let markdown = read_input(input)?;
    let outline = build_outline(&segment(&markdown));

    if json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    } else {
        print!("{}", format_outline(&outline));
    }
    Ok(())
}

/// Sections in display order; phases report their subsections.
fn build_outline(doc: &SegmentedDocument) -> Outline {
    let sections = doc
        .display_order()
        .into_iter()
        .map(|section| {
            let (preface_lines, subsections) = match section.kind {
                SectionKind::Phase => {
                    let split = split_subsections(&section.lines);
                    let preface = split.preface.iter().filter(|l| !l.trim().is_empty()).count();
                    (preface, split.subsections.iter().map(|s| s.title).collect())
                }
                _ => (0, Vec::new()),
            };
            OutlineSection {
                kind: section.kind,
                phase_number: section.phase_number,
                title: section.title.clone(),
                preface_lines,
                subsections,
            }
        })
        .collect();

    Outline {
        structured: doc.is_structured(),
        intro_lines: doc.intro.iter().filter(|l| !l.trim().is_empty()).count(),
        sections,
    }
}

fn format_outline(outline: &Outline) -> String {
    let mut out = String::new();
    if !outline.structured {
        out.push_str("unstructured: renders as plain markdown\n");
    }
    let _ = writeln!(out, "intro: {} line(s)", outline.intro_lines);

    for section in &outline.sections {
        match section.kind {
            SectionKind::Phase => {
                let _ = writeln!(out, "{}", section.title);
            }
            SectionKind::Other => {
                let _ = writeln!(out, "{} (roadmap-level)", section.title);
            }
            SectionKind::YtTutorials => {
                let _ = writeln!(out, "{} (tutorials)", section.title);
            }
        }
        if section.preface_lines > 0 {
            let _ = writeln!(out, "  (preface: {} line(s))", section.preface_lines);
        }
        for title in &section.subsections {
            let _ = writeln!(out, "  - {title}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
Intro.

## Phase 2: Projects
Objectives
- ship

## Phase 1: Basics
Some words first.
Duration
- 1 week
Recommended Resources
- [Docs](https://example.com)

## Tips for Staying Consistent
- daily

## YT Tutorials
- search";

    #[test]
    fn test_outline_follows_display_order() {
        let outline = build_outline(&segment(DOC));
        assert!(outline.structured);
        assert_eq!(outline.intro_lines, 1);

        let numbers: Vec<_> = outline.sections.iter().map(|s| s.phase_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), None, None]);
        assert_eq!(outline.sections[2].kind, SectionKind::Other);
        assert_eq!(outline.sections[3].kind, SectionKind::YtTutorials);

        let basics = &outline.sections[0];
        assert_eq!(basics.preface_lines, 1);
        assert_eq!(
            basics.subsections,
            vec![SubsectionTitle::Duration, SubsectionTitle::RecommendedResources]
        );
    }

    #[test]
    fn test_unstructured_document() {
        let outline = build_outline(&segment("just some notes\n- a list"));
        assert!(!outline.structured);
        assert!(format_outline(&outline).starts_with("unstructured"));
    }

    #[test]
    fn test_text_format() {
        let text = format_outline(&build_outline(&segment(DOC)));
        assert!(text.contains("Phase 1: Basics\n  (preface: 1 line(s))\n  - Duration\n"));
        assert!(text.contains("YT Tutorials (tutorials)\n"));
        assert!(text.contains("Tips For Staying Consistent (roadmap-level)\n"));
    }
}
