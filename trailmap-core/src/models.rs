//! Data model for segmented roadmap documents.

use std::fmt;

use serde::{Serialize, Serializer};

/// Kind of a top-level roadmap section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// A numbered `Phase N:` block.
    Phase,
    /// The trailing `YT Tutorials` block.
    YtTutorials,
    /// A roadmap-level block such as "Tips For Staying Consistent".
    Other,
}

/// Canonical subsection titles.
///
/// The display strings are part of the public contract: the UI and tests
/// match on them, so new synonyms are added in the classifier, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsectionTitle {
    Duration,
    Objectives,
    ConcreteTasks,
    ProjectIdeas,
    RecommendedResources,
    Tips,
    MeasureProgress,
    NextStep,
}

impl SubsectionTitle {
    pub const ALL: [SubsectionTitle; 8] = [
        SubsectionTitle::Duration,
        SubsectionTitle::Objectives,
        SubsectionTitle::ConcreteTasks,
        SubsectionTitle::ProjectIdeas,
        SubsectionTitle::RecommendedResources,
        SubsectionTitle::Tips,
        SubsectionTitle::MeasureProgress,
        SubsectionTitle::NextStep,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubsectionTitle::Duration => "Duration",
            SubsectionTitle::Objectives => "Objectives",
            SubsectionTitle::ConcreteTasks => "Concrete Tasks/Activities",
            SubsectionTitle::ProjectIdeas => "Suggested Project Ideas",
            SubsectionTitle::RecommendedResources => "Recommended Resources",
            SubsectionTitle::Tips => "Tips For Staying Consistent",
            SubsectionTitle::MeasureProgress => "How To Measure Progress",
            SubsectionTitle::NextStep => "Recommended Next Step",
        }
    }

    /// Stable identifier used in `data-subsection` attributes.
    pub fn slug(self) -> &'static str {
        match self {
            SubsectionTitle::Duration => "duration",
            SubsectionTitle::Objectives => "objectives",
            SubsectionTitle::ConcreteTasks => "tasks",
            SubsectionTitle::ProjectIdeas => "projects",
            SubsectionTitle::RecommendedResources => "resources",
            SubsectionTitle::Tips => "tips",
            SubsectionTitle::MeasureProgress => "progress",
            SubsectionTitle::NextStep => "next-step",
        }
    }

    /// Titles that can also head a roadmap-level section after the phases.
    pub fn is_roadmap_level(self) -> bool {
        matches!(
            self,
            SubsectionTitle::Tips | SubsectionTitle::MeasureProgress | SubsectionTitle::NextStep
        )
    }
}

impl fmt::Display for SubsectionTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SubsectionTitle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A run of lines under one canonical subsection heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subsection {
    pub title: SubsectionTitle,
    pub lines: Vec<String>,
}

impl Subsection {
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

/// Result of splitting a section body into subsections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubsectionSplit {
    /// Lines before the first recognized subsection heading
    pub preface: Vec<String>,
    pub subsections: Vec<Subsection>,
}

/// A top-level section of a roadmap document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Only set for `SectionKind::Phase`
    pub phase_number: Option<u32>,
    /// Derived, title-cased display title
    pub title: String,
    /// The raw line that opened this section
    pub heading: String,
    /// Markdown heading level of `heading`, if it was a `#` heading
    #[serde(skip)]
    pub heading_level: Option<usize>,
    /// Raw content lines following the heading
    pub lines: Vec<String>,
}

impl Section {
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}

/// A roadmap document split into its intro run and top-level sections.
///
/// Sections are kept in appearance order; use [`SegmentedDocument::display_order`]
/// for the order they are rendered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentedDocument {
    pub intro: Vec<String>,
    pub sections: Vec<Section>,
}

impl SegmentedDocument {
    /// True when at least one Phase or YT Tutorials section was recognized.
    ///
    /// Roadmap-level sections alone do not make a document structured.
    pub fn is_structured(&self) -> bool {
        self.sections.iter().any(|s| s.kind != SectionKind::Other)
    }

    pub fn intro_text(&self) -> String {
        self.intro.join("\n")
    }

    /// Phases sorted ascending by number (stable for duplicates), then Other
    /// sections, then YT Tutorials sections, each in appearance order.
    pub fn display_order(&self) -> Vec<&Section> {
        let mut phases: Vec<&Section> = self.of_kind(SectionKind::Phase).collect();
        phases.sort_by_key(|s| s.phase_number.unwrap_or(u32::MAX));

        phases
            .into_iter()
            .chain(self.of_kind(SectionKind::Other))
            .chain(self.of_kind(SectionKind::YtTutorials))
            .collect()
    }

    fn of_kind(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.kind == kind)
    }
}
