//! Section mapping.
//!
//! Binds classified header paragraphs to the contiguous content ranges that
//! follow them. A section's content runs from the paragraph after its header
//! to the paragraph before the next detected header, or to the end of the
//! document for the last section.

use crate::classify::{check_shape, HeaderClassifier, ShapeLimits};
use crate::model::SectionType;
use crate::structure::ParagraphInfo;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// A section's position in the paragraph sequence.
///
/// The content range is inclusive and may be empty, in which case
/// `content_start == content_end + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRange {
    /// Section type
    pub section_type: SectionType,
    /// Header paragraph index
    pub header_index: usize,
    /// Header paragraph text
    pub header_text: String,
    /// First content paragraph index
    pub content_start: usize,
    /// Last content paragraph index (inclusive)
    pub content_end: usize,
    /// Format metadata of the content paragraphs, in order
    pub formats: Vec<ParagraphInfo>,
}

impl SectionRange {
    /// Number of content paragraphs.
    pub fn len(&self) -> usize {
        (self.content_end + 1).saturating_sub(self.content_start)
    }

    /// Check if the range has no content paragraphs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content paragraph indices.
    pub fn content_indices(&self) -> RangeInclusive<usize> {
        self.content_start..=self.content_end
    }

    /// Check if a paragraph index falls in the content range.
    pub fn contains(&self, index: usize) -> bool {
        !self.is_empty() && self.content_indices().contains(&index)
    }

    /// Content paragraph texts, in order.
    pub fn content_texts(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.text.as_str()).collect()
    }

    /// Content joined with newlines.
    pub fn content_text(&self) -> String {
        self.content_texts().join("\n")
    }
}

/// Section type to paragraph range bindings for one document, ordered by
/// header index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionMap {
    ranges: Vec<SectionRange>,
}

impl SectionMap {
    /// Get the range for a section type.
    pub fn get(&self, section_type: SectionType) -> Option<&SectionRange> {
        self.ranges.iter().find(|r| r.section_type == section_type)
    }

    /// Check if a section type was detected.
    pub fn contains(&self, section_type: SectionType) -> bool {
        self.get(section_type).is_some()
    }

    /// Iterate over ranges in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionRange> {
        self.ranges.iter()
    }

    /// Detected section types in document order.
    pub fn section_types(&self) -> Vec<SectionType> {
        self.ranges.iter().map(|r| r.section_type).collect()
    }

    /// Number of detected sections.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if no section was detected.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

struct OpenSection {
    section_type: SectionType,
    header_index: usize,
    header_text: String,
}

/// Maps classified headers onto paragraph ranges.
#[derive(Debug, Clone)]
pub struct SectionMapper {
    classifier: Arc<HeaderClassifier>,
    limits: ShapeLimits,
}

impl SectionMapper {
    /// Create a mapper using document-paragraph shape limits.
    pub fn new(classifier: Arc<HeaderClassifier>) -> Self {
        Self {
            classifier,
            limits: ShapeLimits::paragraph(),
        }
    }

    /// Set the header shape limits.
    pub fn with_limits(mut self, limits: ShapeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the classifier.
    pub fn classifier(&self) -> &Arc<HeaderClassifier> {
        &self.classifier
    }

    /// Map paragraphs to sections in one linear scan.
    ///
    /// When a section type is detected twice, the later occurrence wins and
    /// the earlier range is dropped. Paragraphs before the first header
    /// belong to no section.
    pub fn map(&self, paragraphs: &[ParagraphInfo]) -> SectionMap {
        let mut ranges: Vec<SectionRange> = Vec::new();
        let mut open: Option<OpenSection> = None;

        for paragraph in paragraphs {
            if paragraph.is_empty() {
                continue;
            }

            let Some(section_type) = self
                .classifier
                .classify_within(&paragraph.text, self.limits)
            else {
                if looks_like_header(&paragraph.text, &self.limits) {
                    log::debug!(
                        "Header-shaped paragraph {} ({:?}) not classified, treating as content",
                        paragraph.index,
                        paragraph.text
                    );
                }
                continue;
            };

            if let Some(previous) = open.take() {
                ranges.push(close(previous, paragraph.index - 1, paragraphs));
            }
            open = Some(OpenSection {
                section_type,
                header_index: paragraph.index,
                header_text: paragraph.text.clone(),
            });
        }

        if let (Some(previous), Some(last)) = (open, paragraphs.last()) {
            ranges.push(close(previous, last.index, paragraphs));
        }

        let mut deduped: Vec<SectionRange> = Vec::with_capacity(ranges.len());
        for range in ranges {
            if let Some(pos) = deduped
                .iter()
                .position(|r| r.section_type == range.section_type)
            {
                let dropped = deduped.remove(pos);
                log::debug!(
                    "Section {} repeated at paragraph {}, dropping earlier header at {}",
                    range.section_type,
                    range.header_index,
                    dropped.header_index
                );
            }
            deduped.push(range);
        }

        SectionMap { ranges: deduped }
    }
}

fn close(open: OpenSection, content_end: usize, paragraphs: &[ParagraphInfo]) -> SectionRange {
    let content_start = open.header_index + 1;
    let formats = paragraphs
        .iter()
        .filter(|p| p.index >= content_start && p.index <= content_end)
        .cloned()
        .collect();

    SectionRange {
        section_type: open.section_type,
        header_index: open.header_index,
        header_text: open.header_text,
        content_start,
        content_end,
        formats,
    }
}

fn looks_like_header(text: &str, limits: &ShapeLimits) -> bool {
    check_shape(text, limits).is_ok()
        && text
            .trim()
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedNgramEmbedder;
    use crate::model::Document;
    use crate::structure;
    use proptest::prelude::*;

    fn mapper() -> SectionMapper {
        let classifier = HeaderClassifier::new(Arc::new(HashedNgramEmbedder::default())).unwrap();
        SectionMapper::new(Arc::new(classifier))
    }

    fn paragraphs(lines: &[&str]) -> Vec<ParagraphInfo> {
        structure::extract(&Document::from_lines(lines.iter().copied())).paragraphs
    }

    #[test]
    fn test_basic_mapping() {
        let paras = paragraphs(&[
            "Jane Doe",
            "SUMMARY",
            "Engineer with ten years of experience shipping systems software.",
            "EXPERIENCE",
            "Senior Engineer 2021 - 2023",
            "Acme Corp, Remote",
            "EDUCATION",
            "BSc Computer Science, 2015",
        ]);
        let map = mapper().map(&paras);

        assert_eq!(
            map.section_types(),
            vec![SectionType::Summary, SectionType::Experience, SectionType::Education]
        );

        let experience = map.get(SectionType::Experience).unwrap();
        assert_eq!(experience.header_index, 3);
        assert_eq!(experience.content_indices(), 4..=5);
        assert_eq!(experience.content_texts(), vec!["Senior Engineer 2021 - 2023", "Acme Corp, Remote"]);

        let education = map.get(SectionType::Education).unwrap();
        assert_eq!(education.content_end, 7);
        assert!(map.get(SectionType::Skills).is_none());
    }

    #[test]
    fn test_empty_document() {
        let map = mapper().map(&[]);
        assert!(map.is_empty());

        let map = mapper().map(&paragraphs(&["Jane Doe", "jane@example.com"]));
        assert!(map.is_empty());
    }

    #[test]
    fn test_trailing_header_has_empty_range() {
        let map = mapper().map(&paragraphs(&["Skills", "Rust, Go", "Projects"]));
        let projects = map.get(SectionType::Projects).unwrap();
        assert!(projects.is_empty());
        assert_eq!(projects.content_start, 3);
        assert_eq!(projects.content_end, 2);
    }

    #[test]
    fn test_repeated_section_last_wins() {
        let map = mapper().map(&paragraphs(&[
            "Summary",
            "first",
            "Skills",
            "Rust",
            "Summary",
            "second",
        ]));
        assert_eq!(map.len(), 2);
        let summary = map.get(SectionType::Summary).unwrap();
        assert_eq!(summary.header_index, 4);
        assert_eq!(summary.content_texts(), vec!["second"]);
    }

    #[test]
    fn test_blank_paragraphs_stay_in_range() {
        let map = mapper().map(&paragraphs(&["Education", "", "MSc", ""]));
        let education = map.get(SectionType::Education).unwrap();
        assert_eq!(education.len(), 3);
        assert_eq!(education.content_end, 3);
    }

    const LINES: &[&str] = &[
        "Summary",
        "Experience",
        "Skills",
        "Education",
        "Projects",
        "Certifications",
        "Awards",
        "Built a distributed cache in Rust serving millions of requests",
        "Acme Corp, Remote",
        "Python, Java, Go",
        "",
        "Jane Doe",
    ];

    proptest! {
        #[test]
        fn prop_ranges_are_ordered_and_disjoint(picks in prop::collection::vec(0..LINES.len(), 0..40)) {
            let lines: Vec<&str> = picks.iter().map(|&i| LINES[i]).collect();
            let paras = paragraphs(&lines);
            let map = mapper().map(&paras);

            let ranges: Vec<&SectionRange> = map.iter().collect();
            for range in &ranges {
                prop_assert!(range.header_index < range.content_start);
                prop_assert!(range.content_start <= range.content_end + 1);
            }
            for pair in ranges.windows(2) {
                prop_assert!(pair[0].header_index < pair[1].header_index);
                prop_assert!(pair[0].content_end < pair[1].header_index);
            }
            if let Some(last) = ranges.last() {
                prop_assert_eq!(last.content_end, paras.len() - 1);
            }
            let mut types = map.section_types();
            types.sort();
            types.dedup();
            prop_assert_eq!(types.len(), map.len());
        }
    }
}
