//! Paragraph structure extraction.
//!
//! Flattens a [`Document`] into an ordered list of [`ParagraphInfo`] records
//! carrying the style metadata the mapper, guard and rewriter need, plus the
//! document's hyperlink spans.

use crate::model::{Alignment, Document, InlineContent, Paragraph};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Run-level font attributes of one contiguous text run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFormat {
    /// Font name
    pub font_name: Option<String>,
    /// Font size in points
    pub font_size: Option<f32>,
    /// Bold
    pub bold: Option<bool>,
    /// Italic
    pub italic: Option<bool>,
    /// Underline
    pub underline: Option<bool>,
}

/// Style metadata and text of one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphInfo {
    /// Position in document order
    pub index: usize,
    /// Plain text
    pub text: String,
    /// Named paragraph style
    pub style_name: Option<String>,
    /// Alignment
    pub alignment: Option<Alignment>,
    /// Left indent in points
    pub left_indent: Option<f32>,
    /// First line indent in points
    pub first_line_indent: Option<f32>,
    /// Space before in points
    pub space_before: Option<f32>,
    /// Space after in points
    pub space_after: Option<f32>,
    /// Line spacing multiplier
    pub line_spacing: Option<f32>,
    /// Whether the paragraph is a list item
    pub is_list_item: bool,
    /// Whether the paragraph contains a hyperlink element
    pub has_hyperlink: bool,
    /// Font attributes per run
    pub runs: Vec<RunFormat>,
}

impl ParagraphInfo {
    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of characters in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A hyperlink inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperlinkSpan {
    /// Displayed anchor text
    pub anchor_text: String,
    /// Resolved target URL
    pub url: String,
    /// Owning paragraph index
    pub paragraph_index: usize,
    /// Position of the hyperlink element among the paragraph's inline content
    pub run_position: usize,
}

/// Flat structure of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Paragraphs in document order
    pub paragraphs: Vec<ParagraphInfo>,
    /// Resolved hyperlinks in document order
    pub hyperlinks: Vec<HyperlinkSpan>,
    /// Whether the document has tables
    pub has_tables: bool,
}

impl DocumentStructure {
    /// Hyperlinks owned by paragraphs in `start..=end`.
    pub fn hyperlinks_in(&self, start: usize, end: usize) -> Vec<HyperlinkSpan> {
        self.hyperlinks
            .iter()
            .filter(|h| h.paragraph_index >= start && h.paragraph_index <= end)
            .cloned()
            .collect()
    }
}

fn list_glyph_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[•·▪▫◦‣⁃]|[-*]\s|\d+[.)]\s|[a-zA-Z][.)]\s)").expect("valid regex")
    })
}

/// Check whether a paragraph is a list item by style or leading glyph.
pub fn is_list_item(paragraph: &Paragraph, text: &str) -> bool {
    if paragraph.is_numbered() {
        return true;
    }
    let styled_as_list = paragraph
        .style
        .style_name
        .as_deref()
        .is_some_and(|name| name.contains("List") || name.contains("Bullet"));

    styled_as_list || list_glyph_regex().is_match(text.trim_start())
}

/// Extract the style metadata of one paragraph.
pub fn paragraph_info(index: usize, paragraph: &Paragraph) -> ParagraphInfo {
    let text = paragraph.plain_text();
    let style = &paragraph.style;
    let runs = paragraph
        .runs()
        .map(|run| RunFormat {
            font_name: run.style.font_name.clone(),
            font_size: run.style.font_size,
            bold: run.style.bold,
            italic: run.style.italic,
            underline: run.style.underline,
        })
        .collect();

    ParagraphInfo {
        index,
        is_list_item: is_list_item(paragraph, &text),
        has_hyperlink: paragraph.has_hyperlink(),
        style_name: style.style_name.clone(),
        alignment: style.alignment,
        left_indent: style.left_indent,
        first_line_indent: style.first_line_indent,
        space_before: style.space_before,
        space_after: style.space_after,
        line_spacing: style.line_spacing,
        runs,
        text,
    }
}

/// Extract the flat paragraph structure of a document.
///
/// Hyperlinks whose relationship ID does not resolve to a hyperlink target
/// are logged and skipped.
pub fn extract(document: &Document) -> DocumentStructure {
    let mut hyperlinks = Vec::new();
    let paragraphs = document
        .paragraphs
        .iter()
        .enumerate()
        .map(|(index, paragraph)| {
            collect_hyperlinks(document, index, paragraph, &mut hyperlinks);
            paragraph_info(index, paragraph)
        })
        .collect();

    DocumentStructure {
        paragraphs,
        hyperlinks,
        has_tables: !document.tables.is_empty(),
    }
}

fn collect_hyperlinks(
    document: &Document,
    index: usize,
    paragraph: &Paragraph,
    out: &mut Vec<HyperlinkSpan>,
) {
    for (position, item) in paragraph.content.iter().enumerate() {
        let InlineContent::Hyperlink { rel_id, runs } = item else {
            continue;
        };
        let anchor_text: String = runs.iter().map(|r| r.text.as_str()).collect();

        match document.relationships.get(rel_id) {
            Some(rel) if rel.is_hyperlink() && !rel.target.trim().is_empty() => {
                out.push(HyperlinkSpan {
                    anchor_text,
                    url: rel.target.clone(),
                    paragraph_index: index,
                    run_position: position,
                });
            }
            Some(_) => {
                log::warn!(
                    "Relationship {} in paragraph {} is not a hyperlink target, skipping",
                    rel_id,
                    index
                );
            }
            None => {
                log::warn!(
                    "Unresolved hyperlink relationship {} in paragraph {}, skipping",
                    rel_id,
                    index
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListInfo, Relationship, TextRun, TextStyle};

    #[test]
    fn test_list_detection() {
        let plain = |t: &str| Paragraph::with_text(t);
        assert!(is_list_item(&plain("• item"), "• item"));
        assert!(is_list_item(&plain("- item"), "- item"));
        assert!(is_list_item(&plain("3. item"), "3. item"));
        assert!(is_list_item(&plain("b) item"), "b) item"));
        assert!(!is_list_item(&plain("-5% churn"), "-5% churn"));
        assert!(!is_list_item(&plain("Acme Corp"), "Acme Corp"));

        let styled = Paragraph::with_text("item").styled("List Bullet");
        assert!(is_list_item(&styled, "item"));

        let mut numbered = Paragraph::with_text("item");
        numbered.style.numbering = Some(ListInfo::new(1, 0));
        assert!(is_list_item(&numbered, "item"));
    }

    #[test]
    fn test_paragraph_info_captures_style() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::styled("Hello", TextStyle::font("Calibri", 11.0)));
        p.style.alignment = Some(Alignment::Justify);
        p.style.space_after = Some(6.0);

        let info = paragraph_info(4, &p);
        assert_eq!(info.index, 4);
        assert_eq!(info.text, "Hello");
        assert_eq!(info.alignment, Some(Alignment::Justify));
        assert_eq!(info.space_after, Some(6.0));
        assert_eq!(info.runs.len(), 1);
        assert_eq!(info.runs[0].font_name.as_deref(), Some("Calibri"));
        assert!(!info.is_list_item);
    }

    #[test]
    fn test_hyperlinks_resolved_and_unresolved_skipped() {
        let mut doc = Document::new();
        doc.relationships
            .insert("rId7", Relationship::hyperlink("https://jane.dev"));

        let mut p = Paragraph::with_text("See ");
        p.add_hyperlink("rId7", TextRun::new("my portfolio"));
        p.add_hyperlink("rId99", TextRun::new("broken"));
        doc.add_paragraph(p);

        let structure = extract(&doc);
        assert_eq!(structure.paragraphs.len(), 1);
        assert!(structure.paragraphs[0].has_hyperlink);
        assert_eq!(
            structure.hyperlinks,
            vec![HyperlinkSpan {
                anchor_text: "my portfolio".to_string(),
                url: "https://jane.dev".to_string(),
                paragraph_index: 0,
                run_position: 1,
            }]
        );
    }

    #[test]
    fn test_indices_are_dense() {
        let doc = Document::from_lines(["a", "", "b", "c"]);
        let structure = extract(&doc);
        let indices: Vec<usize> = structure.paragraphs.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(!structure.has_tables);
    }
}
