//! Paragraph and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of a loaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in document order
    pub content: Vec<InlineContent>,

    /// Paragraph style
    #[serde(default)]
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Set the paragraph style name (builder form).
    pub fn styled(mut self, style_name: impl Into<String>) -> Self {
        self.style.style_name = Some(style_name.into());
        self
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(InlineContent::Text(run));
    }

    /// Add a hyperlink element wrapping a single run.
    pub fn add_hyperlink(&mut self, rel_id: impl Into<String>, run: TextRun) {
        self.content.push(InlineContent::Hyperlink {
            rel_id: rel_id.into(),
            runs: vec![run],
        });
    }

    /// Add a line break.
    pub fn add_line_break(&mut self) {
        self.content.push(InlineContent::LineBreak);
    }

    /// Remove all inline content, keeping the paragraph and its style.
    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Get plain text content of the paragraph, hyperlink text included.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for item in &self.content {
            match item {
                InlineContent::Text(run) => text.push_str(&run.text),
                InlineContent::LineBreak => text.push('\n'),
                InlineContent::Hyperlink { runs, .. } => {
                    for run in runs {
                        text.push_str(&run.text);
                    }
                }
            }
        }
        text
    }

    /// Iterate over every text run, including runs nested in hyperlinks.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.content.iter().flat_map(|item| match item {
            InlineContent::Text(run) => std::slice::from_ref(run),
            InlineContent::Hyperlink { runs, .. } => runs.as_slice(),
            InlineContent::LineBreak => &[][..],
        })
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.plain_text().trim().is_empty()
    }

    /// Check if the paragraph contains any hyperlink element.
    pub fn has_hyperlink(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, InlineContent::Hyperlink { .. }))
    }

    /// Check if this paragraph carries native list numbering.
    pub fn is_numbered(&self) -> bool {
        self.style.numbering.is_some()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A line break
    LineBreak,

    /// A hyperlink element; the target lives in the document relationships
    Hyperlink {
        /// Relationship ID resolving to the target URL
        rel_id: String,
        /// Runs displayed as the anchor text
        runs: Vec<TextRun>,
    },
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a text run with the given style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                bold: Some(true),
                ..Default::default()
            },
        )
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Run-level font attributes.
///
/// `None` means the attribute is inherited from the paragraph or document
/// style, which is distinct from an explicit `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font name
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Bold text
    pub bold: Option<bool>,

    /// Italic text
    pub italic: Option<bool>,

    /// Underlined text
    pub underline: Option<bool>,

    /// Text color (hex RGB, e.g. "0000FF")
    pub color: Option<String>,
}

impl TextStyle {
    /// Create a style with a font name and size.
    pub fn font(name: impl Into<String>, size: f32) -> Self {
        Self {
            font_name: Some(name.into()),
            font_size: Some(size),
            ..Default::default()
        }
    }

    /// Check if any explicit attribute is set.
    pub fn has_styling(&self) -> bool {
        self.font_name.is_some()
            || self.font_size.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
            || self.color.is_some()
    }
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphStyle {
    /// Named paragraph style (e.g. "Normal", "List Bullet", "Heading 1")
    pub style_name: Option<String>,

    /// Text alignment, `None` when inherited
    pub alignment: Option<Alignment>,

    /// Left indent in points
    pub left_indent: Option<f32>,

    /// First line indent in points
    pub first_line_indent: Option<f32>,

    /// Space before paragraph in points
    pub space_before: Option<f32>,

    /// Space after paragraph in points
    pub space_after: Option<f32>,

    /// Line spacing multiplier (1.0 = single, 2.0 = double)
    pub line_spacing: Option<f32>,

    /// Native list numbering, if the paragraph belongs to a numbered list
    pub numbering: Option<ListInfo>,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// Native list numbering attached to a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Numbering definition ID
    pub num_id: u32,

    /// Nesting level (0 = top level)
    pub level: u8,
}

impl ListInfo {
    /// Create list numbering for the given definition and level.
    pub fn new(num_id: u32, level: u8) -> Self {
        Self { num_id, level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new();
        p.add_text("Hello ");
        p.add_run(TextRun::bold("world"));
        p.add_hyperlink("rId1", TextRun::new(" link"));
        p.add_text("!");

        assert_eq!(p.plain_text(), "Hello world link!");
        assert!(p.has_hyperlink());
    }

    #[test]
    fn test_runs_include_hyperlink_runs() {
        let mut p = Paragraph::with_text("a");
        p.add_line_break();
        p.add_hyperlink("rId1", TextRun::new("b"));

        let texts: Vec<&str> = p.runs().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(p.plain_text(), "a\nb");
    }

    #[test]
    fn test_clear_keeps_style() {
        let mut p = Paragraph::with_text("content").styled("List Bullet");
        p.style.alignment = Some(Alignment::Center);
        p.clear();

        assert!(p.is_empty());
        assert_eq!(p.style.style_name.as_deref(), Some("List Bullet"));
        assert_eq!(p.style.alignment, Some(Alignment::Center));
    }

    #[test]
    fn test_text_style() {
        assert!(!TextStyle::default().has_styling());
        assert!(TextStyle::font("Calibri", 11.0).has_styling());
        assert_eq!(TextRun::bold("x").style.bold, Some(true));
    }
}
