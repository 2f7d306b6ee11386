//! Format-preserving section rewriting.
//!
//! A [`Replacement`] is written into the paragraphs of one [`SectionRange`]
//! with the strategy its shape selects:
//!
//! - [`Replacement::Text`]: one line per paragraph. A single line collapses
//!   a multi-paragraph range into its first paragraph; extra lines are
//!   inserted after the range.
//! - [`Replacement::List`]: one paragraph per item, bullet glyphs added
//!   where the original paragraph was a list item; structured items expand
//!   to name, description, detail bullets and a technologies line.
//! - [`Replacement::Categorized`]: one "Category: items" paragraph per
//!   category, using the colon style of the original lines.
//!
//! List and categorized rewrites never grow the range. Every written run
//! takes the range's [`FormattingProfile`], and hyperlinks whose anchor
//! text or URL survive in the new text are re-anchored.

mod hyperlinks;
mod profile;

pub use profile::{FormattingProfile, LINK_COLOR};

use crate::error::{Error, Result};
use crate::extract::SkillMap;
use crate::mapper::SectionRange;
use crate::model::{Document, Paragraph, SectionType};
use crate::structure::{HyperlinkSpan, ParagraphInfo};
use hyperlinks::LinkPool;
use serde::{Deserialize, Serialize};

const LIST_MARKERS: [char; 3] = ['•', '-', '*'];
const BULLET_PREFIX: &str = "• ";
const TECHNOLOGIES_LABEL: &str = "Technologies: ";

/// Replacement content for one section.
///
/// Deserializes from JSON by shape: a string, an array of strings or
/// objects, or an object of string arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replacement {
    /// Scalar text, one line per paragraph
    Text(String),
    /// List of items, one paragraph per item
    List(Vec<ListItem>),
    /// Category to items, one paragraph per category
    Categorized(SkillMap),
}

/// One item of a list replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    /// A single line
    Text(String),
    /// A record expanded over several paragraphs
    Entry(StructuredItem),
}

/// A record in a list replacement, such as a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructuredItem {
    /// Name line
    pub name: String,
    /// Description line
    pub description: String,
    /// Detail lines, bulleted where the target paragraph was a list item
    pub details: Vec<String>,
    /// Technologies, rendered as one "Technologies: a, b" line
    pub technologies: Vec<String>,
}

impl StructuredItem {
    /// Create an item with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a detail line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Set the technologies.
    pub fn with_technologies<S: Into<String>>(mut self, technologies: impl IntoIterator<Item = S>) -> Self {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }
}

/// Update strategy selected by a replacement's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Scalar text
    Text,
    /// List of items
    List,
    /// Category map
    Categorized,
}

impl Replacement {
    /// Infer the replacement shape of a raw JSON value.
    pub fn from_value(section: SectionType, value: serde_json::Value) -> Result<Self> {
        let shape = describe(&value);
        serde_json::from_value(value).map_err(|_| Error::UnsupportedReplacement {
            section: section.to_string(),
            shape,
        })
    }

    /// Strategy this replacement is written with.
    pub fn strategy(&self) -> Strategy {
        match self {
            Replacement::Text(_) => Strategy::Text,
            Replacement::List(_) => Strategy::List,
            Replacement::Categorized(_) => Strategy::Categorized,
        }
    }

    /// Check if there is nothing to write.
    pub fn is_empty(&self) -> bool {
        match self {
            Replacement::Text(text) => text.trim().is_empty(),
            Replacement::List(items) => items.is_empty(),
            Replacement::Categorized(map) => map.iter().all(|(_, items)| items.is_empty()),
        }
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        Replacement::Text(text.to_string())
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Replacement::Text(text)
    }
}

impl From<SkillMap> for Replacement {
    fn from(map: SkillMap) -> Self {
        Replacement::Categorized(map)
    }
}

impl From<Vec<ListItem>> for Replacement {
    fn from(items: Vec<ListItem>) -> Self {
        Replacement::List(items)
    }
}

impl From<&str> for ListItem {
    fn from(text: &str) -> Self {
        ListItem::Text(text.to_string())
    }
}

impl From<StructuredItem> for ListItem {
    fn from(item: StructuredItem) -> Self {
        ListItem::Entry(item)
    }
}

fn describe(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => match items.iter().find(|v| !v.is_string() && !v.is_object()) {
            Some(item) => format!("array containing {}", describe(item)),
            None => "array of malformed records".to_string(),
        },
        Value::Object(_) => "object with non-list values".to_string(),
    }
}

/// What a rewrite did to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// Rewritten section
    pub section: SectionType,
    /// Strategy used
    pub strategy: Strategy,
    /// Lines written, in order
    pub lines: Vec<String>,
    /// Existing paragraphs that received a line
    pub paragraphs_written: usize,
    /// Paragraphs inserted after the range
    pub paragraphs_inserted: usize,
    /// Existing paragraphs left empty
    pub paragraphs_cleared: usize,
    /// Lines that did not fit in the range
    pub lines_dropped: usize,
    /// Hyperlinks re-anchored into the new text
    pub links_preserved: usize,
}

impl RewriteOutcome {
    /// Written lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Write `replacement` into the content paragraphs of `range`.
///
/// `hyperlinks` are the document's hyperlink spans; only those owned by
/// paragraphs of the range are candidates for re-anchoring. The range must
/// come from a mapping of the document's current state; a range reaching
/// past the last paragraph is [`Error::ParagraphOutOfRange`].
pub fn rewrite(
    document: &mut Document,
    range: &SectionRange,
    hyperlinks: &[HyperlinkSpan],
    replacement: &Replacement,
) -> Result<RewriteOutcome> {
    check_range(document, range)?;

    let (lines, may_grow) = match replacement {
        Replacement::Text(text) => (text_lines(text), true),
        Replacement::List(items) => (list_lines(items, &range.formats), false),
        Replacement::Categorized(map) => (categorized_lines(map, &range.formats), false),
    };

    // Zero lines would clear the whole range.
    if replacement.is_empty() || lines.is_empty() {
        return Err(Error::UnsupportedReplacement {
            section: range.section_type.to_string(),
            shape: format!("empty {:?}", replacement.strategy()).to_lowercase(),
        });
    }

    let profile = FormattingProfile::from_formats(&range.formats);
    let spans = hyperlinks
        .iter()
        .filter(|h| range.contains(h.paragraph_index))
        .cloned()
        .collect();

    let mut writer = RangeWriter {
        document,
        range,
        profile,
        links: LinkPool::new(spans),
    };
    let outcome = writer.write(&lines, may_grow, replacement.strategy());

    log::debug!(
        "Rewrote {} with {:?} strategy: {} written, {} inserted, {} cleared, {} links kept",
        range.section_type,
        outcome.strategy,
        outcome.paragraphs_written,
        outcome.paragraphs_inserted,
        outcome.paragraphs_cleared,
        outcome.links_preserved
    );
    Ok(outcome)
}

fn check_range(document: &Document, range: &SectionRange) -> Result<()> {
    let count = document.paragraph_count();
    let last = if range.is_empty() {
        range.header_index
    } else {
        range.content_end
    };
    if last >= count {
        return Err(Error::ParagraphOutOfRange { index: last, count });
    }
    Ok(())
}

fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_list_slot(formats: &[ParagraphInfo], slot: usize) -> bool {
    formats.get(slot).is_some_and(|info| info.is_list_item)
}

fn bulleted(line: &str, formats: &[ParagraphInfo], slot: usize) -> String {
    let line = line.trim();
    if is_list_slot(formats, slot) && !line.starts_with(LIST_MARKERS) {
        format!("{}{}", BULLET_PREFIX, line)
    } else {
        line.to_string()
    }
}

fn list_lines(items: &[ListItem], formats: &[ParagraphInfo]) -> Vec<String> {
    let mut lines = Vec::new();
    for item in items {
        match item {
            ListItem::Text(text) => {
                if !text.trim().is_empty() {
                    lines.push(bulleted(text, formats, lines.len()));
                }
            }
            ListItem::Entry(entry) => {
                for field in [&entry.name, &entry.description] {
                    if !field.trim().is_empty() {
                        lines.push(field.trim().to_string());
                    }
                }
                for detail in entry.details.iter().filter(|d| !d.trim().is_empty()) {
                    lines.push(bulleted(detail, formats, lines.len()));
                }
                if !entry.technologies.is_empty() {
                    lines.push(format!(
                        "{}{}",
                        TECHNOLOGIES_LABEL,
                        entry.technologies.join(", ")
                    ));
                }
            }
        }
    }
    lines
}

/// Separator after a category title: ":" when more than half of the
/// original lines carry colons and none of them is followed by a space,
/// ": " otherwise.
fn category_separator(formats: &[ParagraphInfo]) -> &'static str {
    let lines: Vec<&str> = formats
        .iter()
        .map(|f| f.text.trim())
        .filter(|t| !t.is_empty())
        .collect();
    let with_colon: Vec<&&str> = lines.iter().filter(|l| l.contains(':')).collect();

    let uses_colons = with_colon.len() * 2 > lines.len();
    if uses_colons && with_colon.iter().all(|l| !l.contains(": ")) {
        ":"
    } else {
        ": "
    }
}

/// "programming_languages" becomes "Programming Languages".
fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn categorized_lines(map: &SkillMap, formats: &[ParagraphInfo]) -> Vec<String> {
    let separator = category_separator(formats);
    map.iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(category, items)| {
            format!("{}{}{}", title_case(category), separator, items.join(", "))
        })
        .collect()
}

struct RangeWriter<'a> {
    document: &'a mut Document,
    range: &'a SectionRange,
    profile: FormattingProfile,
    links: LinkPool,
}

impl RangeWriter<'_> {
    fn write(&mut self, lines: &[String], may_grow: bool, strategy: Strategy) -> RewriteOutcome {
        let range = self.range;
        let mut outcome = RewriteOutcome {
            section: range.section_type,
            strategy,
            lines: Vec::new(),
            paragraphs_written: 0,
            paragraphs_inserted: 0,
            paragraphs_cleared: 0,
            lines_dropped: 0,
            links_preserved: 0,
        };

        let slots = range.len();
        for slot in 0..slots {
            let index = range.content_start + slot;
            match lines.get(slot) {
                Some(line) => {
                    self.fill(index, line, range.formats.get(slot));
                    outcome.lines.push(line.clone());
                    outcome.paragraphs_written += 1;
                }
                None => {
                    if let Some(paragraph) = self.document.paragraph_mut(index) {
                        if !paragraph.content.is_empty() {
                            outcome.paragraphs_cleared += 1;
                        }
                        paragraph.clear();
                    }
                }
            }
        }

        let extra = lines.get(slots..).unwrap_or_default();
        if may_grow {
            let template = self.insertion_template();
            let mut at = range.content_start + slots;
            for line in extra {
                self.document.insert_paragraph(at, template.clone());
                self.fill(at, line, range.formats.last());
                outcome.lines.push(line.clone());
                outcome.paragraphs_inserted += 1;
                at += 1;
            }
        } else if !extra.is_empty() {
            log::debug!(
                "{} lines do not fit the {} paragraphs of {}, dropped",
                extra.len(),
                slots,
                range.section_type
            );
            outcome.lines_dropped = extra.len();
        }

        outcome.links_preserved = self.links.placed();
        outcome
    }

    /// Empty paragraph carrying the style of the range's last paragraph.
    fn insertion_template(&self) -> Paragraph {
        let mut template = Paragraph::new();
        if !self.range.is_empty() {
            if let Some(last) = self.document.paragraph(self.range.content_end) {
                template.style = last.style.clone();
            }
        }
        template
    }

    fn fill(&mut self, index: usize, line: &str, format: Option<&ParagraphInfo>) {
        let Some(paragraph) = self.document.paragraphs.get_mut(index) else {
            return;
        };
        self.links.fill(
            paragraph,
            line,
            &self.profile,
            &mut self.document.relationships,
        );
        if let Some(info) = format {
            restyle(paragraph, info);
        }
    }
}

/// Reapply captured paragraph-level formatting.
fn restyle(paragraph: &mut Paragraph, info: &ParagraphInfo) {
    let style = &mut paragraph.style;
    if info.style_name.is_some() {
        style.style_name = info.style_name.clone();
    }
    if info.alignment.is_some() {
        style.alignment = info.alignment;
    }
    if info.left_indent.is_some() {
        style.left_indent = info.left_indent;
    }
    if info.first_line_indent.is_some() {
        style.first_line_indent = info.first_line_indent;
    }
    if info.space_before.is_some() {
        style.space_before = info.space_before;
    }
    if info.space_after.is_some() {
        style.space_after = info.space_after;
    }
    if info.line_spacing.is_some() {
        style.line_spacing = info.line_spacing;
    }
}
