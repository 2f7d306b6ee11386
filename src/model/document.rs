//! Document-level types.

use super::{Paragraph, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Relationship type URI for external hyperlinks.
pub const HYPERLINK_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// A loaded word-processing document.
///
/// Paragraph indices are positions in `paragraphs`, so they are dense and
/// increasing for any one snapshot of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Core properties
    #[serde(default)]
    pub metadata: Metadata,

    /// Body paragraphs in document order
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,

    /// Body tables
    #[serde(default)]
    pub tables: Vec<Table>,

    /// Relationship table (hyperlink targets keyed by relationship ID)
    #[serde(default)]
    pub relationships: Relationships,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with one plain paragraph per line.
    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        let mut doc = Self::new();
        for line in lines {
            doc.add_paragraph(Paragraph::with_text(line.as_ref()));
        }
        doc
    }

    /// Get the number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Get a paragraph by index.
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Get a mutable paragraph by index.
    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(index)
    }

    /// Append a paragraph to the body.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Insert a paragraph at `index`, shifting later paragraphs down.
    ///
    /// An index past the end appends.
    pub fn insert_paragraph(&mut self, index: usize, paragraph: Paragraph) {
        let index = index.min(self.paragraphs.len());
        self.paragraphs.insert(index, paragraph);
    }

    /// Add a table to the body.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Check if the document has any paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Get plain text of the body paragraphs, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Document core properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Last editor
    pub last_modified_by: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// Revision counter
    pub revision: u32,
}

impl Metadata {
    /// Record an edit made by `editor` at `when`.
    pub fn touch(&mut self, editor: impl Into<String>, when: DateTime<Utc>) {
        self.last_modified_by = Some(editor.into());
        self.modified = Some(when);
        self.revision += 1;
    }
}

/// A relationship from the document part to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship type URI
    pub kind: String,

    /// Target (a URL for external hyperlinks)
    pub target: String,

    /// Whether the target is outside the package
    #[serde(default)]
    pub external: bool,
}

impl Relationship {
    /// Create an external hyperlink relationship.
    pub fn hyperlink(target: impl Into<String>) -> Self {
        Self {
            kind: HYPERLINK_RELATIONSHIP.to_string(),
            target: target.into(),
            external: true,
        }
    }

    /// Check if this is a hyperlink relationship.
    pub fn is_hyperlink(&self) -> bool {
        self.kind == HYPERLINK_RELATIONSHIP
    }
}

/// Relationship table keyed by relationship ID ("rId1", "rId2", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationships {
    entries: BTreeMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty relationship table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relationship under an explicit ID.
    pub fn insert(&mut self, id: impl Into<String>, relationship: Relationship) {
        self.entries.insert(id.into(), relationship);
    }

    /// Resolve a relationship ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.get(id)
    }

    /// Return the ID of a hyperlink to `url`, adding one if none exists.
    pub fn relate_hyperlink(&mut self, url: &str) -> String {
        if let Some((id, _)) = self
            .entries
            .iter()
            .find(|(_, rel)| rel.is_hyperlink() && rel.target == url)
        {
            return id.clone();
        }

        let mut n = self.entries.len() + 1;
        while self.entries.contains_key(&format!("rId{}", n)) {
            n += 1;
        }
        let id = format!("rId{}", n);
        self.entries.insert(id.clone(), Relationship::hyperlink(url));
        id
    }

    /// Iterate over all relationships.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Relationship)> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
