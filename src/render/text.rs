//! Document to plain text flattening.

use crate::model::Document;

/// Flatten a document into newline-delimited text for parsing.
///
/// Body paragraphs come first, one line each, then table rows with cells
/// separated by tabs.
pub fn to_text(doc: &Document) -> String {
    let mut lines: Vec<String> = doc.paragraphs.iter().map(|p| p.plain_text()).collect();
    for table in &doc.tables {
        lines.extend(table.rows.iter().map(|row| row.plain_text()));
    }
    lines.join("\n").trim().to_string()
}
