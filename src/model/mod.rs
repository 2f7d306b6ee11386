//! Structural document model.
//!
//! This is the paragraph-sequence representation produced by an external
//! document loader and handed back to an external serializer after
//! regeneration. Only the parts the pipeline reads or writes are modelled.

mod document;
mod paragraph;
mod section;
mod table;

pub use document::{Document, Metadata, Relationship, Relationships, HYPERLINK_RELATIONSHIP};
pub use paragraph::{
    Alignment, InlineContent, ListInfo, Paragraph, ParagraphStyle, TextRun, TextStyle,
};
pub use section::SectionType;
pub use table::{Table, TableCell, TableRow};
