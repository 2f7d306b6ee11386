//! Summary extraction.

use super::content_lines;
use crate::classify::{normalize_header, Taxonomy};
use crate::model::SectionType;

/// Extract the summary paragraph from a summary section.
///
/// Interior lines that are themselves a summary header variant ("Profile",
/// "About Me") are dropped; the rest are joined with single spaces.
pub fn extract_summary(text: &str) -> String {
    content_lines(text)
        .into_iter()
        .filter(|line| !is_header_variant(line))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_header_variant(line: &str) -> bool {
    let normalized = normalize_header(line).to_lowercase();
    SectionType::Summary
        .vocabulary()
        .iter()
        .any(|variant| variant.to_lowercase() == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_variants_stripped() {
        let text = "PROFILE\nSystems engineer with a focus on storage.\n\nAbout Me:\nEnjoys climbing.";
        assert_eq!(
            extract_summary(text),
            "Systems engineer with a focus on storage. Enjoys climbing."
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(extract_summary(""), "");
        assert_eq!(extract_summary("Summary\n\n"), "");
    }
}
