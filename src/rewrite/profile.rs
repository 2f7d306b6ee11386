//! Dominant formatting profile of a section range.

use crate::model::TextStyle;
use crate::structure::ParagraphInfo;
use serde::{Deserialize, Serialize};

/// The most frequent run-level font attributes of a range.
///
/// Each attribute is the mode of the values found on the first run of every
/// non-empty paragraph; paragraphs whose first run leaves an attribute
/// inherited do not vote for it. Ties go to the value seen first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingProfile {
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

impl FormattingProfile {
    /// Sample the first run of every non-empty paragraph.
    pub fn from_formats(formats: &[ParagraphInfo]) -> Self {
        let samples: Vec<_> = formats
            .iter()
            .filter(|info| !info.is_empty())
            .filter_map(|info| info.runs.first())
            .collect();

        Self {
            font_name: mode(samples.iter().filter_map(|r| r.font_name.clone())),
            font_size: mode(samples.iter().filter_map(|r| r.font_size)),
            bold: mode(samples.iter().filter_map(|r| r.bold)),
            italic: mode(samples.iter().filter_map(|r| r.italic)),
            underline: mode(samples.iter().filter_map(|r| r.underline)),
        }
    }

    /// Check if no attribute was sampled.
    pub fn is_empty(&self) -> bool {
        self.font_name.is_none()
            && self.font_size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
    }

    /// Run style for plain replacement text.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            color: None,
        }
    }

    /// Run style for a re-anchored hyperlink: the profile in blue, underlined.
    pub fn link_style(&self) -> TextStyle {
        TextStyle {
            color: Some(LINK_COLOR.to_string()),
            underline: Some(true),
            ..self.text_style()
        }
    }
}

/// Hex RGB color of re-anchored hyperlinks.
pub const LINK_COLOR: &str = "0000FF";

fn mode<T: PartialEq>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::RunFormat;

    fn info(index: usize, text: &str, run: RunFormat) -> ParagraphInfo {
        ParagraphInfo {
            index,
            text: text.to_string(),
            style_name: None,
            alignment: None,
            left_indent: None,
            first_line_indent: None,
            space_before: None,
            space_after: None,
            line_spacing: None,
            is_list_item: false,
            has_hyperlink: false,
            runs: vec![run],
        }
    }

    fn run(font: &str, size: f32, bold: Option<bool>) -> RunFormat {
        RunFormat {
            font_name: Some(font.to_string()),
            font_size: Some(size),
            bold,
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_per_attribute() {
        let formats = vec![
            info(0, "a", run("Calibri", 11.0, None)),
            info(1, "b", run("Calibri", 10.0, Some(false))),
            info(2, "c", run("Georgia", 10.0, None)),
        ];
        let profile = FormattingProfile::from_formats(&formats);

        assert_eq!(profile.font_name.as_deref(), Some("Calibri"));
        assert_eq!(profile.font_size, Some(10.0));
        assert_eq!(profile.bold, Some(false));
        assert_eq!(profile.italic, None);
    }

    #[test]
    fn test_ties_go_to_first_value() {
        let formats = vec![
            info(0, "a", run("Georgia", 12.0, None)),
            info(1, "b", run("Calibri", 11.0, None)),
        ];
        let profile = FormattingProfile::from_formats(&formats);
        assert_eq!(profile.font_name.as_deref(), Some("Georgia"));
        assert_eq!(profile.font_size, Some(12.0));
    }

    #[test]
    fn test_empty_paragraphs_do_not_vote() {
        let formats = vec![
            info(0, "  ", run("Arial", 8.0, None)),
            info(1, "text", run("Calibri", 11.0, None)),
        ];
        let profile = FormattingProfile::from_formats(&formats);
        assert_eq!(profile.font_name.as_deref(), Some("Calibri"));
        assert!(FormattingProfile::from_formats(&[]).is_empty());
    }

    #[test]
    fn test_link_style() {
        let profile = FormattingProfile {
            font_name: Some("Calibri".to_string()),
            underline: Some(false),
            ..Default::default()
        };
        let style = profile.link_style();
        assert_eq!(style.color.as_deref(), Some(LINK_COLOR));
        assert_eq!(style.underline, Some(true));
        assert_eq!(style.font_name.as_deref(), Some("Calibri"));
        assert_eq!(profile.text_style().color, None);
    }
}
