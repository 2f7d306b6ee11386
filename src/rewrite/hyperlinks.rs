//! Hyperlink re-anchoring.
//!
//! A link survives a rewrite when its anchor text, or failing that its
//! target URL, occurs verbatim in the replacement text. Each original link
//! is re-inserted at most once, in the first rewritten paragraph that
//! contains it.

use super::FormattingProfile;
use crate::model::{InlineContent, Paragraph, Relationships, TextRun};
use crate::structure::HyperlinkSpan;

/// Links of a range that are still waiting for a place in the new text.
#[derive(Debug)]
pub(crate) struct LinkPool {
    spans: Vec<HyperlinkSpan>,
    placed: Vec<bool>,
}

/// One link positioned in a replacement text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placement {
    span: usize,
    start: usize,
    end: usize,
}

impl LinkPool {
    pub(crate) fn new(spans: Vec<HyperlinkSpan>) -> Self {
        let placed = vec![false; spans.len()];
        Self { spans, placed }
    }

    /// Number of links placed so far.
    pub(crate) fn placed(&self) -> usize {
        self.placed.iter().filter(|p| **p).count()
    }

    /// Non-overlapping placements of the unplaced links in `text`, by offset.
    fn locate(&self, text: &str) -> Vec<Placement> {
        let mut candidates: Vec<Placement> = self
            .spans
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.placed[*i])
            .filter_map(|(i, span)| {
                let anchor = [span.anchor_text.as_str(), span.url.as_str()]
                    .into_iter()
                    .filter(|a| !a.trim().is_empty())
                    .find(|a| text.contains(a))?;
                let start = text.find(anchor)?;
                Some(Placement {
                    span: i,
                    start,
                    end: start + anchor.len(),
                })
            })
            .collect();
        candidates.sort_by_key(|p| (p.start, std::cmp::Reverse(p.end)));

        let mut placements: Vec<Placement> = Vec::new();
        for candidate in candidates {
            if placements.last().map_or(true, |last| candidate.start >= last.end) {
                placements.push(candidate);
            }
        }
        placements
    }

    /// Replace the content of `paragraph` with `text`.
    ///
    /// Plain stretches become runs in the profile's style; placed links
    /// become hyperlink elements in the link style, pointing at a
    /// relationship for the original URL.
    pub(crate) fn fill(
        &mut self,
        paragraph: &mut Paragraph,
        text: &str,
        profile: &FormattingProfile,
        relationships: &mut Relationships,
    ) {
        paragraph.clear();

        let mut cursor = 0;
        for placement in self.locate(text) {
            if placement.start > cursor {
                paragraph.add_run(TextRun::styled(
                    &text[cursor..placement.start],
                    profile.text_style(),
                ));
            }

            let span = &self.spans[placement.span];
            let rel_id = relationships.relate_hyperlink(&span.url);
            paragraph.content.push(InlineContent::Hyperlink {
                rel_id,
                runs: vec![TextRun::styled(
                    &text[placement.start..placement.end],
                    profile.link_style(),
                )],
            });
            log::debug!(
                "Re-anchored link {:?} -> {} into new text",
                &text[placement.start..placement.end],
                span.url
            );

            self.placed[placement.span] = true;
            cursor = placement.end;
        }

        if cursor < text.len() {
            paragraph.add_run(TextRun::styled(&text[cursor..], profile.text_style()));
        }
    }
}
