//! Integration tests for format-preserving section regeneration.

use proptest::prelude::*;
use resume_tailor::model::{Relationship, TextStyle};
use resume_tailor::rewrite::Strategy;
use resume_tailor::{
    Alignment, Document, InlineContent, ListItem, Paragraph, RegenerationPolicy, ResumeTailor,
    SectionType, SectionUpdates, SkillMap, StructuredItem, TextRun,
};

fn body_style() -> TextStyle {
    TextStyle {
        italic: Some(true),
        ..TextStyle::font("Garamond", 11.5)
    }
}

/// A resume whose summary carries a hyperlink and explicit formatting.
fn styled_resume() -> Document {
    let mut doc = Document::new();
    doc.add_paragraph(Paragraph::with_text("Jane Doe"));
    doc.add_paragraph(Paragraph::with_text("Summary").styled("Heading 1"));

    let mut summary = Paragraph::new();
    summary.style.alignment = Some(Alignment::Justify);
    summary.add_run(TextRun::styled("Engineer. See ", body_style()));
    summary.add_hyperlink("rId7", TextRun::new("my portfolio"));
    summary.add_run(TextRun::styled(".", body_style()));
    doc.add_paragraph(summary);

    doc.add_paragraph(Paragraph::with_text("Education").styled("Heading 1"));
    doc.add_paragraph(Paragraph::with_text("MSc Computer Science"));
    doc.add_paragraph(Paragraph::with_text("Skills").styled("Heading 1"));
    doc.add_paragraph(Paragraph::with_text("Languages: Rust, Go"));
    doc.add_paragraph(Paragraph::with_text("Databases: PostgreSQL"));
    doc.add_paragraph(Paragraph::with_text("Projects").styled("Heading 1"));
    doc.add_paragraph(Paragraph::with_text("Realtime chat application"));
    doc.add_paragraph(Paragraph::with_text("Built with Rust and websockets."));

    doc.relationships
        .insert("rId7", Relationship::hyperlink("https://jane.dev"));
    doc
}

fn hyperlinks(paragraph: &Paragraph) -> Vec<(String, String)> {
    paragraph
        .content
        .iter()
        .filter_map(|item| match item {
            InlineContent::Hyperlink { rel_id, runs } => Some((
                rel_id.clone(),
                runs.iter().map(|r| r.text.as_str()).collect::<String>(),
            )),
            _ => None,
        })
        .collect()
}

#[test]
fn test_summary_keeps_hyperlink_and_format() {
    let tailor = ResumeTailor::new().build().unwrap();
    let mut doc = styled_resume();
    let updates = SectionUpdates::new().with(
        SectionType::Summary,
        "Rust engineer building storage engines. Demos on my portfolio.",
    );

    let report = tailor.regenerate(&mut doc, &updates).unwrap();
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].links_preserved, 1);

    let summary = &doc.paragraphs[2];
    assert_eq!(
        summary.plain_text(),
        "Rust engineer building storage engines. Demos on my portfolio."
    );
    assert_eq!(
        hyperlinks(summary),
        vec![("rId7".to_string(), "my portfolio".to_string())]
    );
    assert_eq!(summary.style.alignment, Some(Alignment::Justify));
    assert_eq!(doc.relationships.len(), 1);

    let first = summary.runs().next().unwrap();
    assert_eq!(first.style.font_name.as_deref(), Some("Garamond"));
    assert_eq!(first.style.font_size, Some(11.5));
    assert_eq!(first.style.italic, Some(true));
}

#[test]
fn test_protected_sections_untouched() {
    let tailor = ResumeTailor::new().build().unwrap();
    let mut doc = styled_resume();
    let original = doc.clone();
    let updates = SectionUpdates::new()
        .with(SectionType::Summary, "Rust engineer.")
        .with(SectionType::Education, "PhD")
        .with(SectionType::Projects, "Nothing to see");

    let report = tailor.regenerate(&mut doc, &updates).unwrap();

    assert_eq!(report.applied_sections(), vec![SectionType::Summary]);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.verification.passed());
    assert_eq!(report.verification.sections.len(), 2);
    assert_eq!(doc.paragraphs[3..], original.paragraphs[3..]);
}

#[test]
fn test_skills_categorized_within_range() {
    let tailor = ResumeTailor::new().build().unwrap();
    let mut doc = styled_resume();
    let skills = SkillMap::new()
        .with("programming_languages", ["Rust", "Python"])
        .with("databases", ["PostgreSQL", "Redis"])
        .with("cloud", ["AWS"]);
    let updates = SectionUpdates::new().with(SectionType::Skills, skills);

    let report = tailor.regenerate(&mut doc, &updates).unwrap();
    let outcome = &report.applied[0];

    assert_eq!(outcome.strategy, Strategy::Categorized);
    assert_eq!(outcome.lines_dropped, 1);
    assert_eq!(doc.paragraph_count(), original_len());
    assert_eq!(doc.paragraphs[6].plain_text(), "Programming Languages: Rust, Python");
    assert_eq!(doc.paragraphs[7].plain_text(), "Databases: PostgreSQL, Redis");
}

fn original_len() -> usize {
    styled_resume().paragraph_count()
}

#[test]
fn test_summary_lines_grow_range() {
    let tailor = ResumeTailor::new().build().unwrap();
    let mut doc = styled_resume();
    let updates = SectionUpdates::new().with(
        SectionType::Summary,
        "Rust engineer focused on storage.\nMentor to junior engineers and an occasional conference speaker.",
    );

    tailor.regenerate(&mut doc, &updates).unwrap();

    assert_eq!(doc.paragraph_count(), original_len() + 1);
    assert_eq!(
        doc.paragraphs[3].plain_text(),
        "Mentor to junior engineers and an occasional conference speaker."
    );
    assert_eq!(doc.paragraphs[4].plain_text(), "Education");

    let sections = tailor.sections(&doc);
    assert_eq!(sections.get(SectionType::Summary).unwrap().len(), 2);
}

#[test]
fn test_updates_json_with_unknown_keys() {
    let tailor = ResumeTailor::new().build().unwrap();
    let mut doc = styled_resume();
    let updates = SectionUpdates::from_json(
        r#"{
            "professional_summary": "Rust engineer.",
            "hobbies": "Chess",
            "skills": {"languages": ["Rust"]}
        }"#,
    )
    .unwrap();

    let report = tailor.regenerate(&mut doc, &updates).unwrap();

    assert_eq!(
        report.applied_sections(),
        vec![SectionType::Skills, SectionType::Summary]
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].key, "hobbies");
    assert_eq!(doc.paragraphs[6].plain_text(), "Languages: Rust");
    assert_eq!(doc.paragraphs[7].plain_text(), "");
}

#[test]
fn test_injected_header_fails_and_keeps_document() {
    let tailor = ResumeTailor::new().build().unwrap();
    let mut doc = styled_resume();
    let original = doc.clone();
    let updates = SectionUpdates::new().with(
        SectionType::Skills,
        "Languages: Rust\nEducation\nPhD in everything",
    );

    let err = tailor.regenerate(&mut doc, &updates).unwrap_err();

    assert!(err.is_integrity_violation());
    assert_eq!(doc, original);
}

#[test]
fn test_wider_policy_rewrites_projects() {
    let policy = RegenerationPolicy::new(
        [SectionType::Summary, SectionType::Projects],
        [SectionType::Education],
    )
    .unwrap();
    let tailor = ResumeTailor::new().with_policy(policy).build().unwrap();
    let mut doc = styled_resume();
    let project = StructuredItem::new("Storage engine")
        .with_description("A log-structured key value store.")
        .with_technologies(["Rust"]);
    let updates = SectionUpdates::new().with(SectionType::Projects, vec![ListItem::from(project)]);

    let report = tailor.regenerate(&mut doc, &updates).unwrap();

    assert_eq!(report.applied[0].strategy, Strategy::List);
    assert_eq!(doc.paragraphs[9].plain_text(), "Storage engine");
    assert_eq!(
        doc.paragraphs[10].plain_text(),
        "A log-structured key value store."
    );
    assert_eq!(report.applied[0].lines_dropped, 1);
}

proptest! {
    #[test]
    fn prop_summary_rewrites_keep_protected_sections(
        words in prop::collection::vec("[a-z]{3,8}", 8..16)
    ) {
        let tailor = ResumeTailor::new().build().unwrap();
        let mut doc = styled_resume();
        let original = doc.clone();
        let updates = SectionUpdates::new().with(SectionType::Summary, words.join(" "));

        let report = tailor.regenerate(&mut doc, &updates).unwrap();

        prop_assert!(report.verification.passed());
        prop_assert_eq!(&doc.paragraphs[3..], &original.paragraphs[3..]);
    }
}
