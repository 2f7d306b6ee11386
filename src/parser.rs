//! Plain-text resume parsing.
//!
//! Text is normalized, split into sections by classifying each line, and
//! handed to the entity extractors. The result is a pure function of the
//! input text and the parser's configuration.

use crate::classify::{HeaderClassifier, ShapeLimits, SkillCategoryClassifier};
use crate::contact::{harvest_text, PersonalInfo};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::extract::{
    content_lines, extract_experience, extract_projects, extract_summary, strip_bullet,
    ExperienceEntry, ProjectEntry, SkillMap, SkillsExtractor,
};
use crate::model::SectionType;
use crate::normalize::{NormalizeOptions, TextNormalizer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Options for plain-text parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Input normalization
    pub normalize: NormalizeOptions,
    /// Header shape limits for text lines
    pub limits: ShapeLimits,
}

impl ParserOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalization options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the header shape limits.
    pub fn with_limits(mut self, limits: ShapeLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// One section of a parsed text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedSection {
    /// Display title ("Summary", "Skills")
    pub title: String,
    /// Content lines joined with newlines
    pub content: String,
    /// Non-empty content lines
    pub items: Vec<String>,
}

/// Structured result of parsing a resume text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    /// Detected sections
    pub sections: BTreeMap<SectionType, ParsedSection>,
    /// Summary paragraph
    pub professional_summary: String,
    /// Work experience entries
    pub experience: Vec<ExperienceEntry>,
    /// Skills by category
    pub skills: SkillMap,
    /// Projects
    pub projects: Vec<ProjectEntry>,
    /// Certification lines
    pub certifications: Vec<String>,
    /// Achievement lines
    pub achievements: Vec<String>,
    /// Contact identifiers found anywhere in the text
    pub contact: PersonalInfo,
    /// Input text as given
    pub raw_text: String,
}

impl ParsedResume {
    /// Get a section.
    pub fn section(&self, section: SectionType) -> Option<&ParsedSection> {
        self.sections.get(&section)
    }
}

/// A line recognised as a section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedHeader {
    /// Zero-based line number in the normalized text
    pub line: usize,
    /// Header text
    pub text: String,
    /// Section type
    pub section: SectionType,
}

/// Plain-text resume parser.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    headers: Arc<HeaderClassifier>,
    skills: SkillsExtractor,
    normalizer: TextNormalizer,
    limits: ShapeLimits,
}

impl ResumeParser {
    /// Create a parser whose classifiers embed with `provider`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let headers = Arc::new(HeaderClassifier::new(Arc::clone(&provider))?);
        let skills = Arc::new(SkillCategoryClassifier::new(provider)?);
        Ok(Self::with_classifiers(headers, skills))
    }

    /// Create a parser from prebuilt classifiers.
    pub fn with_classifiers(
        headers: Arc<HeaderClassifier>,
        skills: Arc<SkillCategoryClassifier>,
    ) -> Self {
        let options = ParserOptions::default();
        Self {
            headers,
            skills: SkillsExtractor::new(skills),
            normalizer: TextNormalizer::new(options.normalize),
            limits: options.limits,
        }
    }

    /// Apply parser options.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.normalizer = TextNormalizer::new(options.normalize);
        self.limits = options.limits;
        self
    }

    /// Get the header classifier.
    pub fn header_classifier(&self) -> &Arc<HeaderClassifier> {
        &self.headers
    }

    /// Lines of `text` classified as section headers.
    pub fn detect_headers(&self, text: &str) -> Vec<DetectedHeader> {
        let normalized = self.normalizer.process(text);
        normalized
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(line, raw)| {
                let section = self.headers.classify_within(raw, self.limits)?;
                Some(DetectedHeader {
                    line,
                    text: raw.trim().to_string(),
                    section,
                })
            })
            .collect()
    }

    /// Split `text` into section bodies.
    ///
    /// Lines before the first header belong to no section. A section whose
    /// header appears more than once gets the bodies of every occurrence,
    /// in order.
    pub fn split_sections(&self, text: &str) -> BTreeMap<SectionType, String> {
        let normalized = self.normalizer.process(text);
        let mut bodies: BTreeMap<SectionType, Vec<&str>> = BTreeMap::new();
        let mut current: Option<SectionType> = None;

        for line in normalized.lines() {
            if let Some(section) = self.headers.classify_within(line, self.limits) {
                if bodies.contains_key(&section) {
                    log::debug!("Section {} repeated, concatenating content", section);
                }
                bodies.entry(section).or_default();
                current = Some(section);
                continue;
            }
            if let Some(section) = current {
                bodies.entry(section).or_default().push(line);
            }
        }

        bodies
            .into_iter()
            .map(|(section, lines)| (section, lines.join("\n").trim().to_string()))
            .collect()
    }

    /// Parse one resume text.
    pub fn parse(&self, text: &str) -> ParsedResume {
        let bodies = self.split_sections(text);
        let body = |section: SectionType| bodies.get(&section).map(String::as_str).unwrap_or("");

        let sections = bodies
            .iter()
            .map(|(section, content)| {
                let parsed = ParsedSection {
                    title: section.title().to_string(),
                    items: content_lines(content).into_iter().map(str::to_string).collect(),
                    content: content.clone(),
                };
                (*section, parsed)
            })
            .collect();

        let resume = ParsedResume {
            sections,
            professional_summary: extract_summary(body(SectionType::Summary)),
            experience: extract_experience(body(SectionType::Experience)),
            skills: self.skills.extract(body(SectionType::Skills)),
            projects: extract_projects(body(SectionType::Projects)),
            certifications: list_items(body(SectionType::Certifications)),
            achievements: list_items(body(SectionType::Achievements)),
            contact: harvest_text(text),
            raw_text: text.to_string(),
        };

        log::debug!(
            "Parsed {} sections: {} experience entries, {} skill categories, {} projects",
            resume.sections.len(),
            resume.experience.len(),
            resume.skills.len(),
            resume.projects.len()
        );
        resume
    }

    /// Parse independent texts in parallel.
    pub fn parse_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<ParsedResume> {
        texts.par_iter().map(|text| self.parse(text.as_ref())).collect()
    }
}

fn list_items(text: &str) -> Vec<String> {
    content_lines(text)
        .into_iter()
        .map(|line| strip_bullet(line).unwrap_or(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashedNgramEmbedder;

    fn parser() -> ResumeParser {
        ResumeParser::new(Arc::new(HashedNgramEmbedder::default())).unwrap()
    }

    const RESUME: &str = "Jane Doe\n\
        jane@example.com | +1 555 123 4567\n\
        \n\
        Professional Summary\n\
        Backend engineer focused on storage systems.\n\
        \n\
        Work Experience\n\
        Senior Engineer 2021 - 2023\n\
        Acme Corp, Remote\n\
        Led the storage team through a rewrite.\n\
        Cut p99 latency by half.\n\
        \n\
        Technical Skills\n\
        Programming Languages: Python, Java, Go\n\
        Databases: PostgreSQL, Redis\n\
        \n\
        Certifications\n\
        • AWS Solutions Architect\n\
        • CKA";

    #[test]
    fn test_parse_sections() {
        let resume = parser().parse(RESUME);

        assert_eq!(
            resume.sections.keys().copied().collect::<Vec<_>>(),
            vec![
                SectionType::Summary,
                SectionType::Experience,
                SectionType::Skills,
                SectionType::Certifications
            ]
        );
        let summary = resume.section(SectionType::Summary).unwrap();
        assert_eq!(summary.title, "Summary");
        assert_eq!(summary.items, vec!["Backend engineer focused on storage systems."]);
        assert_eq!(
            resume.professional_summary,
            "Backend engineer focused on storage systems."
        );
    }

    #[test]
    fn test_parse_entities() {
        let resume = parser().parse(RESUME);

        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company, "Acme Corp, Remote");
        assert_eq!(
            resume.skills.get("programming_languages").unwrap(),
            ["Python", "Java", "Go"]
        );
        assert_eq!(resume.skills.get("databases").unwrap(), ["PostgreSQL", "Redis"]);
        assert_eq!(resume.certifications, vec!["AWS Solutions Architect", "CKA"]);
        assert!(resume.contact.emails.contains("jane@example.com"));
        assert_eq!(resume.raw_text, RESUME);
    }

    #[test]
    fn test_repeated_headers_concatenate() {
        let text = "Summary\nFirst part.\nSkills\nRust: tokio\nSummary\nSecond part.";
        let resume = parser().parse(text);
        assert_eq!(resume.professional_summary, "First part. Second part.");
    }

    #[test]
    fn test_preamble_belongs_to_no_section() {
        let bodies = parser().split_sections("Jane Doe\nBerlin\nEducation\nBSc Physics");
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[&SectionType::Education], "BSc Physics");
    }

    #[test]
    fn test_empty_text() {
        let resume = parser().parse("");
        assert!(resume.sections.is_empty());
        assert!(resume.experience.is_empty());
        assert!(resume.skills.is_empty());
        assert_eq!(resume.professional_summary, "");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = parser();
        assert_eq!(parser.parse(RESUME), parser.parse(RESUME));
    }

    #[test]
    fn test_detect_headers() {
        let headers = parser().detect_headers(RESUME);
        let sections: Vec<SectionType> = headers.iter().map(|h| h.section).collect();
        assert_eq!(
            sections,
            vec![
                SectionType::Summary,
                SectionType::Experience,
                SectionType::Skills,
                SectionType::Certifications
            ]
        );
        assert_eq!(headers[0].line, 3);
        assert_eq!(headers[0].text, "Professional Summary");
    }

    #[test]
    fn test_parse_batch_matches_sequential() {
        let parser = parser();
        let texts = [RESUME, "Education\nBSc"];
        let batch = parser.parse_batch(&texts);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], parser.parse(RESUME));
        assert!(batch[1].sections.contains_key(&SectionType::Education));
    }
}
