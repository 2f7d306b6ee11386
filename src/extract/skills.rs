//! Skills extraction.

use super::{content_lines, push_unique, strip_bullet, tokenize_items};
use crate::classify::{ShapeLimits, SkillCategoryClassifier};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Skill category name to items, in order of first occurrence.
///
/// Items are deduplicated case-insensitively within a category; the casing
/// of the first occurrence is kept. Serializes as a JSON object whose key
/// order matches insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillMap {
    categories: Vec<(String, Vec<String>)>,
}

impl SkillMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items to a category, creating it if needed.
    pub fn extend<I>(&mut self, category: &str, items: I)
    where
        I: IntoIterator<Item = String>,
    {
        let index = match self.categories.iter().position(|(name, _)| name == category) {
            Some(index) => index,
            None => {
                self.categories.push((category.to_string(), Vec::new()));
                self.categories.len() - 1
            }
        };
        let existing = &mut self.categories[index].1;
        for item in items {
            push_unique(existing, item);
        }
    }

    /// Builder form of [`SkillMap::extend`].
    pub fn with<S: Into<String>>(mut self, category: &str, items: impl IntoIterator<Item = S>) -> Self {
        self.extend(category, items.into_iter().map(Into::into));
        self
    }

    /// Items of a category.
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, items)| items.as_slice())
    }

    /// Iterate over categories in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Category names in order.
    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Remove categories that ended up with no items.
    fn prune(&mut self) {
        self.categories.retain(|(_, items)| !items.is_empty());
    }
}

impl Serialize for SkillMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, items) in &self.categories {
            map.serialize_entry(name, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SkillMapVisitor;

        impl<'de> Visitor<'de> for SkillMapVisitor {
            type Value = SkillMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to lists of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SkillMap, A::Error> {
                let mut skills = SkillMap::new();
                while let Some((name, items)) = access.next_entry::<String, Vec<String>>()? {
                    skills.extend(&name, items);
                }
                Ok(skills)
            }
        }

        deserializer.deserialize_map(SkillMapVisitor)
    }
}

/// Two-layer skills extractor.
///
/// Layer 1 detects sub-category headers ("Databases", "Programming
/// Languages: ...") with a [`SkillCategoryClassifier`]. Layer 2 runs only when
/// layer 1 finds nothing and reads "Category: item, item" lines literally.
#[derive(Debug, Clone)]
pub struct SkillsExtractor {
    classifier: Arc<SkillCategoryClassifier>,
}

impl SkillsExtractor {
    /// Create an extractor around a skill-category classifier.
    pub fn new(classifier: Arc<SkillCategoryClassifier>) -> Self {
        Self { classifier }
    }

    /// Extract categorized skills from a skills section.
    pub fn extract(&self, text: &str) -> SkillMap {
        let lines = content_lines(text);
        if lines.is_empty() {
            return SkillMap::new();
        }

        let detected = self.by_category_headers(&lines);
        if !detected.is_empty() {
            return detected;
        }

        let literal = by_colon_lines(&lines);
        if literal.is_empty() {
            log::debug!("No skills recognised in {} lines", lines.len());
        }
        literal
    }

    fn by_category_headers(&self, lines: &[&str]) -> SkillMap {
        let mut skills = SkillMap::new();
        let mut current: Option<&'static str> = None;

        for line in lines {
            let line = strip_bullet(line).unwrap_or(line);
            let (candidate, inline) = match line.split_once(':') {
                Some((head, rest)) => (head, Some(rest)),
                None => (line, None),
            };

            if let Some(category) = self.classifier.classify_within(candidate, ShapeLimits::line()) {
                current = Some(category.as_str());
                skills.extend(category.as_str(), Vec::new());
                if let Some(rest) = inline {
                    skills.extend(category.as_str(), tokenize_items(rest));
                }
            } else if let Some(category) = current {
                skills.extend(category, tokenize_items(line));
            }
        }

        skills.prune();
        skills
    }
}

fn by_colon_lines(lines: &[&str]) -> SkillMap {
    let mut skills = SkillMap::new();
    for line in lines {
        let line = strip_bullet(line).unwrap_or(line);
        let Some((head, rest)) = line.split_once(':') else {
            continue;
        };
        let key = snake_case(head);
        let items = tokenize_items(rest);
        if !key.is_empty() && !items.is_empty() {
            skills.extend(&key, items);
        }
    }
    skills
}

/// Lower snake-case key for a free-form category name.
pub(crate) fn snake_case(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SkillCategoryClassifier;
    use crate::embedding::HashedNgramEmbedder;

    fn extractor() -> SkillsExtractor {
        let classifier =
            SkillCategoryClassifier::new(Arc::new(HashedNgramEmbedder::default())).unwrap();
        SkillsExtractor::new(Arc::new(classifier))
    }

    #[test]
    fn test_inline_categories() {
        let skills = extractor().extract(
            "Programming Languages: Python, Java, Go\nDatabases: PostgreSQL, Redis",
        );
        assert_eq!(
            skills,
            SkillMap::new()
                .with("programming_languages", ["Python", "Java", "Go"])
                .with("databases", ["PostgreSQL", "Redis"])
        );
        assert_eq!(
            serde_json::to_string(&skills).unwrap(),
            r#"{"programming_languages":["Python","Java","Go"],"databases":["PostgreSQL","Redis"]}"#
        );
    }

    #[test]
    fn test_category_headers_on_own_line() {
        let skills = extractor().extract("Databases\nPostgreSQL, Redis\n• MongoDB\nDevOps\nDocker | Git");
        assert_eq!(skills.get("databases").unwrap(), ["PostgreSQL", "Redis", "MongoDB"]);
        assert_eq!(skills.get("devops_tools").unwrap(), ["Docker", "Git"]);
    }

    #[test]
    fn test_case_insensitive_dedupe() {
        let skills = extractor().extract("Languages: Python, python, PYTHON, Go");
        assert_eq!(skills.get("programming_languages").unwrap(), ["Python", "Go"]);
    }

    #[test]
    fn test_colon_fallback() {
        let skills = extractor().extract("Soft Skills: Communication, Mentoring\nSpoken: English");
        assert_eq!(skills.categories(), vec!["soft_skills", "spoken"]);
        assert_eq!(skills.get("soft_skills").unwrap(), ["Communication", "Mentoring"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("Rust and Go and more").is_empty());
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let skills: SkillMap =
            serde_json::from_str(r#"{"zeta": ["a1"], "alpha": ["b1", "B1"]}"#).unwrap();
        assert_eq!(skills.categories(), vec!["zeta", "alpha"]);
        assert_eq!(skills.get("alpha").unwrap(), ["b1"]);
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("Soft Skills"), "soft_skills");
        assert_eq!(snake_case(" CI/CD  Tools "), "ci_cd_tools");
    }
}
