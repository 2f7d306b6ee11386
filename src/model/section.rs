//! Resume section taxonomy.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resume content category.
///
/// Declaration order is the tie-break order used by the header classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// Professional summary / profile
    #[serde(alias = "professional_summary")]
    Summary,
    /// Work experience
    Experience,
    /// Skills
    Skills,
    /// Education
    Education,
    /// Projects
    Projects,
    /// Certifications
    Certifications,
    /// Achievements and awards
    Achievements,
}

impl SectionType {
    /// All section types in enumeration order.
    pub const ALL: [SectionType; 7] = [
        SectionType::Summary,
        SectionType::Experience,
        SectionType::Skills,
        SectionType::Education,
        SectionType::Projects,
        SectionType::Certifications,
        SectionType::Achievements,
    ];

    /// Snake-case key, as used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Skills => "skills",
            SectionType::Education => "education",
            SectionType::Projects => "projects",
            SectionType::Certifications => "certifications",
            SectionType::Achievements => "achievements",
        }
    }

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            SectionType::Summary => "Summary",
            SectionType::Experience => "Experience",
            SectionType::Skills => "Skills",
            SectionType::Education => "Education",
            SectionType::Projects => "Projects",
            SectionType::Certifications => "Certifications",
            SectionType::Achievements => "Achievements",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "summary" | "professional_summary" | "profile" => Ok(SectionType::Summary),
            "experience" | "work_experience" => Ok(SectionType::Experience),
            "skills" => Ok(SectionType::Skills),
            "education" => Ok(SectionType::Education),
            "projects" => Ok(SectionType::Projects),
            "certifications" => Ok(SectionType::Certifications),
            "achievements" => Ok(SectionType::Achievements),
            _ => Err(Error::UnknownSection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("professional_summary".parse::<SectionType>().unwrap(), SectionType::Summary);
        assert_eq!("Work Experience".parse::<SectionType>().unwrap(), SectionType::Experience);
        assert!(matches!(
            "hobbies".parse::<SectionType>(),
            Err(Error::UnknownSection(_))
        ));
    }

    #[test]
    fn test_serde_keys() {
        let json = serde_json::to_string(&SectionType::Certifications).unwrap();
        assert_eq!(json, "\"certifications\"");
        let parsed: SectionType = serde_json::from_str("\"professional_summary\"").unwrap();
        assert_eq!(parsed, SectionType::Summary);
    }

    #[test]
    fn test_order_matches_all() {
        let mut sorted = SectionType::ALL;
        sorted.sort();
        assert_eq!(sorted, SectionType::ALL);
    }
}
