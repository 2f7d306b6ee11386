//! Curated reference vocabularies.
//!
//! Every phrase fits within `ShapeLimits::line()` and no phrase appears under
//! two keys, so each phrase classifies to its own key.

use super::Taxonomy;
use crate::model::SectionType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Similarity threshold for top-level section headers.
pub const SECTION_THRESHOLD: f32 = 0.6;

/// Similarity threshold for skill sub-category headers.
pub const SKILL_CATEGORY_THRESHOLD: f32 = 0.65;

const SUMMARY: &[&str] = &[
    "Summary",
    "Professional Summary",
    "Executive Summary",
    "Profile",
    "Professional Profile",
    "Career Summary",
    "Overview",
    "Professional Overview",
    "About Me",
    "Summary of Qualifications",
    "Career Objective",
    "Objective",
    "Professional Statement",
    "Career Profile",
    "Introduction",
    "Background",
    "Personal Statement",
    "About",
    "Bio",
];

const EXPERIENCE: &[&str] = &[
    "Experience",
    "Work Experience",
    "Professional Experience",
    "Employment History",
    "Career History",
    "Work History",
    "Employment",
    "Career Experience",
    "Previous Positions",
    "Job Experience",
    "Positions Held",
    "Professional History",
    "Employment Record",
    "Job History",
    "Professional Work Experience",
];

const SKILLS: &[&str] = &[
    "Skills",
    "Technical Skills",
    "Core Competencies",
    "Competencies",
    "Expertise",
    "Technical Expertise",
    "Core Skills",
    "Key Skills",
    "Areas of Expertise",
    "Skill Set",
];

const EDUCATION: &[&str] = &[
    "Education",
    "Academic Background",
    "Qualifications",
    "Academic Qualifications",
    "Educational Background",
    "Academic History",
    "Education and Training",
    "Academics",
];

const PROJECTS: &[&str] = &[
    "Projects",
    "Key Projects",
    "Notable Projects",
    "Personal Projects",
    "Academic Projects",
    "Professional Projects",
    "Project Experience",
    "Selected Projects",
    "Portfolio",
    "Project Portfolio",
    "Major Projects",
    "Project Work",
    "Technical Projects",
    "Side Projects",
    "Open Source Projects",
    "Research Projects",
];

const CERTIFICATIONS: &[&str] = &[
    "Certifications",
    "Certificates",
    "Professional Certifications",
    "Credentials",
    "Licenses and Certifications",
];

const ACHIEVEMENTS: &[&str] = &[
    "Achievements",
    "Accomplishments",
    "Awards",
    "Honors",
    "Recognition",
    "Notable Achievements",
    "Honors and Awards",
];

impl Taxonomy for SectionType {
    const THRESHOLD: f32 = SECTION_THRESHOLD;

    fn variants() -> &'static [Self] {
        &SectionType::ALL
    }

    fn vocabulary(&self) -> &'static [&'static str] {
        match self {
            SectionType::Summary => SUMMARY,
            SectionType::Experience => EXPERIENCE,
            SectionType::Skills => SKILLS,
            SectionType::Education => EDUCATION,
            SectionType::Projects => PROJECTS,
            SectionType::Certifications => CERTIFICATIONS,
            SectionType::Achievements => ACHIEVEMENTS,
        }
    }

    fn key(&self) -> &'static str {
        self.as_str()
    }
}

/// Sub-category of a skills section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    /// Programming languages
    ProgrammingLanguages,
    /// Frontend and web technologies
    WebTechnologies,
    /// Backend frameworks
    BackendFrameworks,
    /// Databases and storage
    Databases,
    /// Cloud platforms and infrastructure
    CloudPlatforms,
    /// DevOps, CI/CD and version control
    DevopsTools,
    /// IDEs and developer tooling
    DevelopmentTools,
    /// Data science and machine learning
    DataScience,
    /// Mobile development
    MobileDevelopment,
}

impl SkillCategory {
    /// All categories in enumeration order.
    pub const ALL: [SkillCategory; 9] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::WebTechnologies,
        SkillCategory::BackendFrameworks,
        SkillCategory::Databases,
        SkillCategory::CloudPlatforms,
        SkillCategory::DevopsTools,
        SkillCategory::DevelopmentTools,
        SkillCategory::DataScience,
        SkillCategory::MobileDevelopment,
    ];

    /// Snake-case key used in skill maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "programming_languages",
            SkillCategory::WebTechnologies => "web_technologies",
            SkillCategory::BackendFrameworks => "backend_frameworks",
            SkillCategory::Databases => "databases",
            SkillCategory::CloudPlatforms => "cloud_platforms",
            SkillCategory::DevopsTools => "devops_tools",
            SkillCategory::DevelopmentTools => "development_tools",
            SkillCategory::DataScience => "data_science",
            SkillCategory::MobileDevelopment => "mobile_development",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Taxonomy for SkillCategory {
    const THRESHOLD: f32 = SKILL_CATEGORY_THRESHOLD;

    fn variants() -> &'static [Self] {
        &SkillCategory::ALL
    }

    fn vocabulary(&self) -> &'static [&'static str] {
        match self {
            SkillCategory::ProgrammingLanguages => &[
                "Programming Languages",
                "Programming Language",
                "Languages",
                "Coding Languages",
            ],
            SkillCategory::WebTechnologies => &[
                "Web Technologies",
                "Frontend",
                "Front-End",
                "Web Development",
                "Web Tech",
            ],
            SkillCategory::BackendFrameworks => &[
                "Backend",
                "Back-End",
                "Frameworks",
                "Backend Frameworks",
                "Server Side",
            ],
            SkillCategory::Databases => &["Databases", "Database", "Data Storage", "DB"],
            SkillCategory::CloudPlatforms => {
                &["Cloud", "Cloud Platforms", "Platforms", "Infrastructure"]
            }
            SkillCategory::DevopsTools => &[
                "DevOps",
                "DevOps Tools",
                "Version Control",
                "CI/CD",
                "Tools",
            ],
            SkillCategory::DevelopmentTools => {
                &["Development Tools", "Developer Tools", "IDEs"]
            }
            SkillCategory::DataScience => &["Data Science", "Machine Learning", "AI/ML"],
            SkillCategory::MobileDevelopment => &["Mobile Development", "Mobile"],
        }
    }

    fn key(&self) -> &'static str {
        self.as_str()
    }
}
