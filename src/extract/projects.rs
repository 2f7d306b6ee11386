//! Project extraction.
//!
//! Project names are found by an ordered list of line rules; the first rule
//! that returns a verdict decides.

use super::{
    content_lines, contains_year, is_major_header, push_unique, starts_with_action,
    tokenize_items, url_regex, ACTION_VERBS, EXTENDED_ACTION_VERBS,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    /// Project name
    pub name: String,
    /// Description lines joined with single spaces
    pub description: String,
    /// Items of a "Technologies:" / "Tech Stack:" line
    pub technologies: Vec<String>,
    /// Year range found on the name line
    pub duration: String,
    /// Value of a "Role:" line
    pub role: String,
    /// URLs found in the project's lines
    pub links: Vec<String>,
}

const PROJECT_KEYWORDS: &[&str] = &[
    "chat application",
    "sentiment analysis",
    "e-commerce",
    "platform",
    "website",
    "api",
    "tool",
    "system",
    "application",
    "project",
    "app",
    "engine",
    "library",
    "bot",
];

const NON_PROJECT_WORDS: &[&str] = &[
    "skills",
    "programming languages",
    "web technologies",
    "devops tools",
    "databases",
    "development tools",
    "version control",
    "education",
    "work experience",
    "technologies:",
];

const TECHNOLOGY_PREFIXES: &[&str] = &["technologies:", "technologies used:", "tech stack:", "stack:"];

const ROLE_PREFIX: &str = "role:";

const MIN_NAME_CHARS: usize = 10;
const MAX_NAME_CHARS: usize = 80;

fn corporate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:Ltd|Inc|Corp|LLC|GmbH|Pvt|Limited)\b").expect("valid regex"))
}

fn year_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\(?\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?(?:19|20)\d{2}(?:\s*(?:[-–—]|to)\s*(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?(?:(?:19|20)\d{2}|present|current|now))?\)?",
        )
        .expect("valid regex")
    })
}

fn link_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z][a-z ]{0,20}:\s*)?https?://\S+$").expect("valid regex")
    })
}

/// Outcome of a name rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Name,
    NotName,
}

/// Rules deciding whether a line names a project, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameRule {
    /// Section vocabulary ("Skills", "Education", ...) is never a name
    NonProjectWord,
    /// Company lines are never names
    Corporate,
    /// Description lines open with an action verb
    ActionVerb,
    /// Names have a plausible title length
    LengthBand,
    /// A project-domain keyword makes a name
    ProjectKeyword,
    /// So does being followed by an action-verb line
    FollowedByAction,
}

const NAME_RULES: [NameRule; 6] = [
    NameRule::NonProjectWord,
    NameRule::Corporate,
    NameRule::ActionVerb,
    NameRule::LengthBand,
    NameRule::ProjectKeyword,
    NameRule::FollowedByAction,
];

impl NameRule {
    fn evaluate(&self, line: &str, next: Option<&str>) -> Option<Verdict> {
        let lower = line.to_lowercase();
        match self {
            NameRule::NonProjectWord => NON_PROJECT_WORDS
                .iter()
                .any(|w| lower.contains(w))
                .then_some(Verdict::NotName),
            NameRule::Corporate => corporate_regex().is_match(line).then_some(Verdict::NotName),
            NameRule::ActionVerb => {
                starts_with_action(line, EXTENDED_ACTION_VERBS).then_some(Verdict::NotName)
            }
            NameRule::LengthBand => {
                let len = line.chars().count();
                (!(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len)).then_some(Verdict::NotName)
            }
            NameRule::ProjectKeyword => PROJECT_KEYWORDS
                .iter()
                .any(|k| contains_word(&lower, k))
                .then_some(Verdict::Name),
            NameRule::FollowedByAction => next
                .is_some_and(|n| starts_with_action(n, ACTION_VERBS))
                .then_some(Verdict::Name),
        }
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn apply_rules(rules: &[NameRule], line: &str, next: Option<&str>) -> bool {
    rules
        .iter()
        .find_map(|rule| rule.evaluate(line, next))
        == Some(Verdict::Name)
}

fn strip_prefix_ci<'a>(line: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    let lower = line.to_lowercase();
    prefixes
        .iter()
        .find(|p| lower.starts_with(*p))
        .and_then(|p| line.get(p.len()..))
        .map(str::trim)
}

/// Labelled lines ("Role:", "Tech Stack:") and bare links belong to the
/// current project even when an action line follows them.
fn starts_next_project(line: &str, next: Option<&str>) -> bool {
    let labelled = strip_prefix_ci(line, TECHNOLOGY_PREFIXES).is_some()
        || strip_prefix_ci(line, &[ROLE_PREFIX]).is_some()
        || link_only_regex().is_match(line);
    !labelled && apply_rules(&NAME_RULES, line, next)
}

/// Split a year range off a name line.
fn split_name_duration(line: &str) -> (String, String) {
    let Some(m) = year_range_regex()
        .find_iter(line)
        .find(|m| contains_year(m.as_str()))
    else {
        return (line.to_string(), String::new());
    };

    let duration = m
        .as_str()
        .trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
        .to_string();
    let name = format!("{} {}", &line[..m.start()], &line[m.end()..]);
    let name = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | ',' | '-' | '–' | '—'))
        .to_string();

    if name.is_empty() {
        (line.to_string(), String::new())
    } else {
        (name, duration)
    }
}

/// Extract projects from a projects section.
pub fn extract_projects(text: &str) -> Vec<ProjectEntry> {
    let lines = content_lines(text);
    let mut projects = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !apply_rules(&NAME_RULES, lines[i], lines.get(i + 1).copied()) {
            i += 1;
            continue;
        }

        let mut project = ProjectEntry::default();
        (project.name, project.duration) = split_name_duration(lines[i]);
        i += 1;

        let mut description = Vec::new();
        while i < lines.len() {
            let line = lines[i];
            if is_major_header(line) || starts_next_project(line, lines.get(i + 1).copied()) {
                break;
            }
            i += 1;

            for url in url_regex().find_iter(line) {
                let url = url.as_str().trim_end_matches(['.', ','].as_slice()).to_string();
                if !project.links.contains(&url) {
                    project.links.push(url);
                }
            }

            if let Some(items) = strip_prefix_ci(line, TECHNOLOGY_PREFIXES) {
                for item in tokenize_items(items) {
                    push_unique(&mut project.technologies, item);
                }
            } else if let Some(role) = strip_prefix_ci(line, &[ROLE_PREFIX]) {
                project.role = role.to_string();
            } else if !link_only_regex().is_match(line) {
                description.push(line);
            }
        }

        if description.is_empty() {
            log::debug!("Dropping project {:?} with no description", project.name);
            continue;
        }
        project.description = description.join(" ");
        projects.push(project);
    }

    if projects.is_empty() && !lines.is_empty() {
        log::debug!("No projects recognised in {} lines", lines.len());
    }
    projects
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_project() {
        let text = "Realtime Chat Application (2022 - 2023)\n\
                    Built a websocket server handling 10k concurrent users.\n\
                    Tech Stack: Rust, Tokio, Redis\n\
                    Role: Lead developer\n\
                    GitHub: https://github.com/jane/chat";
        let projects = extract_projects(text);

        assert_eq!(projects.len(), 1);
        let project = &projects[0];
        assert_eq!(project.name, "Realtime Chat Application");
        assert_eq!(project.duration, "2022 - 2023");
        assert_eq!(
            project.description,
            "Built a websocket server handling 10k concurrent users."
        );
        assert_eq!(project.technologies, vec!["Rust", "Tokio", "Redis"]);
        assert_eq!(project.role, "Lead developer");
        assert_eq!(project.links, vec!["https://github.com/jane/chat"]);
    }

    #[test]
    fn test_name_followed_by_action_line() {
        let text = "Moonlight Recipe Finder\n\
                    Developed a search over 40k recipes.\n\
                    Weather Dashboard Platform\n\
                    Designed charts for hourly forecasts.";
        let projects = extract_projects(text);

        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Moonlight Recipe Finder", "Weather Dashboard Platform"]);
        assert_eq!(projects[1].description, "Designed charts for hourly forecasts.");
    }

    #[test]
    fn test_skips_non_project_lines() {
        let text = "Acme Corp Ltd internal tooling system\n\
                    Technical Skills overview platform\n\
                    Developed something";
        assert!(extract_projects(text).is_empty());
    }

    #[test]
    fn test_project_without_description_dropped() {
        let text = "Inventory Management System\nEDUCATION\nBSc";
        assert!(extract_projects(text).is_empty());
    }

    #[test]
    fn test_unkeyworded_name_ends_previous_project() {
        let text = "Realtime Chat Application\n\
                    Built a websocket server.\n\
                    Moonlight Recipe Finder\n\
                    Developed a search over 40k recipes.";
        let projects = extract_projects(text);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].description, "Built a websocket server.");
        assert_eq!(projects[1].name, "Moonlight Recipe Finder");
        assert_eq!(projects[1].description, "Developed a search over 40k recipes.");
    }

    #[test]
    fn test_labelled_line_before_action_stays_in_project() {
        let text = "Realtime Chat Application\n\
                    Tech Stack: Rust, Tokio\n\
                    Built a websocket server.";
        let projects = extract_projects(text);

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].technologies, vec!["Rust", "Tokio"]);
        assert_eq!(projects[0].description, "Built a websocket server.");
    }

    #[test]
    fn test_rule_order() {
        assert!(!apply_rules(&NAME_RULES, "Built an API gateway", None));
        assert!(!apply_rules(&NAME_RULES, "API", None));
        assert!(apply_rules(&NAME_RULES, "Payment API gateway", None));
        assert!(!apply_rules(&NAME_RULES, "Rapid prototyping lab", None));
    }
}
