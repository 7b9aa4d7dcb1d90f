use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::profile::ProfileRecord;

/// Which part of a profile a keyword rule searches.
///
/// Blob surfaces (`headline`, `experience`, `education`, `full`, `location`)
/// count each distinct keyword found once. Entry surfaces (`titles`,
/// `companies`, `schools`) count entries that contain any keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Name, headline, about, location and skills
    Headline,
    /// Titles, companies and descriptions of every experience entry
    Experience,
    /// School, degree and field of every education entry
    Education,
    /// Everything above combined
    #[default]
    Full,
    Location,
    Titles,
    Companies,
    Schools,
}

/// What produces a rule's hit count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Keyword matches on the rule's surface
    #[default]
    Keywords,
    /// Recent years appearing as text plus keyword matches
    RecentMention,
    /// Current roles that started in a recent year
    RecentStart,
    /// Roles that ended in a recent year
    RecentEnd,
    /// Roles that either started (current) or ended in a recent year
    RecentRole,
    /// One hit when the record has an email address
    Email,
    /// One hit when the follower count exceeds the rule's threshold
    Followers,
    /// Experience entries whose title matches `keywords` at a company
    /// matching `companies`
    RoleAt,
    /// Always one hit; combine with `requires`/`unless`
    Always,
}

impl Source {
    /// Whether rules with this source must carry keywords
    pub fn needs_keywords(self) -> bool {
        matches!(self, Source::Keywords | Source::RoleAt)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring containment; pad keywords with spaces (" ai ") to
    /// approximate word matching
    #[default]
    Substring,
    /// Keyword must be bounded by non-alphanumeric characters
    Word,
}

impl MatchMode {
    /// Check whether a normalised `keyword` occurs in normalised `haystack`
    pub fn contains(self, haystack: &str, keyword: &str) -> bool {
        if keyword.trim().is_empty() {
            return false;
        }
        match self {
            MatchMode::Substring => haystack.contains(keyword),
            MatchMode::Word => {
                let needle = keyword.trim();
                haystack.match_indices(needle).any(|(start, _)| {
                    let end = start + needle.len();
                    let before = haystack[..start].chars().next_back();
                    let after = haystack[end..].chars().next();
                    !before.is_some_and(char::is_alphanumeric)
                        && !after.is_some_and(char::is_alphanumeric)
                })
            }
        }
    }
}

/// Lowercase and collapse whitespace, padding the result with one space on
/// each side so that padded keywords match at the edges. Empty input stays
/// empty.
pub fn normalize_text<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let words: Vec<String> = parts
        .into_iter()
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        String::new()
    } else {
        format!(" {} ", words.join(" "))
    }
}

/// Lowercase a keyword and collapse inner whitespace, keeping a single
/// leading or trailing space where the keyword had one.
pub fn normalize_keyword(keyword: &str) -> String {
    let core = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
    if core.is_empty() {
        return String::new();
    }
    let lead = if keyword.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if keyword.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{}{}{}", lead, core.to_lowercase(), trail)
}

/// Pre-normalised searchable text for one profile.
///
/// Built once per record so every rule searches the same lowercased,
/// whitespace-collapsed strings.
#[derive(Debug, Clone, Default)]
pub struct ProfileText {
    pub headline: String,
    pub experience: String,
    pub education: String,
    pub full: String,
    pub location: String,
    pub titles: Vec<String>,
    pub companies: Vec<String>,
    pub schools: Vec<String>,
}

impl ProfileText {
    pub fn from_record(record: &ProfileRecord) -> Self {
        let loc = &record.location;
        let headline = normalize_text(
            [
                record.full_name.as_str(),
                record.headline.as_str(),
                record.about.as_str(),
                loc.full.as_str(),
                loc.city.as_str(),
                loc.country.as_str(),
            ]
            .into_iter()
            .chain(record.skills.iter().map(String::as_str)),
        );
        let experience = normalize_text(record.experiences.iter().flat_map(|exp| {
            [
                exp.title.as_str(),
                exp.company.as_str(),
                exp.description.as_str(),
            ]
        }));
        let education = normalize_text(record.education.iter().flat_map(|edu| {
            [
                edu.school.as_str(),
                edu.degree.as_deref().unwrap_or(""),
                edu.field.as_deref().unwrap_or(""),
            ]
        }));
        let full = normalize_text([headline.as_str(), experience.as_str(), education.as_str()]);

        Self {
            location: normalize_text([loc.full.as_str(), loc.city.as_str(), loc.country.as_str()]),
            titles: entry_texts(record.experiences.iter().map(|exp| exp.title.as_str())),
            companies: entry_texts(record.experiences.iter().map(|exp| exp.company.as_str())),
            schools: entry_texts(record.education.iter().map(|edu| edu.school.as_str())),
            headline,
            experience,
            education,
            full,
        }
    }

    /// Count hits for `keywords` on `surface`
    pub fn count(&self, surface: Surface, keywords: &[String], mode: MatchMode) -> u32 {
        let keywords = distinct_keywords(keywords);
        let found = match surface {
            Surface::Headline => count_in(&self.headline, &keywords, mode),
            Surface::Experience => count_in(&self.experience, &keywords, mode),
            Surface::Education => count_in(&self.education, &keywords, mode),
            Surface::Full => count_in(&self.full, &keywords, mode),
            Surface::Location => count_in(&self.location, &keywords, mode),
            Surface::Titles => count_entries(&self.titles, &keywords, mode),
            Surface::Companies => count_entries(&self.companies, &keywords, mode),
            Surface::Schools => count_entries(&self.schools, &keywords, mode),
        };
        u32::try_from(found).unwrap_or(u32::MAX)
    }
}

/// Whether any of `keywords` occurs in a single piece of text
pub fn matches_any(text: &str, keywords: &[String], mode: MatchMode) -> bool {
    let text = normalize_text([text]);
    keywords
        .iter()
        .any(|keyword| mode.contains(&text, &normalize_keyword(keyword)))
}

fn entry_texts<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<String> {
    entries
        .map(|entry| normalize_text([entry]))
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn distinct_keywords(keywords: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .map(|keyword| normalize_keyword(keyword))
        .filter(|keyword| !keyword.is_empty() && seen.insert(keyword.clone()))
        .collect()
}

fn count_in(blob: &str, keywords: &[String], mode: MatchMode) -> usize {
    keywords
        .iter()
        .filter(|keyword| mode.contains(blob, keyword))
        .count()
}

fn count_entries(entries: &[String], keywords: &[String], mode: MatchMode) -> usize {
    entries
        .iter()
        .filter(|entry| keywords.iter().any(|keyword| mode.contains(entry, keyword)))
        .count()
}
