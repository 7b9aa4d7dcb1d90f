use serde::{Deserialize, Serialize};

/// A single profile as supplied by the fetcher, normalised into a fixed shape.
///
/// Every field has a neutral default so that scoring never has to deal with
/// missing data. Records are built once and never mutated by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub full_name: String,
    pub url: String,
    pub headline: String,
    pub about: String,
    pub location: Location,
    pub email: Option<String>,
    pub follower_count: u64,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub full: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub description: String,
    pub is_current: bool,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub year: Option<i32>,
}

impl Location {
    /// Best human-readable form: the full string, else "city, country".
    pub fn display(&self) -> String {
        if !self.full.trim().is_empty() {
            return self.full.trim().to_string();
        }
        [self.city.trim(), self.country.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ProfileRecord {
    /// Stable identifier used for deduplication and for joining results back
    /// to records: the lower-cased profile URL, else the lower-cased name.
    pub fn key(&self) -> String {
        let url = self.url.trim().trim_end_matches('/').to_lowercase();
        if !url.is_empty() {
            return url;
        }
        self.full_name.trim().to_lowercase()
    }

    /// Display name, falling back to the URL for anonymous records
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() {
            self.url.trim()
        } else {
            name
        }
    }

    /// First word of the full name, if any
    pub fn first_name(&self) -> Option<&str> {
        self.full_name.split_whitespace().next()
    }

    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}
