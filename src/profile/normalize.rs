use serde_json::{Map, Value};

use super::types::{Education, Experience, Location, ProfileRecord};

const PROFILE_URL_BASE: &str = "https://www.linkedin.com/in/";

const URL_KEYS: &[&str] = &[
    "profileUrl",
    "profile_url",
    "linkedin_url",
    "linkedinUrl",
    "url",
    "public_identifier",
    "publicIdentifier",
];
const NAME_KEYS: &[&str] = &["fullname", "fullName", "full_name", "name"];
const HEADLINE_KEYS: &[&str] = &["headline", "title", "occupation"];
const ABOUT_KEYS: &[&str] = &["about", "summary", "description"];
const EMAIL_KEYS: &[&str] = &["email", "emailAddress", "email_address"];
const FOLLOWER_KEYS: &[&str] = &["follower_count", "followerCount", "followers", "followersCount"];
const EXPERIENCE_KEYS: &[&str] = &["experience", "experiences", "positions"];
const EDUCATION_KEYS: &[&str] = &["education", "educations", "schools"];

impl ProfileRecord {
    /// Build a record from one raw fetcher item.
    ///
    /// Accepts the nested apimaestro shape (`basic_info` plus `experience`
    /// sections) and the flat shape used by most other actors. Never fails:
    /// anything unrecognisable is treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };
        let basic = root
            .get("basic_info")
            .and_then(Value::as_object)
            .unwrap_or(root);
        let maps = [basic, root];

        Self {
            full_name: first_text(&maps, NAME_KEYS),
            url: profile_url(&first_text(&maps, URL_KEYS)),
            headline: first_text(&maps, HEADLINE_KEYS),
            about: first_text(&maps, ABOUT_KEYS),
            location: location_of(&maps),
            email: optional_text(&maps, EMAIL_KEYS),
            follower_count: first_value(&maps, FOLLOWER_KEYS)
                .and_then(coerce_count)
                .unwrap_or(0),
            experiences: entries(&maps, EXPERIENCE_KEYS)
                .map(experience_of)
                .collect(),
            education: entries(&maps, EDUCATION_KEYS).map(education_of).collect(),
            skills: skills_of(&maps),
        }
    }
}

/// Expand a bare public identifier into a full profile URL
pub fn profile_url(identifier: &str) -> String {
    let identifier = identifier.trim();
    if identifier.is_empty() || identifier.starts_with("http") {
        identifier.to_string()
    } else {
        format!("{}{}", PROFILE_URL_BASE, identifier.trim_start_matches('/'))
    }
}

fn experience_of(entry: &Map<String, Value>) -> Experience {
    let maps = [entry];
    Experience {
        title: first_text(&maps, &["title", "position", "role"]),
        company: company_of(entry),
        description: first_text(&maps, &["description", "summary"]),
        is_current: first_value(&maps, &["is_current", "isCurrent", "current"])
            .is_some_and(coerce_flag),
        start_year: first_value(
            &maps,
            &["start_date", "startDate", "starts_at", "startYear", "start_year"],
        )
        .and_then(coerce_year),
        end_year: first_value(
            &maps,
            &["end_date", "endDate", "ends_at", "endYear", "end_year"],
        )
        .and_then(coerce_year),
    }
}

fn company_of(entry: &Map<String, Value>) -> String {
    // Some actors nest the employer as {"company": {"name": ...}}
    if let Some(company) = entry.get("company").and_then(Value::as_object) {
        return first_text(&[company], &["name", "companyName"]);
    }
    first_text(&[entry], &["company", "companyName", "company_name"])
}

fn education_of(entry: &Map<String, Value>) -> Education {
    let maps = [entry];
    Education {
        school: first_text(&maps, &["school", "schoolName", "school_name", "institution"]),
        degree: optional_text(&maps, &["degree", "degreeName", "degree_name"]),
        field: optional_text(&maps, &["field", "field_of_study", "fieldOfStudy"]),
        year: first_value(&maps, &["end_date", "endDate", "endYear", "year"])
            .and_then(coerce_year),
    }
}

fn location_of(maps: &[&Map<String, Value>]) -> Location {
    match first_value(maps, &["location", "locationName", "geo"]) {
        Some(Value::Object(loc)) => {
            let parts = [loc];
            Location {
                city: first_text(&parts, &["city"]),
                country: first_text(&parts, &["country", "countryName"]),
                full: first_text(&parts, &["full", "default", "name"]),
            }
        }
        Some(other) => Location {
            full: coerce_text(other).unwrap_or_default(),
            ..Location::default()
        },
        None => Location {
            city: first_text(maps, &["city"]),
            country: first_text(maps, &["country"]),
            full: String::new(),
        },
    }
}

fn skills_of(maps: &[&Map<String, Value>]) -> Vec<String> {
    let Some(Value::Array(items)) = first_value(maps, &["skills"]) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(skill) => Some(first_text(&[skill], &["name", "title"])),
            other => coerce_text(other),
        })
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn entries<'a>(
    maps: &[&'a Map<String, Value>],
    keys: &[&str],
) -> impl Iterator<Item = &'a Map<String, Value>> {
    let items: &'a [Value] = match first_value(maps, keys) {
        Some(Value::Array(items)) => items,
        _ => &[],
    };
    items.iter().filter_map(Value::as_object)
}

/// First non-null value found under any of `keys`, searching maps in order
fn first_value<'a>(maps: &[&'a Map<String, Value>], keys: &[&str]) -> Option<&'a Value> {
    maps.iter()
        .copied()
        .flat_map(|map| keys.iter().filter_map(move |key| map.get(*key)))
        .find(|value| !value.is_null())
}

/// First non-empty text found under any of `keys`
fn first_text(maps: &[&Map<String, Value>], keys: &[&str]) -> String {
    maps.iter()
        .flat_map(|map| keys.iter().filter_map(move |key| map.get(*key)))
        .filter_map(coerce_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn optional_text(maps: &[&Map<String, Value>], keys: &[&str]) -> Option<String> {
    let text = first_text(maps, keys);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(date) => date.get("year").and_then(coerce_year),
        _ => None,
    }
}

fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}
