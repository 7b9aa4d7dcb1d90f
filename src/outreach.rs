use crate::profile::ProfileRecord;
use crate::scoring::{Category, ScoreResult};

/// Build a one-paragraph outreach opener for a scored profile.
///
/// The template is chosen by the profile's category; name, headline and
/// location are filled in when present and left out gracefully otherwise.
pub fn conversation_starter(record: &ProfileRecord, result: &ScoreResult) -> String {
    let name = record.first_name().unwrap_or("there");
    let headline = record.headline.trim();
    let work = if headline.is_empty() {
        "your current work".to_string()
    } else {
        format!("\"{}\"", headline)
    };
    let location = record.location.display();
    let from = if location.is_empty() {
        String::new()
    } else {
        format!(" from {}", location)
    };

    match result.primary_category() {
        Some(Category::HealthAi) => format!(
            "Hi {}! I noticed you're building at the intersection of health and AI{}. \
             {} caught my attention, and I'd love to hear how you're applying AI to healthcare problems.",
            name, from, capitalize(&work)
        ),
        Some(Category::Health) => format!(
            "Hi {}! I saw you're working on healthcare{}. \
             {} is the kind of background we look for. Open to a quick chat about the healthtech space?",
            name, from, capitalize(&work)
        ),
        Some(Category::ConsumerAi) => format!(
            "Hi {}! Looks like you're bringing AI to consumer products{}. \
             {} stood out to me. Would love to compare notes on where consumer AI is heading.",
            name, from, capitalize(&work)
        ),
        Some(Category::ConsumerTech) => format!(
            "Hi {}! I saw you're building in consumer tech{}. \
             {} is impressive. Open to a quick chat about the opportunity you're chasing?",
            name, from, capitalize(&work)
        ),
        None => format!(
            "Hi {}! I came across {}{}. Would love to learn more about what you're building next!",
            name, work, from
        ),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
