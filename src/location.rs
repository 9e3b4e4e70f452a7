//! Geocoding query construction from status sentences

use std::sync::LazyLock;

use regex::Regex;

// At one position the first listed alternative wins, so longer phrases that
// share a start with a shorter keyword are listed before it: `off the coast
// of X` yields `X`.
static LOCATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(off the coast of|arrived in|underway in|operating in|in|at|near|off|transiting)\s+(?:the\s)?(.+?)(?:\.|$|, according)",
    )
    .unwrap()
});

// Only consulted when no other keyword occurs, so `Patrolling off X` still
// resolves through `off`.
static PATROLLING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(patrolling)\s+(?:the\s)?(.+?)(?:\.|$|, according)").unwrap()
});

const PORT_KEYWORDS: &[&str] = &["in", "at", "arrived in"];
const OCEAN_WORDS: &[&str] = &["sea", "ocean", "gulf"];

/// Geocoding queries derived from one status sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    /// Matched locative keyword, lowercased
    pub keyword: String,
    /// Place phrase following the keyword, trimmed
    pub location: String,
    /// Query to send first
    pub primary: String,
}

impl LocationQuery {
    /// Query to try when the primary one finds nothing.
    ///
    /// Only port queries have one: the bare place name.
    pub fn fallback(&self) -> Option<&str> {
        if self.is_port_query() {
            Some(&self.location)
        } else {
            None
        }
    }

    pub fn is_port_query(&self) -> bool {
        self.primary != self.location
    }
}

fn is_ocean_body(location: &str) -> bool {
    let lower = location.to_lowercase();
    OCEAN_WORDS.iter().any(|word| lower.contains(word))
}

/// Build the geocoding query for a normalized status.
///
/// Returns `None` when no locative keyword is present.
pub fn build_query(status: &str) -> Option<LocationQuery> {
    let caps = LOCATIVE
        .captures(status)
        .or_else(|| PATROLLING.captures(status))?;
    let keyword = caps[1].to_lowercase();
    let location = caps[2].trim().to_string();

    let port = PORT_KEYWORDS.contains(&keyword.as_str());
    let primary = if port && !is_ocean_body(&location) {
        format!("Port of {}", location)
    } else {
        location.clone()
    };

    Some(LocationQuery {
        keyword,
        location,
        primary,
    })
}
