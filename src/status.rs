//! Status sentence normalization

use std::sync::LazyLock;

use regex::Regex;

static ATTRIBUTIONS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i),\s*according to ship spotters\.?$").unwrap(),
        Regex::new(r"(?i),\s*according to local media reports\.?$").unwrap(),
    ]
});

/// Strip one trailing attribution clause, if any
fn strip_attribution(text: &str) -> Option<&str> {
    ATTRIBUTIONS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| text[..m.start()].trim())
}

/// Canonicalize a captured status sentence.
///
/// Trailing attribution clauses are removed, a full stop is appended when
/// the text has no terminal punctuation and the first letter is uppercased.
/// Empty input stays empty. Applying this twice gives the same result.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.trim();
    while let Some(stripped) = strip_attribution(text) {
        text = stripped;
    }

    if text.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(text.len() + 1);
    let mut chars = text.chars();
    if let Some(first) = chars.next() {
        result.extend(first.to_uppercase());
    }
    result.push_str(chars.as_str());

    if !result.ends_with(['.', '!', '?']) {
        result.push('.');
    }
    result
}
