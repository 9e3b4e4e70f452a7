//! Vessel mention extraction from free text

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ShipMention;

/// Captured status text must be longer than this to count as a mention
pub const MIN_STATUS_LEN: usize = 10;

/// A bullet character that went through a UTF-8/Windows-1252 round trip
const MANGLED_BULLET: &str = "â€¢";

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(USS|HMS|JS|FS|HMAS)\s+([\w\s'-]+?)\s+\(([\w\s-]+)\)").unwrap()
});

/// Scan a paragraph for ship mentions.
///
/// Each mention's status is the rest of the paragraph after the match, so a
/// paragraph that names several ships yields overlapping status texts.
pub fn mentions(text: &str) -> impl Iterator<Item = ShipMention> + '_ {
    MENTION.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let raw_status = text[whole.end()..]
            .trim()
            .replace(MANGLED_BULLET, "")
            .trim()
            .to_string();

        if raw_status.chars().count() <= MIN_STATUS_LEN {
            return None;
        }

        Some(ShipMention {
            name_prefix: caps[1].to_string(),
            name: caps[2].trim().to_string(),
            hull: caps[3].trim().to_string(),
            raw_status,
        })
    })
}
