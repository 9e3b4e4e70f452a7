//! Hull designator classification

use std::sync::LazyLock;

use regex::Regex;

/// Class reported when a designator prefix is not recognised
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Designator prefix to vessel class
pub const HULL_CLASSES: &[(&str, &str)] = &[
    ("CVN", "Aircraft Carrier"),
    ("LHA", "Amphibious Assault Ship"),
    ("LHD", "Amphibious Assault Ship"),
    ("LPD", "Amphibious Transport Dock"),
    ("LSD", "Dock Landing Ship"),
    ("CG", "Cruiser"),
    ("DDG", "Destroyer"),
    ("LCS", "Littoral Combat Ship"),
    ("SSN", "Submarine"),
    ("SSBN", "Submarine"),
    ("SSGN", "Submarine"),
    ("ESB", "Expeditionary Sea Base"),
    ("LCC", "Command Ship"),
    ("T-AO", "Replenishment Oiler"),
    ("R", "Aircraft Carrier"),
    ("DDH", "Helicopter Destroyer"),
];

// Letter segments may be hyphen-joined, as in `T-AO-189`
static HULL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+(?:-[A-Z]+)*").unwrap());

fn lookup(prefix: &str) -> Option<&'static str> {
    HULL_CLASSES
        .iter()
        .find(|(key, _)| *key == prefix)
        .map(|(_, class)| *class)
}

/// Map a hull designator to its vessel class.
///
/// The leading uppercase run is looked up first; if that is a hyphenated
/// run with no entry, its first segment is tried. Anything else is
/// [`UNKNOWN_CLASS`].
pub fn classify(hull: &str) -> &'static str {
    let Some(found) = HULL_PREFIX.find(hull) else {
        return UNKNOWN_CLASS;
    };
    let prefix = found.as_str();

    lookup(prefix)
        .or_else(|| prefix.split('-').next().and_then(lookup))
        .unwrap_or(UNKNOWN_CLASS)
}
