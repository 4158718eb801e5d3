//! Team-name canonicalization for duplicate detection.
//!
//! The output is a comparison key only; display strings are never
//! rewritten here.

/// Tokens that carry no information about which club is playing: legal
/// affixes and words shared by half the clubs in a league.
const NOISE_TOKENS: &[&str] = &[
    "fc", "cf", "cd", "ac", "sc", "afc", "cfc", "club", "united", "utd", "city",
];

/// Produces the canonical comparison key for a free-text team or matchup
/// name: ASCII-lowercased, noise tokens removed, everything that is not
/// alphanumeric dropped. Pure and deterministic.
pub fn comparison_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| !NOISE_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .concat()
}
