//! Voice Accent Tables
//!
//! The Veo backend keeps voice characteristics stable across repeated
//! segments of the same campaign by seeding generation deterministically per
//! accent, and steers the voice away from the other primary accents with a
//! fixed negative prompt.

/// Seed used for unknown accents (the "american" entry)
const DEFAULT_SEED: u32 = 12345;

/// Fixed accent → generation seed table
const ACCENT_SEEDS: [(&str, u32); 10] = [
    ("american", 12345),
    ("british", 23456),
    ("australian", 34567),
    ("indian", 45678),
    ("south-african", 56789),
    ("american-female", 67890),
    ("british-female", 78901),
    ("australian-female", 89012),
    ("indian-female", 90123),
    ("south-african-female", 91234),
];

/// Primary accent → the four accents its negative prompt excludes
const ACCENT_EXCLUSIONS: [(&str, [&str; 4]); 5] = [
    ("american", ["british", "australian", "indian", "south-african"]),
    ("british", ["american", "australian", "indian", "south-african"]),
    ("australian", ["american", "british", "indian", "south-african"]),
    ("indian", ["american", "british", "australian", "south-african"]),
    ("south-african", ["american", "british", "australian", "indian"]),
];

/// Returns the deterministic generation seed for an accent.
///
/// Unknown accents fall back to the default accent's seed so repeated
/// segments of one campaign stay consistent even when a caller mistypes the
/// accent key.
pub fn seed_for(accent: &str) -> u32 {
    ACCENT_SEEDS
        .iter()
        .find(|(key, _)| *key == accent)
        .map(|(_, seed)| *seed)
        .unwrap_or(DEFAULT_SEED)
}

/// Returns the negative-prompt clause for an accent.
///
/// Only the five primary accents steer away from their peers; female
/// variants and unmapped accents return an empty clause.
pub fn negative_prompt_for(accent: &str) -> String {
    ACCENT_EXCLUSIONS
        .iter()
        .find(|(key, _)| *key == accent)
        .map(|(_, excluded)| {
            excluded
                .iter()
                .map(|name| format!("{} accent", name))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
