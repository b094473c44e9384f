//! Tiered string similarity between a typed query and stored queries.
//!
//! Used to suggest previously cached queries. Cache lookups themselves are
//! exact-match only and never consult this module.

use serde::Serialize;

/// How closely a candidate matches an input, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Equal ignoring case.
    Exact,
    /// One is a prefix of the other.
    Prefix,
    /// One contains the other.
    Substring,
    Unrelated,
}

impl MatchTier {
    /// Numeric score, `0` (exact) to `3` (unrelated).
    pub fn score(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Prefix => 1,
            Self::Substring => 2,
            Self::Unrelated => 3,
        }
    }
}

/// Classify `candidate` against `input`, ignoring case.
pub fn match_tier(input: &str, candidate: &str) -> MatchTier {
    let i = input.to_lowercase();
    let c = candidate.to_lowercase();

    if c == i {
        MatchTier::Exact
    } else if c.starts_with(&i) || i.starts_with(&c) {
        MatchTier::Prefix
    } else if c.contains(&i) || i.contains(&c) {
        MatchTier::Substring
    } else {
        MatchTier::Unrelated
    }
}
