use crate::normalize::char_jaccard;
use crate::record::MatchKey;

/// Scores at or above this value put two records in the same cluster.
pub const DEFAULT_THRESHOLD: u32 = 60;

const NAME_EXACT: u32 = 40;
const NAME_CONTAINS: u32 = 30;
const NAME_CLOSE: u32 = 25;
const NAME_LOOSE: u32 = 15;
const PHONE_EXACT: u32 = 30;
const ADDRESS_EXACT: u32 = 20;
const ADDRESS_CLOSE: u32 = 10;
const CITY_EXACT: u32 = 10;

/// Per-field contributions to a similarity score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub name: u32,
    pub phone: u32,
    pub address: u32,
    pub city: u32,
}

impl ScoreBreakdown {
    /// Additive total. Not clamped: the weights top out at 100.
    pub fn total(&self) -> u32 {
        self.name + self.phone + self.address + self.city
    }
}

/// Composite similarity of two normalized records.
pub fn score(a: &MatchKey, b: &MatchKey) -> u32 {
    breakdown(a, b).total()
}

pub fn breakdown(a: &MatchKey, b: &MatchKey) -> ScoreBreakdown {
    ScoreBreakdown {
        name: name_score(&a.name, &b.name),
        phone: phone_score(&a.phone, &b.phone),
        address: address_score(&a.address, &b.address),
        city: city_score(&a.city, &b.city),
    }
}

fn name_score(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a == b {
        return NAME_EXACT;
    }
    if a.contains(b) || b.contains(a) {
        return NAME_CONTAINS;
    }
    let similarity = char_jaccard(a, b);
    if similarity > 0.8 {
        NAME_CLOSE
    } else if similarity > 0.6 {
        NAME_LOOSE
    } else {
        0
    }
}

fn phone_score(a: &str, b: &str) -> u32 {
    if !a.is_empty() && a == b {
        PHONE_EXACT
    } else {
        0
    }
}

fn address_score(a: &str, b: &str) -> u32 {
    if a.is_empty() || b.is_empty() {
        0
    } else if a == b {
        ADDRESS_EXACT
    } else if char_jaccard(a, b) > 0.7 {
        ADDRESS_CLOSE
    } else {
        0
    }
}

fn city_score(a: &str, b: &str) -> u32 {
    if !a.is_empty() && a == b {
        CITY_EXACT
    } else {
        0
    }
}
