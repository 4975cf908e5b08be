// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Genre heuristics scoring a realized progression in [0, 1].
//!
//! Scores are only comparable within one genre.

use serde::{Deserialize, Serialize};

use crate::music::ChordSymbol;
use crate::music::Degree::{self, FlatVII, I, II, IV, V, VI};

use super::Genre;

/// Opening shapes the pop pattern bonus looks for
const POP_OPENINGS: [[Degree; 4]; 3] = [[I, V, VI, IV], [VI, IV, I, V], [I, VI, IV, V]];

const POP_MINOR_TARGET: f64 = 0.4;

/// Tunable rule constants.
///
/// Only the rock terms are exposed; jazz and pop weights are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    /// Weight of the power-chord fraction; the flat-seven term gets the rest
    pub rock_power_weight: f64,
    /// Flat-seven term when a bVII is present
    pub rock_flat_seven_bonus: f64,
    /// Flat-seven term when it is not
    pub rock_default_bonus: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            rock_power_weight: 0.5,
            rock_flat_seven_bonus: 1.0,
            rock_default_bonus: 0.6,
        }
    }
}

impl RuleWeights {
    /// Score a progression for `genre`. `roman` and `chords` are parallel.
    pub fn score(&self, genre: Genre, roman: &[Degree], chords: &[ChordSymbol]) -> f64 {
        let s = match genre {
            Genre::Jazz => jazz_score(roman, chords),
            Genre::Pop => pop_score(roman, chords),
            Genre::Rock => self.rock_score(roman, chords),
        };
        s.clamp(0.0, 1.0)
    }

    fn rock_score(&self, roman: &[Degree], chords: &[ChordSymbol]) -> f64 {
        let power = suffix_ratio(chords, |c| c.as_str().ends_with('5'));
        let bonus = if roman.contains(&FlatVII) {
            self.rock_flat_seven_bonus
        } else {
            self.rock_default_bonus
        };
        let w = self.rock_power_weight.clamp(0.0, 1.0);
        w * power + (1.0 - w) * bonus
    }
}

/// Score with the default weights
pub fn rule_score(genre: Genre, roman: &[Degree], chords: &[ChordSymbol]) -> f64 {
    RuleWeights::default().score(genre, roman, chords)
}

fn suffix_ratio(chords: &[ChordSymbol], pred: impl Fn(&ChordSymbol) -> bool) -> f64 {
    if chords.is_empty() {
        return 0.0;
    }
    chords.iter().filter(|c| pred(c)).count() as f64 / chords.len() as f64
}

fn jazz_score(roman: &[Degree], chords: &[ChordSymbol]) -> f64 {
    let ii_v = roman.windows(2).filter(|w| w[0] == II && w[1] == V).count();
    let cadence = if roman.contains(&I) && roman.contains(&V) { 1.0 } else { 0.0 };
    // "maj7" counts as a seventh here too
    let sevenths = suffix_ratio(chords, |c| c.as_str().ends_with('7'));

    0.5 * (ii_v as f64 / 2.0).min(1.0) + 0.3 * cadence + 0.2 * sevenths
}

fn pop_score(roman: &[Degree], chords: &[ChordSymbol]) -> f64 {
    let pattern = if roman.len() >= 4 && POP_OPENINGS.iter().any(|o| roman[..4] == o[..]) {
        1.0
    } else {
        0.5
    };
    let minor = suffix_ratio(chords, |c| c.as_str().ends_with('m'));

    0.6 * pattern + 0.4 * (1.0 - (minor - POP_MINOR_TARGET).abs())
}
