// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sparse lead lines that point up the phrase structure.
//!
//! Pop and rock play short pentatonic hooks on the first bar and at the end
//! of every four-bar phrase, resting everywhere else. Jazz plays a point
//! line over each bar: an occasional chord tone on the "and" of 2 and an
//! approach-and-target lick into each phrase end.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::Genre;
use crate::music::{ChordSymbol, Key, Quality};

/// Bars in a phrase
pub const PHRASE_BARS: usize = 4;

/// MIDI note of the lowest lead root (C5)
const LEAD_BASE: u8 = 72;

/// Major pentatonic pitch classes relative to the tonic
const MAJOR_PENTATONIC: [u8; 5] = [0, 2, 4, 7, 9];

/// Steps a pentatonic hook may start on, latest last
const HOOK_STEPS: [usize; 3] = [10, 12, 14];

/// Chance a jazz phrase-end lick starts with an approach note on beat 4
const PICKUP_PROBABILITY: f64 = 0.6;

/// How busy the lead line is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadDensity {
    Sparse,
    Light,
    Medium,
}

impl LeadDensity {
    pub const ALL: [LeadDensity; 3] = [LeadDensity::Sparse, LeadDensity::Light, LeadDensity::Medium];

    pub fn name(self) -> &'static str {
        match self {
            LeadDensity::Sparse => "sparse",
            LeadDensity::Light => "light",
            LeadDensity::Medium => "medium",
        }
    }

    /// Notes in a pentatonic hook
    pub fn hook_notes(self) -> usize {
        match self {
            LeadDensity::Sparse => 1,
            LeadDensity::Light => 2,
            LeadDensity::Medium => 3,
        }
    }

    /// Jazz odds as (mid-bar hit, phrase-end lick)
    fn jazz_odds(self) -> (f64, f64) {
        match self {
            LeadDensity::Sparse => (0.15, 0.85),
            LeadDensity::Light => (0.30, 0.92),
            LeadDensity::Medium => (0.45, 0.96),
        }
    }
}

impl fmt::Display for LeadDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LeadDensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|density| density.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|d| d.name()).collect();
                format!("unknown lead density '{}' (expected one of {})", s, names.join(", "))
            })
    }
}

/// A lead note on the 16-step grid of one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadHit {
    pub step: usize,
    /// Length in steps
    pub length: usize,
    /// MIDI note number
    pub note: u8,
    /// Landing note of a hook or lick
    pub accent: bool,
}

impl LeadHit {
    fn eighth(step: usize, note: u8, accent: bool) -> Self {
        Self {
            step,
            length: 2,
            note,
            accent,
        }
    }
}

/// Whether chord slot `slot` (counted from the start of the arrangement)
/// carries a pentatonic hook: the first bar and every phrase end.
pub fn is_hook_slot(slot: usize) -> bool {
    slot == 0 || is_phrase_end(slot)
}

fn is_phrase_end(slot: usize) -> bool {
    (slot + 1) % PHRASE_BARS == 0
}

/// Major pentatonic notes of a key over two octaves from C5
pub fn pentatonic(key: &Key) -> Vec<u8> {
    let root = LEAD_BASE + key.root.pitch_class();
    (0..2u8)
        .flat_map(|octave| MAJOR_PENTATONIC.iter().map(move |i| root + i + 12 * octave))
        .collect()
}

/// Notes a jazz line aims at over a chord: ninth, third and color tones
pub fn target_tones(chord: &ChordSymbol) -> Vec<u8> {
    let suffix = chord.suffix();
    let major_seventh = ["maj7", "M7", "Δ", "^"].iter().any(|t| suffix.contains(t));
    let intervals: &[u8] = match chord.quality() {
        Quality::Major if major_seventh => &[14, 4, 7, 9],
        Quality::Minor => &[14, 3, 7, 10],
        Quality::Dominant7 => &[14, 4, 10, 7],
        Quality::Diminished => &[3, 6, 9],
        Quality::Sus4 => &[5, 7, 14],
        Quality::Augmented => &[4, 8, 14],
        Quality::Major | Quality::Power => &[4, 7, 14],
    };
    let root = chord.root().pitch_class();
    intervals.iter().map(|i| LEAD_BASE + (root + i) % 12).collect()
}

fn pick<R: Rng>(rng: &mut R, notes: &[u8]) -> u8 {
    notes[rng.gen_range(0..notes.len())]
}

/// Pentatonic hook ending on the last eighth of the bar
fn hook<R: Rng>(rng: &mut R, scale: &[u8], density: LeadDensity) -> Vec<LeadHit> {
    let n = density.hook_notes().min(HOOK_STEPS.len());
    let last = HOOK_STEPS.len() - 1;
    HOOK_STEPS[HOOK_STEPS.len() - n..]
        .iter()
        .map(|&step| LeadHit::eighth(step, pick(rng, scale), step == HOOK_STEPS[last]))
        .collect()
}

/// Jazz point line for one bar
fn point_line<R: Rng>(rng: &mut R, tones: &[u8], density: LeadDensity, phrase_end: bool) -> Vec<LeadHit> {
    let (mid, lick) = density.jazz_odds();
    let mut hits = Vec::new();

    if rng.gen_bool(mid) {
        hits.push(LeadHit::eighth(6, pick(rng, tones), false));
    }

    if phrase_end && rng.gen_bool(lick) {
        let approach = pick(rng, tones);
        let target = pick(rng, tones);
        if rng.gen_bool(PICKUP_PROBABILITY) {
            hits.push(LeadHit::eighth(12, approach, false));
        }
        hits.push(LeadHit::eighth(14, target, true));
    } else if rng.gen_bool(mid * 0.5) {
        hits.push(LeadHit::eighth(14, pick(rng, tones), false));
    }

    hits
}

/// Lead hits for the bar that closes chord slot `slot`.
///
/// `key` is the key of the whole progression; jazz ignores it and follows
/// the chord instead.
pub fn lead_bar<R: Rng>(
    rng: &mut R,
    genre: Genre,
    key: &Key,
    chord: &ChordSymbol,
    slot: usize,
    density: LeadDensity,
) -> Vec<LeadHit> {
    match genre {
        Genre::Jazz => point_line(rng, &target_tones(chord), density, is_phrase_end(slot)),
        Genre::Pop | Genre::Rock if is_hook_slot(slot) => hook(rng, &pentatonic(key), density),
        Genre::Pop | Genre::Rock => Vec::new(),
    }
}
