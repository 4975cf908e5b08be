// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-genre rhythm patterns for drums, bass and comping.
//!
//! All patterns live on a 16-step grid (sixteenth notes in 4/4). Swung
//! styles delay the off-beat eighths toward the triplet position when the
//! steps are placed in time.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::Genre;
use crate::music::{ChordSymbol, Quality};

/// Steps per bar
pub const STEPS_PER_BAR: usize = 16;

/// General MIDI drum note numbers
pub mod gm_drums {
    pub const KICK: u8 = 36;
    pub const SIDE_STICK: u8 = 37;
    pub const SNARE: u8 = 38;
    pub const CLOSED_HAT: u8 = 42;
    pub const PEDAL_HAT: u8 = 44;
    pub const OPEN_HAT: u8 = 46;
    pub const CRASH: u8 = 49;
    pub const RIDE: u8 = 51;
}

/// Drum style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrumStyle {
    /// Kick on every beat, snare on 2 and 4
    FourOnFloor,
    /// Kick on 1 and 3, snare on 2 and 4
    Backbeat,
    /// Snare on 3 only
    HalfTime,
    /// Eighth-note hats over a rock kick
    StraightEighths,
    /// Sixteenth-note hats with a pushed kick
    Driving,
    /// Swing ride, feathered kick, hi-hat on 2 and 4
    Swing,
}

impl DrumStyle {
    pub const ALL: [DrumStyle; 6] = [
        DrumStyle::FourOnFloor,
        DrumStyle::Backbeat,
        DrumStyle::HalfTime,
        DrumStyle::StraightEighths,
        DrumStyle::Driving,
        DrumStyle::Swing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrumStyle::FourOnFloor => "four_on_floor",
            DrumStyle::Backbeat => "backbeat",
            DrumStyle::HalfTime => "half_time",
            DrumStyle::StraightEighths => "straight_eighths",
            DrumStyle::Driving => "driving",
            DrumStyle::Swing => "swing",
        }
    }

    /// Styles a genre chooses from
    pub fn for_genre(genre: Genre) -> &'static [DrumStyle] {
        match genre {
            Genre::Pop => &[DrumStyle::FourOnFloor, DrumStyle::Backbeat, DrumStyle::HalfTime],
            Genre::Rock => &[DrumStyle::StraightEighths, DrumStyle::Driving],
            Genre::Jazz => &[DrumStyle::Swing],
        }
    }

    /// Pick one of the genre's styles
    pub fn choose<R: Rng>(genre: Genre, rng: &mut R) -> Self {
        let styles = Self::for_genre(genre);
        styles[rng.gen_range(0..styles.len())]
    }

    /// Whether off-beat eighths are swung
    pub fn is_swung(self) -> bool {
        matches!(self, DrumStyle::Swing)
    }
}

impl fmt::Display for DrumStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrumStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|s| s.name()).collect();
                format!("unknown drum style '{}' (expected one of {})", s, names.join(", "))
            })
    }
}

/// One drum instrument's bar pattern
#[derive(Debug, Clone, PartialEq)]
pub struct DrumVoice {
    /// MIDI note number
    pub note: u8,
    /// Hit pattern (16 steps, true = hit)
    pub pattern: Vec<bool>,
    /// Base velocity
    pub velocity: u8,
    /// Accent pattern (positions that get accent)
    pub accents: Vec<bool>,
    /// Accent velocity
    pub accent_velocity: u8,
}

impl DrumVoice {
    fn new(note: u8, velocity: u8) -> Self {
        Self {
            note,
            pattern: vec![false; STEPS_PER_BAR],
            velocity,
            accents: vec![false; STEPS_PER_BAR],
            accent_velocity: velocity.saturating_add(20).min(127),
        }
    }

    fn with_pattern(mut self, hit: impl Fn(usize) -> bool) -> Self {
        self.pattern = (0..STEPS_PER_BAR).map(hit).collect();
        self
    }

    fn with_accents(mut self, accent: impl Fn(usize) -> bool) -> Self {
        self.accents = (0..STEPS_PER_BAR).map(accent).collect();
        self
    }

    /// Velocity at a step, or `None` when the step is silent
    pub fn hit(&self, step: usize) -> Option<u8> {
        let i = step % STEPS_PER_BAR;
        if !self.pattern[i] {
            return None;
        }
        Some(if self.accents[i] { self.accent_velocity } else { self.velocity })
    }
}

/// Voices making up one bar of a drum style
pub fn drum_voices(style: DrumStyle) -> Vec<DrumVoice> {
    use gm_drums::*;

    match style {
        DrumStyle::FourOnFloor => vec![
            DrumVoice::new(KICK, 100)
                .with_pattern(|i| i % 4 == 0)
                .with_accents(|i| i == 0),
            DrumVoice::new(SNARE, 96).with_pattern(|i| i == 4 || i == 12),
            DrumVoice::new(CLOSED_HAT, 76).with_pattern(|i| i % 2 == 0),
            DrumVoice::new(OPEN_HAT, 70).with_pattern(|i| i == 14),
        ],
        DrumStyle::Backbeat => vec![
            DrumVoice::new(KICK, 100).with_pattern(|i| i == 0 || i == 8 || i == 10),
            DrumVoice::new(SNARE, 100).with_pattern(|i| i == 4 || i == 12),
            DrumVoice::new(CLOSED_HAT, 72)
                .with_pattern(|i| i % 2 == 0)
                .with_accents(|i| i % 4 == 0),
        ],
        DrumStyle::HalfTime => vec![
            DrumVoice::new(KICK, 100).with_pattern(|i| i == 0 || i == 6),
            DrumVoice::new(SNARE, 104).with_pattern(|i| i == 8),
            DrumVoice::new(CLOSED_HAT, 70).with_pattern(|i| i % 2 == 0),
        ],
        DrumStyle::StraightEighths => vec![
            DrumVoice::new(KICK, 108).with_pattern(|i| i == 0 || i == 8),
            DrumVoice::new(SNARE, 110).with_pattern(|i| i == 4 || i == 12),
            DrumVoice::new(CLOSED_HAT, 84)
                .with_pattern(|i| i % 2 == 0)
                .with_accents(|i| i % 4 == 0),
        ],
        DrumStyle::Driving => vec![
            DrumVoice::new(KICK, 110).with_pattern(|i| i == 0 || i == 3 || i == 8 || i == 11),
            DrumVoice::new(SNARE, 112).with_pattern(|i| i == 4 || i == 12),
            DrumVoice::new(CLOSED_HAT, 78)
                .with_pattern(|_| true)
                .with_accents(|i| i % 2 == 0),
            DrumVoice::new(CRASH, 100).with_pattern(|i| i == 0),
        ],
        DrumStyle::Swing => vec![
            // Spang-a-lang: beats plus the swung "and" of 2 and 4
            DrumVoice::new(RIDE, 82)
                .with_pattern(|i| i % 4 == 0 || i == 6 || i == 14)
                .with_accents(|i| i == 4 || i == 12),
            DrumVoice::new(KICK, 40).with_pattern(|i| i % 4 == 0),
            DrumVoice::new(PEDAL_HAT, 70).with_pattern(|i| i == 4 || i == 12),
            DrumVoice::new(SIDE_STICK, 52).with_pattern(|i| i == 10),
        ],
    }
}

/// Tone of the chord a bass note plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BassTone {
    Root,
    Fifth,
}

/// A rhythmic hit: start step, length in steps and the tone played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BassHit {
    pub step: usize,
    pub length: usize,
    pub tone: BassTone,
}

/// Bass rhythm for one bar
pub fn bass_pattern(genre: Genre) -> Vec<BassHit> {
    let hit = |step, length, tone| BassHit { step, length, tone };
    match genre {
        // Driving root eighths
        Genre::Rock => (0..STEPS_PER_BAR).step_by(2).map(|s| hit(s, 2, BassTone::Root)).collect(),
        // Quarter-note pulse
        Genre::Pop => (0..STEPS_PER_BAR).step_by(4).map(|s| hit(s, 4, BassTone::Root)).collect(),
        // Two-feel: root on 1, fifth on 3
        Genre::Jazz => vec![hit(0, 8, BassTone::Root), hit(8, 8, BassTone::Fifth)],
    }
}

/// Comping rhythm for one bar as (start step, length in steps)
pub fn comp_rhythm(genre: Genre) -> &'static [(usize, usize)] {
    match genre {
        Genre::Rock => &[(0, 3), (3, 3), (6, 2), (8, 3), (11, 3), (14, 2)],
        Genre::Pop => &[(0, 6), (6, 2), (8, 8)],
        // Charleston
        Genre::Jazz => &[(0, 3), (6, 4)],
    }
}

/// MIDI note of the lowest comping root (C3)
const COMP_BASE: u8 = 48;
/// MIDI note of the lowest bass root (C2)
const BASS_BASE: u8 = 36;

/// Chord tones for a comping hit. Rock plays power chords with the octave.
pub fn comp_voicing(genre: Genre, chord: &ChordSymbol) -> Vec<u8> {
    let root = COMP_BASE + chord.root().pitch_class();
    let quality = match genre {
        Genre::Rock => Quality::Power,
        _ => chord.quality(),
    };
    let mut notes: Vec<u8> = quality.intervals().iter().map(|i| root + i).collect();
    if genre == Genre::Rock {
        notes.push(root + 12);
    }
    notes
}

/// Bass note for a chord and tone
pub fn bass_note(chord: &ChordSymbol, tone: BassTone) -> u8 {
    let root = BASS_BASE + chord.root().pitch_class();
    match tone {
        BassTone::Root => root,
        BassTone::Fifth => match chord.quality() {
            Quality::Diminished => root + 6,
            Quality::Augmented => root + 8,
            _ => root + 7,
        },
    }
}

/// Apply humanization to a velocity
pub fn humanize_velocity<R: Rng>(rng: &mut R, velocity: u8, amount: u8) -> u8 {
    if amount == 0 {
        return velocity.clamp(1, 127);
    }
    let var = amount as i16;
    let offset = rng.gen_range(-var..=var);
    (velocity as i16 + offset).clamp(1, 127) as u8
}
