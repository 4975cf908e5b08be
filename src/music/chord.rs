// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbols and qualities.
//!
//! A chord symbol is a root name followed by a quality suffix ("Am", "G7",
//! "E5"). Realized progressions only ever use the closed set of suffixes in
//! [`Quality`], but symbols parsed from user input may carry any suffix
//! ("Dm7", "Cmaj7"), so the symbol keeps its original text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::note::Note;
use crate::error::{ChordError, Result};

/// Chord quality (closed set used for realization)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Major,
    Minor,
    Dominant7,
    Diminished,
    Sus4,
    Augmented,
    /// Root and fifth, no third
    Power,
}

impl Quality {
    /// Suffix appended to the root name
    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
            Quality::Dominant7 => "7",
            Quality::Diminished => "dim",
            Quality::Sus4 => "sus4",
            Quality::Augmented => "aug",
            Quality::Power => "5",
        }
    }

    /// Chord tones in semitones above the root
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Quality::Major => &[0, 4, 7],
            Quality::Minor => &[0, 3, 7],
            Quality::Dominant7 => &[0, 4, 7, 10],
            Quality::Diminished => &[0, 3, 6],
            Quality::Sus4 => &[0, 5, 7],
            Quality::Augmented => &[0, 4, 8],
            Quality::Power => &[0, 7],
        }
    }

    /// Classify an arbitrary suffix into the closed set.
    ///
    /// Extended chords collapse onto their triad family: "maj7", "add9" and
    /// "6/9" are major, "m7" is minor, "9" and "13" are dominant, "m7b5" is
    /// diminished.
    pub fn from_suffix(suffix: &str) -> Self {
        let s = suffix.trim();
        let lower = s.to_lowercase();

        if s.is_empty() || lower == "maj" {
            return Quality::Major;
        }
        if s == "5" {
            return Quality::Power;
        }
        if lower.contains("dim") || lower.contains("m7b5") || s.contains('°') || s.contains('ø') || s.starts_with('o') {
            return Quality::Diminished;
        }
        if lower.contains("aug") || s.starts_with('+') {
            return Quality::Augmented;
        }
        if lower.contains("sus") {
            return Quality::Sus4;
        }
        if lower.starts_with("maj") || s.starts_with('M') || s.starts_with('Δ') || s.starts_with('^') {
            return Quality::Major;
        }
        if lower.starts_with("min") || s.starts_with('m') || s.starts_with('-') {
            return Quality::Minor;
        }
        // Added tones and sixths color a major triad
        if lower.starts_with("add") || s.starts_with('6') {
            return Quality::Major;
        }
        if ["7", "9", "11", "13"].iter().any(|t| s.contains(t)) {
            return Quality::Dominant7;
        }
        Quality::Major
    }
}

/// Split a chord symbol into its root and the remaining suffix.
///
/// The root is an upper-case letter A-G optionally followed by `#` or `b`.
/// Returns `None` when the text does not start with a known root.
pub fn split_root(symbol: &str) -> Option<(Note, &str)> {
    let s = symbol.trim();
    let mut chars = s.char_indices();
    let (_, letter) = chars.next()?;
    if !('A'..='G').contains(&letter) {
        return None;
    }

    let root_len = match chars.next() {
        Some((i, '#')) | Some((i, 'b')) => i + 1,
        Some((i, _)) => i,
        None => s.len(),
    };

    Note::from_name(&s[..root_len]).map(|note| (note, &s[root_len..]))
}

/// A chord symbol such as "Am", "G7" or "Dm7".
///
/// Equality is string equality of the symbol text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChordSymbol {
    text: String,
    root: Note,
    root_len: usize,
}

impl ChordSymbol {
    /// Build a symbol from a root and a quality using the fixed spelling
    pub fn new(root: Note, quality: Quality) -> Self {
        let name = root.name();
        Self {
            text: format!("{}{}", name, quality.suffix()),
            root,
            root_len: name.len(),
        }
    }

    /// Parse a symbol, keeping its text verbatim
    pub fn parse(symbol: &str) -> Result<Self> {
        let trimmed = symbol.trim();
        let (root, suffix) =
            split_root(trimmed).ok_or_else(|| ChordError::InvalidChord(symbol.to_string()))?;
        Ok(Self {
            text: trimmed.to_string(),
            root,
            root_len: trimmed.len() - suffix.len(),
        })
    }

    /// The symbol text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> Note {
        self.root
    }

    /// Everything after the root ("m7" for "Dm7")
    pub fn suffix(&self) -> &str {
        &self.text[self.root_len..]
    }

    /// Quality family of this symbol
    pub fn quality(&self) -> Quality {
        Quality::from_suffix(self.suffix())
    }

    /// True for a plain dominant seventh ("G7")
    pub fn is_dominant_seventh(&self) -> bool {
        self.suffix() == Quality::Dominant7.suffix()
    }

    /// True for a plain minor triad ("Am")
    pub fn is_minor_triad(&self) -> bool {
        self.suffix() == Quality::Minor.suffix()
    }

    /// True for a plain major triad ("F")
    pub fn is_major_triad(&self) -> bool {
        self.suffix().is_empty()
    }
}

impl AsRef<str> for ChordSymbol {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<String> for ChordSymbol {
    type Error = ChordError;

    fn try_from(value: String) -> Result<Self> {
        ChordSymbol::parse(&value)
    }
}

impl From<ChordSymbol> for String {
    fn from(symbol: ChordSymbol) -> Self {
        symbol.text
    }
}

/// Parse a list of chord symbols, failing on the first invalid one
pub fn parse_progression<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<ChordSymbol>> {
    symbols.iter().map(|s| ChordSymbol::parse(s.as_ref())).collect()
}

/// Join a progression for display ("C → G → Am")
pub fn format_progression(chords: &[ChordSymbol]) -> String {
    chords
        .iter()
        .map(ChordSymbol::as_str)
        .collect::<Vec<_>>()
        .join(" → ")
}
