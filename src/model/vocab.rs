// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Model vocabulary and chord-symbol canonicalization.
//!
//! Model vocabularies spell qualities as tokens ("Cmaj", "Amin", "G7",
//! "Bbmaj7"), which rarely match what users type or what the engine
//! realizes ("C", "Am"). [`Vocabulary::canonicalize`] bridges the two.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{ChordError, Result};
use crate::music::{split_root, Quality};

pub const CHORD_TO_INDEX_FILE: &str = "chord_to_index.json";
pub const INDEX_TO_CHORD_FILE: &str = "index_to_chord.json";

/// Quality aliases, tried in order. Each form found in the suffix is
/// replaced by the canonical token.
const ALIASES: [(&str, &[&str]); 7] = [
    ("maj7", &["maj7", "M7", "Δ7", "^7"]),
    ("min7", &["min7", "m7", "-7"]),
    ("min", &["min", "m", "-"]),
    ("dim7", &["dim7", "o7", "°7"]),
    ("dim", &["dim", "o", "°"]),
    ("sus4", &["sus4"]),
    ("7", &["7"]),
];

/// Last-resort tokens, tried in order
const FALLBACKS: [&str; 6] = ["7", "maj", "min", "dim", "aug", "sus4"];

/// Sharp roots respelled flat before lookup
fn flat_spelling(root: &str) -> &str {
    match root {
        "A#" => "Bb",
        "D#" => "Eb",
        "G#" => "Ab",
        other => other,
    }
}

/// Vocabulary token for a closed-set quality
fn family_token(quality: Quality) -> &'static str {
    match quality {
        Quality::Major | Quality::Power => "maj",
        Quality::Minor => "min",
        Quality::Dominant7 => "7",
        Quality::Diminished => "dim",
        Quality::Sus4 => "sus4",
        Quality::Augmented => "aug",
    }
}

/// Bidirectional chord <-> index table
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    chord_to_index: HashMap<String, usize>,
    index_to_chord: Vec<String>,
}

impl Vocabulary {
    /// Build from an ordered token list; index = position
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let index_to_chord: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        let mut chord_to_index = HashMap::with_capacity(index_to_chord.len());
        for (i, chord) in index_to_chord.iter().enumerate() {
            if chord_to_index.insert(chord.clone(), i).is_some() {
                return Err(ChordError::Config(format!("duplicate vocabulary token '{}'", chord)));
            }
        }
        Ok(Self {
            chord_to_index,
            index_to_chord,
        })
    }

    /// Build from the two persisted maps, checking that they agree
    pub fn from_maps(chord_to_index: HashMap<String, usize>, index_to_chord: BTreeMap<usize, String>) -> Result<Self> {
        let n = index_to_chord.len();
        if chord_to_index.len() != n {
            return Err(ChordError::Config(format!(
                "vocabulary maps disagree: {} chords vs {} indices",
                chord_to_index.len(),
                n
            )));
        }

        let mut tokens = Vec::with_capacity(n);
        for (expected, (index, chord)) in index_to_chord.into_iter().enumerate() {
            if index != expected {
                return Err(ChordError::Config(format!("vocabulary index {} missing", expected)));
            }
            if chord_to_index.get(&chord) != Some(&index) {
                return Err(ChordError::Config(format!("vocabulary entry '{}' does not map back to {}", chord, index)));
            }
            tokens.push(chord);
        }
        Self::from_tokens(&tokens)
    }

    /// Load `chord_to_index.json` and `index_to_chord.json` from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let c2i: HashMap<String, usize> = serde_json::from_str(&fs::read_to_string(dir.join(CHORD_TO_INDEX_FILE))?)?;
        let i2c: BTreeMap<usize, String> = serde_json::from_str(&fs::read_to_string(dir.join(INDEX_TO_CHORD_FILE))?)?;
        Self::from_maps(c2i, i2c)
    }

    pub fn len(&self) -> usize {
        self.index_to_chord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_chord.is_empty()
    }

    pub fn contains(&self, chord: &str) -> bool {
        self.chord_to_index.contains_key(chord)
    }

    pub fn index_of(&self, chord: &str) -> Option<usize> {
        self.chord_to_index.get(chord).copied()
    }

    pub fn chord_at(&self, index: usize) -> Option<&str> {
        self.index_to_chord.get(index).map(String::as_str)
    }

    /// Fit a chord symbol to the vocabulary.
    ///
    /// Returns the fitted token and whether it is one. Tries, in order: the
    /// symbol with A#/D#/G# respelled flat, alias rewrites of the suffix,
    /// seventh chords downgraded to their triad (half-diminished and dim7
    /// to dim), the token for the suffix's quality family, then the first
    /// present of root + 7, maj, min, dim, aug, sus4. A symbol nothing
    /// fits comes back unchanged.
    pub fn canonicalize(&self, chord: &str) -> (String, bool) {
        let trimmed = chord.trim();
        let Some((_, suffix)) = split_root(trimmed) else {
            return (chord.to_string(), false);
        };
        let root = flat_spelling(&trimmed[..trimmed.len() - suffix.len()]);

        let direct = format!("{}{}", root, suffix);
        if self.contains(&direct) {
            return (direct, true);
        }

        let lower = suffix.to_lowercase();
        let fitted = |q: &str| {
            let c = format!("{}{}", root, q);
            self.contains(&c).then_some(c)
        };

        for (canon, forms) in ALIASES {
            for form in forms {
                let rewritten = if suffix.contains(form) {
                    suffix.replace(form, canon)
                } else if lower.contains(form) {
                    lower.replace(form, canon)
                } else {
                    continue;
                };
                if let Some(c) = fitted(&rewritten) {
                    return (c, true);
                }
            }
        }

        let has = |forms: &[&str]| forms.iter().any(|f| suffix.contains(f));
        let downgrade = if has(&["ø", "m7b5", "dim7", "o7", "°7"]) {
            Some("dim")
        } else if has(&["maj7", "M7", "Δ7", "^7"]) {
            Some("maj")
        } else if has(&["min7", "m7", "-7"]) {
            Some("min")
        } else {
            None
        };
        if let Some(c) = downgrade.and_then(|q| fitted(q)) {
            return (c, true);
        }

        if let Some(c) = fitted(family_token(Quality::from_suffix(suffix))) {
            return (c, true);
        }

        match FALLBACKS.iter().find_map(|q| fitted(*q)) {
            Some(c) => (c, true),
            None => (chord.to_string(), false),
        }
    }

    /// Canonicalize each seed chord; also returns `(before, after)` for
    /// every chord that changed
    pub fn normalize_seed<S: AsRef<str>>(&self, seed: &[S]) -> (Vec<String>, Vec<(String, String)>) {
        let mut fixed = Vec::with_capacity(seed.len());
        let mut changes = Vec::new();
        for chord in seed {
            let before = chord.as_ref();
            let (after, _) = self.canonicalize(before);
            if after != before {
                changes.push((before.to_string(), after.clone()));
            }
            fixed.push(after);
        }
        (fixed, changes)
    }

    /// Index used for a chord the model has never seen
    pub fn index_or_default(&self, chord: &str) -> usize {
        self.index_of(chord).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// The 72-token layout: 12 roots x {maj, min, 7, dim, aug, sus4}
    fn triad_vocab() -> Vocabulary {
        let roots = ["C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B"];
        let tokens: Vec<String> = roots
            .iter()
            .flat_map(|r| FALLBACKS.iter().map(move |q| format!("{}{}", r, q)))
            .collect();
        Vocabulary::from_tokens(&tokens).unwrap()
    }

    #[test]
    fn test_exact_hit() {
        let v = triad_vocab();
        assert_eq!(v.canonicalize("Cmaj"), ("Cmaj".to_string(), true));
    }

    #[test]
    fn test_sharps_respelled_flat() {
        let v = triad_vocab();
        assert_eq!(v.canonicalize("A#7").0, "Bb7");
        assert_eq!(v.canonicalize("G#min").0, "Abmin");
    }

    #[test]
    fn test_aliases() {
        let v = triad_vocab();
        assert_eq!(v.canonicalize("Am").0, "Amin");
        assert_eq!(v.canonicalize("E-").0, "Emin");
        assert_eq!(v.canonicalize("Bo").0, "Bdim");
        assert_eq!(v.canonicalize("Bdim").0, "Bdim");
    }

    #[test]
    fn test_sevenths_downgrade_to_triads() {
        let v = triad_vocab();
        assert_eq!(v.canonicalize("Cmaj7").0, "Cmaj");
        assert_eq!(v.canonicalize("Dm7").0, "Dmin");
        assert_eq!(v.canonicalize("Bm7b5").0, "Bdim");
        assert_eq!(v.canonicalize("Bdim7").0, "Bdim");
    }

    #[test]
    fn test_quality_family_before_fallback() {
        let v = triad_vocab();
        assert_eq!(v.canonicalize("C").0, "Cmaj");
        assert_eq!(v.canonicalize("D5").0, "Dmaj");
        assert_eq!(v.canonicalize("G13").0, "G7");
    }

    #[test]
    fn test_seventh_vocab_keeps_sevenths() {
        let v = Vocabulary::from_tokens(&["Cmaj7", "Dmin7", "G7", "Cmaj"]).unwrap();
        assert_eq!(v.canonicalize("CM7").0, "Cmaj7");
        assert_eq!(v.canonicalize("Dm7").0, "Dmin7");
        assert_eq!(v.canonicalize("C^7").0, "Cmaj7");
    }

    #[test]
    fn test_unfit_chord_unchanged() {
        let v = Vocabulary::from_tokens(&["Cmaj"]).unwrap();
        assert_eq!(v.canonicalize("F#m"), ("F#m".to_string(), false));
        assert_eq!(v.canonicalize("xyz"), ("xyz".to_string(), false));
    }

    #[test]
    fn test_normalize_seed_reports_changes() {
        let v = triad_vocab();
        let (fixed, changes) = v.normalize_seed(&["Cmaj", "Am", "G7"]);
        assert_eq!(fixed, vec!["Cmaj", "Amin", "G7"]);
        assert_eq!(changes, vec![("Am".to_string(), "Amin".to_string())]);
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        assert!(Vocabulary::from_tokens(&["C7", "C7"]).is_err());
    }

    #[test]
    fn test_load_from_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CHORD_TO_INDEX_FILE), r#"{"Cmaj": 0, "G7": 1}"#).unwrap();
        fs::write(dir.path().join(INDEX_TO_CHORD_FILE), r#"{"0": "Cmaj", "1": "G7"}"#).unwrap();

        let v = Vocabulary::load(dir.path()).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.index_of("G7"), Some(1));
        assert_eq!(v.chord_at(0), Some("Cmaj"));
        assert_eq!(v.index_or_default("Bb7"), 0);
    }

    #[test]
    fn test_mismatched_maps_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CHORD_TO_INDEX_FILE), r#"{"Cmaj": 1, "G7": 0}"#).unwrap();
        fs::write(dir.path().join(INDEX_TO_CHORD_FILE), r#"{"0": "Cmaj", "1": "G7"}"#).unwrap();
        assert!(Vocabulary::load(dir.path()).is_err());
    }
}
