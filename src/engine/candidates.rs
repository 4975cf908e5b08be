// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Candidate generation: template realization plus jazz reharmonization.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::music::{romanize, ChordSymbol, Degree, Key, Note, Quality};

use super::key::infer_key;
use super::quality::realize_progression;
use super::template::{anchor_degree, fit_length, rotate_to_anchor, templates_for, TEMPLATE_LEN};
use super::Genre;

/// A realized progression before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Chord symbols in time order
    pub chords: Vec<ChordSymbol>,
    /// Degree of each chord in `key`
    pub roman: Vec<Degree>,
    /// Inferred key the progression was realized in
    pub key: Key,
    /// Reharmonization applied on top of the template, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<Substitution>,
}

/// Jazz reharmonizations. Each touches at most one chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substitution {
    /// Last dominant seventh moved a tritone away
    Tritone,
    /// First V7 replaced by bVII7
    Backdoor,
    /// First minor triad replaced by the dominant of its root
    SecondaryDominant,
    /// First major IV replaced by minor iv
    ModalBorrowing,
}

impl Substitution {
    pub const ALL: [Substitution; 4] = [
        Substitution::Tritone,
        Substitution::Backdoor,
        Substitution::SecondaryDominant,
        Substitution::ModalBorrowing,
    ];

    /// Apply to a base proposal; `None` when there is nothing to substitute
    pub fn apply(self, base: &Proposal) -> Option<Proposal> {
        let key = base.key;
        let (index, chord, degree) = match self {
            Substitution::Tritone => {
                let i = base.chords.iter().rposition(ChordSymbol::is_dominant_seventh)?;
                let root = base.chords[i].root().transpose(6);
                (i, ChordSymbol::new(root, Quality::Dominant7), Degree::Unknown)
            }
            Substitution::Backdoor => {
                let i = base
                    .chords
                    .iter()
                    .zip(&base.roman)
                    .position(|(c, &d)| d == Degree::V && c.is_dominant_seventh())?;
                let root = key.note_at(10);
                (i, ChordSymbol::new(root, Quality::Dominant7), Degree::FlatVII)
            }
            Substitution::SecondaryDominant => {
                let i = base.chords.iter().position(ChordSymbol::is_minor_triad)?;
                let root = base.chords[i].root().transpose(7);
                let degree = Degree::from_relative_pc(key.relative_pc(root));
                (i, ChordSymbol::new(root, Quality::Dominant7), degree)
            }
            Substitution::ModalBorrowing => {
                let i = base
                    .chords
                    .iter()
                    .zip(&base.roman)
                    .position(|(c, &d)| d == Degree::IV && c.is_major_triad())?;
                let root = base.chords[i].root();
                (i, ChordSymbol::new(root, Quality::Minor), Degree::IV)
            }
        };

        let mut chords = base.chords.clone();
        let mut roman = base.roman.clone();
        chords[index] = chord;
        roman[index] = degree;

        Some(Proposal {
            chords,
            roman,
            key,
            substitution: Some(self),
        })
    }
}

/// Parse root names; unrecognized names become `None`
pub fn parse_roots<S: AsRef<str>>(seed_roots: &[S]) -> Vec<Option<Note>> {
    seed_roots.iter().map(|r| Note::from_name(r.as_ref())).collect()
}

/// Number of chords in a generated progression. Zero means the template length.
pub fn progression_len(length: usize) -> usize {
    match length {
        0 => TEMPLATE_LEN,
        n => n,
    }
}

/// Generate every candidate progression for a seed.
///
/// One candidate per genre template, rotated to the seed's anchor degree and
/// realized in the inferred key. Jazz adds one variant per successful
/// substitution. Duplicate chord sequences are dropped, first one wins.
pub fn generate_candidates<S: AsRef<str>>(genre: Genre, seed_roots: &[S], length: usize) -> Vec<Proposal> {
    let roots = parse_roots(seed_roots);
    let key = infer_key(&roots);
    let seed_degrees = romanize(&roots, &key);
    let anchor = anchor_degree(&seed_degrees);
    let len = progression_len(length);

    let mut proposals = Vec::new();
    for template in templates_for(genre) {
        let roman = fit_length(&rotate_to_anchor(template, anchor), len);
        let base = Proposal {
            chords: realize_progression(&roman, &key, genre),
            roman,
            key,
            substitution: None,
        };

        let variants: Vec<Proposal> = if genre == Genre::Jazz {
            Substitution::ALL.iter().filter_map(|s| s.apply(&base)).collect()
        } else {
            Vec::new()
        };

        proposals.push(base);
        proposals.extend(variants);
    }

    let before = proposals.len();
    let mut seen = HashSet::new();
    proposals.retain(|p| seen.insert(p.chords.clone()));

    debug!(
        %genre,
        %key,
        anchor = %anchor,
        candidates = proposals.len(),
        duplicates = before - proposals.len(),
        "generated candidates"
    );
    proposals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(p: &Proposal) -> Vec<&str> {
        p.chords.iter().map(ChordSymbol::as_str).collect()
    }

    #[test]
    fn test_pop_seed_in_c() {
        // C G B: only C major holds all three (B rules out F major)
        let proposals = generate_candidates(Genre::Pop, &["C", "G", "B"], 8);
        assert_eq!(proposals[0].key, Key::major(Note::C));
        assert_eq!(symbols(&proposals[0]), vec!["C", "G", "Am", "F", "C", "G", "Am", "F"]);
        // [6,4,1,5,...] rotated to the tonic duplicates the first and is dropped
        assert_eq!(proposals.len(), 2);
        assert_eq!(symbols(&proposals[1]), vec!["C", "Am", "F", "G", "C", "Am", "F", "G"]);
    }

    #[test]
    fn test_pop_c_g_a_realizes_in_f() {
        // C is V and G is ii of F, which outscores C major (3.6 vs 3.4).
        // The anchor is V at index 0, so templates start on the dominant.
        let proposals = generate_candidates(Genre::Pop, &["C", "G", "A"], 8);
        assert_eq!(proposals[0].key, Key::major(Note::F));
        assert_eq!(symbols(&proposals[0]), vec!["C", "Dm", "Bb", "F", "C", "Dm", "Bb", "F"]);
    }

    #[test]
    fn test_rock_all_power_chords() {
        let proposals = generate_candidates(Genre::Rock, &["D", "A", "B"], 8);
        assert!(!proposals.is_empty());
        for p in &proposals {
            assert_eq!(p.chords.len(), 8);
            assert!(p.chords.iter().all(|c| c.as_str().ends_with('5')), "{:?}", symbols(p));
        }
    }

    #[test]
    fn test_jazz_adds_variants() {
        let proposals = generate_candidates(Genre::Jazz, &["D", "G", "C"], 8);
        assert!(proposals.len() > templates_for(Genre::Jazz).len());
        assert!(proposals.iter().any(|p| p.substitution == Some(Substitution::Tritone)));
        assert!(proposals.iter().any(|p| p.substitution == Some(Substitution::Backdoor)));
        assert!(proposals.iter().any(|p| p.substitution.is_none()));
    }

    #[test]
    fn test_no_duplicate_progressions() {
        for genre in Genre::ALL {
            for seed in [["C", "G", "A"], ["D", "A", "B"], ["F", "Bb", "C"], ["X", "Y", "Z"]] {
                let proposals = generate_candidates(genre, &seed, 8);
                let unique: HashSet<_> = proposals.iter().map(|p| p.chords.clone()).collect();
                assert_eq!(unique.len(), proposals.len());
            }
        }
    }

    #[test]
    fn test_length_controls_progression_size() {
        let proposals = generate_candidates(Genre::Pop, &["C", "G", "A"], 4);
        assert!(proposals.iter().all(|p| p.chords.len() == 4));

        let proposals = generate_candidates(Genre::Pop, &["C", "G", "A"], 16);
        assert!(proposals.iter().all(|p| p.chords.len() == 16 && p.roman.len() == 16));

        let proposals = generate_candidates(Genre::Pop, &["C", "G", "A"], 0);
        assert!(proposals.iter().all(|p| p.chords.len() == TEMPLATE_LEN));
    }

    #[test]
    fn test_length_independent_of_seed_size() {
        for genre in Genre::ALL {
            for seed in [&[][..], &["C"][..], &["C", "G"][..], &["C", "G", "Am"][..]] {
                let proposals = generate_candidates(genre, seed, TEMPLATE_LEN);
                assert!(!proposals.is_empty());
                for p in &proposals {
                    assert_eq!(p.chords.len(), 8, "{} {:?} -> {:?}", genre, seed, symbols(p));
                }
            }
        }
    }

    #[test]
    fn test_two_chord_seed_keeps_closing_chord() {
        // C G reads as V ii of F; the loop runs through to its closing tonic
        let proposals = generate_candidates(Genre::Pop, &["C", "G"], TEMPLATE_LEN);
        assert_eq!(proposals[0].key, Key::major(Note::F));
        assert_eq!(symbols(&proposals[0]), vec!["C", "Dm", "Bb", "F", "C", "Dm", "Bb", "F"]);
    }

    #[test]
    fn test_unknown_roots_fall_back_to_c() {
        let proposals = generate_candidates(Genre::Pop, &["H", "?", ""], 8);
        assert_eq!(proposals[0].key, Key::major(Note::C));
        assert_eq!(proposals[0].chords[0].as_str(), "C");
    }

    #[test]
    fn test_tritone_substitution() {
        let base = Proposal {
            chords: crate::music::parse_progression(&["Dm", "G7", "C", "G7"]).unwrap(),
            roman: vec![Degree::II, Degree::V, Degree::I, Degree::V],
            key: Key::major(Note::C),
            substitution: None,
        };
        let sub = Substitution::Tritone.apply(&base).unwrap();
        let got: Vec<&str> = sub.chords.iter().map(ChordSymbol::as_str).collect();
        assert_eq!(got, vec!["Dm", "G7", "C", "C#7"]);
        assert_eq!(sub.roman[3], Degree::Unknown);
    }

    #[test]
    fn test_backdoor_substitution() {
        let base = Proposal {
            chords: crate::music::parse_progression(&["Dm", "G7", "C", "G7"]).unwrap(),
            roman: vec![Degree::II, Degree::V, Degree::I, Degree::V],
            key: Key::major(Note::C),
            substitution: None,
        };
        let sub = Substitution::Backdoor.apply(&base).unwrap();
        let got: Vec<&str> = sub.chords.iter().map(ChordSymbol::as_str).collect();
        assert_eq!(got, vec!["Dm", "Bb7", "C", "G7"]);
        assert_eq!(sub.roman[1], Degree::FlatVII);
    }

    #[test]
    fn test_secondary_dominant_and_borrowing() {
        let base = Proposal {
            chords: crate::music::parse_progression(&["C", "Am", "F", "G7"]).unwrap(),
            roman: vec![Degree::I, Degree::VI, Degree::IV, Degree::V],
            key: Key::major(Note::C),
            substitution: None,
        };

        let sec = Substitution::SecondaryDominant.apply(&base).unwrap();
        assert_eq!(sec.chords[1].as_str(), "E7");
        assert_eq!(sec.roman[1], Degree::III);

        let borrowed = Substitution::ModalBorrowing.apply(&base).unwrap();
        assert_eq!(borrowed.chords[2].as_str(), "Fm");
        assert_eq!(borrowed.roman[2], Degree::IV);
    }

    #[test]
    fn test_substitutions_noop_without_precondition() {
        let base = Proposal {
            chords: crate::music::parse_progression(&["C5", "G5"]).unwrap(),
            roman: vec![Degree::I, Degree::V],
            key: Key::major(Note::C),
            substitution: None,
        };
        for s in Substitution::ALL {
            assert!(s.apply(&base).is_none());
        }
    }
}
