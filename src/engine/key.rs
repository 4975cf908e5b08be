// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lightweight major-key inference from a handful of seed roots.

use tracing::debug;

use crate::music::{Key, Note};

/// Key roots in the order they are tried. Natural letters come first so
/// that on equal scores the natural-letter key wins; strict comparison
/// keeps the earliest.
const KEY_ORDER: [Note; 12] = [
    Note::C,
    Note::D,
    Note::E,
    Note::F,
    Note::G,
    Note::A,
    Note::B,
    Note::Cs,
    Note::Ds,
    Note::Fs,
    Note::Gs,
    Note::As,
];

const IN_SCALE: f64 = 1.0;
const OUT_OF_SCALE: f64 = -0.5;
const DOMINANT_BONUS: f64 = 0.4;
const SUPERTONIC_BONUS: f64 = 0.2;

/// How well a major key on `key_root` explains the seed roots.
///
/// Unknown roots (`None`) contribute nothing.
pub fn score_key(seed_roots: &[Option<Note>], key_root: Note) -> f64 {
    let key = Key::major(key_root);
    seed_roots
        .iter()
        .flatten()
        .map(|&root| {
            let rel = key.relative_pc(root);
            let mut s = if key.contains(root) {
                IN_SCALE
            } else {
                OUT_OF_SCALE
            };
            if rel == 7 {
                s += DOMINANT_BONUS;
            }
            if rel == 2 {
                s += SUPERTONIC_BONUS;
            }
            s
        })
        .sum()
}

/// Pick the major key that best explains the seed. No recognizable roots
/// yields C major.
pub fn infer_key(seed_roots: &[Option<Note>]) -> Key {
    let mut best = Note::C;
    let mut best_score = f64::NEG_INFINITY;

    for &candidate in KEY_ORDER.iter() {
        let s = score_key(seed_roots, candidate);
        if s > best_score {
            best = candidate;
            best_score = s;
        }
    }

    debug!(key = %best, score = best_score, "inferred key");
    Key::major(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(names: &[&str]) -> Vec<Option<Note>> {
        names.iter().map(|n| Note::from_name(n)).collect()
    }

    #[test]
    fn test_c_g_b_is_c_major() {
        assert_eq!(infer_key(&roots(&["C", "G", "B"])).root, Note::C);
    }

    #[test]
    fn test_subdominant_key_outscores_tonic() {
        // C G A: C major scores 1 + 1.4 + 1 = 3.4, F major 1.4 + 1.2 + 1 = 3.6
        let seed = roots(&["C", "G", "A"]);
        assert!((score_key(&seed, Note::C) - 3.4).abs() < 1e-9);
        assert!((score_key(&seed, Note::F) - 3.6).abs() < 1e-9);
        assert_eq!(infer_key(&seed).root, Note::F);

        assert_eq!(infer_key(&roots(&["D", "A", "B"])).root, Note::G);
    }

    #[test]
    fn test_score_key_bonuses() {
        // C in C: 1.0, G in C: 1.0 + 0.4, D in C: 1.0 + 0.2, F# in C: -0.5
        let s = score_key(&roots(&["C", "G", "D", "F#"]), Note::C);
        assert!((s - 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_roots_ignored() {
        let with_unknown = score_key(&[Some(Note::G), None], Note::C);
        let without = score_key(&[Some(Note::G)], Note::C);
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn test_empty_seed_defaults_to_c() {
        assert_eq!(infer_key(&[]), Key::major(Note::C));
        assert_eq!(infer_key(&[None, None, None]), Key::major(Note::C));
    }

    #[test]
    fn test_ties_keep_earliest_key() {
        // F major (C is V, D is VI) and G major (C is IV, D is V) both score 2.4
        let seed = roots(&["C", "D"]);
        assert!((score_key(&seed, Note::F) - score_key(&seed, Note::G)).abs() < 1e-9);
        assert_eq!(infer_key(&seed).root, Note::F);
    }

    #[test]
    fn test_key_order_covers_all_pitch_classes() {
        let mut pcs: Vec<u8> = KEY_ORDER.iter().map(|n| n.pitch_class()).collect();
        pcs.sort();
        assert_eq!(pcs, (0..12).collect::<Vec<u8>>());
    }
}
