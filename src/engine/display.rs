// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Display percentages for ranked results.
//!
//! These are presentation values, not probabilities. Each of the first
//! three ranks lands in a fixed band; where inside the band depends on the
//! score relative to the top result, novelty against it, and a jitter
//! hashed from the chord sequence so the same result always shows the
//! same number.

use sha2::{Digest, Sha256};

use crate::music::ChordSymbol;

use super::diversity::similarity;
use super::ranking::Candidate;

/// Inclusive percentage bands for ranks 1, 2 and 3
pub const DISPLAY_BANDS: [(u8, u8); 3] = [(86, 92), (44, 60), (12, 30)];

/// Shown for ranks past the last band
pub const FALLBACK_PERCENT: u8 = 50;

/// Peak jitter in percentage points
const JITTER: f64 = 2.0;

/// Deterministic value in [-1, 1) from the chord sequence
fn jitter_unit(chords: &[ChordSymbol]) -> f64 {
    let mut hasher = Sha256::new();
    for chord in chords {
        hasher.update(chord.as_str().as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let u = u64::from_be_bytes(head) as f64 / u64::MAX as f64;
    2.0 * u - 1.0
}

fn place(band: (u8, u8), t: f64, chords: &[ChordSymbol]) -> u8 {
    let (lo, hi) = (band.0 as f64, band.1 as f64);
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pct = lo + t * (hi - lo) + JITTER * jitter_unit(chords);
    pct.round().clamp(lo, hi) as u8
}

/// Map ranked results (best first) to display percentages.
///
/// Rank 1 is placed by its own score. Ranks 2 and 3 are placed by an even
/// mix of score relative to rank 1 and novelty (one minus similarity to
/// rank 1). Later ranks get [`FALLBACK_PERCENT`].
pub fn bucketize(ranked: &[Candidate]) -> Vec<u8> {
    let Some(top) = ranked.first() else {
        return Vec::new();
    };
    let top_score = top.score;

    ranked
        .iter()
        .enumerate()
        .map(|(rank, c)| match DISPLAY_BANDS.get(rank) {
            Some(&band) if rank == 0 => place(band, top_score, &c.chords),
            Some(&band) => {
                let relative = if top_score > 0.0 { c.score / top_score } else { 1.0 };
                let novelty = 1.0 - similarity(&c.chords, &top.chords);
                place(band, 0.5 * relative.clamp(0.0, 1.0) + 0.5 * novelty, &c.chords)
            }
            None => FALLBACK_PERCENT,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::parse_progression;

    fn cand(s: &str, score: f64) -> Candidate {
        Candidate::new(parse_progression(&s.split_whitespace().collect::<Vec<_>>()).unwrap(), score)
    }

    #[test]
    fn test_bands_contain_results() {
        let pools = [
            vec![cand("C G Am F", 0.94), cand("C Am F G", 0.93), cand("Am F C G", 0.2)],
            vec![cand("D5 C5 G5 D5", 1.0), cand("D5 G5 A5 D5", 1.0), cand("D5 C5 G5 D5", 0.0)],
            vec![cand("C", 0.0), cand("C", 0.0), cand("G", f64::NAN)],
            vec![cand("Dm G7 C", -3.0), cand("Em A7 D", 7.0), cand("Bb7 Eb", 0.5)],
        ];
        for pool in &pools {
            let shown = bucketize(pool);
            assert_eq!(shown.len(), 3);
            for (pct, (lo, hi)) in shown.iter().zip(DISPLAY_BANDS) {
                assert!((lo..=hi).contains(pct), "{} not in {}..={}", pct, lo, hi);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let pool = vec![cand("C G Am F", 0.94), cand("C Am F G", 0.7)];
        assert_eq!(bucketize(&pool), bucketize(&pool));
    }

    #[test]
    fn test_fewer_and_more_than_three() {
        assert!(bucketize(&[]).is_empty());
        assert_eq!(bucketize(&[cand("C", 0.5)]).len(), 1);

        let pool: Vec<Candidate> = ["C", "D", "E", "F", "G"].iter().map(|r| cand(r, 0.5)).collect();
        let shown = bucketize(&pool);
        assert_eq!(shown[3], FALLBACK_PERCENT);
        assert_eq!(shown[4], FALLBACK_PERCENT);
    }

    #[test]
    fn test_top_score_moves_within_band() {
        let low = bucketize(&[cand("C G Am F", 0.0)])[0];
        let high = bucketize(&[cand("C G Am F", 1.0)])[0];
        assert!(high > low);
    }

    #[test]
    fn test_jitter_depends_on_chords() {
        let a = jitter_unit(&cand("C G Am F", 0.0).chords);
        let b = jitter_unit(&cand("C G Am G", 0.0).chords);
        assert_ne!(a, b);
        assert!((-1.0..=1.0).contains(&a));
    }
}
