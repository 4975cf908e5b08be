// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Maximal-marginal-relevance selection of a diverse top-k.
//!
//! Similarity between two progressions is position-wise: only the
//! overlapping length is compared, chord by chord.

use tracing::debug;

use crate::music::ChordSymbol;

use super::ranking::Candidate;

/// Number of positions where `a` and `b` hold different chords,
/// counted over their overlapping length
pub fn difference(a: &[ChordSymbol], b: &[ChordSymbol]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Fraction of equal chords over the overlapping length; 0.0 if either is empty
pub fn similarity(a: &[ChordSymbol], b: &[ChordSymbol]) -> f64 {
    let overlap = a.len().min(b.len());
    if overlap == 0 {
        return 0.0;
    }
    let same = a.iter().zip(b).filter(|(x, y)| x == y).count();
    same as f64 / overlap as f64
}

/// Pick up to `k` candidates balancing score against similarity.
///
/// The first pick is the best-scoring candidate at least `min_diff`
/// positions away from everything in `already`. Later picks maximize
/// `lambda * score - (1 - lambda) * max_similarity` against `already` and
/// the picks so far, among candidates that still clear the floor. When
/// nothing clears it the floor drops by one, at most `min_diff` times over
/// the whole selection. If nothing qualifies after that, fewer than `k`
/// results come back.
pub fn select_diverse(
    candidates: &[Candidate],
    k: usize,
    lambda: f64,
    already: &[Vec<ChordSymbol>],
    min_diff: usize,
) -> Vec<Candidate> {
    let lambda = lambda.clamp(0.0, 1.0);

    let mut pool: Vec<&Candidate> = candidates.iter().collect();
    pool.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut taken = vec![false; pool.len()];
    let mut selected: Vec<Candidate> = Vec::with_capacity(k);
    let mut floor = min_diff;
    let mut relaxations = 0;

    while selected.len() < k && taken.iter().any(|t| !t) {
        let references: Vec<&[ChordSymbol]> = already
            .iter()
            .map(Vec::as_slice)
            .chain(selected.iter().map(|c| c.chords.as_slice()))
            .collect();

        let eligible = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| !taken[*i])
            .filter(|(_, c)| references.iter().all(|r| difference(&c.chords, r) >= floor));

        let pick = if selected.is_empty() {
            eligible.map(|(i, _)| i).next()
        } else {
            let mut best: Option<(usize, f64)> = None;
            for (i, c) in eligible {
                let max_sim = references
                    .iter()
                    .map(|r| similarity(&c.chords, r))
                    .fold(0.0, f64::max);
                let mmr = lambda * c.score - (1.0 - lambda) * max_sim;
                if best.map_or(true, |(_, b)| mmr > b) {
                    best = Some((i, mmr));
                }
            }
            best.map(|(i, _)| i)
        };

        match pick {
            Some(i) => {
                taken[i] = true;
                selected.push(pool[i].clone());
            }
            None if relaxations < min_diff => {
                floor -= 1;
                relaxations += 1;
                debug!(floor, "relaxed diversity floor");
            }
            None => break,
        }
    }

    debug!(requested = k, selected = selected.len(), floor, "diverse selection");
    selected
}
