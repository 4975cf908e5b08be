// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Top-k ranking of candidates, optionally blended with an external scorer.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::music::{romanize, ChordSymbol, Degree};

use super::candidates::{generate_candidates, parse_roots};
use super::key::infer_key;
use super::rules::RuleWeights;
use super::template::{pick_anchor, TEMPLATE_LEN};
use super::Genre;

/// An external progression scorer, e.g. a sequence model.
///
/// Returns a value expected in [0, 1]. Callers never propagate scorer
/// errors; a failed or non-finite score counts as 0.0.
pub trait ProgressionScorer {
    fn score(&self, progression: &[ChordSymbol]) -> Result<f64>;
}

impl<F> ProgressionScorer for F
where
    F: Fn(&[ChordSymbol]) -> Result<f64>,
{
    fn score(&self, progression: &[ChordSymbol]) -> Result<f64> {
        self(progression)
    }
}

/// A scored progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub chords: Vec<ChordSymbol>,
    pub score: f64,
}

impl Candidate {
    pub fn new(chords: Vec<ChordSymbol>, score: f64) -> Self {
        Self { chords, score }
    }
}

/// Options for [`generate_topk`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopK {
    /// Chords per progression, independent of the seed length
    pub length: usize,
    /// Maximum number of results
    pub k: usize,
    /// Rule weight when a scorer is present: `alpha * rule + (1 - alpha) * model`
    pub alpha: f64,
    pub weights: RuleWeights,
}

impl Default for TopK {
    fn default() -> Self {
        Self {
            length: TEMPLATE_LEN,
            k: 3,
            alpha: 0.6,
            weights: RuleWeights::default(),
        }
    }
}

impl TopK {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Score with an external scorer, degrading to 0.0 on any failure
fn external_score(scorer: &dyn ProgressionScorer, chords: &[ChordSymbol]) -> f64 {
    match scorer.score(chords) {
        Ok(s) if s.is_finite() => s.clamp(0.0, 1.0),
        Ok(s) => {
            warn!(score = s, "scorer returned a non-finite value, using 0.0");
            0.0
        }
        Err(e) => {
            warn!(error = %e, "scorer failed, using 0.0");
            0.0
        }
    }
}

/// Generate, score and rank candidates for a seed.
///
/// Results are sorted by final score, descending. Equal scores keep
/// generation order.
pub fn generate_topk<S: AsRef<str>>(
    genre: Genre,
    seed_roots: &[S],
    opts: &TopK,
    scorer: Option<&dyn ProgressionScorer>,
) -> Vec<Candidate> {
    let alpha = opts.alpha.clamp(0.0, 1.0);

    let mut ranked: Vec<Candidate> = generate_candidates(genre, seed_roots, opts.length)
        .into_iter()
        .map(|p| {
            let rule = opts.weights.score(genre, &p.roman, &p.chords);
            let score = match scorer {
                Some(scorer) => alpha * rule + (1.0 - alpha) * external_score(scorer, &p.chords),
                None => rule,
            };
            Candidate::new(p.chords, score)
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(opts.k);

    debug!(%genre, k = opts.k, returned = ranked.len(), blended = scorer.is_some(), "ranked candidates");
    ranked
}

/// One entry of a [`ProposalReport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalEntry {
    pub chords: Vec<ChordSymbol>,
    pub roman: Vec<Degree>,
    /// Rule score rounded to three decimals
    pub score: f64,
}

/// Rule-only analysis of a seed, one proposal per base template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalReport {
    /// Inferred major key root
    pub key: String,
    pub anchor_index: usize,
    pub proposals: Vec<ProposalEntry>,
    pub notes: Vec<String>,
}

/// Build a [`ProposalReport`] with the `top` best base-template proposals
pub fn propose<S: AsRef<str>>(genre: Genre, seed_roots: &[S], top: usize) -> ProposalReport {
    let roots = parse_roots(seed_roots);
    let key = infer_key(&roots);
    let anchor_index = pick_anchor(&romanize(&roots, &key));
    let weights = RuleWeights::default();

    let mut proposals: Vec<ProposalEntry> = generate_candidates(genre, seed_roots, TopK::default().length)
        .into_iter()
        .filter(|p| p.substitution.is_none())
        .map(|p| {
            let score = weights.score(genre, &p.roman, &p.chords);
            ProposalEntry {
                score: (score * 1000.0).round() / 1000.0,
                chords: p.chords,
                roman: p.roman,
            }
        })
        .collect();

    proposals.sort_by(|a, b| b.score.total_cmp(&a.score));
    proposals.truncate(top);

    ProposalReport {
        key: key.root.name().to_string(),
        anchor_index,
        proposals,
        notes: vec![
            format!("inferred_key={}", key),
            "qualities auto-assigned per-genre".to_string(),
        ],
    }
}
