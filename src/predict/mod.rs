// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The prediction pipeline: seed in, a short labeled list of progressions out.
//!
//! The first result is always the best rule-scored progression. The rest
//! are picked for diversity from a pool blended with the genre model when
//! one is available, or from the remaining rule candidates when not.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ChordsmithConfig, PredictionConfig};
use crate::engine::display::FALLBACK_PERCENT;
use crate::engine::{bucketize, generate_topk, select_diverse, Candidate, Genre, ProgressionScorer, RuleWeights, TopK};
use crate::model::{ChordModel, ModelRegistry};

/// Seed roots used at most
pub const MAX_SEED_ROOTS: usize = 3;

pub const LABEL_STANDARD: &str = "Standard progression";
pub const LABEL_ALTERNATIVE: &str = "Alternative progression";
pub const LABEL_BASIC: &str = "Basic progression";

/// One result of [`PredictionService::predict`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub progression: Vec<String>,
    /// Display score in [0, 1] (display percentage / 100)
    pub score: f64,
    pub label: String,
}

/// Leading root name of a chord token: a letter A-G with an optional `#` or `b`
fn leading_root(token: &str) -> Option<&str> {
    let mut chars = token.char_indices();
    match chars.next() {
        Some((_, 'A'..='G')) => {}
        _ => return None,
    }
    match chars.next() {
        Some((i, '#')) | Some((i, 'b')) => Some(&token[..i + 1]),
        _ => Some(&token[..1]),
    }
}

/// Reduce seed chord tokens to at most three roots.
///
/// Blank tokens are skipped. A token without a recognizable root is kept
/// as is, so it later romanizes to an unknown degree.
pub fn seed_roots<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(|t| leading_root(t).unwrap_or(t).to_string())
        .take(MAX_SEED_ROOTS)
        .collect()
}

/// Runs the prediction pipeline against an explicit model registry
#[derive(Debug)]
pub struct PredictionService {
    settings: PredictionConfig,
    weights: RuleWeights,
    registry: ModelRegistry,
}

impl PredictionService {
    pub fn new(settings: PredictionConfig, weights: RuleWeights, registry: ModelRegistry) -> Self {
        Self {
            settings,
            weights,
            registry,
        }
    }

    /// Service using the configured settings and model directory
    pub fn from_config(config: &ChordsmithConfig) -> Self {
        Self::new(config.prediction.clone(), config.scoring, config.registry())
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Predict with the configured number of results
    pub fn predict<S: AsRef<str>>(&self, genre: Genre, seed: &[S]) -> Vec<Prediction> {
        self.predict_k(genre, seed, self.settings.k)
    }

    /// Predict up to `k` labeled progressions for a seed
    pub fn predict_k<S: AsRef<str>>(&self, genre: Genre, seed: &[S], k: usize) -> Vec<Prediction> {
        let roots = seed_roots(seed);
        let s = &self.settings;
        let base = TopK {
            length: s.length,
            k: s.rule_pool,
            alpha: 1.0,
            weights: self.weights,
        };

        let rule_pool = generate_topk(genre, &roots, &base, None);
        let Some(top) = rule_pool.first().cloned() else {
            return vec![Prediction {
                progression: roots,
                score: 0.5,
                label: LABEL_BASIC.to_string(),
            }];
        };

        let model: Option<Arc<ChordModel>> = self.registry.get(genre);
        let pool: Vec<Candidate> = match &model {
            Some(model) => {
                let blended = TopK {
                    k: s.blend_pool,
                    alpha: s.blend_alpha,
                    ..base
                };
                let scorer: &dyn ProgressionScorer = &**model;
                generate_topk(genre, &roots, &blended, Some(scorer))
                    .into_iter()
                    .filter(|c| c.chords != top.chords)
                    .collect()
            }
            None => rule_pool[1..].to_vec(),
        };

        let alternatives = select_diverse(&pool, k.saturating_sub(1), s.mmr_lambda, &[top.chords.clone()], s.min_diff);

        let mut combined = Vec::with_capacity(k);
        combined.push(top);
        combined.extend(alternatives);
        combined.truncate(k);

        let shown = bucketize(&combined);
        let predictions: Vec<Prediction> = combined
            .into_iter()
            .enumerate()
            .map(|(rank, c)| Prediction {
                progression: c.chords.iter().map(|ch| ch.as_str().to_string()).collect(),
                score: f64::from(shown.get(rank).copied().unwrap_or(FALLBACK_PERCENT)) / 100.0,
                label: if rank == 0 { LABEL_STANDARD } else { LABEL_ALTERNATIVE }.to_string(),
            })
            .collect();

        debug!(%genre, ?roots, pool = pool.len(), "prediction pools");
        info!(%genre, results = predictions.len(), model = model.is_some(), "predicted progressions");
        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::display::DISPLAY_BANDS;
    use crate::model::{TransitionModel, Vocabulary};

    fn service() -> PredictionService {
        PredictionService::new(PredictionConfig::default(), RuleWeights::default(), ModelRegistry::empty())
    }

    #[test]
    fn test_seed_roots() {
        assert_eq!(seed_roots(&["Cmaj7", "G7", "Am"]), vec!["C", "G", "A"]);
        assert_eq!(seed_roots(&["F#m", "Bb", "Ebmaj7", "D"]), vec!["F#", "Bb", "Eb"]);
        assert_eq!(seed_roots(&["", "  ", "x7", "D"]), vec!["x7", "D"]);
    }

    #[test]
    fn test_rule_only_prediction() {
        let predictions = service().predict(Genre::Pop, &["C", "G", "B"]);
        assert!(!predictions.is_empty() && predictions.len() <= 3);
        assert_eq!(predictions[0].label, LABEL_STANDARD);
        assert_eq!(predictions[0].progression, vec!["C", "G", "Am", "F", "C", "G", "Am", "F"]);
        for (p, (lo, hi)) in predictions.iter().zip(DISPLAY_BANDS) {
            let pct = (p.score * 100.0).round() as u8;
            assert!((lo..=hi).contains(&pct));
        }
        for p in &predictions[1..] {
            assert_eq!(p.label, LABEL_ALTERNATIVE);
        }
    }

    #[test]
    fn test_results_are_distinct() {
        let predictions = service().predict(Genre::Jazz, &["Dm7", "G7", "Cmaj7"]);
        assert_eq!(predictions.len(), 3);
        for (i, a) in predictions.iter().enumerate() {
            for b in &predictions[i + 1..] {
                assert_ne!(a.progression, b.progression);
            }
        }
    }

    #[test]
    fn test_short_seeds_give_full_progressions() {
        for seed in [&["C"][..], &["C", "G"][..], &["C", "G", "Am"][..]] {
            for genre in Genre::ALL {
                for p in service().predict(genre, seed) {
                    assert_eq!(p.progression.len(), 8, "{} {:?} -> {:?}", genre, seed, p.progression);
                }
            }
        }
    }

    #[test]
    fn test_ranks_past_three_show_fallback() {
        let predictions = service().predict_k(Genre::Jazz, &["D", "G", "C"], 5);
        assert_eq!(predictions.len(), 5);
        assert_eq!(predictions[3].score, 0.5);
        assert_eq!(predictions[4].score, 0.5);
    }

    #[test]
    fn test_empty_rule_pool_returns_seed() {
        let settings = PredictionConfig {
            rule_pool: 0,
            ..PredictionConfig::default()
        };
        let svc = PredictionService::new(settings, RuleWeights::default(), ModelRegistry::empty());
        let predictions = svc.predict(Genre::Rock, &["Dm", "A", "Bm"]);
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].progression, vec!["D", "A", "B"]);
        assert_eq!(predictions[0].score, 0.5);
        assert_eq!(predictions[0].label, LABEL_BASIC);
    }

    #[test]
    fn test_model_blended_alternatives() {
        let roots = ["C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B"];
        let tokens: Vec<String> = roots
            .iter()
            .flat_map(|r| ["maj", "min", "7", "dim"].map(|q| format!("{}{}", r, q)))
            .collect();
        let vocab = Vocabulary::from_tokens(&tokens).unwrap();
        let n = vocab.len();
        let model = TransitionModel::from_logits(vec![vec![0.0; n]; n]).unwrap();

        let registry = ModelRegistry::empty();
        registry.insert(Genre::Pop, ChordModel::new(vocab, model, 3).unwrap());
        let svc = PredictionService::new(PredictionConfig::default(), RuleWeights::default(), registry);

        let predictions = svc.predict(Genre::Pop, &["C", "G", "B"]);
        assert_eq!(predictions[0].progression, vec!["C", "G", "Am", "F", "C", "G", "Am", "F"]);
        assert!(predictions[1..].iter().all(|p| p.progression != predictions[0].progression));
    }
}
