// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Whole-progression plausibility under a sequence model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::transition::SequenceModel;
use super::vocab::Vocabulary;

/// Default number of preceding chords used as context
pub const DEFAULT_WINDOW: usize = 3;

const PROBABILITY_FLOOR: f64 = 1e-9;

/// Geometric mean of the model probability of each chord after the first
/// `window`, each conditioned on the `window` chords before it.
///
/// Chords outside the vocabulary use index 0. Returns 0.0 when the
/// progression is not longer than the window.
pub fn evaluate_progression<M, S>(model: &M, vocab: &Vocabulary, progression: &[S], window: usize) -> f64
where
    M: SequenceModel + ?Sized,
    S: AsRef<str>,
{
    if progression.len() <= window {
        return 0.0;
    }

    let indices: Vec<usize> = progression
        .iter()
        .map(|c| vocab.index_or_default(c.as_ref()))
        .collect();

    let log_probs: Vec<f64> = (window..indices.len())
        .map(|i| {
            let probs = model.next_probabilities(&indices[i - window..i]);
            let p = probs.get(indices[i]).copied().unwrap_or(0.0);
            p.max(PROBABILITY_FLOOR).ln()
        })
        .collect();

    (log_probs.iter().sum::<f64>() / log_probs.len() as f64).exp()
}

/// Coarse grade of a harmony score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyGrade {
    Standard,
    Popular,
    Common,
    Experimental,
}

impl HarmonyGrade {
    pub fn label(self) -> &'static str {
        match self {
            HarmonyGrade::Standard => "standard progression",
            HarmonyGrade::Popular => "popular progression",
            HarmonyGrade::Common => "fairly common",
            HarmonyGrade::Experimental => "unusual / experimental",
        }
    }
}

impl fmt::Display for HarmonyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn interpret_score(score: f64) -> HarmonyGrade {
    if score >= 0.68 {
        HarmonyGrade::Standard
    } else if score >= 0.55 {
        HarmonyGrade::Popular
    } else if score >= 0.42 {
        HarmonyGrade::Common
    } else {
        HarmonyGrade::Experimental
    }
}
