// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Next-chord sequence models.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChordError, Result};

pub const TRANSITIONS_FILE: &str = "transitions.json";

/// Predicts a distribution over the next chord index
pub trait SequenceModel {
    /// Number of chord indices the model predicts over
    fn vocab_size(&self) -> usize;

    /// Probabilities of every next index given the context (oldest first).
    /// The result has `vocab_size()` entries summing to 1.
    fn next_probabilities(&self, context: &[usize]) -> Vec<f64>;
}

/// First-order model: a row of logits per previous chord.
///
/// Only the last context index matters. An empty or out-of-range context
/// predicts uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionModel {
    logits: Vec<Vec<f32>>,
}

impl TransitionModel {
    /// Build from a square logits matrix
    pub fn from_logits(logits: Vec<Vec<f32>>) -> Result<Self> {
        let n = logits.len();
        if let Some((row, bad)) = logits.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(ChordError::Config(format!(
                "transition row {} has {} entries, expected {}",
                row,
                bad.len(),
                n
            )));
        }
        if logits.iter().flatten().any(|x| !x.is_finite()) {
            return Err(ChordError::Config("transition logits must be finite".to_string()));
        }
        Ok(Self { logits })
    }

    /// Load `transitions.json` from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let text = fs::read_to_string(dir.join(TRANSITIONS_FILE))?;
        let raw: TransitionModel = serde_json::from_str(&text)?;
        Self::from_logits(raw.logits)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn softmax(row: &[f32]) -> Vec<f64> {
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = row.iter().map(|&x| (x as f64 - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl SequenceModel for TransitionModel {
    fn vocab_size(&self) -> usize {
        self.logits.len()
    }

    fn next_probabilities(&self, context: &[usize]) -> Vec<f64> {
        let n = self.vocab_size();
        match context.last().and_then(|&i| self.logits.get(i)) {
            Some(row) => softmax(row),
            None => vec![1.0 / n as f64; n],
        }
    }
}
