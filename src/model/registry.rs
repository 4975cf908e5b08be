// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-genre model bundles and their lazily loaded registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::engine::{Genre, ProgressionScorer};
use crate::error::{ChordError, Result};
use crate::music::ChordSymbol;

use super::harmony::{evaluate_progression, DEFAULT_WINDOW};
use super::transition::{SequenceModel, TransitionModel};
use super::vocab::Vocabulary;

/// A genre's vocabulary and sequence model
#[derive(Debug, Clone)]
pub struct ChordModel {
    pub vocab: Vocabulary,
    pub model: TransitionModel,
    pub window: usize,
}

impl ChordModel {
    pub fn new(vocab: Vocabulary, model: TransitionModel, window: usize) -> Result<Self> {
        if vocab.len() != model.vocab_size() {
            return Err(ChordError::Config(format!(
                "vocabulary has {} chords but the model predicts over {}",
                vocab.len(),
                model.vocab_size()
            )));
        }
        Ok(Self { vocab, model, window })
    }

    /// Load the three artifact files from one genre directory
    pub fn load(dir: &Path, window: usize) -> Result<Self> {
        let wrap = |e: ChordError| ChordError::ModelLoad {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        };
        let vocab = Vocabulary::load(dir).map_err(wrap)?;
        let model = TransitionModel::load(dir).map_err(wrap)?;
        Self::new(vocab, model, window).map_err(wrap)
    }

    /// Harmony score of chord symbols, canonicalized to the vocabulary first
    pub fn evaluate<S: AsRef<str>>(&self, progression: &[S]) -> f64 {
        let tokens: Vec<String> = progression
            .iter()
            .map(|c| self.vocab.canonicalize(c.as_ref()).0)
            .collect();
        evaluate_progression(&self.model, &self.vocab, &tokens, self.window)
    }
}

impl ProgressionScorer for ChordModel {
    fn score(&self, progression: &[ChordSymbol]) -> Result<f64> {
        if self.vocab.is_empty() {
            return Err(ChordError::Scorer("model vocabulary is empty".to_string()));
        }
        Ok(self.evaluate(progression))
    }
}

/// Models keyed by genre, loaded on first use and shared read-only after.
///
/// A genre whose artifacts are missing or broken is remembered as absent
/// and not retried.
#[derive(Debug)]
pub struct ModelRegistry {
    dir: Option<PathBuf>,
    window: usize,
    models: Mutex<HashMap<Genre, Option<Arc<ChordModel>>>>,
}

impl ModelRegistry {
    /// Registry reading `<dir>/<genre>/`
    pub fn new(dir: impl Into<PathBuf>, window: usize) -> Self {
        Self {
            dir: Some(dir.into()),
            window,
            models: Mutex::new(HashMap::new()),
        }
    }

    /// Registry with no model directory; every lookup yields `None`
    pub fn empty() -> Self {
        Self {
            dir: None,
            window: DEFAULT_WINDOW,
            models: Mutex::new(HashMap::new()),
        }
    }

    /// Register an already built model for a genre
    pub fn insert(&self, genre: Genre, model: ChordModel) {
        self.models
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(genre, Some(Arc::new(model)));
    }

    /// Model for a genre, loading it on first request
    pub fn get(&self, genre: Genre) -> Option<Arc<ChordModel>> {
        let mut models = self.models.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = models.get(&genre) {
            return cached.clone();
        }

        let loaded = self.dir.as_ref().and_then(|dir| {
            let path = dir.join(genre.name());
            match ChordModel::load(&path, self.window) {
                Ok(model) => {
                    info!(%genre, path = %path.display(), vocab = model.vocab.len(), "loaded chord model");
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!(%genre, error = %e, "chord model unavailable, using rules only");
                    None
                }
            }
        });

        models.insert(genre, loaded.clone());
        loaded
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
