// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for chordsmith.
//!
//! Everything has a default, so an empty YAML document is a valid
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::LeadDensity;
use crate::engine::{RuleWeights, TEMPLATE_LEN};
use crate::error::ChordError;
use crate::model::{ModelRegistry, DEFAULT_WINDOW};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChordsmithConfig {
    /// Candidate ranking and selection
    #[serde(default)]
    pub prediction: PredictionConfig,
    /// Model artifact location
    #[serde(default)]
    pub models: ModelsConfig,
    /// Tunable rule constants
    #[serde(default)]
    pub scoring: RuleWeights,
    /// MIDI arrangement defaults
    #[serde(default)]
    pub arrangement: ArrangementConfig,
}

impl ChordsmithConfig {
    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")?
        };
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::error::Result<()> {
        let p = &self.prediction;
        if p.k == 0 {
            return Err(ChordError::Config("prediction.k must be at least 1".to_string()));
        }
        for (name, value) in [("prediction.blend_alpha", p.blend_alpha), ("prediction.mmr_lambda", p.mmr_lambda)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChordError::Config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if !(0.0..=1.0).contains(&self.scoring.rock_power_weight) {
            return Err(ChordError::Config(format!(
                "scoring.rock_power_weight must be within [0, 1], got {}",
                self.scoring.rock_power_weight
            )));
        }

        let a = &self.arrangement;
        if !(20.0..=300.0).contains(&a.tempo) {
            return Err(ChordError::Config(format!("arrangement.tempo must be 20-300 BPM, got {}", a.tempo)));
        }
        if a.repeat == 0 || a.bars_per_chord == 0 {
            return Err(ChordError::Config(
                "arrangement.repeat and arrangement.bars_per_chord must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Model registry for the configured directory; empty without one
    pub fn registry(&self) -> ModelRegistry {
        match &self.models.dir {
            Some(dir) => ModelRegistry::new(dir.clone(), self.models.window),
            None => ModelRegistry::empty(),
        }
    }
}

/// Prediction pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionConfig {
    /// Results returned
    #[serde(default = "default_k")]
    pub k: usize,
    /// Chords per progression; 0 means the template length
    #[serde(default = "default_length")]
    pub length: usize,
    /// Size of the rule-only pool
    #[serde(default = "default_rule_pool")]
    pub rule_pool: usize,
    /// Size of the model-blended pool
    #[serde(default = "default_blend_pool")]
    pub blend_pool: usize,
    /// Rule weight inside the blended pool
    #[serde(default = "default_blend_alpha")]
    pub blend_alpha: f64,
    #[serde(default = "default_mmr_lambda")]
    pub mmr_lambda: f64,
    /// Minimum position-wise difference between results
    #[serde(default = "default_min_diff")]
    pub min_diff: usize,
}

fn default_k() -> usize {
    3
}
fn default_length() -> usize {
    TEMPLATE_LEN
}
fn default_rule_pool() -> usize {
    8
}
fn default_blend_pool() -> usize {
    64
}
fn default_blend_alpha() -> f64 {
    0.5
}
fn default_mmr_lambda() -> f64 {
    0.55
}
fn default_min_diff() -> usize {
    3
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            length: default_length(),
            rule_pool: default_rule_pool(),
            blend_pool: default_blend_pool(),
            blend_alpha: default_blend_alpha(),
            mmr_lambda: default_mmr_lambda(),
            min_diff: default_min_diff(),
        }
    }
}

/// Where per-genre model artifacts live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelsConfig {
    /// Directory containing one subdirectory per genre
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Context window of the harmony evaluator
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            window: default_window(),
        }
    }
}

/// Arrangement defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrangementConfig {
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Times the progression is played
    #[serde(default = "default_repeat")]
    pub repeat: usize,
    #[serde(default = "default_bars_per_chord")]
    pub bars_per_chord: usize,
    /// Lead line density, off when absent
    #[serde(default)]
    pub lead: Option<LeadDensity>,
}

fn default_tempo() -> f64 {
    120.0
}
fn default_repeat() -> usize {
    6
}
fn default_bars_per_chord() -> usize {
    1
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            tempo: default_tempo(),
            repeat: default_repeat(),
            bars_per_chord: default_bars_per_chord(),
            lead: None,
        }
    }
}
