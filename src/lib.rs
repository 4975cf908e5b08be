// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chordsmith - chord-progression continuation and procedural arrangement.
//!
//! A seed of up to three chords and a genre go in; a short list of
//! continuations comes out, ranked by genre rules, optionally blended with
//! a learned next-chord model, and picked for diversity. A chosen
//! progression can then be arranged into a multi-track MIDI file.

pub mod arrangement;
pub mod config;
pub mod engine;
pub mod error;
pub mod midi;
pub mod model;
pub mod music;
pub mod predict;

pub use arrangement::{arrange, ArrangeOptions, Arrangement, DrumStyle, LeadDensity};
pub use config::ChordsmithConfig;
pub use engine::{generate_topk, propose, Candidate, Genre, ProgressionScorer, TopK};
pub use error::{ChordError, Result};
pub use model::{ChordModel, ModelRegistry};
pub use music::{ChordSymbol, Key, Note};
pub use predict::{Prediction, PredictionService};
