// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Learned next-chord models used as an optional progression scorer.
//!
//! Artifacts live in one directory per genre:
//!
//! ```text
//! <dir>/<genre>/chord_to_index.json   {"Cmaj": 0, ...}
//! <dir>/<genre>/index_to_chord.json   {"0": "Cmaj", ...}
//! <dir>/<genre>/transitions.json      {"logits": [[...], ...]}
//! ```

pub mod harmony;
pub mod registry;
pub mod transition;
pub mod vocab;

pub use harmony::{evaluate_progression, interpret_score, HarmonyGrade, DEFAULT_WINDOW};
pub use registry::{ChordModel, ModelRegistry};
pub use transition::{SequenceModel, TransitionModel};
pub use vocab::Vocabulary;
