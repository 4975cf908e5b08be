// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord-progression candidate engine.
//!
//! Given a short seed of chord roots and a genre, the engine infers a key,
//! aligns the genre's fixed templates to the seed, realizes them into chord
//! symbols, scores them with genre heuristics (optionally blended with an
//! external model score), and picks a diverse top-k for display.
//!
//! Every call is request-scoped and deterministic; nothing here keeps state.

pub mod candidates;
pub mod display;
pub mod diversity;
pub mod key;
pub mod quality;
pub mod ranking;
pub mod rules;
pub mod template;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChordError;

pub use candidates::{generate_candidates, Proposal};
pub use display::{bucketize, DISPLAY_BANDS};
pub use diversity::{difference, select_diverse, similarity};
pub use key::infer_key;
pub use quality::{quality_for_degree, realize_progression};
pub use ranking::{generate_topk, propose, Candidate, ProgressionScorer, ProposalReport, TopK};
pub use rules::{rule_score, RuleWeights};
pub use template::{pick_anchor, rotate_to_anchor, templates_for, TEMPLATE_LEN};

/// Supported genres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Jazz,
    Pop,
    Rock,
}

impl Genre {
    pub const ALL: [Genre; 3] = [Genre::Jazz, Genre::Pop, Genre::Rock];

    pub fn name(self) -> &'static str {
        match self {
            Genre::Jazz => "jazz",
            Genre::Pop => "pop",
            Genre::Rock => "rock",
        }
    }
}

impl FromStr for Genre {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jazz" => Ok(Genre::Jazz),
            "pop" => Ok(Genre::Pop),
            "rock" => Ok(Genre::Rock),
            _ => Err(ChordError::UnknownGenre(s.to_string())),
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
