// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Fixed per-genre progression templates, anchor selection and rotation.

use crate::music::Degree::{self, FlatVII, I, II, IV, V, VI};

use super::Genre;

/// Length of every built-in template
pub const TEMPLATE_LEN: usize = 8;

/// A fixed roman-degree progression shape
pub type Template = [Degree; TEMPLATE_LEN];

const JAZZ_TEMPLATES: [Template; 4] = [
    [II, V, I, VI, II, V, I, V], // ii-V-I-vi | ii-V-I-V
    [II, V, I, I, II, V, I, V],  // turnaround
    [VI, II, V, I, VI, II, V, I],
    [II, V, I, IV, II, V, I, V], // subdominant touch
];

const POP_TEMPLATES: [Template; 3] = [
    [I, V, VI, IV, I, V, VI, IV],
    [VI, IV, I, V, VI, IV, I, V],
    [I, VI, IV, V, I, VI, IV, V],
];

const ROCK_TEMPLATES: [Template; 3] = [
    [I, FlatVII, IV, I, I, FlatVII, IV, V], // I-bVII-IV | I-bVII-IV-V
    [I, IV, V, I, I, IV, V, I],
    [V, IV, I, V, V, IV, I, V],
];

/// Templates belonging to a genre
pub fn templates_for(genre: Genre) -> &'static [Template] {
    match genre {
        Genre::Jazz => &JAZZ_TEMPLATES,
        Genre::Pop => &POP_TEMPLATES,
        Genre::Rock => &ROCK_TEMPLATES,
    }
}

/// Index of the seed chord the templates are aligned to.
///
/// First tonic, else first dominant, else first known degree, else 0.
pub fn pick_anchor(seed: &[Degree]) -> usize {
    seed.iter()
        .position(|&d| d == I)
        .or_else(|| seed.iter().position(|&d| d == V))
        .or_else(|| seed.iter().position(|d| d.is_known()))
        .unwrap_or(0)
}

/// Degree at the anchor, falling back to the tonic
pub fn anchor_degree(seed: &[Degree]) -> Degree {
    match seed.get(pick_anchor(seed)) {
        Some(&d) if d.is_known() => d,
        _ => I,
    }
}

/// Rotate a template so it starts at the first occurrence of `anchor`.
/// A template without that degree is returned unchanged.
pub fn rotate_to_anchor(template: &[Degree], anchor: Degree) -> Vec<Degree> {
    let mut rotated = template.to_vec();
    if let Some(start) = template.iter().position(|&d| d == anchor) {
        rotated.rotate_left(start);
    }
    rotated
}

/// Cycle a degree sequence to exactly `len` entries
pub fn fit_length(degrees: &[Degree], len: usize) -> Vec<Degree> {
    if degrees.is_empty() {
        return Vec::new();
    }
    degrees.iter().copied().cycle().take(len).collect()
}
