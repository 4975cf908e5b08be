// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-genre chord quality policy and chord realization.

use crate::music::{realize, ChordSymbol, Degree, Key, Quality};

use super::Genre;

/// Chord quality a genre assigns to a scale degree
pub fn quality_for_degree(genre: Genre, degree: Degree) -> Quality {
    match genre {
        Genre::Jazz => match degree {
            Degree::V => Quality::Dominant7,
            Degree::II | Degree::III | Degree::VI => Quality::Minor,
            Degree::VII => Quality::Diminished,
            _ => Quality::Major,
        },
        Genre::Pop => match degree {
            Degree::II | Degree::III | Degree::VI => Quality::Minor,
            Degree::VII => Quality::Diminished,
            _ => Quality::Major,
        },
        // Power chords throughout
        Genre::Rock => Quality::Power,
    }
}

/// Turn a degree sequence into chord symbols in `key` under the genre's policy
pub fn realize_progression(degrees: &[Degree], key: &Key, genre: Genre) -> Vec<ChordSymbol> {
    realize(degrees, key)
        .into_iter()
        .zip(degrees)
        .map(|(root, &degree)| {
            let quality = if degree.is_known() {
                quality_for_degree(genre, degree)
            } else {
                Quality::Major
            };
            ChordSymbol::new(root, quality)
        })
        .collect()
}
