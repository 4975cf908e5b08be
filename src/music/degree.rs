// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale degrees relative to a major key.
//!
//! Romanization maps absolute roots to degrees; realization maps degrees
//! back to absolute roots. Neither direction fails: unmappable input becomes
//! [`Degree::Unknown`], and `Unknown` realizes to the key root.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::note::Note;
use super::scale::Key;

/// A chord's scale position in a major key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", from = "i8")]
pub enum Degree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    /// Borrowed flat seventh (bVII)
    FlatVII,
    /// Root outside the diatonic table
    Unknown,
}

impl Degree {
    /// Degree of a pitch class relative to the tonic.
    ///
    /// Only the seven diatonic pitch classes map; everything else, the flat
    /// seventh included, is `Unknown`.
    pub fn from_relative_pc(relative_pc: u8) -> Self {
        match relative_pc % 12 {
            0 => Degree::I,
            2 => Degree::II,
            4 => Degree::III,
            5 => Degree::IV,
            7 => Degree::V,
            9 => Degree::VI,
            11 => Degree::VII,
            _ => Degree::Unknown,
        }
    }

    /// Pitch class above the tonic, `None` for `Unknown`
    pub fn relative_pc(self) -> Option<u8> {
        match self {
            Degree::I => Some(0),
            Degree::II => Some(2),
            Degree::III => Some(4),
            Degree::IV => Some(5),
            Degree::V => Some(7),
            Degree::VI => Some(9),
            Degree::VII => Some(11),
            Degree::FlatVII => Some(10),
            Degree::Unknown => None,
        }
    }

    /// Numeric encoding: 1..7, -7 for bVII, -1 for unknown
    pub fn number(self) -> i8 {
        match self {
            Degree::I => 1,
            Degree::II => 2,
            Degree::III => 3,
            Degree::IV => 4,
            Degree::V => 5,
            Degree::VI => 6,
            Degree::VII => 7,
            Degree::FlatVII => -7,
            Degree::Unknown => -1,
        }
    }

    /// Inverse of [`Degree::number`]; anything unrecognized is `Unknown`
    pub fn from_number(n: i8) -> Self {
        match n {
            1 => Degree::I,
            2 => Degree::II,
            3 => Degree::III,
            4 => Degree::IV,
            5 => Degree::V,
            6 => Degree::VI,
            7 => Degree::VII,
            -7 => Degree::FlatVII,
            _ => Degree::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Degree::Unknown
    }

    /// Roman numeral text
    pub fn roman(self) -> &'static str {
        match self {
            Degree::I => "I",
            Degree::II => "II",
            Degree::III => "III",
            Degree::IV => "IV",
            Degree::V => "V",
            Degree::VI => "VI",
            Degree::VII => "VII",
            Degree::FlatVII => "bVII",
            Degree::Unknown => "?",
        }
    }
}

impl From<Degree> for i8 {
    fn from(degree: Degree) -> Self {
        degree.number()
    }
}

impl From<i8> for Degree {
    fn from(n: i8) -> Self {
        Degree::from_number(n)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.roman())
    }
}

/// Map optional roots to degrees in `key`
pub fn romanize(roots: &[Option<Note>], key: &Key) -> Vec<Degree> {
    roots
        .iter()
        .map(|root| match root {
            Some(note) => Degree::from_relative_pc(key.relative_pc(*note)),
            None => Degree::Unknown,
        })
        .collect()
}

/// Map degrees back to absolute roots in `key`
pub fn realize(degrees: &[Degree], key: &Key) -> Vec<Note> {
    degrees
        .iter()
        .map(|degree| match degree.relative_pc() {
            Some(pc) => key.note_at(pc),
            None => key.root,
        })
        .collect()
}
