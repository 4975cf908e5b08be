// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory primitives for chordsmith.
//!
//! Pitch classes, keys, chord symbols and scale degrees. Everything here is
//! a plain lookup or value type with no state.

pub mod chord;
pub mod degree;
pub mod note;
pub mod scale;

pub use chord::{format_progression, parse_progression, split_root, ChordSymbol, Quality};
pub use degree::{realize, romanize, Degree};
pub use note::Note;
pub use scale::{Key, Mode, MAJOR_SCALE};
