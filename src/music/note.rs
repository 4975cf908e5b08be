// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and their spellings.
//!
//! Input accepts both sharp and flat spellings ("C#", "Db"). Output always
//! uses one fixed spelling per pitch class so realized chord symbols compare
//! by plain string equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semitone offset type
pub type Semitones = i8;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse a root name ("C", "C#", "Db", "Bb").
    ///
    /// Letters are upper case and accidentals are `#` or a lower-case `b`,
    /// matching how roots appear at the front of a chord symbol.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim() {
            "C" => Some(Note::C),
            "C#" | "Db" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "Eb" => Some(Note::Ds),
            "E" => Some(Note::E),
            "F" => Some(Note::F),
            "F#" | "Gb" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "Ab" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "Bb" => Some(Note::As),
            "B" => Some(Note::B),
            _ => None,
        }
    }

    /// Output spelling used for realized chords
    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "Eb",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "Ab",
            Note::A => "A",
            Note::As => "Bb",
            Note::B => "B",
        }
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: Semitones) -> Self {
        let new_pc = (self.pitch_class() as i8 + semitones).rem_euclid(12) as u8;
        Note::from_pitch_class(new_pc)
    }

    /// Get interval in semitones to another note (ascending)
    pub fn interval_to(self, other: Note) -> u8 {
        (other.pitch_class() as i16 - self.pitch_class() as i16).rem_euclid(12) as u8
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_pitch_class() {
        assert_eq!(Note::C.pitch_class(), 0);
        assert_eq!(Note::A.pitch_class(), 9);
        assert_eq!(Note::B.pitch_class(), 11);
        assert_eq!(Note::from_pitch_class(14), Note::D);
    }

    #[test]
    fn test_note_from_name() {
        assert_eq!(Note::from_name("C"), Some(Note::C));
        assert_eq!(Note::from_name("C#"), Some(Note::Cs));
        assert_eq!(Note::from_name("Db"), Some(Note::Cs));
        assert_eq!(Note::from_name("Bb"), Some(Note::As));
        assert_eq!(Note::from_name("bb"), None);
        assert_eq!(Note::from_name("H"), None);
        assert_eq!(Note::from_name(""), None);
    }

    #[test]
    fn test_note_spelling() {
        assert_eq!(Note::Ds.to_string(), "Eb");
        assert_eq!(Note::Fs.to_string(), "F#");
        assert_eq!(Note::As.name(), "Bb");
    }

    #[test]
    fn test_note_transpose() {
        assert_eq!(Note::C.transpose(2), Note::D);
        assert_eq!(Note::C.transpose(12), Note::C);
        assert_eq!(Note::C.transpose(-1), Note::B);
        assert_eq!(Note::G.transpose(5), Note::C);
    }

    #[test]
    fn test_note_interval() {
        assert_eq!(Note::C.interval_to(Note::G), 7);
        assert_eq!(Note::C.interval_to(Note::C), 0);
        assert_eq!(Note::G.interval_to(Note::C), 5);
    }
}
