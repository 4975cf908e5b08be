// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale membership and keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::note::Note;

/// Major scale pitch classes relative to the tonic
pub const MAJOR_SCALE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Key mode. Inference only considers major keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
}

impl Mode {
    /// Get the intervals (semitones from root) for this mode
    pub fn intervals(self) -> &'static [u8; 7] {
        match self {
            Mode::Major => &MAJOR_SCALE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A musical key with root and mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub root: Note,
    pub mode: Mode,
}

impl Key {
    /// Create a new key
    pub fn new(root: Note, mode: Mode) -> Self {
        Self { root, mode }
    }

    /// Major key on the given root
    pub fn major(root: Note) -> Self {
        Self::new(root, Mode::Major)
    }

    /// Pitch class of `note` relative to the key root (0-11)
    pub fn relative_pc(&self, note: Note) -> u8 {
        self.root.interval_to(note)
    }

    /// Check if a note belongs to the key's scale
    pub fn contains(&self, note: Note) -> bool {
        self.mode.intervals().contains(&self.relative_pc(note))
    }

    /// Note at a relative pitch class from the root
    pub fn note_at(&self, relative_pc: u8) -> Note {
        self.root.transpose((relative_pc % 12) as i8)
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::major(Note::C)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_intervals() {
        assert_eq!(Mode::Major.intervals(), &[0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn test_key_contains() {
        let c_major = Key::major(Note::C);
        assert!(c_major.contains(Note::C));
        assert!(c_major.contains(Note::G));
        assert!(!c_major.contains(Note::Cs));
        assert!(!c_major.contains(Note::Fs));

        let d_major = Key::major(Note::D);
        assert!(d_major.contains(Note::Fs));
        assert!(!d_major.contains(Note::F));
    }

    #[test]
    fn test_relative_pc() {
        let g_major = Key::major(Note::G);
        assert_eq!(g_major.relative_pc(Note::D), 7);
        assert_eq!(g_major.relative_pc(Note::C), 5);
        assert_eq!(g_major.note_at(10), Note::F);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::major(Note::As).to_string(), "Bb major");
        assert_eq!(Key::default(), Key::major(Note::C));
    }
}
