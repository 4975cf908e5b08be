// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI constants and standard MIDI file output.

pub mod export;

pub use export::{ExportMarker, ExportNote, ExportTrack, MidiExporter, MidiFileFormat};

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const PROGRAM_CHANGE: u8 = 0xC0;

    // Meta events (file only)
    pub const META: u8 = 0xFF;
    pub const META_TRACK_NAME: u8 = 0x03;
    pub const META_MARKER: u8 = 0x06;
    pub const META_END_OF_TRACK: u8 = 0x2F;
    pub const META_TEMPO: u8 = 0x51;
    pub const META_TIME_SIGNATURE: u8 = 0x58;
}

/// General MIDI program numbers (0-based)
pub mod gm_programs {
    pub const ACOUSTIC_GRAND_PIANO: u8 = 0;
    pub const ELECTRIC_PIANO: u8 = 4;
    pub const ELECTRIC_GUITAR_JAZZ: u8 = 26;
    pub const OVERDRIVEN_GUITAR: u8 = 29;
    pub const DISTORTION_GUITAR: u8 = 30;
    pub const ACOUSTIC_BASS: u8 = 32;
    pub const ELECTRIC_BASS_FINGER: u8 = 33;
    pub const ELECTRIC_BASS_PICK: u8 = 34;
    pub const LEAD_SQUARE: u8 = 80;
}

/// Channel reserved for percussion (channel 10, zero-based)
pub const DRUM_CHANNEL: u8 = 9;
