// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes arrangements as Type 0 or Type 1 MIDI files, including marker
//! meta events for chord changes.

use std::fs;
use std::io;
use std::path::Path;

use super::messages;

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MidiFileFormat {
    /// Type 0: Single track with all channels
    Type0,
    /// Type 1: Multiple simultaneous tracks
    #[default]
    Type1,
}

/// A track for export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTrack {
    /// Track name
    pub name: String,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Notes in this track
    pub notes: Vec<ExportNote>,
    /// Marker meta events in this track
    pub markers: Vec<ExportMarker>,
    /// Program change at start (None = no change)
    pub program: Option<u8>,
}

impl ExportTrack {
    /// Create a new export track
    pub fn new(name: impl Into<String>, channel: u8) -> Self {
        Self {
            name: name.into(),
            channel,
            notes: Vec::new(),
            markers: Vec::new(),
            program: None,
        }
    }

    /// Add a note
    pub fn add_note(&mut self, note: ExportNote) {
        self.notes.push(note);
    }

    /// Add a marker
    pub fn add_marker(&mut self, tick: u64, text: impl Into<String>) {
        self.markers.push(ExportMarker {
            tick,
            text: text.into(),
        });
    }

    /// Set program
    pub fn with_program(mut self, program: u8) -> Self {
        self.program = Some(program);
        self
    }

    /// Sort notes by tick
    pub fn sort(&mut self) {
        self.notes.sort_by_key(|n| (n.tick, n.note));
        self.markers.sort_by_key(|m| m.tick);
    }
}

/// A note for export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportNote {
    /// Start tick
    pub tick: u64,
    /// Note number (0-127)
    pub note: u8,
    /// Velocity (1-127)
    pub velocity: u8,
    /// Duration in ticks
    pub duration: u64,
}

impl ExportNote {
    /// Create a new export note
    pub fn new(tick: u64, note: u8, velocity: u8, duration: u64) -> Self {
        Self {
            tick,
            note,
            velocity,
            duration,
        }
    }

    /// End tick
    pub fn end_tick(&self) -> u64 {
        self.tick + self.duration
    }
}

/// A marker meta event (text at a tick)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMarker {
    pub tick: u64,
    pub text: String,
}

/// MIDI event for export
#[derive(Debug, Clone)]
struct MidiExportEvent {
    /// Absolute tick
    tick: u64,
    /// Ordering among events on the same tick; lower goes first
    order: u8,
    /// Event data
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn meta(tick: u64, kind: u8, payload: &[u8]) -> Self {
        let mut data = vec![messages::META, kind];
        write_variable_length(&mut data, payload.len() as u32);
        data.extend_from_slice(payload);
        Self { tick, order: 0, data }
    }

    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            order: 3,
            data: vec![messages::NOTE_ON | (channel & 0x0F), note & 0x7F, velocity.clamp(1, 127)],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            order: 2,
            data: vec![messages::NOTE_OFF | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn program_change(tick: u64, channel: u8, program: u8) -> Self {
        Self {
            tick,
            order: 1,
            data: vec![messages::PROGRAM_CHANGE | (channel & 0x0F), program & 0x7F],
        }
    }

    fn tempo(tick: u64, bpm: f64) -> Self {
        let microseconds = (60_000_000.0 / bpm) as u32;
        Self::meta(tick, messages::META_TEMPO, &microseconds.to_be_bytes()[1..])
    }

    fn time_signature(tick: u64, numerator: u8, denominator: u8) -> Self {
        // Denominator is expressed as power of 2
        let denom_power = (denominator as f64).log2() as u8;
        Self::meta(
            tick,
            messages::META_TIME_SIGNATURE,
            &[
                numerator,
                denom_power,
                24, // MIDI clocks per metronome click
                8,  // 32nd notes per MIDI quarter note
            ],
        )
    }

    fn track_name(tick: u64, name: &str) -> Self {
        Self::meta(tick, messages::META_TRACK_NAME, name.as_bytes())
    }

    fn marker(tick: u64, text: &str) -> Self {
        Self::meta(tick, messages::META_MARKER, text.as_bytes())
    }

    fn end_of_track() -> Self {
        Self {
            tick: 0, // Will be set correctly during writing
            order: 0,
            data: vec![messages::META, messages::META_END_OF_TRACK, 0x00],
        }
    }
}

/// Write variable-length quantity
fn write_variable_length(out: &mut Vec<u8>, mut value: u32) {
    let mut bytes = Vec::with_capacity(4);

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    out.extend_from_slice(&bytes);
}

/// Channel and marker events of one track
fn track_events(track: &ExportTrack) -> Vec<MidiExportEvent> {
    let mut events = Vec::with_capacity(track.notes.len() * 2 + track.markers.len() + 1);

    if let Some(program) = track.program {
        events.push(MidiExportEvent::program_change(0, track.channel, program));
    }

    for marker in &track.markers {
        events.push(MidiExportEvent::marker(marker.tick, &marker.text));
    }

    for note in &track.notes {
        events.push(MidiExportEvent::note_on(note.tick, track.channel, note.note, note.velocity));
        events.push(MidiExportEvent::note_off(note.end_tick(), track.channel, note.note));
    }

    events
}

/// MIDI file exporter
#[derive(Debug, Clone)]
pub struct MidiExporter {
    /// File format
    format: MidiFileFormat,
    /// PPQN (ticks per quarter note)
    ppqn: u16,
    /// Tempo in BPM
    tempo: f64,
    /// Time signature
    time_sig: (u8, u8),
    /// Tracks to export
    tracks: Vec<ExportTrack>,
}

impl MidiExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self {
            format: MidiFileFormat::Type1,
            ppqn: 480,
            tempo: 120.0,
            time_sig: (4, 4),
            tracks: Vec::new(),
        }
    }

    /// Get format
    pub fn format(&self) -> MidiFileFormat {
        self.format
    }

    /// Set format
    pub fn set_format(&mut self, format: MidiFileFormat) {
        self.format = format;
    }

    /// Set PPQN
    pub fn set_ppqn(&mut self, ppqn: u16) {
        self.ppqn = ppqn.max(1);
    }

    /// Get PPQN
    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Set tempo
    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo = bpm.clamp(20.0, 300.0);
    }

    /// Get tempo
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Set time signature
    pub fn set_time_signature(&mut self, numerator: u8, denominator: u8) {
        self.time_sig = (numerator.max(1), denominator.max(1));
    }

    /// Get time signature
    pub fn time_signature(&self) -> (u8, u8) {
        self.time_sig
    }

    /// Add a track
    pub fn add_track(&mut self, track: ExportTrack) {
        self.tracks.push(track);
    }

    /// Get tracks
    pub fn tracks(&self) -> &[ExportTrack] {
        &self.tracks
    }

    /// Export to file
    pub fn export<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.to_bytes())
    }

    /// Serialize the whole file
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self.format {
            MidiFileFormat::Type0 => self.write_type0(&mut out),
            MidiFileFormat::Type1 => self.write_type1(&mut out),
        }
        out
    }

    fn conductor_events(&self) -> Vec<MidiExportEvent> {
        vec![
            MidiExportEvent::tempo(0, self.tempo),
            MidiExportEvent::time_signature(0, self.time_sig.0, self.time_sig.1),
        ]
    }

    /// Write Type 0 MIDI file (single track)
    fn write_type0(&self, out: &mut Vec<u8>) {
        let mut events = self.conductor_events();
        for track in &self.tracks {
            events.extend(track_events(track));
        }

        self.write_header(out, 0, 1);
        self.write_track(out, events);
    }

    /// Write Type 1 MIDI file (tempo track plus one per track)
    fn write_type1(&self, out: &mut Vec<u8>) {
        let num_tracks = self.tracks.len() + 1;
        self.write_header(out, 1, num_tracks as u16);

        let mut tempo_events = self.conductor_events();
        tempo_events.push(MidiExportEvent::track_name(0, "Tempo"));
        self.write_track(out, tempo_events);

        for track in &self.tracks {
            let mut events = vec![MidiExportEvent::track_name(0, &track.name)];
            events.extend(track_events(track));
            self.write_track(out, events);
        }
    }

    /// Write MIDI file header chunk
    fn write_header(&self, out: &mut Vec<u8>, format: u16, num_tracks: u16) {
        out.extend_from_slice(b"MThd");
        // Chunk length (always 6)
        out.extend_from_slice(&6u32.to_be_bytes());
        out.extend_from_slice(&format.to_be_bytes());
        out.extend_from_slice(&num_tracks.to_be_bytes());
        out.extend_from_slice(&self.ppqn.to_be_bytes());
    }

    /// Write a track chunk; events are sorted here
    fn write_track(&self, out: &mut Vec<u8>, mut events: Vec<MidiExportEvent>) {
        events.sort_by_key(|e| (e.tick, e.order));

        let mut track_data = Vec::new();
        let mut last_tick = 0u64;

        for event in &events {
            let delta = event.tick.saturating_sub(last_tick);
            write_variable_length(&mut track_data, delta as u32);
            track_data.extend_from_slice(&event.data);
            last_tick = event.tick;
        }

        write_variable_length(&mut track_data, 0);
        track_data.extend_from_slice(&MidiExportEvent::end_of_track().data);

        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(track_data.len() as u32).to_be_bytes());
        out.extend_from_slice(&track_data);
    }
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new()
    }
}
