// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Procedural multi-instrument arrangement of a chord progression.
//!
//! A progression becomes a short backing track: drums, bass, a comping
//! instrument and an optional lead line, plus a track of marker events
//! naming each chord as it arrives. Everything is in 4/4 at 480 PPQN. Given the same options and
//! seed, the result is identical.

pub mod lead;
pub mod patterns;

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::ArrangementConfig;
use crate::engine::{infer_key, Genre};
use crate::error::{ChordError, Result};
use crate::midi::{gm_programs, ExportNote, ExportTrack, MidiExporter, MidiFileFormat, DRUM_CHANNEL};
use crate::music::ChordSymbol;

pub use lead::{lead_bar, LeadDensity, LeadHit, PHRASE_BARS};

pub use patterns::{
    bass_note, bass_pattern, comp_rhythm, comp_voicing, drum_voices, gm_drums, BassHit, BassTone, DrumStyle,
    DrumVoice, STEPS_PER_BAR,
};

/// Ticks per quarter note
pub const PPQN: u16 = 480;
/// Ticks in one 4/4 bar
pub const TICKS_PER_BAR: u64 = PPQN as u64 * 4;
/// Ticks in one sixteenth step
pub const TICKS_PER_STEP: u64 = TICKS_PER_BAR / STEPS_PER_BAR as u64;
/// Delay applied to swung off-beat eighths (straight to triplet position)
const SWING_DELAY: u64 = PPQN as u64 / 6;

/// Name of the marker track
pub const MARKER_TRACK: &str = "Chord Markers";
/// Marker placed at the end of the last chord
pub const END_MARKER: &str = "END";

/// Arrangement parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangeOptions {
    /// Tempo in BPM
    pub tempo: f64,
    /// Times the progression is played
    pub repeat: usize,
    /// Bars each chord lasts
    pub bars_per_chord: usize,
    /// Drum style; chosen from the genre's styles when `None`
    pub drum_style: Option<DrumStyle>,
    /// Seed for style choice and humanization
    pub seed: u64,
    pub format: MidiFileFormat,
    /// Maximum velocity deviation
    pub humanize: u8,
    /// Lead line density; no lead track when `None`
    pub lead: Option<LeadDensity>,
}

impl Default for ArrangeOptions {
    fn default() -> Self {
        Self::from_config(&ArrangementConfig::default())
    }
}

impl ArrangeOptions {
    pub fn from_config(config: &ArrangementConfig) -> Self {
        Self {
            tempo: config.tempo,
            repeat: config.repeat,
            bars_per_chord: config.bars_per_chord,
            drum_style: None,
            seed: 0,
            format: MidiFileFormat::Type1,
            humanize: 6,
            lead: config.lead,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(20.0..=300.0).contains(&self.tempo) {
            return Err(ChordError::Config(format!("tempo must be 20-300 BPM, got {}", self.tempo)));
        }
        if self.repeat == 0 || self.bars_per_chord == 0 {
            return Err(ChordError::Config("repeat and bars_per_chord must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Name of the lead track
pub const LEAD_TRACK: &str = "Lead";
const LEAD_CHANNEL: u8 = 2;

/// Comping track name and General MIDI programs (comp, bass, lead) per genre
fn instruments(genre: Genre) -> (&'static str, u8, u8, u8) {
    match genre {
        Genre::Pop => (
            "Keys",
            gm_programs::ACOUSTIC_GRAND_PIANO,
            gm_programs::ELECTRIC_BASS_FINGER,
            gm_programs::LEAD_SQUARE,
        ),
        Genre::Rock => (
            "Guitar",
            gm_programs::DISTORTION_GUITAR,
            gm_programs::ELECTRIC_BASS_PICK,
            gm_programs::OVERDRIVEN_GUITAR,
        ),
        Genre::Jazz => (
            "Comp",
            gm_programs::ELECTRIC_PIANO,
            gm_programs::ACOUSTIC_BASS,
            gm_programs::ELECTRIC_GUITAR_JAZZ,
        ),
    }
}

/// Tick of a step inside a bar
fn step_tick(bar_start: u64, step: usize, swung: bool) -> u64 {
    let mut tick = bar_start + step as u64 * TICKS_PER_STEP;
    if swung && step % 4 == 2 {
        tick += SWING_DELAY;
    }
    tick
}

/// A rendered backing track
#[derive(Debug, Clone)]
pub struct Arrangement {
    genre: Genre,
    drum_style: DrumStyle,
    tempo: f64,
    format: MidiFileFormat,
    chords: Vec<ChordSymbol>,
    total_ticks: u64,
    tracks: Vec<ExportTrack>,
}

impl Arrangement {
    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn drum_style(&self) -> DrumStyle {
        self.drum_style
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// The progression as played once
    pub fn chords(&self) -> &[ChordSymbol] {
        &self.chords
    }

    /// Length in ticks
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn tracks(&self) -> &[ExportTrack] {
        &self.tracks
    }

    /// Track by name
    pub fn track(&self, name: &str) -> Option<&ExportTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Exporter holding every track
    pub fn exporter(&self) -> MidiExporter {
        let mut exporter = MidiExporter::new();
        exporter.set_format(self.format);
        exporter.set_ppqn(PPQN);
        exporter.set_tempo(self.tempo);
        exporter.set_time_signature(4, 4);
        for track in &self.tracks {
            exporter.add_track(track.clone());
        }
        exporter
    }

    /// Standard MIDI file bytes
    pub fn to_midi_bytes(&self) -> Vec<u8> {
        self.exporter().to_bytes()
    }

    /// Write a standard MIDI file
    pub fn write_midi<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.exporter().export(path.as_ref())?;
        info!(path = %path.as_ref().display(), genre = %self.genre, "wrote MIDI arrangement");
        Ok(())
    }
}

/// Arrange a progression for a genre
pub fn arrange(genre: Genre, progression: &[ChordSymbol], options: &ArrangeOptions) -> Result<Arrangement> {
    if progression.is_empty() {
        return Err(ChordError::EmptyProgression);
    }
    options.validate()?;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let drum_style = options
        .drum_style
        .unwrap_or_else(|| DrumStyle::choose(genre, &mut rng));
    let swung = drum_style.is_swung();
    let (comp_name, comp_program, bass_program, lead_program) = instruments(genre);

    // Own stream so switching the lead on leaves the other parts unchanged
    let mut lead_rng = StdRng::seed_from_u64(options.seed.wrapping_add(1));
    let roots: Vec<_> = progression.iter().map(|c| Some(c.root())).collect();
    let key = infer_key(&roots);

    let mut markers = ExportTrack::new(MARKER_TRACK, 0);
    let mut drums = ExportTrack::new("Drums", DRUM_CHANNEL);
    let mut bass = ExportTrack::new("Bass", 1).with_program(bass_program);
    let mut comp = ExportTrack::new(comp_name, 0).with_program(comp_program);
    let mut lead = ExportTrack::new(LEAD_TRACK, LEAD_CHANNEL).with_program(lead_program);

    let voices = drum_voices(drum_style);
    let bass_hits = bass_pattern(genre);
    let rhythm = comp_rhythm(genre);
    let chord_ticks = TICKS_PER_BAR * options.bars_per_chord as u64;

    let mut position = 0u64;
    let mut slot = 0usize;
    for _ in 0..options.repeat {
        for chord in progression {
            markers.add_marker(position, chord.as_str());
            let voicing = comp_voicing(genre, chord);

            for bar in 0..options.bars_per_chord {
                let bar_start = position + bar as u64 * TICKS_PER_BAR;

                for step in 0..STEPS_PER_BAR {
                    for voice in &voices {
                        if let Some(velocity) = voice.hit(step) {
                            let velocity = patterns::humanize_velocity(&mut rng, velocity, options.humanize);
                            let tick = step_tick(bar_start, step, swung);
                            drums.add_note(ExportNote::new(tick, voice.note, velocity, TICKS_PER_STEP));
                        }
                    }
                }

                for hit in &bass_hits {
                    let velocity = patterns::humanize_velocity(&mut rng, 92, options.humanize);
                    let tick = step_tick(bar_start, hit.step, swung);
                    let duration = hit.length as u64 * TICKS_PER_STEP;
                    bass.add_note(ExportNote::new(tick, bass_note(chord, hit.tone), velocity, duration));
                }

                for &(step, length) in rhythm {
                    let velocity = patterns::humanize_velocity(&mut rng, 80, options.humanize);
                    let tick = step_tick(bar_start, step, swung);
                    let duration = length as u64 * TICKS_PER_STEP;
                    for &note in &voicing {
                        comp.add_note(ExportNote::new(tick, note, velocity, duration));
                    }
                }

                // Hooks and licks close the chord's last bar
                if let Some(density) = options.lead.filter(|_| bar + 1 == options.bars_per_chord) {
                    for hit in lead_bar(&mut lead_rng, genre, &key, chord, slot, density) {
                        let base = if hit.accent { 96 } else { 84 };
                        let velocity = patterns::humanize_velocity(&mut lead_rng, base, options.humanize);
                        let tick = step_tick(bar_start, hit.step, swung);
                        let duration = hit.length as u64 * TICKS_PER_STEP;
                        lead.add_note(ExportNote::new(tick, hit.note, velocity, duration));
                    }
                }
            }

            position += chord_ticks;
            slot += 1;
        }
    }
    markers.add_marker(position, END_MARKER);

    let mut tracks = vec![markers, drums, bass, comp];
    if options.lead.is_some() {
        tracks.push(lead);
    }
    for track in &mut tracks {
        track.sort();
    }

    debug!(
        drum_notes = tracks[1].notes.len(),
        bass_notes = tracks[2].notes.len(),
        comp_notes = tracks[3].notes.len(),
        lead_notes = tracks.get(4).map_or(0, |t| t.notes.len()),
        "arrangement parts"
    );
    info!(%genre, %drum_style, chords = progression.len(), repeat = options.repeat, "arranged progression");

    Ok(Arrangement {
        genre,
        drum_style,
        tempo: options.tempo,
        format: options.format,
        chords: progression.to_vec(),
        total_ticks: position,
        tracks,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::lead::pentatonic;
    use super::*;
    use crate::music::parse_progression;

    fn chords(symbols: &[&str]) -> Vec<ChordSymbol> {
        parse_progression(symbols).unwrap()
    }

    #[test]
    fn test_empty_progression_is_error() {
        let err = arrange(Genre::Pop, &[], &ArrangeOptions::default()).unwrap_err();
        assert!(matches!(err, ChordError::EmptyProgression));
    }

    #[test]
    fn test_invalid_options() {
        let progression = chords(&["C"]);
        for options in [
            ArrangeOptions { repeat: 0, ..ArrangeOptions::default() },
            ArrangeOptions { bars_per_chord: 0, ..ArrangeOptions::default() },
            ArrangeOptions { tempo: 400.0, ..ArrangeOptions::default() },
        ] {
            assert!(matches!(arrange(Genre::Pop, &progression, &options), Err(ChordError::Config(_))));
        }
    }

    #[test]
    fn test_markers_per_chord_and_end() {
        let options = ArrangeOptions { repeat: 2, ..ArrangeOptions::default() };
        let arrangement = arrange(Genre::Pop, &chords(&["C", "G", "Am", "F"]), &options).unwrap();

        let markers = &arrangement.track(MARKER_TRACK).unwrap().markers;
        assert_eq!(markers.len(), 9);
        let texts: Vec<&str> = markers.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "G", "Am", "F", "C", "G", "Am", "F", "END"]);
        for (i, marker) in markers.iter().enumerate() {
            assert_eq!(marker.tick, i as u64 * TICKS_PER_BAR);
        }
        assert_eq!(arrangement.total_ticks(), 8 * TICKS_PER_BAR);
    }

    #[test]
    fn test_bars_per_chord() {
        let options = ArrangeOptions {
            repeat: 1,
            bars_per_chord: 2,
            ..ArrangeOptions::default()
        };
        let arrangement = arrange(Genre::Rock, &chords(&["E", "A"]), &options).unwrap();
        let ticks: Vec<u64> = arrangement.track(MARKER_TRACK).unwrap().markers.iter().map(|m| m.tick).collect();
        assert_eq!(ticks, vec![0, 2 * TICKS_PER_BAR, 4 * TICKS_PER_BAR]);

        // Rock bass plays eighths through both bars of each chord
        assert_eq!(arrangement.track("Bass").unwrap().notes.len(), 2 * 2 * 8);
    }

    #[test]
    fn test_drums_on_channel_ten() {
        let arrangement = arrange(Genre::Pop, &chords(&["C"]), &ArrangeOptions::default()).unwrap();
        let drums = arrangement.track("Drums").unwrap();
        assert_eq!(drums.channel, 9);
        assert!(drums.program.is_none());
        assert!(!drums.notes.is_empty());
        assert!(DrumStyle::for_genre(Genre::Pop).contains(&arrangement.drum_style()));
    }

    #[test]
    fn test_jazz_two_feel_and_swing() {
        let options = ArrangeOptions {
            repeat: 1,
            humanize: 0,
            ..ArrangeOptions::default()
        };
        let arrangement = arrange(Genre::Jazz, &chords(&["Dm7", "G7"]), &options).unwrap();
        assert_eq!(arrangement.drum_style(), DrumStyle::Swing);

        let bass = &arrangement.track("Bass").unwrap().notes;
        let first_bar: Vec<(u64, u8)> = bass.iter().filter(|n| n.tick < TICKS_PER_BAR).map(|n| (n.tick, n.note)).collect();
        // D2 on beat 1, A2 on beat 3
        assert_eq!(first_bar, vec![(0, 38), (960, 45)]);

        // Ride on the "and" of 2 lands on the triplet
        let drums = &arrangement.track("Drums").unwrap().notes;
        assert!(drums.iter().any(|n| n.note == gm_drums::RIDE && n.tick == 6 * TICKS_PER_STEP + SWING_DELAY));
        assert!(!drums.iter().any(|n| n.tick == 6 * TICKS_PER_STEP));
    }

    #[test]
    fn test_rock_power_chords() {
        let options = ArrangeOptions { repeat: 1, ..ArrangeOptions::default() };
        let arrangement = arrange(Genre::Rock, &chords(&["Am"]), &options).unwrap();
        let guitar = arrangement.track("Guitar").unwrap();
        assert_eq!(guitar.program, Some(gm_programs::DISTORTION_GUITAR));
        let at_zero: Vec<u8> = guitar.notes.iter().filter(|n| n.tick == 0).map(|n| n.note).collect();
        assert_eq!(at_zero, vec![57, 64, 69]);
    }

    #[test]
    fn test_explicit_style_and_seeded_output() {
        let progression = chords(&["C", "F"]);
        let options = ArrangeOptions {
            drum_style: Some(DrumStyle::HalfTime),
            seed: 11,
            ..ArrangeOptions::default()
        };
        let a = arrange(Genre::Pop, &progression, &options).unwrap();
        let b = arrange(Genre::Pop, &progression, &options).unwrap();
        assert_eq!(a.drum_style(), DrumStyle::HalfTime);
        assert_eq!(a.to_midi_bytes(), b.to_midi_bytes());
    }

    #[test]
    fn test_lead_hooks_leave_other_parts_unchanged() {
        let progression = chords(&["C", "G", "Am", "F"]);
        let plain = ArrangeOptions {
            repeat: 2,
            seed: 4,
            ..ArrangeOptions::default()
        };
        let with_lead = ArrangeOptions {
            lead: Some(LeadDensity::Light),
            ..plain.clone()
        };

        let without = arrange(Genre::Pop, &progression, &plain).unwrap();
        let arrangement = arrange(Genre::Pop, &progression, &with_lead).unwrap();
        assert!(without.track(LEAD_TRACK).is_none());

        let lead = arrangement.track(LEAD_TRACK).unwrap();
        assert_eq!(lead.channel, 2);
        assert_eq!(lead.program, Some(gm_programs::LEAD_SQUARE));

        // Two-note hooks on the first bar and both phrase ends, nothing else
        let bars: BTreeSet<u64> = lead.notes.iter().map(|n| n.tick / TICKS_PER_BAR).collect();
        assert_eq!(bars.into_iter().collect::<Vec<_>>(), vec![0, 3, 7]);
        assert_eq!(lead.notes.len(), 6);

        let roots: Vec<_> = progression.iter().map(|c| Some(c.root())).collect();
        let scale = pentatonic(&infer_key(&roots));
        assert!(lead.notes.iter().all(|n| scale.contains(&n.note)));

        for name in [MARKER_TRACK, "Drums", "Bass", "Keys"] {
            assert_eq!(without.track(name), arrangement.track(name), "{} changed", name);
        }

        let again = arrange(Genre::Pop, &progression, &with_lead).unwrap();
        assert_eq!(again.to_midi_bytes(), arrangement.to_midi_bytes());
    }

    #[test]
    fn test_jazz_lead_closes_each_chord() {
        let options = ArrangeOptions {
            repeat: 4,
            bars_per_chord: 2,
            seed: 8,
            lead: Some(LeadDensity::Medium),
            ..ArrangeOptions::default()
        };
        let arrangement = arrange(Genre::Jazz, &chords(&["Dm7", "G7"]), &options).unwrap();
        let lead = arrangement.track(LEAD_TRACK).unwrap();
        assert_eq!(lead.program, Some(gm_programs::ELECTRIC_GUITAR_JAZZ));
        assert!(!lead.notes.is_empty());
        // Only the second bar of each chord carries lead notes
        assert!(lead.notes.iter().all(|n| (n.tick / TICKS_PER_BAR) % 2 == 1));
    }

    #[test]
    fn test_midi_bytes_format() {
        let progression = chords(&["C", "G"]);
        let type1 = arrange(Genre::Pop, &progression, &ArrangeOptions::default()).unwrap();
        let bytes = type1.to_midi_bytes();
        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(bytes[9], 1);
        // Tempo track plus markers, drums, bass and keys
        assert_eq!(&bytes[10..12], &5u16.to_be_bytes());
        assert_eq!(&bytes[12..14], &PPQN.to_be_bytes());

        let options = ArrangeOptions {
            format: MidiFileFormat::Type0,
            ..ArrangeOptions::default()
        };
        let type0 = arrange(Genre::Pop, &progression, &options).unwrap();
        let bytes = type0.to_midi_bytes();
        assert_eq!(bytes[9], 0);
        assert_eq!(&bytes[10..12], &1u16.to_be_bytes());
    }

    #[test]
    fn test_write_midi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mid");
        let arrangement = arrange(Genre::Jazz, &chords(&["Dm7", "G7", "Cmaj7"]), &ArrangeOptions::default()).unwrap();
        arrangement.write_midi(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), arrangement.to_midi_bytes());
    }
}
