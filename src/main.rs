// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chordsmith::arrangement::{arrange, ArrangeOptions, DrumStyle, LeadDensity};
use chordsmith::engine::{propose, Genre};
use chordsmith::midi::MidiFileFormat;
use chordsmith::model::interpret_score;
use chordsmith::music::{format_progression, parse_progression};
use chordsmith::{ChordsmithConfig, Prediction, PredictionService};

#[derive(Parser, Debug)]
#[command(name = "chordsmith")]
#[command(version, about = "Chord-progression continuation and MIDI arrangement", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Suggest continuations of a seed progression
    Predict {
        #[arg(long)]
        genre: Genre,

        /// Directory with one model subdirectory per genre
        #[arg(long)]
        models: Option<PathBuf>,

        /// Number of results
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        k: Option<u16>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Seed chords, e.g. Dm7 G7 Cmaj7
        #[arg(required = true)]
        seed: Vec<String>,
    },

    /// Print the rule-only proposal report for seed roots as JSON
    Analyze {
        #[arg(long)]
        genre: Genre,

        #[arg(long, default_value = "3")]
        top: usize,

        #[arg(required = true)]
        roots: Vec<String>,
    },

    /// Arrange a progression into a MIDI file
    Arrange {
        #[arg(long)]
        genre: Genre,

        /// Output .mid file
        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        tempo: Option<f64>,

        /// Times the progression is played
        #[arg(long)]
        repeat: Option<usize>,

        /// Drum style (defaults to a seeded pick for the genre)
        #[arg(long)]
        drums: Option<DrumStyle>,

        /// Add a lead line: sparse, light or medium
        #[arg(long)]
        lead: Option<LeadDensity>,

        #[arg(long, default_value = "0")]
        seed: u64,

        /// Write a Type 0 (single track) file
        #[arg(long)]
        single_track: bool,

        #[arg(required = true)]
        chords: Vec<String>,
    },

    /// Print the effective configuration as YAML
    ShowConfig,
}

#[derive(Serialize)]
struct PredictOutput<'a> {
    genre: Genre,
    seed: &'a [String],
    predictions: Vec<ScoredPrediction<'a>>,
}

#[derive(Serialize)]
struct ScoredPrediction<'a> {
    #[serde(flatten)]
    prediction: &'a Prediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    harmony: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<&'static str>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "chordsmith=debug" } else { "chordsmith=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ChordsmithConfig> {
    match path {
        Some(path) => ChordsmithConfig::load(path),
        None => Ok(ChordsmithConfig::default()),
    }
}

fn run_predict(
    mut config: ChordsmithConfig,
    genre: Genre,
    models: Option<PathBuf>,
    k: Option<u16>,
    json: bool,
    seed: Vec<String>,
) -> Result<()> {
    if models.is_some() {
        config.models.dir = models;
    }
    if let Some(k) = k {
        config.prediction.k = usize::from(k);
    }

    let service = PredictionService::from_config(&config);
    let model = service.registry().get(genre);

    let seed = match &model {
        Some(model) => {
            let (fixed, changes) = model.vocab.normalize_seed(&seed);
            for (before, after) in &changes {
                debug!(%before, %after, "seed chord fitted to vocabulary");
            }
            fixed
        }
        None => seed,
    };

    let predictions = service.predict(genre, &seed);
    let scored: Vec<ScoredPrediction> = predictions
        .iter()
        .map(|p| {
            let harmony = model.as_ref().map(|m| m.evaluate(&p.progression));
            ScoredPrediction {
                prediction: p,
                harmony,
                grade: harmony.map(|h| interpret_score(h).label()),
            }
        })
        .collect();

    if json {
        let output = PredictOutput {
            genre,
            seed: &seed,
            predictions: scored,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} continuations of {}", genre, seed.join(" "));
    for (i, s) in scored.iter().enumerate() {
        let p = s.prediction;
        print!("{}. {:<40} {:>3}%  {}", i + 1, p.progression.join(" "), (p.score * 100.0).round(), p.label);
        match (s.harmony, s.grade) {
            (Some(h), Some(grade)) => println!("  (harmony {:.3}, {})", h, grade),
            _ => println!(),
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_arrange(
    config: &ChordsmithConfig,
    genre: Genre,
    out: PathBuf,
    tempo: Option<f64>,
    repeat: Option<usize>,
    drums: Option<DrumStyle>,
    lead: Option<LeadDensity>,
    seed: u64,
    single_track: bool,
    chords: Vec<String>,
) -> Result<()> {
    let progression = parse_progression(&chords).context("Failed to parse chord progression")?;

    let mut options = ArrangeOptions::from_config(&config.arrangement);
    if let Some(tempo) = tempo {
        options.tempo = tempo;
    }
    if let Some(repeat) = repeat {
        options.repeat = repeat;
    }
    options.drum_style = drums;
    if lead.is_some() {
        options.lead = lead;
    }
    options.seed = seed;
    if single_track {
        options.format = MidiFileFormat::Type0;
    }

    let arrangement = arrange(genre, &progression, &options).context("Failed to arrange progression")?;
    arrangement
        .write_midi(&out)
        .with_context(|| format!("Failed to write MIDI file: {:?}", out))?;

    println!(
        "Wrote {}: {} ({} drums, {} BPM, {} bars)",
        out.display(),
        format_progression(arrangement.chords()),
        arrangement.drum_style(),
        arrangement.tempo(),
        progression.len() * options.repeat * options.bars_per_chord
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Predict {
            genre,
            models,
            k,
            json,
            seed,
        } => run_predict(config, genre, models, k, json, seed),
        Commands::Analyze { genre, top, roots } => {
            let report = propose(genre, &roots, top);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Arrange {
            genre,
            out,
            tempo,
            repeat,
            drums,
            lead,
            seed,
            single_track,
            chords,
        } => run_arrange(&config, genre, out, tempo, repeat, drums, lead, seed, single_track, chords),
        Commands::ShowConfig => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}
