//! Load, filter, convert, save.

use crate::config::Config;
use crate::convert::{convert_play, ClearType, ScoreRecord, Skip};
use crate::export::BatchManual;
use crate::parser::PlayList;
use crate::{Error, Result};
use tracing::{error, info, warn};

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// `music` documents in the database
    pub loaded: usize,
    /// Of those, plays belonging to the configured profile
    pub matched: usize,
    /// Scores written to the output
    pub converted: usize,
    pub skipped: usize,
    /// FAILED plays left out because `preserve_fails` is off
    pub dropped_fails: usize,
    /// Whether the output file was saved
    pub written: bool,
}

/// Converted scores of one batch and what was left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub scores: Vec<ScoreRecord>,
    pub skipped: Vec<Skip>,
    pub dropped_fails: usize,
}

/// Converts every play in order. Plays that cannot be converted are logged and
/// collected in [`Conversion::skipped`].
pub fn convert_all(plays: &PlayList, preserve_fails: bool) -> Conversion {
    let mut conversion = Conversion::default();

    for play in plays {
        match convert_play(play) {
            Ok(score) if !preserve_fails && score.lamp == ClearType::Failed => {
                conversion.dropped_fails += 1;
            }
            Ok(score) => conversion.scores.push(score),
            Err(skip) => {
                match &skip {
                    Skip::UnknownClearType { .. } | Skip::UnknownDifficulty { .. } => {
                        warn!("{}", skip)
                    }
                    _ => error!(
                        "Error converting play {}: {}",
                        play.get("_id").map(|id| id.to_string()).unwrap_or_default(),
                        skip
                    ),
                }
                conversion.skipped.push(skip);
            }
        }
    }

    conversion
}

/// Runs a whole conversion as described by `config`.
///
/// Only a database that cannot be read or parsed is an error. A failed save is
/// logged and reported through [`Report::written`].
pub fn run(config: &Config) -> Result<Report> {
    info!("Config:");
    info!("DATABASE_PATH: {}", config.database_path.display());
    info!("OUTPUT_FILE: {}", config.output_path.display());
    info!("ASPHYXIA_PROFILE_ID: {}", config.profile_id);
    info!("PRESERVE_FAILS: {}", config.preserve_fails);

    info!("Starting scores conversion");
    let plays = PlayList::from_file(&config.database_path).map_err(|e| {
        match &e {
            Error::Parse { .. } | Error::NotAnObject { .. } => {
                warn!("Invalid JSON format in database file: {}", e)
            }
            _ => error!("Error loading database: {}", e),
        }
        e
    })?;
    let loaded = plays.len();

    let plays = plays.for_user(&config.profile_id);
    info!("Found {} scores for user {}", plays.len(), config.profile_id);
    let matched = plays.len();

    let conversion = convert_all(&plays, config.preserve_fails);
    info!(
        "Conversion resulted in {} valid scores",
        conversion.scores.len()
    );
    if !conversion.skipped.is_empty() {
        warn!("Skipped {} plays", conversion.skipped.len());
    }

    let mut report = Report {
        loaded,
        matched,
        converted: conversion.scores.len(),
        skipped: conversion.skipped.len(),
        dropped_fails: conversion.dropped_fails,
        written: false,
    };

    let batch = BatchManual::new(conversion.scores);
    match batch.save(&config.output_path) {
        Ok(()) => {
            info!("File {} saved", config.output_path.display());
            report.written = true;
        }
        Err(e) => error!("Error saving results: {}", e),
    }

    info!("Scores conversion complete");
    Ok(report)
}
