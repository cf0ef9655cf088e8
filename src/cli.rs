//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! This module defines the `Args` struct with validation logic and the
//! conversion into a transform configuration.

use clap::Parser;
use std::path::PathBuf;

use crate::config::StringifyConfig;
use crate::error::CsvStreamError;

/// Command-line arguments for the CSV streamer.
///
/// The binary reads JSON Lines (one JSON array as a positional row, or one
/// JSON object as a keyed record, per line) and writes CSV chunks. Use the
/// `validate()` method after parsing to ensure the arguments form a valid
/// configuration.
#[derive(Parser, Debug)]
#[command(name = "csv-streamer")]
#[command(about = "Stream JSON Lines rows into CSV")]
#[command(version)]
pub struct Args {
    /// Input JSON Lines file (defaults to stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output CSV file (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Field delimiter, a single ASCII character (defaults to comma)
    #[arg(long)]
    pub separator: Option<String>,

    /// Comma-separated column names; enables the header row and selects
    /// keyed-record input
    #[arg(long)]
    pub columns: Option<String>,

    /// Terminate lines with LF instead of CR+LF
    #[arg(long, default_value = "false")]
    pub lf: bool,
}

impl Args {
    /// Validate argument combinations.
    ///
    /// Checks that:
    /// - `--separator` is exactly one ASCII character
    /// - `--columns`, when given, contains no empty names
    ///
    /// # Errors
    ///
    /// Returns [`CsvStreamError::InvalidArgument`] describing the first
    /// violation found.
    pub fn validate(&self) -> Result<(), CsvStreamError> {
        if let Some(separator) = &self.separator {
            let mut chars = separator.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => {}
                _ => {
                    return Err(CsvStreamError::InvalidArgument(format!(
                        "separator must be a single ASCII character, got '{separator}'"
                    )));
                }
            }
        }

        if let Some(columns) = &self.columns {
            if columns.split(',').any(|name| name.trim().is_empty()) {
                return Err(CsvStreamError::InvalidArgument(
                    "column names must be non-empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Builds the transform configuration from the parsed arguments.
    ///
    /// Call [`validate`](Self::validate) first; this conversion assumes the
    /// arguments are well-formed.
    #[must_use]
    pub fn to_config(&self) -> StringifyConfig {
        let mut config = StringifyConfig::new().crlf(!self.lf);
        if let Some(separator) = self.separator.as_deref().and_then(|s| s.chars().next()) {
            config = config.separator(separator);
        }
        if let Some(columns) = &self.columns {
            config = config.columns(columns.split(',').map(str::trim));
        }
        config
    }
}
