//! Error module
//!
//! Defines custom error types using `thiserror` for the CSV streamer.
//! This module provides a unified error type that wraps all possible error
//! sources and implements the `From` trait for automatic conversion from
//! underlying error types.

use thiserror::Error;

use crate::row::RowShape;

/// The main error type for the CSV streamer.
///
/// This enum represents all possible errors that can occur while driving
/// the stringify transform, including encoder failures, transform-state
/// misuse, and file I/O errors on the binary side.
///
/// # Error Categories
///
/// - **Encoder errors**: the record encoder rejected a row (`Csv`,
///   `UnsupportedValue`)
/// - **Transform-state errors**: the transform was driven out of order or
///   after a terminal failure (`NotStarted`, `Terminated`, `ShapeMismatch`)
/// - **Input/output errors**: JSON Lines parsing and file I/O (`Json`, `Io`)
/// - **Configuration errors**: invalid arguments at construction or on the
///   command line (`InvalidArgument`)
#[derive(Error, Debug)]
pub enum CsvStreamError {
    /// CSV encoding error from the csv crate.
    ///
    /// This error occurs when the underlying writer rejects a record, for
    /// example rows of inconsistent width within one encode call.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A field held a value the encoder cannot render as a single CSV field.
    ///
    /// Nested arrays and objects have no flat text form; the encoder
    /// surfaces them instead of guessing a serialization.
    #[error("Unsupported {kind} value in field '{location}'")]
    UnsupportedValue {
        /// JSON type name of the offending value ("array" or "object").
        kind: &'static str,
        /// Column name or zero-based index of the offending field.
        location: String,
    },

    /// An item did not match the row shape selected at construction.
    ///
    /// A transform configured with columns accepts only keyed records; one
    /// configured without columns accepts only positional rows.
    #[error("Row shape mismatch: expected a {expected} row, got a {found} row")]
    ShapeMismatch {
        /// The shape fixed by the transform's configuration.
        expected: RowShape,
        /// The shape of the rejected item.
        found: RowShape,
    },

    /// An item was pushed before the start-of-stream transition ran.
    #[error("Stream not started: push() called before start()")]
    NotStarted,

    /// The transform was used after a terminal encoding failure.
    ///
    /// Once an encoder error has been surfaced, the transform accepts and
    /// emits nothing further.
    #[error("Stream terminated by a previous encoding error")]
    Terminated,

    /// General I/O error.
    ///
    /// This error occurs for file system operations like opening, reading,
    /// or writing files in the binary.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    ///
    /// This error occurs when an input line is not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line argument or configuration error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
