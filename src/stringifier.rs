//! The stringify transform.
//!
//! [`Stringifier`] is a single-pass state machine with two transition
//! points: [`Stringifier::start`], run exactly once at stream start, and
//! [`Stringifier::push`], run once per input item in input order. The
//! start transition emits the one-time header chunk when columns are
//! configured; every push emits exactly one data chunk. Field-level
//! encoding is delegated to a [`RecordEncoder`] collaborator.

use serde_json::Value;

use crate::config::StringifyConfig;
use crate::encoder::{CsvEncoder, EncodeOptions, RecordEncoder};
use crate::error::CsvStreamError;
use crate::row::Row;

/// Streaming CSV stringifier.
///
/// Converts a sequence of rows into CSV text chunks: at most one header
/// chunk first (only when columns are configured), then one chunk per row,
/// preserving input order. The configuration is read-only after
/// construction, and the first encoding failure is terminal: no chunk is
/// produced for the failing item or any later one, while chunks already
/// handed out stay valid.
///
/// # Example
///
/// ```
/// use csv_streamer::config::StringifyConfig;
/// use csv_streamer::row::Row;
/// use csv_streamer::stringifier::Stringifier;
///
/// let config = StringifyConfig::new().columns(["id", "name"]);
/// let mut stringifier = Stringifier::new(config).unwrap();
///
/// assert_eq!(stringifier.start().unwrap().as_deref(), Some("id,name\r\n"));
///
/// let row = Row::from_json_line(r#"{"id": 1, "name": "one"}"#).unwrap();
/// assert_eq!(stringifier.push(&row).unwrap(), "1,one\r\n");
/// ```
pub struct Stringifier<E = CsvEncoder> {
    /// Immutable configuration, fixed at construction.
    config: StringifyConfig,
    /// The record encoder collaborator.
    encoder: E,
    /// Whether the start-of-stream transition has run.
    started: bool,
    /// Set on the first encoding failure; nothing is accepted afterwards.
    failed: bool,
    /// Number of data chunks produced so far.
    rows_written: u64,
}

impl Stringifier<CsvEncoder> {
    /// Creates a stringifier using the bundled RFC 4180 encoder.
    ///
    /// # Errors
    ///
    /// Returns [`CsvStreamError::InvalidArgument`] if the configured
    /// separator is not a single ASCII character.
    pub fn new(config: StringifyConfig) -> Result<Self, CsvStreamError> {
        Self::with_encoder(config, CsvEncoder::new())
    }
}

impl<E: RecordEncoder> Stringifier<E> {
    /// Creates a stringifier with a custom record encoder.
    pub fn with_encoder(config: StringifyConfig, encoder: E) -> Result<Self, CsvStreamError> {
        config.validate()?;
        Ok(Self {
            config,
            encoder,
            started: false,
            failed: false,
            rows_written: 0,
        })
    }

    /// Returns the configuration this transform was built with.
    pub fn config(&self) -> &StringifyConfig {
        &self.config
    }

    /// Returns the number of data chunks produced so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Runs the start-of-stream transition.
    ///
    /// The first call returns the header chunk when columns are configured
    /// and `None` otherwise; every later call returns `None`. The header
    /// row is the column list itself, encoded as a positional row with no
    /// `columns` option, so the encoder cannot reinterpret it as field
    /// names.
    ///
    /// # Errors
    ///
    /// An encoder failure is surfaced unchanged and is terminal: the
    /// transform accepts nothing afterwards.
    pub fn start(&mut self) -> Result<Option<String>, CsvStreamError> {
        if self.failed {
            return Err(CsvStreamError::Terminated);
        }
        if self.started {
            return Ok(None);
        }
        self.started = true;

        if self.config.columns.is_empty() {
            return Ok(None);
        }

        let header = Row::Positional(
            self.config
                .columns
                .iter()
                .map(|name| Value::String(name.clone()))
                .collect(),
        );
        let options = EncodeOptions {
            separator: self.config.separator,
            headers: false,
            columns: None,
            crlf: self.config.crlf,
        };
        match self.encoder.encode(std::slice::from_ref(&header), &options) {
            Ok(chunk) => Ok(Some(chunk)),
            Err(error) => {
                self.failed = true;
                Err(error)
            }
        }
    }

    /// Encodes one input item into one output chunk.
    ///
    /// Items must match the shape selected at construction (keyed records
    /// when columns are configured, positional rows otherwise) and must
    /// arrive after [`start`](Self::start) has run.
    ///
    /// # Errors
    ///
    /// - [`CsvStreamError::NotStarted`] before the start transition
    /// - [`CsvStreamError::Terminated`] after any earlier failure
    /// - [`CsvStreamError::ShapeMismatch`] for an item of the wrong shape
    /// - the encoder's error, unchanged, when encoding fails
    ///
    /// Shape and encoder failures are terminal; chunks already produced
    /// are not retracted.
    pub fn push(&mut self, row: &Row) -> Result<String, CsvStreamError> {
        if self.failed {
            return Err(CsvStreamError::Terminated);
        }
        if !self.started {
            return Err(CsvStreamError::NotStarted);
        }

        let expected = self.config.shape();
        if row.shape() != expected {
            self.failed = true;
            return Err(CsvStreamError::ShapeMismatch {
                expected,
                found: row.shape(),
            });
        }

        let options = EncodeOptions {
            separator: self.config.separator,
            headers: false,
            columns: Some(&self.config.columns),
            crlf: self.config.crlf,
        };
        match self.encoder.encode(std::slice::from_ref(row), &options) {
            Ok(chunk) => {
                self.rows_written += 1;
                Ok(chunk)
            }
            Err(error) => {
                self.failed = true;
                Err(error)
            }
        }
    }
}

/// One-shot convenience: runs the full state machine over `rows` and
/// concatenates the chunks.
///
/// Produces the same text a streaming consumer would see: the header line
/// first when columns are configured, then one line per row.
///
/// # Errors
///
/// Stops at the first failing row, like the streaming form; nothing of the
/// failing row or later rows appears in the result.
pub fn stringify(config: StringifyConfig, rows: &[Row]) -> Result<String, CsvStreamError> {
    let mut stringifier = Stringifier::new(config)?;
    let mut output = String::new();
    if let Some(header) = stringifier.start()? {
        output.push_str(&header);
    }
    for row in rows {
        output.push_str(&stringifier.push(row)?);
    }
    Ok(output)
}
