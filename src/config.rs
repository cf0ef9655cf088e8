//! Transform configuration.
//!
//! Defines [`StringifyConfig`], the immutable option set fixed when a
//! stringifier is constructed: field separator, column list, and line
//! terminator choice.

use crate::error::CsvStreamError;
use crate::row::RowShape;

/// Configuration for a stringify transform.
///
/// All options are fixed at construction; nothing about item processing
/// mutates them afterwards.
///
/// - `separator`: single-character field delimiter; `None` selects the
///   encoder's default (comma for the bundled encoder).
/// - `columns`: ordered column names. Non-empty enables the one-time
///   header chunk and selects keyed-record input; empty disables the
///   header and selects positional-row input, with the encoder inferring
///   field order from each row directly.
/// - `crlf`: CR+LF line terminator when true (the default), bare LF
///   otherwise.
///
/// # Example
///
/// ```
/// use csv_streamer::config::StringifyConfig;
///
/// let config = StringifyConfig::new()
///     .separator(';')
///     .columns(["id", "name"])
///     .crlf(false);
/// assert_eq!(config.columns, vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringifyConfig {
    /// Field delimiter override; must be a single ASCII character.
    pub separator: Option<char>,
    /// Ordered column names; empty means no header chunk.
    pub columns: Vec<String>,
    /// CR+LF line terminator when true, LF when false.
    pub crlf: bool,
}

impl Default for StringifyConfig {
    fn default() -> Self {
        Self {
            separator: None,
            columns: Vec::new(),
            crlf: true,
        }
    }
}

impl StringifyConfig {
    /// Creates a configuration with no separator override, no columns, and
    /// CR+LF line terminators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Sets the ordered column list. Column names pass through to the
    /// encoder verbatim; no validation of their contents happens here.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Selects the line terminator: CR+LF when true, LF when false.
    #[must_use]
    pub fn crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    /// The row shape this configuration selects for the lifetime of a
    /// transform: keyed records when columns are supplied, positional rows
    /// otherwise.
    #[must_use]
    pub fn shape(&self) -> RowShape {
        if self.columns.is_empty() {
            RowShape::Positional
        } else {
            RowShape::Keyed
        }
    }

    /// Checks that the configuration is usable by the encoder.
    pub(crate) fn validate(&self) -> Result<(), CsvStreamError> {
        if let Some(separator) = self.separator {
            if !separator.is_ascii() {
                return Err(CsvStreamError::InvalidArgument(format!(
                    "separator must be a single ASCII character, got '{separator}'"
                )));
            }
        }
        Ok(())
    }
}
