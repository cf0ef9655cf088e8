//! The record encoder contract.
//!
//! Defines [`RecordEncoder`], the trait the stringify transform calls for
//! every chunk it emits, and [`EncodeOptions`], the per-call option set.

use crate::error::CsvStreamError;
use crate::row::Row;

/// Options handed to a [`RecordEncoder`] for a single encode call.
///
/// The stringify transform always passes `headers: false` (the header
/// decision is made by the transform itself, never delegated) and always
/// passes exactly one row per call. On the header-emission call, `columns`
/// is `None` so the encoder cannot reinterpret the column-list row as field
/// names; on item calls it is `Some`, even when the configured list is
/// empty, so the encoder can decide field order for keyed records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions<'a> {
    /// Field delimiter override; `None` selects the encoder's default.
    pub separator: Option<char>,
    /// When true, the encoder derives and emits its own header row before
    /// the data rows. Only meaningful for standalone encoder use.
    pub headers: bool,
    /// Explicit field order for keyed records. An empty slice means the
    /// encoder infers order from each record itself; positional rows keep
    /// their own order regardless.
    pub columns: Option<&'a [String]>,
    /// CR+LF line terminator when true, bare LF when false.
    pub crlf: bool,
}

impl Default for EncodeOptions<'_> {
    fn default() -> Self {
        Self {
            separator: None,
            headers: false,
            columns: None,
            crlf: true,
        }
    }
}

/// A record encoder turns a batch of rows into CSV text.
///
/// Implementations own every field-level rule: quoting, delimiter and
/// newline escaping, and value stringification. The returned text contains
/// one line per encoded row, each including its line terminator.
///
/// # Errors
///
/// An encoder fails with an encoding error when a row cannot be rendered,
/// for example inconsistent row widths within one call or an illegal value
/// type. Callers treat any failure as terminal for the batch.
pub trait RecordEncoder {
    /// Encodes `rows` into a single text fragment.
    fn encode(&self, rows: &[Row], options: &EncodeOptions<'_>) -> Result<String, CsvStreamError>;
}
