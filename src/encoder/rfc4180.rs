use csv::{Terminator, WriterBuilder};
use serde_json::Value;

use super::options::{EncodeOptions, RecordEncoder};
use crate::error::CsvStreamError;
use crate::row::{value_kind, Row};

/// Delimiter used when the options carry no override.
const DEFAULT_SEPARATOR: char = ',';

/// The bundled record encoder, backed by the `csv` crate.
///
/// Produces RFC 4180 output: fields containing the delimiter, double
/// quotes, or line breaks are quoted and escaped by the underlying writer.
///
/// # Value stringification
///
/// - strings are written verbatim
/// - numbers are written in their decimal text form
/// - booleans become `true` / `false`
/// - null becomes an empty field
/// - nested arrays and objects are an encoding error
///
/// # Field order
///
/// - positional rows keep their own order; a column list never reorders
///   them
/// - keyed records follow the column list when one is given; a missing key
///   yields an empty field and keys outside the list are ignored
/// - keyed records without a column list follow their own key order
pub struct CsvEncoder;

impl CsvEncoder {
    /// Creates the default encoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one value as field text, or reports its JSON type name when
    /// it has no flat form.
    fn field_text(value: &Value) -> Result<String, &'static str> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Bool(flag) => Ok(flag.to_string()),
            Value::Number(number) => Ok(number.to_string()),
            Value::String(text) => Ok(text.clone()),
            Value::Array(_) | Value::Object(_) => Err(value_kind(value)),
        }
    }

    /// Resolves the ordered field texts for one row.
    fn row_fields(row: &Row, columns: Option<&[String]>) -> Result<Vec<String>, CsvStreamError> {
        match row {
            Row::Positional(values) => values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    Self::field_text(value).map_err(|kind| CsvStreamError::UnsupportedValue {
                        kind,
                        location: index.to_string(),
                    })
                })
                .collect(),
            Row::Keyed(record) => match columns {
                Some(columns) if !columns.is_empty() => columns
                    .iter()
                    .map(|name| match record.get(name) {
                        None => Ok(String::new()),
                        Some(value) => Self::field_text(value).map_err(|kind| {
                            CsvStreamError::UnsupportedValue {
                                kind,
                                location: name.clone(),
                            }
                        }),
                    })
                    .collect(),
                _ => record
                    .iter()
                    .map(|(name, value)| {
                        Self::field_text(value).map_err(|kind| CsvStreamError::UnsupportedValue {
                            kind,
                            location: name.clone(),
                        })
                    })
                    .collect(),
            },
        }
    }

    /// Field names for a self-derived header row (`headers: true` only):
    /// the column list when one is given, otherwise the keys of the first
    /// keyed row. Positional-only batches get no header.
    fn header_fields(rows: &[Row], columns: Option<&[String]>) -> Option<Vec<String>> {
        match columns {
            Some(columns) if !columns.is_empty() => Some(columns.to_vec()),
            _ => rows.iter().find_map(|row| match row {
                Row::Keyed(record) => Some(record.keys().cloned().collect()),
                Row::Positional(_) => None,
            }),
        }
    }
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordEncoder for CsvEncoder {
    fn encode(&self, rows: &[Row], options: &EncodeOptions<'_>) -> Result<String, CsvStreamError> {
        let separator = options.separator.unwrap_or(DEFAULT_SEPARATOR);
        if !separator.is_ascii() {
            return Err(CsvStreamError::InvalidArgument(format!(
                "separator must be a single ASCII character, got '{separator}'"
            )));
        }
        let terminator = if options.crlf {
            Terminator::CRLF
        } else {
            Terminator::Any(b'\n')
        };

        let mut buffer = Vec::new();
        {
            let mut writer = WriterBuilder::new()
                .delimiter(separator as u8)
                .terminator(terminator)
                .from_writer(&mut buffer);

            if options.headers {
                if let Some(fields) = Self::header_fields(rows, options.columns) {
                    writer.write_record(&fields)?;
                }
            }
            for row in rows {
                writer.write_record(&Self::row_fields(row, options.columns)?)?;
            }
            writer.flush()?;
        }

        // The writer only ever receives UTF-8 field text.
        Ok(String::from_utf8(buffer).expect("csv writer produced invalid UTF-8"))
    }
}
