//! Input row types for CSV stringification.
//!
//! Defines [`Row`], the tagged union over the two item shapes the transform
//! accepts (positional value arrays and field-name-keyed records), and
//! [`RowShape`] for shape selection and mismatch reporting.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::CsvStreamError;

/// The shape of an input row.
///
/// A transform instance accepts exactly one shape for its whole lifetime,
/// selected at construction: configurations with columns take keyed
/// records, configurations without columns take positional rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// An ordered sequence of unkeyed values.
    Positional,
    /// A mapping from field name to value.
    Keyed,
}

impl fmt::Display for RowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowShape::Positional => write!(f, "positional"),
            RowShape::Keyed => write!(f, "keyed"),
        }
    }
}

/// One logical record to be encoded as a single CSV line.
///
/// A row is either positional (an ordered sequence of values with no field
/// names) or keyed (a mapping from field name to value). Keyed records
/// preserve insertion order, so a record's own key order is meaningful when
/// no explicit column list is configured.
///
/// The untagged serde representation means a JSON array deserializes to a
/// positional row and a JSON object to a keyed record, which is exactly the
/// JSON Lines input format of the `csv-streamer` binary.
///
/// # Example
///
/// ```
/// use csv_streamer::row::Row;
/// use serde_json::json;
///
/// let positional = Row::from_json_line(r#"[1, "one"]"#).unwrap();
/// assert_eq!(positional, Row::Positional(vec![json!(1), json!("one")]));
///
/// let keyed = Row::from_json_line(r#"{"id": 1, "name": "one"}"#).unwrap();
/// assert_eq!(keyed.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Row {
    /// An ordered sequence of unkeyed values.
    Positional(Vec<Value>),
    /// A mapping from field name to value, in insertion order.
    Keyed(Map<String, Value>),
}

impl Row {
    /// Returns the shape of this row.
    #[must_use]
    pub fn shape(&self) -> RowShape {
        match self {
            Row::Positional(_) => RowShape::Positional,
            Row::Keyed(_) => RowShape::Keyed,
        }
    }

    /// Returns the number of fields in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Row::Positional(values) => values.len(),
            Row::Keyed(record) => record.len(),
        }
    }

    /// Returns true if this row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a single JSON Lines entry into a row.
    ///
    /// The line must be one JSON array (positional row) or one JSON object
    /// (keyed record); any other JSON value is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CsvStreamError::Json`] if the line is not valid JSON, or
    /// [`CsvStreamError::InvalidArgument`] if it parses to a scalar.
    pub fn from_json_line(line: &str) -> Result<Self, CsvStreamError> {
        let value: Value = serde_json::from_str(line)?;
        Row::try_from(value)
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::Positional(values)
    }
}

impl From<Map<String, Value>> for Row {
    fn from(record: Map<String, Value>) -> Self {
        Row::Keyed(record)
    }
}

impl TryFrom<Value> for Row {
    type Error = CsvStreamError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(values) => Ok(Row::Positional(values)),
            Value::Object(record) => Ok(Row::Keyed(record)),
            other => Err(CsvStreamError::InvalidArgument(format!(
                "expected a JSON array or object row, got {}",
                value_kind(&other)
            ))),
        }
    }
}

/// JSON type name of a value, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
