//! Record encoder module
//!
//! The seam between the stringify transform and field-level CSV encoding.
//! The transform decides *when* a row is encoded (header once, then one row
//! per item); an encoder decides *how* fields become text.

pub mod options;
pub mod rfc4180;

pub use options::{EncodeOptions, RecordEncoder};
pub use rfc4180::CsvEncoder;
