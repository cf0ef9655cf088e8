//! Integration tests for the stringify transform through the pull adapters

use csv_streamer::config::StringifyConfig;
use csv_streamer::error::CsvStreamError;
use csv_streamer::row::Row;
use csv_streamer::stream::{StringifyIter, StringifyStream};
use csv_streamer::stringifier::stringify;

use futures::StreamExt;
use serde_json::json;
use std::io::Write;
use tempfile::tempdir;

fn keyed_rows(lines: &[&str]) -> Vec<Row> {
    lines
        .iter()
        .map(|line| Row::from_json_line(line).expect("test row should parse"))
        .collect()
}

/// Keyed records with a column list produce a header chunk followed by one
/// chunk per record, CR+LF terminated.
#[test]
fn test_keyed_records_with_header() {
    let config = StringifyConfig::new().columns(["id", "name"]);
    let rows = keyed_rows(&[r#"{"id": 1, "name": "one"}"#, r#"{"id": 2, "name": "two"}"#]);

    let chunks: Vec<String> = StringifyIter::new(config, rows.into_iter())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks, vec!["id,name\r\n", "1,one\r\n", "2,two\r\n"]);
}

/// Positional rows without a column list produce no header and LF
/// terminators when CR+LF is switched off.
#[test]
fn test_positional_rows_without_header() {
    let config = StringifyConfig::new().crlf(false);
    let rows = vec![
        Row::Positional(vec![json!(1), json!("one")]),
        Row::Positional(vec![json!(2), json!("two")]),
    ];

    let chunks: Vec<String> = StringifyIter::new(config, rows.into_iter())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks, vec!["1,one\n", "2,two\n"]);
}

/// A custom separator applies to the header and every data chunk.
#[test]
fn test_custom_separator() {
    let config = StringifyConfig::new().separator(';').columns(["a", "b"]);
    let rows = keyed_rows(&[r#"{"a": 1, "b": 2}"#]);

    let chunks: Vec<String> = StringifyIter::new(config, rows.into_iter())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks, vec!["a;b\r\n", "1;2\r\n"]);
}

/// Writing the chunk sequence to a file yields a complete CSV document
/// identical to the one-shot batch form.
#[test]
fn test_chunks_written_to_file_match_batch_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");

    let config = StringifyConfig::new().columns(["id", "name"]);
    let rows = keyed_rows(&[
        r#"{"id": 1, "name": "one"}"#,
        r#"{"id": 2, "name": "two, with comma"}"#,
    ]);

    {
        let mut file = std::fs::File::create(&path).unwrap();
        for chunk in StringifyIter::new(config.clone(), rows.clone().into_iter()).unwrap() {
            file.write_all(chunk.unwrap().as_bytes()).unwrap();
        }
    }

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, stringify(config, &rows).unwrap());
    assert_eq!(
        written,
        "id,name\r\n1,one\r\n2,\"two, with comma\"\r\n"
    );
}

/// An encoder failure on item k leaves the header and the first k-1 data
/// chunks intact and produces nothing further.
#[test]
fn test_error_cuts_stream_at_failing_item() {
    let config = StringifyConfig::new().columns(["id", "tags"]);
    let rows = keyed_rows(&[
        r#"{"id": 1, "tags": "a"}"#,
        r#"{"id": 2, "tags": ["nested"]}"#,
        r#"{"id": 3, "tags": "c"}"#,
    ]);

    let mut iter = StringifyIter::new(config, rows.into_iter()).unwrap();
    assert_eq!(iter.next().unwrap().unwrap(), "id,tags\r\n");
    assert_eq!(iter.next().unwrap().unwrap(), "1,a\r\n");
    assert!(matches!(
        iter.next().unwrap().unwrap_err(),
        CsvStreamError::UnsupportedValue { .. }
    ));
    assert!(iter.next().is_none());
}

/// A keyed record arriving at a transform configured for positional rows
/// is rejected and terminates the stream.
#[test]
fn test_shape_mismatch_terminates_stream() {
    let rows = vec![
        Row::Positional(vec![json!(1)]),
        Row::from_json_line(r#"{"id": 2}"#).unwrap(),
        Row::Positional(vec![json!(3)]),
    ];

    let mut iter = StringifyIter::new(StringifyConfig::new(), rows.into_iter()).unwrap();
    assert_eq!(iter.next().unwrap().unwrap(), "1\r\n");
    assert!(matches!(
        iter.next().unwrap().unwrap_err(),
        CsvStreamError::ShapeMismatch { .. }
    ));
    assert!(iter.next().is_none());
}

/// Two transforms with identical configuration produce identical chunk
/// sequences for identical inputs.
#[test]
fn test_identical_configuration_is_deterministic() {
    let config = StringifyConfig::new().separator(';').columns(["a", "b"]);
    let rows = keyed_rows(&[r#"{"a": 1, "b": "x"}"#, r#"{"b": "y", "a": 2}"#]);

    let first: Vec<_> = StringifyIter::new(config.clone(), rows.clone().into_iter())
        .unwrap()
        .map(Result::unwrap)
        .collect();
    let second: Vec<_> = StringifyIter::new(config, rows.into_iter())
        .unwrap()
        .map(Result::unwrap)
        .collect();

    assert_eq!(first, second);
}

/// The async stream adapter yields the same sequence as the iterator.
#[tokio::test]
async fn test_stream_adapter_matches_iterator() {
    let config = StringifyConfig::new().columns(["id", "name"]);
    let rows = keyed_rows(&[r#"{"id": 1, "name": "one"}"#, r#"{"id": 2, "name": "two"}"#]);

    let from_iter: Vec<String> = StringifyIter::new(config.clone(), rows.clone().into_iter())
        .unwrap()
        .map(Result::unwrap)
        .collect();

    let from_stream: Vec<String> = StringifyStream::new(config, futures::stream::iter(rows))
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(from_iter, from_stream);
}

/// Keyed records missing configured columns render empty fields in the
/// right positions.
#[test]
fn test_missing_columns_render_empty_fields() {
    let config = StringifyConfig::new().columns(["id", "name", "note"]);
    let rows = keyed_rows(&[r#"{"id": 1}"#, r#"{"note": "n", "id": 2}"#]);

    let chunks: Vec<String> = StringifyIter::new(config, rows.into_iter())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(chunks, vec!["id,name,note\r\n", "1,,\r\n", "2,,n\r\n"]);
}
