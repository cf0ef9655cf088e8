//! Integration tests for the channel-driven stringify pipeline

use csv_streamer::config::StringifyConfig;
use csv_streamer::error::CsvStreamError;
use csv_streamer::pipeline::StringifyPipeline;
use csv_streamer::row::Row;

use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::AsyncWriteExt;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

/// Helper: spawn a pipeline and return its channels and join handle.
fn spawn_pipeline(
    config: StringifyConfig,
) -> (
    mpsc::Sender<Row>,
    mpsc::Receiver<String>,
    broadcast::Sender<()>,
    tokio::task::JoinHandle<Result<u64, CsvStreamError>>,
) {
    let (item_tx, item_rx) = mpsc::channel(8);
    let (chunk_tx, chunk_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let pipeline = StringifyPipeline::new(config).expect("pipeline should build");
    let handle = tokio::spawn(pipeline.run(item_rx, chunk_tx, shutdown_rx));
    (item_tx, chunk_rx, shutdown_tx, handle)
}

/// Feeding rows through the pipeline into a file produces a complete CSV
/// document, header first.
#[tokio::test]
async fn test_pipeline_writes_full_document_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output.csv");

    let config = StringifyConfig::new().columns(["id", "name"]);
    let (item_tx, mut chunk_rx, _shutdown_tx, handle) = spawn_pipeline(config);

    for line in [r#"{"id": 1, "name": "one"}"#, r#"{"id": 2, "name": "two"}"#] {
        item_tx
            .send(Row::from_json_line(line).unwrap())
            .await
            .unwrap();
    }
    drop(item_tx);

    let mut file = tokio::fs::File::create(&path).await.unwrap();
    while let Some(chunk) = chunk_rx.recv().await {
        file.write_all(chunk.as_bytes()).await.unwrap();
    }
    file.flush().await.unwrap();

    let rows = timeout(Duration::from_secs(5), handle)
        .await
        .expect("pipeline timed out")
        .expect("pipeline task panicked")
        .expect("pipeline returned error");
    assert_eq!(rows, 2);

    let written = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(written, "id,name\r\n1,one\r\n2,two\r\n");
}

/// A shutdown signal stops the pump without invalidating chunks already
/// delivered.
#[tokio::test]
async fn test_pipeline_shutdown_keeps_delivered_chunks() {
    let (item_tx, mut chunk_rx, shutdown_tx, handle) = spawn_pipeline(StringifyConfig::new());

    item_tx
        .send(Row::Positional(vec![json!(1), json!("one")]))
        .await
        .unwrap();
    let first = chunk_rx.recv().await.unwrap();
    assert_eq!(first, "1,one\r\n");

    shutdown_tx.send(()).unwrap();
    let rows = timeout(Duration::from_secs(5), handle)
        .await
        .expect("pipeline timed out")
        .expect("pipeline task panicked")
        .expect("pipeline returned error");
    assert_eq!(rows, 1);

    // The pump closed its chunk sender on the way out.
    assert!(chunk_rx.recv().await.is_none());
    drop(item_tx);
}

/// An encoding failure terminates the pump with the offending error while
/// earlier chunks stay delivered.
#[tokio::test]
async fn test_pipeline_error_terminates_after_good_chunks() {
    let config = StringifyConfig::new().columns(["id", "tags"]);
    let (item_tx, mut chunk_rx, _shutdown_tx, handle) = spawn_pipeline(config);

    for line in [
        r#"{"id": 1, "tags": "a"}"#,
        r#"{"id": 2, "tags": {"nested": true}}"#,
        r#"{"id": 3, "tags": "c"}"#,
    ] {
        item_tx
            .send(Row::from_json_line(line).unwrap())
            .await
            .unwrap();
    }
    drop(item_tx);

    let mut received = Vec::new();
    while let Some(chunk) = chunk_rx.recv().await {
        received.push(chunk);
    }
    assert_eq!(received, vec!["id,tags\r\n", "1,a\r\n"]);

    let error = timeout(Duration::from_secs(5), handle)
        .await
        .expect("pipeline timed out")
        .expect("pipeline task panicked")
        .expect_err("pipeline should fail");
    assert!(matches!(error, CsvStreamError::UnsupportedValue { .. }));
}

/// With no items at all, a configured column list still yields exactly the
/// header chunk.
#[tokio::test]
async fn test_pipeline_empty_input_emits_header_only() {
    let config = StringifyConfig::new().columns(["id", "name"]);
    let (item_tx, mut chunk_rx, _shutdown_tx, handle) = spawn_pipeline(config);

    drop(item_tx);

    let mut received = Vec::new();
    while let Some(chunk) = chunk_rx.recv().await {
        received.push(chunk);
    }
    assert_eq!(received, vec!["id,name\r\n"]);
    assert_eq!(handle.await.unwrap().unwrap(), 0);
}

/// Backpressure: with a full chunk channel the pump pauses instead of
/// dropping or reordering chunks.
#[tokio::test]
async fn test_pipeline_respects_bounded_chunk_channel() {
    let (item_tx, item_rx) = mpsc::channel(64);
    let (chunk_tx, mut chunk_rx) = mpsc::channel(1);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let pipeline = StringifyPipeline::new(StringifyConfig::new()).unwrap();
    let handle = tokio::spawn(pipeline.run(item_rx, chunk_tx, shutdown_rx));

    for i in 0..20 {
        item_tx
            .send(Row::Positional(vec![json!(i)]))
            .await
            .unwrap();
    }
    drop(item_tx);

    // Drain slowly; every chunk must still arrive, in order.
    let mut received = Vec::new();
    while let Some(chunk) = chunk_rx.recv().await {
        received.push(chunk);
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    let expected: Vec<String> = (0..20).map(|i| format!("{i}\r\n")).collect();
    assert_eq!(received, expected);
    assert_eq!(handle.await.unwrap().unwrap(), 20);
}
