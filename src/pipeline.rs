//! Channel-driven pipeline for the stringify transform.
//!
//! [`StringifyPipeline`] pumps rows from an upstream mpsc channel through a
//! [`Stringifier`] into a downstream chunk channel. A bounded chunk channel
//! is the backpressure point: when the consumer is not ready, the pump (and
//! through the bounded item channel, the producer) pauses. It supports
//! graceful shutdown via a broadcast channel and reports the number of data
//! chunks delivered on completion.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::config::StringifyConfig;
use crate::encoder::{CsvEncoder, RecordEncoder};
use crate::error::CsvStreamError;
use crate::row::Row;
use crate::stringifier::Stringifier;

/// Pump that drives a [`Stringifier`] between two channels.
///
/// The pipeline owns its transform, so one instance serves exactly one
/// producer/consumer pair. It holds no resources beyond the channel
/// endpoints passed to [`run`](Self::run); cancellation (a shutdown signal
/// or a dropped chunk receiver) needs no teardown beyond returning.
///
/// # Example
///
/// ```rust,ignore
/// use csv_streamer::config::StringifyConfig;
/// use csv_streamer::pipeline::StringifyPipeline;
/// use tokio::sync::{broadcast, mpsc};
///
/// let (item_tx, item_rx) = mpsc::channel(16);
/// let (chunk_tx, mut chunk_rx) = mpsc::channel(16);
/// let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
///
/// let pipeline = StringifyPipeline::new(StringifyConfig::new())?;
/// let handle = tokio::spawn(pipeline.run(item_rx, chunk_tx, shutdown_rx));
///
/// item_tx.send(row).await?;
/// drop(item_tx);
/// while let Some(chunk) = chunk_rx.recv().await {
///     print!("{chunk}");
/// }
/// let rows = handle.await??;
/// ```
pub struct StringifyPipeline<E = CsvEncoder> {
    /// The transform driven by this pump.
    stringifier: Stringifier<E>,
}

impl StringifyPipeline<CsvEncoder> {
    /// Creates a pipeline using the bundled RFC 4180 encoder.
    pub fn new(config: StringifyConfig) -> Result<Self, CsvStreamError> {
        Ok(Self {
            stringifier: Stringifier::new(config)?,
        })
    }
}

impl<E: RecordEncoder> StringifyPipeline<E> {
    /// Creates a pipeline with a custom record encoder.
    pub fn with_encoder(config: StringifyConfig, encoder: E) -> Result<Self, CsvStreamError> {
        Ok(Self {
            stringifier: Stringifier::with_encoder(config, encoder)?,
        })
    }

    /// Runs the pump until the item channel closes, the chunk receiver is
    /// dropped, or a shutdown signal arrives.
    ///
    /// The header chunk (when configured) is delivered before any item is
    /// read. Each received row becomes exactly one chunk, in order. A
    /// dropped chunk receiver and an external shutdown are cancellation,
    /// not errors: the pump stops cleanly and chunks already delivered
    /// remain valid.
    ///
    /// # Returns
    ///
    /// The number of data chunks delivered (header excluded).
    ///
    /// # Errors
    ///
    /// Returns the first encoding failure unchanged. No chunk is delivered
    /// for the failing item or any later one.
    pub async fn run(
        mut self,
        mut items: mpsc::Receiver<Row>,
        chunks: mpsc::Sender<String>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<u64, CsvStreamError> {
        if let Some(header) = self.stringifier.start()? {
            if chunks.send(header).await.is_err() {
                debug!("chunk receiver dropped before the header was delivered");
                return Ok(0);
            }
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!(
                        rows = self.stringifier.rows_written(),
                        "shutdown signal received, stopping stringify pipeline"
                    );
                    break;
                }
                maybe_row = items.recv() => {
                    match maybe_row {
                        // Upstream closed: normal end of stream.
                        None => break,
                        Some(row) => {
                            let chunk = self.stringifier.push(&row)?;
                            if chunks.send(chunk).await.is_err() {
                                debug!("chunk receiver dropped, stopping stringify pipeline");
                                break;
                            }
                        }
                    }
                }
            }
        }

        Ok(self.stringifier.rows_written())
    }
}
