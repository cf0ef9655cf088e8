//! csv-streamer - Stream JSON Lines rows into CSV
//!
//! Reads rows from a JSON Lines source (one JSON array or object per
//! line), runs them through the stringify pipeline, and writes the
//! resulting CSV chunks to a file or stdout as they are produced.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success (including graceful shutdown) |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O error |
//! | 4 | Runtime error (parse or encoding failure) |

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use csv_streamer::cli::Args;
use csv_streamer::error::CsvStreamError;
use csv_streamer::pipeline::StringifyPipeline;
use csv_streamer::row::Row;

/// Exit code for success (including graceful shutdown)
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for runtime errors (parse or encoding failures)
const EXIT_RUNTIME_ERROR: u8 = 4;

/// Capacity of the item and chunk channels; bounds how far the reader can
/// run ahead of the consumer.
const CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(args).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Main application logic: wires source, pipeline, and sink together and
/// coordinates graceful shutdown.
async fn run(args: Args) -> Result<(), CsvStreamError> {
    let pipeline = StringifyPipeline::new(args.to_config())?;

    // Ctrl-C feeds the shutdown broadcast; the pump stops cleanly and
    // whatever was already written remains valid.
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let shutdown_tx_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx_signal.send(());
        }
    });

    let (item_tx, item_rx) = mpsc::channel::<Row>(CHANNEL_CAPACITY);
    let (chunk_tx, chunk_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);

    let pump = pipeline.run(item_rx, chunk_tx, shutdown_rx);

    let input = args.input.clone();
    let reader = async move {
        match input {
            Some(path) => feed_rows(open_input(&path).await?, item_tx).await,
            None => feed_rows(BufReader::new(tokio::io::stdin()), item_tx).await,
        }
    };

    let output = args.output.clone();
    let writer = async move {
        match output {
            Some(path) => write_chunks(tokio::fs::File::create(&path).await?, chunk_rx).await,
            None => write_chunks(tokio::io::stdout(), chunk_rx).await,
        }
    };

    let (rows, (), ()) = tokio::try_join!(pump, reader, writer)?;
    info!(rows, "stringify complete");
    Ok(())
}

async fn open_input(path: &PathBuf) -> Result<BufReader<tokio::fs::File>, CsvStreamError> {
    Ok(BufReader::new(tokio::fs::File::open(path).await?))
}

/// Parses JSON Lines into rows and feeds them to the pipeline. Blank lines
/// are skipped; a closed item channel means the pump stopped and reading
/// ends cleanly.
async fn feed_rows<R>(reader: R, items: mpsc::Sender<Row>) -> Result<(), CsvStreamError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let row = Row::from_json_line(&line)?;
        if items.send(row).await.is_err() {
            break;
        }
    }
    Ok(())
}

/// Writes chunks to the sink as they arrive, flushing once the chunk
/// channel closes.
async fn write_chunks<W>(
    mut writer: W,
    mut chunks: mpsc::Receiver<String>,
) -> Result<(), CsvStreamError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(chunk) = chunks.recv().await {
        writer.write_all(chunk.as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Maps an error to the process exit code.
fn error_to_exit_code(error: &CsvStreamError) -> u8 {
    match error {
        CsvStreamError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        CsvStreamError::Io(_) => EXIT_IO_ERROR,
        _ => EXIT_RUNTIME_ERROR,
    }
}
