//! Pull adapters for the stringify transform.
//!
//! Wraps a [`Stringifier`] around an upstream row source: [`StringifyIter`]
//! for synchronous iterators and [`StringifyStream`] for asynchronous
//! `futures` streams. Both yield the header chunk first when one is
//! configured, then one chunk per row, and fuse after the first error so a
//! terminated transform never emits again.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::config::StringifyConfig;
use crate::encoder::{CsvEncoder, RecordEncoder};
use crate::error::CsvStreamError;
use crate::row::Row;
use crate::stringifier::Stringifier;

/// Where an adapter is in the chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdapterState {
    /// The start-of-stream transition has not run yet.
    Start,
    /// Items are being pulled and encoded.
    Items,
    /// The source ended or an error was yielded; nothing follows.
    Done,
}

/// Iterator adapter over the stringify transform.
///
/// Yields `Result<String, CsvStreamError>` chunks: the header first when
/// columns are configured, then one chunk per upstream row. After yielding
/// an error the iterator is fused and returns `None` forever.
///
/// # Example
///
/// ```
/// use csv_streamer::config::StringifyConfig;
/// use csv_streamer::row::Row;
/// use csv_streamer::stream::StringifyIter;
/// use serde_json::json;
///
/// let rows = vec![Row::Positional(vec![json!(1), json!("one")])];
/// let chunks: Vec<String> = StringifyIter::new(StringifyConfig::new(), rows.into_iter())
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(chunks, vec!["1,one\r\n".to_string()]);
/// ```
pub struct StringifyIter<I, E = CsvEncoder> {
    stringifier: Stringifier<E>,
    items: I,
    state: AdapterState,
}

impl<I> StringifyIter<I, CsvEncoder>
where
    I: Iterator<Item = Row>,
{
    /// Creates an iterator adapter using the bundled encoder.
    pub fn new(config: StringifyConfig, items: I) -> Result<Self, CsvStreamError> {
        Self::with_encoder(config, CsvEncoder::new(), items)
    }
}

impl<I, E> StringifyIter<I, E>
where
    I: Iterator<Item = Row>,
    E: RecordEncoder,
{
    /// Creates an iterator adapter with a custom record encoder.
    pub fn with_encoder(
        config: StringifyConfig,
        encoder: E,
        items: I,
    ) -> Result<Self, CsvStreamError> {
        Ok(Self {
            stringifier: Stringifier::with_encoder(config, encoder)?,
            items,
            state: AdapterState::Start,
        })
    }
}

impl<I, E> Iterator for StringifyIter<I, E>
where
    I: Iterator<Item = Row>,
    E: RecordEncoder,
{
    type Item = Result<String, CsvStreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                AdapterState::Done => return None,
                AdapterState::Start => {
                    self.state = AdapterState::Items;
                    match self.stringifier.start() {
                        Ok(Some(header)) => return Some(Ok(header)),
                        Ok(None) => {}
                        Err(error) => {
                            self.state = AdapterState::Done;
                            return Some(Err(error));
                        }
                    }
                }
                AdapterState::Items => match self.items.next() {
                    None => {
                        self.state = AdapterState::Done;
                        return None;
                    }
                    Some(row) => match self.stringifier.push(&row) {
                        Ok(chunk) => return Some(Ok(chunk)),
                        Err(error) => {
                            self.state = AdapterState::Done;
                            return Some(Err(error));
                        }
                    },
                },
            }
        }
    }
}

/// Asynchronous stream adapter over the stringify transform.
///
/// The async twin of [`StringifyIter`]: wraps a `futures` stream of rows
/// and yields chunk results in the same order, suspending exactly where
/// the inner stream suspends. Backpressure is therefore whatever the
/// surrounding runtime applies to the inner stream and to the consumer of
/// this one.
pub struct StringifyStream<S, E = CsvEncoder> {
    stringifier: Stringifier<E>,
    items: S,
    state: AdapterState,
}

impl<S> StringifyStream<S, CsvEncoder>
where
    S: Stream<Item = Row> + Unpin,
{
    /// Creates a stream adapter using the bundled encoder.
    pub fn new(config: StringifyConfig, items: S) -> Result<Self, CsvStreamError> {
        Self::with_encoder(config, CsvEncoder::new(), items)
    }
}

impl<S, E> StringifyStream<S, E>
where
    S: Stream<Item = Row> + Unpin,
    E: RecordEncoder,
{
    /// Creates a stream adapter with a custom record encoder.
    pub fn with_encoder(
        config: StringifyConfig,
        encoder: E,
        items: S,
    ) -> Result<Self, CsvStreamError> {
        Ok(Self {
            stringifier: Stringifier::with_encoder(config, encoder)?,
            items,
            state: AdapterState::Start,
        })
    }
}

impl<S, E> Stream for StringifyStream<S, E>
where
    S: Stream<Item = Row> + Unpin,
    E: RecordEncoder + Unpin,
{
    type Item = Result<String, CsvStreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match this.state {
                AdapterState::Done => return Poll::Ready(None),
                AdapterState::Start => {
                    this.state = AdapterState::Items;
                    match this.stringifier.start() {
                        Ok(Some(header)) => return Poll::Ready(Some(Ok(header))),
                        Ok(None) => {}
                        Err(error) => {
                            this.state = AdapterState::Done;
                            return Poll::Ready(Some(Err(error)));
                        }
                    }
                }
                AdapterState::Items => match Pin::new(&mut this.items).poll_next(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(None) => {
                        this.state = AdapterState::Done;
                        return Poll::Ready(None);
                    }
                    Poll::Ready(Some(row)) => match this.stringifier.push(&row) {
                        Ok(chunk) => return Poll::Ready(Some(Ok(chunk))),
                        Err(error) => {
                            this.state = AdapterState::Done;
                            return Poll::Ready(Some(Err(error)));
                        }
                    },
                },
            }
        }
    }
}
