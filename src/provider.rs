//! Item-at-a-time view over a block-producing source.
//!
//! [`BufferedProvider`] hides how a source partitions its data. Consumers see
//! one FIFO stream regardless of how many fetches it took to fill it.

use crate::error::{FetchError, ProviderError};
use crate::source::ItemSource;
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::debug;

/// Buffers blocks from an [`ItemSource`] and hands items out one by one.
pub struct BufferedProvider<T, S> {
    source: S,
    buffer: VecDeque<T>,
    fetches: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> BufferedProvider<T, S>
where
    S: ItemSource<T>,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            fetches: 0,
            _item: PhantomData,
        }
    }

    /// Whether another item is available, fetching if the buffer is empty.
    ///
    /// No fetch happens while items are still buffered. An empty block ends
    /// the stream unless the source reports more blocks pending, in which
    /// case fetching continues with the next block.
    pub async fn has_more(&mut self) -> Result<bool, FetchError> {
        while self.buffer.is_empty() {
            let block = self.source.fetch().await?;
            self.fetches += 1;
            debug!("Fetch #{} delivered {} items", self.fetches, block.len());

            if block.is_empty() && !self.source.has_pending_blocks() {
                break;
            }
            self.buffer.extend(block);
        }

        Ok(!self.buffer.is_empty())
    }

    /// Remove and return the next item.
    pub async fn take_next(&mut self) -> Result<T, ProviderError> {
        if !self.has_more().await? {
            return Err(ProviderError::Empty);
        }

        self.buffer.pop_front().ok_or(ProviderError::Empty)
    }

    /// Everything the source still has to offer, in arrival order.
    pub async fn drain_all(&mut self) -> Result<Vec<T>, FetchError> {
        let mut items = Vec::new();

        while self.has_more().await? {
            items.extend(self.buffer.drain(..));
        }

        Ok(items)
    }

    /// Number of fetches issued against the source.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
