//! Source replaying blocks already held in memory.

use super::ItemSource;
use crate::error::FetchError;
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::VecDeque;

/// Hands out pre-built blocks one per fetch, then empty blocks forever.
#[derive(Debug, Clone)]
pub struct MemorySource<T> {
    blocks: VecDeque<Vec<T>>,
    fetches: usize,
}

impl<T> MemorySource<T> {
    /// Source delivering exactly these blocks, in order.
    pub fn new(blocks: Vec<Vec<T>>) -> Self {
        Self {
            blocks: blocks.into(),
            fetches: 0,
        }
    }

    /// Split `items` into blocks of at most `block_size` items.
    pub fn chunked(items: Vec<T>, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        let mut blocks = Vec::new();
        let mut iter = items.into_iter().peekable();

        while iter.peek().is_some() {
            blocks.push(iter.by_ref().take(block_size).collect());
        }

        Self::new(blocks)
    }

    /// Number of fetch calls served so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }
}

impl<T: Send + 'static> ItemSource<T> for MemorySource<T> {
    fn fetch(&mut self) -> BoxFuture<'_, Result<Vec<T>, FetchError>> {
        self.fetches += 1;
        let block = self.blocks.pop_front().unwrap_or_default();
        future::ready(Ok(block)).boxed()
    }

    fn has_pending_blocks(&self) -> bool {
        !self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_blocks_in_order_then_empty() {
        let mut source = MemorySource::new(vec![vec![1, 2], vec![], vec![3]]);

        assert_eq!(block_on(source.fetch()).unwrap(), vec![1, 2]);
        assert_eq!(block_on(source.fetch()).unwrap(), Vec::<i32>::new());
        assert!(source.has_pending_blocks());
        assert_eq!(block_on(source.fetch()).unwrap(), vec![3]);
        assert!(!source.has_pending_blocks());
        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert!(block_on(source.fetch()).unwrap().is_empty());
        assert_eq!(source.fetches(), 5);
    }

    #[test]
    fn test_chunked_split() {
        let mut source = MemorySource::chunked(vec!["A", "B", "C", "D", "E", "F", "G"], 3);

        assert_eq!(block_on(source.fetch()).unwrap(), vec!["A", "B", "C"]);
        assert_eq!(block_on(source.fetch()).unwrap(), vec!["D", "E", "F"]);
        assert_eq!(block_on(source.fetch()).unwrap(), vec!["G"]);
        assert!(block_on(source.fetch()).unwrap().is_empty());
    }

    #[test]
    fn test_chunked_zero_block_size_is_one() {
        let mut source = MemorySource::chunked(vec![1, 2], 0);
        assert_eq!(block_on(source.fetch()).unwrap(), vec![1]);
        assert_eq!(block_on(source.fetch()).unwrap(), vec![2]);
    }
}
