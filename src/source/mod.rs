//! Item sources: where blocks of items come from.
//!
//! A source hands out the next block on every [`ItemSource::fetch`] call.
//! It never announces the end of data; callers infer exhaustion from the
//! blocks coming back empty, see [`crate::provider::BufferedProvider`].
//! Sources whose empty blocks can be mid-stream (a chunk with no records)
//! say so through [`ItemSource::has_pending_blocks`].

pub mod memory;
pub mod range;
pub mod single;

pub use memory::MemorySource;
pub use range::{ChunkedRangeSource, RequestTemplate, Step, StepUnit};
pub use single::SingleRequestSource;

use crate::error::FetchError;
use futures::future::BoxFuture;

/// Pull-based producer of item blocks.
pub trait ItemSource<T>: Send {
    /// Retrieve the next block. An empty block is a valid result.
    fn fetch(&mut self) -> BoxFuture<'_, Result<Vec<T>, FetchError>>;

    /// True when blocks remain even though the last one may have been empty.
    ///
    /// The default is `false`: an empty block ends the stream.
    fn has_pending_blocks(&self) -> bool {
        false
    }
}

impl<T, S> ItemSource<T> for Box<S>
where
    S: ItemSource<T> + ?Sized,
{
    fn fetch(&mut self) -> BoxFuture<'_, Result<Vec<T>, FetchError>> {
        (**self).fetch()
    }

    fn has_pending_blocks(&self) -> bool {
        (**self).has_pending_blocks()
    }
}
