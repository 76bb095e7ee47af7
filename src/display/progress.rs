//! Spinner shown while a multi-request fetch is running.

use crate::error::FetchError;
use crate::source::ItemSource;
use futures::future::{BoxFuture, FutureExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Wraps a source and reports fetched blocks and records on a spinner.
///
/// The spinner is cleared when the wrapper is dropped.
pub struct ProgressSource<S> {
    inner: S,
    bar: ProgressBar,
    label: String,
    records: u64,
}

impl<S> ProgressSource<S> {
    pub fn new(inner: S, label: impl Into<String>) -> Self {
        let label = label.into();
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} requests)")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(label.clone());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self {
            inner,
            bar,
            label,
            records: 0,
        }
    }

    /// Records fetched so far.
    pub fn records(&self) -> u64 {
        self.records
    }
}

impl<T, S> ItemSource<T> for ProgressSource<S>
where
    T: Send + 'static,
    S: ItemSource<T>,
{
    fn fetch(&mut self) -> BoxFuture<'_, Result<Vec<T>, FetchError>> {
        async move {
            let block = self.inner.fetch().await?;
            self.records += block.len() as u64;
            self.bar.inc(1);
            self.bar
                .set_message(format!("{}: {} records", self.label, self.records));
            Ok(block)
        }
        .boxed()
    }

    fn has_pending_blocks(&self) -> bool {
        self.inner.has_pending_blocks()
    }
}

impl<S> Drop for ProgressSource<S> {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
