//! One-shot statistical analysis of a provider's stream.
//!
//! An [`Analyzer`] reads its provider front to back exactly once. Every
//! analysis method claims the analyzer before touching the stream, so a second
//! call fails with [`AnalysisError::Used`] even when the first one failed.

use super::spread::{KeyedSpread, SpreadTracker};
use crate::error::AnalysisError;
use crate::provider::BufferedProvider;
use crate::source::ItemSource;
use std::cmp::Ordering;
use tracing::debug;

/// Which end of the value range to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    /// Strict comparison, so the first item seen keeps ties.
    fn beats(self, candidate: f64, current: f64) -> bool {
        match self {
            Extremum::Min => candidate < current,
            Extremum::Max => candidate > current,
        }
    }
}

/// Items holding the smallest and the largest projected value.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

/// Single-pass analyzer over a [`BufferedProvider`].
pub struct Analyzer<T, S> {
    provider: BufferedProvider<T, S>,
    used: bool,
}

impl<T, S> Analyzer<T, S>
where
    S: ItemSource<T>,
{
    pub fn new(provider: BufferedProvider<T, S>) -> Self {
        Self {
            provider,
            used: false,
        }
    }

    /// Analyzer over a fresh provider wrapping `source`.
    pub fn from_source(source: S) -> Self {
        Self::new(BufferedProvider::new(source))
    }

    /// Whether an analysis already ran on this instance.
    pub fn is_used(&self) -> bool {
        self.used
    }

    fn claim(&mut self) -> Result<(), AnalysisError> {
        if self.used {
            return Err(AnalysisError::Used);
        }
        self.used = true;
        Ok(())
    }

    /// Next item of the stream, or `None` at the end.
    async fn next_item(&mut self) -> Result<Option<T>, AnalysisError> {
        if !self.provider.has_more().await? {
            return Ok(None);
        }
        Ok(Some(self.provider.take_next().await?))
    }

    /// Arithmetic mean of the projected values.
    pub async fn average<P>(&mut self, projector: P) -> Result<f64, AnalysisError>
    where
        P: Fn(&T) -> Option<f64>,
    {
        self.claim()?;

        let mut sum = 0.0;
        let mut count = 0usize;

        while let Some(item) = self.next_item().await? {
            sum += project(&projector, &item, count)?;
            count += 1;
        }

        if count == 0 {
            return Err(AnalysisError::NoData);
        }

        debug!("Average over {} items", count);
        Ok(sum / count as f64)
    }

    /// The item with the smallest or largest projected value.
    ///
    /// Returns `Ok(None)` for an empty stream. On ties the earliest item wins.
    pub async fn extremum<P>(&mut self, projector: P, which: Extremum) -> Result<Option<T>, AnalysisError>
    where
        P: Fn(&T) -> Option<f64>,
    {
        self.claim()?;

        let Some(first) = self.next_item().await? else {
            return Ok(None);
        };
        let mut best_value = project(&projector, &first, 0)?;
        let mut best = first;
        let mut position = 1;

        while let Some(item) = self.next_item().await? {
            let value = project(&projector, &item, position)?;
            if which.beats(value, best_value) {
                best = item;
                best_value = value;
            }
            position += 1;
        }

        debug!("{:?} of {} items is {}", which, position, best_value);
        Ok(Some(best))
    }

    pub async fn smallest<P>(&mut self, projector: P) -> Result<Option<T>, AnalysisError>
    where
        P: Fn(&T) -> Option<f64>,
    {
        self.extremum(projector, Extremum::Min).await
    }

    pub async fn largest<P>(&mut self, projector: P) -> Result<Option<T>, AnalysisError>
    where
        P: Fn(&T) -> Option<f64>,
    {
        self.extremum(projector, Extremum::Max).await
    }

    /// Smallest and largest items in one pass. A single item is both.
    pub async fn range<P>(&mut self, projector: P) -> Result<Option<MinMax<T>>, AnalysisError>
    where
        P: Fn(&T) -> Option<f64>,
        T: Clone,
    {
        self.claim()?;

        let Some(first) = self.next_item().await? else {
            return Ok(None);
        };
        let first_value = project(&projector, &first, 0)?;
        let (mut min_value, mut max_value) = (first_value, first_value);
        let mut min = first.clone();
        let mut max = first;
        let mut position = 1;

        while let Some(item) = self.next_item().await? {
            let value = project(&projector, &item, position)?;
            if value > max_value {
                max_value = value;
                max = item.clone();
            }
            if value < min_value {
                min_value = value;
                min = item;
            }
            position += 1;
        }

        debug!("Range of {} items: {} to {}", position, min_value, max_value);
        Ok(Some(MinMax { min, max }))
    }

    /// The whole stream, stably sorted by `compare`.
    pub async fn sorted<C>(&mut self, compare: C) -> Result<Vec<T>, AnalysisError>
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        self.claim()?;

        let mut items = self.provider.drain_all().await?;
        items.sort_by(compare);

        debug!("Sorted {} items", items.len());
        Ok(items)
    }

    /// Key whose values span the widest interval.
    ///
    /// `flatten` turns each item into `(key, value)` pairs, so one item may
    /// contribute to many keys. Returns `Ok(None)` when no pair was seen.
    pub async fn spread_by_key<F>(&mut self, flatten: F) -> Result<Option<KeyedSpread>, AnalysisError>
    where
        F: Fn(&T) -> Option<Vec<(String, f64)>>,
    {
        self.claim()?;

        let mut tracker = SpreadTracker::default();
        let mut position = 0;

        while let Some(item) = self.next_item().await? {
            let pairs = flatten(&item).ok_or(AnalysisError::Unprojectable { position })?;
            for (key, value) in pairs {
                tracker.observe(key, value);
            }
            position += 1;
        }

        Ok(tracker.widest())
    }
}

fn project<T, P>(projector: &P, item: &T, position: usize) -> Result<f64, AnalysisError>
where
    P: Fn(&T) -> Option<f64>,
{
    projector(item).ok_or(AnalysisError::Unprojectable { position })
}
