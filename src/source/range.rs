//! Source that walks a date range in fixed-size chunks.
//!
//! Every fetch requests one sub-range `[from, to]`, where `to` is `from`
//! advanced by the step and clamped to the end boundary. The next sub-range
//! starts the day after `to`, so chunks never overlap and never leave gaps.

use super::ItemSource;
use crate::api::{extract_list, JsonApi, PayloadShape};
use crate::error::FetchError;
use chrono::{Days, Months, NaiveDate};
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Maps a sub-range `(from, to)` to the endpoint to request.
pub type RequestTemplate = Box<dyn Fn(NaiveDate, NaiveDate) -> String + Send + Sync>;

/// Calendar unit of a chunk step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Day,
    Week,
    Month,
    Year,
}

/// Chunk length: `magnitude` times `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub unit: StepUnit,
    pub magnitude: u32,
}

impl Step {
    pub fn new(unit: StepUnit, magnitude: u32) -> Self {
        Self { unit, magnitude }
    }

    pub fn days(magnitude: u32) -> Self {
        Self::new(StepUnit::Day, magnitude)
    }

    /// `date` moved forward by this step, or `None` past the calendar's end.
    fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        let n = self.magnitude;
        match self.unit {
            StepUnit::Day => date.checked_add_days(Days::new(u64::from(n))),
            StepUnit::Week => date.checked_add_days(Days::new(u64::from(n) * 7)),
            StepUnit::Month => date.checked_add_months(Months::new(n)),
            StepUnit::Year => n
                .checked_mul(12)
                .and_then(|months| date.checked_add_months(Months::new(months))),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            StepUnit::Day => "day",
            StepUnit::Week => "week",
            StepUnit::Month => "month",
            StepUnit::Year => "year",
        };
        write!(f, "{} {}(s)", self.magnitude, unit)
    }
}

/// Position within the range. `next` is `None` once the calendar overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RangeCursor {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

/// A planned sub-range plus where the cursor goes once it is consumed.
#[derive(Debug, Clone, Copy)]
struct Span {
    from: NaiveDate,
    to: NaiveDate,
    after: Option<NaiveDate>,
}

impl RangeCursor {
    fn is_exhausted(&self) -> bool {
        self.next.map_or(true, |next| next > self.end)
    }

    /// The next sub-range, without moving the cursor.
    fn plan(&self, step: Step) -> Option<Span> {
        let from = self.next.filter(|next| *next <= self.end)?;
        let to = step.advance(from).map_or(self.end, |to| to.min(self.end));
        Some(Span {
            from,
            to,
            after: to.checked_add_days(Days::new(1)),
        })
    }
}

/// [`ItemSource`] issuing one request per date sub-range.
pub struct ChunkedRangeSource {
    api: Arc<dyn JsonApi>,
    cursor: RangeCursor,
    step: Step,
    shape: PayloadShape,
    template: RequestTemplate,
}

impl ChunkedRangeSource {
    /// Create a source covering `start..=end` inclusive.
    ///
    /// Fails with [`FetchError::InvalidStep`] when the step has zero length.
    pub fn new(
        api: Arc<dyn JsonApi>,
        start: NaiveDate,
        end: NaiveDate,
        step: Step,
        shape: PayloadShape,
        template: impl Fn(NaiveDate, NaiveDate) -> String + Send + Sync + 'static,
    ) -> Result<Self, FetchError> {
        if step.magnitude == 0 {
            return Err(FetchError::InvalidStep);
        }

        debug!("Chunked range {} to {} in steps of {}", start, end, step);

        Ok(Self {
            api,
            cursor: RangeCursor {
                next: Some(start),
                end,
            },
            step,
            shape,
            template: Box::new(template),
        })
    }

    /// True once every sub-range has been fetched.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }
}

impl fmt::Debug for ChunkedRangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedRangeSource")
            .field("cursor", &self.cursor)
            .field("step", &self.step)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl ItemSource<Value> for ChunkedRangeSource {
    fn fetch(&mut self) -> BoxFuture<'_, Result<Vec<Value>, FetchError>> {
        async move {
            let Some(span) = self.cursor.plan(self.step) else {
                return Ok(Vec::new());
            };

            let endpoint = (self.template)(span.from, span.to);
            debug!("Fetching {} to {}: {}", span.from, span.to, endpoint);

            let payload = self.api.request(&endpoint).await?;
            let items = extract_list(payload, &self.shape)?;

            // Only a consumed chunk moves the cursor.
            self.cursor.next = span.after;

            debug!("Chunk {} to {} held {} items", span.from, span.to, items.len());
            Ok(items)
        }
        .boxed()
    }

    fn has_pending_blocks(&self) -> bool {
        !self.cursor.is_exhausted()
    }
}
