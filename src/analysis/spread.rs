//! Per-key min/max tracking.

use std::collections::BTreeMap;

/// The key whose values moved the most, with the bounds they moved between.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedSpread {
    pub key: String,
    pub min: f64,
    pub max: f64,
}

impl KeyedSpread {
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Running bounds for every key seen so far.
#[derive(Debug, Default)]
pub(crate) struct SpreadTracker {
    bounds: BTreeMap<String, (f64, f64)>,
}

impl SpreadTracker {
    pub(crate) fn observe(&mut self, key: String, value: f64) {
        let (min, max) = self
            .bounds
            .entry(key)
            .or_insert((f64::INFINITY, f64::NEG_INFINITY));

        if value < *min {
            *min = value;
        }
        if value > *max {
            *max = value;
        }
    }

    /// Key with the strictly largest positive spread; the smallest key wins
    /// ties. `None` when no key moved at all.
    pub(crate) fn widest(self) -> Option<KeyedSpread> {
        let mut best: Option<KeyedSpread> = None;

        for (key, (min, max)) in self.bounds {
            let candidate = KeyedSpread { key, min, max };
            let floor = best.as_ref().map_or(0.0, KeyedSpread::spread);
            let wider = candidate.spread() > floor;
            if wider {
                best = Some(candidate);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widest_key() {
        let mut tracker = SpreadTracker::default();
        for (key, value) in [("USD", 3.8), ("EUR", 4.2), ("USD", 4.1), ("EUR", 4.3), ("USD", 3.7)] {
            tracker.observe(key.to_string(), value);
        }

        let widest = tracker.widest().unwrap();
        assert_eq!(widest.key, "USD");
        assert_eq!(widest.min, 3.7);
        assert_eq!(widest.max, 4.1);
        assert!((widest.spread() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_ties_go_to_smallest_key() {
        let mut tracker = SpreadTracker::default();
        for (key, value) in [("JPY", 1.0), ("JPY", 1.5), ("CHF", 2.0), ("CHF", 2.5)] {
            tracker.observe(key.to_string(), value);
        }

        assert_eq!(tracker.widest().unwrap().key, "CHF");
    }

    #[test]
    fn test_unchanged_values_have_no_widest_key() {
        let mut tracker = SpreadTracker::default();
        for (key, value) in [("JPY", 1.0), ("CHF", 2.0), ("JPY", 1.0)] {
            tracker.observe(key.to_string(), value);
        }

        assert!(tracker.widest().is_none());
    }

    #[test]
    fn test_empty_tracker() {
        assert!(SpreadTracker::default().widest().is_none());
    }
}
