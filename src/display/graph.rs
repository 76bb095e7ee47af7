//! Horizontal bar chart drawn with text.

const BAR: char = '■';

/// Rows of labelled values rendered as horizontal bars.
///
/// The smallest value gets a tenth of the bar width, the largest the full
/// width, everything else is scaled linearly in between.
#[derive(Debug, Clone, Default)]
pub struct BarChart {
    entries: Vec<(String, f64)>,
    min: f64,
    max: f64,
}

impl BarChart {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.entries.push((label.into(), value));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of bar characters for `value`.
    fn bar_length(&self, value: f64, bar_width: usize) -> usize {
        let width = bar_width as f64;
        let ratio = if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            1.0
        };
        let columns = width * 0.1 + ratio * width * 0.9;
        (columns.ceil() as usize).saturating_sub(1)
    }

    /// One line per entry: padded label, bar, value.
    pub fn render(&self, label_width: usize, bar_width: usize) -> String {
        let mut output = String::new();

        for (label, value) in &self.entries {
            let bar: String = std::iter::repeat(BAR)
                .take(self.bar_length(*value, bar_width))
                .collect();
            output.push_str(&format!(
                "{:<width$} {} {:.4}\n",
                label,
                bar,
                value,
                width = label_width
            ));
        }

        output
    }
}
