//! Continuous numeric scale with optional "nice" domain rounding.

use super::ScaleError;
use serde::Serialize;

/// Default tick count used when niceing a domain.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Maps a continuous domain `[min, max]` onto a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Builds a scale over the extent of `values`. Non-finite values are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::EmptyDomain`] when no finite value remains.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        range: [f64; 2],
    ) -> Result<Self, ScaleError> {
        let [min, max] = extent(values).ok_or(ScaleError::EmptyDomain { scale: "linear" })?;
        Ok(Self {
            domain: [min, max],
            range,
        })
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn min(&self) -> f64 {
        self.domain[0]
    }

    pub fn max(&self) -> f64 {
        self.domain[1]
    }

    /// Expands the domain outward to multiples of a 1, 2 or 5 × 10ⁿ step so
    /// that roughly `count` ticks land on round values. A degenerate domain
    /// is left untouched.
    pub fn nice(self, count: usize) -> Self {
        let [min, max] = self.domain;
        if count == 0 || min >= max {
            return self;
        }

        let (mut start, mut stop) = (min, max);
        let mut previous = None;
        for _ in 0..10 {
            let step = TickStep::new(start, stop, count);
            if previous == Some(step) {
                break;
            }
            (start, stop) = step.widen(start, stop);
            previous = Some(step);
        }

        Self {
            domain: [start.min(min), stop.max(max)],
            range: self.range,
        }
    }

    /// Maps `value` from the domain into the range. Values outside the
    /// domain extrapolate. A single-valued domain maps everything to the
    /// range midpoint.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Maps a range position back into the domain.
    pub fn invert(&self, position: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r0 == r1 {
            return (d0 + d1) / 2.0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Round tick values inside the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [min, max] = self.domain;
        if count == 0 {
            return vec![];
        }
        if min == max {
            return vec![min];
        }
        TickStep::new(min, max, count).values(min, max)
    }
}

/// Finite `[min, max]` of `values`, or `None` if there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<[f64; 2]> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}

/// Tick spacing. Fractional steps are kept as their reciprocal so that
/// values like 0.1 are computed by division and stay exact.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickStep {
    Multiple(f64),
    Fraction(f64),
}

impl TickStep {
    fn new(start: f64, stop: f64, count: usize) -> Self {
        let raw = (stop - start) / count as f64;
        let power = raw.log10().floor();
        let error = raw / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        if power >= 0.0 {
            TickStep::Multiple(factor * 10f64.powf(power))
        } else {
            TickStep::Fraction(10f64.powf(-power) / factor)
        }
    }

    fn widen(self, start: f64, stop: f64) -> (f64, f64) {
        match self {
            TickStep::Multiple(step) => ((start / step).floor() * step, (stop / step).ceil() * step),
            TickStep::Fraction(inv) => ((start * inv).floor() / inv, (stop * inv).ceil() / inv),
        }
    }

    fn values(self, start: f64, stop: f64) -> Vec<f64> {
        match self {
            TickStep::Multiple(step) => {
                let first = (start / step).ceil() as i64;
                let last = (stop / step).floor() as i64;
                (first..=last).map(|i| i as f64 * step).collect()
            }
            TickStep::Fraction(inv) => {
                let first = (start * inv).ceil() as i64;
                let last = (stop * inv).floor() as i64;
                (first..=last).map(|i| i as f64 / inv).collect()
            }
        }
    }
}
