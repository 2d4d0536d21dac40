//! Discrete ordered keys mapped to equal-width padded slots.

use super::ScaleError;
use serde::Serialize;

/// Band scale over a fixed key order.
///
/// `padding` is applied both between slots and at each outer edge, as a
/// fraction of the step. Slots are centred in the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandScale<K> {
    domain: Vec<K>,
    range: [f64; 2],
    padding: f64,
    step: f64,
    bandwidth: f64,
    offset: f64,
}

impl<K: PartialEq + Clone> BandScale<K> {
    /// Builds a band scale. Callers must pass keys in their display order;
    /// repeated keys keep their first position.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::EmptyDomain`] when `keys` is empty.
    pub fn new(keys: &[K], range: [f64; 2], padding: f64) -> Result<Self, ScaleError> {
        let mut domain: Vec<K> = Vec::with_capacity(keys.len());
        for key in keys {
            if !domain.contains(key) {
                domain.push(key.clone());
            }
        }
        if domain.is_empty() {
            return Err(ScaleError::EmptyDomain { scale: "band" });
        }

        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let [r0, r1] = range;
        let (start, stop) = (r0.min(r1), r0.max(r1));

        let step = (stop - start) / (n - padding + padding * 2.0).max(1.0);
        let offset = start + (stop - start - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);

        let mut scale = Self {
            domain,
            range,
            padding,
            step,
            bandwidth,
            offset,
        };
        if r1 < r0 {
            scale.domain.reverse();
        }
        Ok(scale)
    }

    /// Start position of `key`'s slot.
    pub fn map(&self, key: &K) -> Option<f64> {
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|i| self.offset + self.step * i as f64)
    }

    /// Slot centre of `key`, for labels and axis ticks.
    pub fn center(&self, key: &K) -> Option<f64> {
        self.map(key).map(|start| start + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Keys in slot order along the range.
    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    /// `(key, start, end)` for every slot, in range order.
    pub fn slots(&self) -> Vec<(&K, f64, f64)> {
        self.domain
            .iter()
            .enumerate()
            .map(|(i, k)| {
                let start = self.offset + self.step * i as f64;
                (k, start, start + self.bandwidth)
            })
            .collect()
    }
}
