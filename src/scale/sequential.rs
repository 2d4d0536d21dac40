//! Continuous domain mapped through a colour gradient.

use super::colour::{ColorRamp, ColorSpace, ramp_by_name};
use super::{ScaleError, linear::extent};
use serde::Serialize;

/// Colour gradient with its stops kept alongside the parsed ramp, so a
/// renderer can rebuild the same gradient for a legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpolator {
    stops: Vec<String>,
    space: ColorSpace,
    #[serde(skip)]
    ramp: ColorRamp,
}

impl Interpolator {
    pub fn new(stops: &[&str], space: ColorSpace) -> Result<Self, ScaleError> {
        Ok(Self {
            stops: stops.iter().map(|s| s.to_string()).collect(),
            space,
            ramp: ColorRamp::new(stops, space)?,
        })
    }

    /// A named ColorBrewer ramp such as `"OrRd"` or `"YlOrRd"`.
    pub fn named(name: &str) -> Result<Self, ScaleError> {
        let stops = ramp_by_name(name).ok_or_else(|| ScaleError::UnknownPalette(name.to_string()))?;
        Self::new(stops, ColorSpace::Oklab)
    }

    /// Gradient between exactly two colours.
    pub fn two_stop(from: &str, to: &str) -> Result<Self, ScaleError> {
        Self::new(&[from, to], ColorSpace::Oklab)
    }

    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn sample(&self, t: f64) -> String {
        self.ramp.sample(t)
    }
}

/// One stop of a legend gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendStop {
    pub value: f64,
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequentialColorScale {
    domain: [f64; 2],
    interpolator: Interpolator,
}

impl SequentialColorScale {
    /// Builds a colour scale over the finite extent of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::EmptyDomain`] when no finite value remains.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        interpolator: Interpolator,
    ) -> Result<Self, ScaleError> {
        let domain = extent(values).ok_or(ScaleError::EmptyDomain {
            scale: "sequential",
        })?;
        Ok(Self {
            domain,
            interpolator,
        })
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    /// Colour for `value`. Out-of-domain values clamp to the end colours; a
    /// single-valued domain yields the middle of the gradient.
    pub fn map(&self, value: f64) -> String {
        self.interpolator.sample(self.position(value))
    }

    fn position(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        if d0 == d1 {
            0.5
        } else {
            (value - d0) / (d1 - d0)
        }
    }

    /// `count` evenly spaced stops across the domain, for drawing a legend.
    pub fn legend(&self, count: usize) -> Vec<LegendStop> {
        let [d0, d1] = self.domain;
        match count {
            0 => vec![],
            1 => vec![LegendStop {
                value: (d0 + d1) / 2.0,
                offset: 0.5,
                color: self.interpolator.sample(0.5),
            }],
            _ => (0..count)
                .map(|i| {
                    let offset = i as f64 / (count - 1) as f64;
                    LegendStop {
                        value: d0 + (d1 - d0) * offset,
                        offset,
                        color: self.interpolator.sample(offset),
                    }
                })
                .collect(),
        }
    }
}
