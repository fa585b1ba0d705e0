//! Input and output descriptors.

use serde::{Deserialize, Serialize};

use crate::defuzz::Accumulator;
use crate::operators::bound;

/// Range and current crisp value shared by inputs and outputs.
///
/// This is also what membership shapes receive: `value` is the point of
/// evaluation and `min`/`max` the universe of discourse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FisIo {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl Default for FisIo {
    fn default() -> Self {
        Self {
            min: -1.0,
            max: 1.0,
            value: 0.0,
        }
    }
}

impl FisIo {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            value: min,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub(crate) fn truncate(&mut self) {
        self.value = bound(self.value, self.min, self.max);
    }
}

/// Inputs carry nothing beyond range and value.
pub type FisInput = FisIo;

/// Caller buffers receiving the sampled aggregated curve of an output.
#[derive(Debug)]
pub(crate) struct AggregatedRegion<'p> {
    pub(crate) x: &'p mut [f64],
    pub(crate) y: &'p mut [f64],
}

impl AggregatedRegion<'_> {
    pub(crate) fn capacity(&self) -> usize {
        self.x.len().min(self.y.len())
    }
}

/// Output variable with its defuzzification state.
#[derive(Debug, Default)]
pub struct FisOutput<'p> {
    pub(crate) io: FisIo,
    /// Current sample point (Mamdani only).
    pub(crate) x: f64,
    /// Aggregated degree at `x` (Mamdani only).
    pub(crate) y: f64,
    pub(crate) acc: Accumulator,
    pub(crate) region: Option<AggregatedRegion<'p>>,
}

impl<'p> FisOutput<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.io.value
    }

    pub fn range(&self) -> (f64, f64) {
        (self.io.min, self.io.max)
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }

    /// Sampled `(x, y)` curve of the last Mamdani defuzzification, if
    /// buffers were attached.
    pub fn aggregated_region(&self) -> Option<(&[f64], &[f64])> {
        self.region.as_ref().map(|r| (&*r.x, &*r.y))
    }

    pub(crate) fn attach_region(&mut self, x: &'p mut [f64], y: &'p mut [f64]) {
        self.region = Some(AggregatedRegion { x, y });
    }

    pub(crate) fn region_capacity(&self) -> Option<usize> {
        self.region.as_ref().map(AggregatedRegion::capacity)
    }

    /// Position the output at sample `k` of `points` and reset its degree.
    pub(crate) fn begin_sample(&mut self, k: usize, points: usize) {
        let step = (self.io.max - self.io.min) / points as f64;
        self.x = self.io.min + (k as f64 + 0.5) * step;
        self.y = 0.0;
        self.io.value = self.x;
    }

    pub(crate) fn record_sample(&mut self, k: usize) {
        if let Some(region) = self.region.as_mut() {
            if let (Some(x), Some(y)) = (region.x.get_mut(k), region.y.get_mut(k)) {
                *x = self.x;
                *y = self.y;
            }
        }
    }
}
