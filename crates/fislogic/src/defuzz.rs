//! Defuzzification strategies.
//!
//! Each strategy runs an `init / accumulate / finalize` lifecycle over an
//! [`Accumulator`] owned by the output:
//!
//! - **Centroid**: `Σx·y / Σy` over the sampled aggregated curve
//! - **Bisector**: point where the cumulative area reaches half of the total
//! - **Mean / Largest / Smallest of Maximum**: position of the peak plateau
//! - **Weighted Average**: `Σ(w·z) / Σw` over rule outputs
//! - **Weighted Sum**: `Σ(w·z)` over rule outputs
//!
//! The first five sample the output domain and are reserved to Mamdani
//! systems; the last two consume the per-rule outputs of Sugeno and
//! Tsukamoto systems directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::io::FisIo;

/// Two samples closer than this are considered to share the maximum.
const PLATEAU_TOLERANCE: f64 = 1e-10;

/// Inference architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    /// Rule consequents are fuzzy sets; the output is sampled and defuzzified.
    Mamdani,
    /// Rule consequents are constant or linear functions of the inputs.
    Sugeno,
    /// Rule consequents are monotonic fuzzy sets evaluated through their inverse.
    Tsukamoto,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Architecture::Mamdani => "Mamdani",
            Architecture::Sugeno => "Sugeno",
            Architecture::Tsukamoto => "Tsukamoto",
        };
        f.write_str(name)
    }
}

/// Defuzzification method selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefuzzMethod {
    /// Center of gravity of the aggregated set
    Centroid,
    /// Vertical line splitting the aggregated set into equal areas
    Bisector,
    /// Middle of the maximum plateau
    MeanOfMaximum,
    /// Rightmost point of maximum membership
    LargestOfMaximum,
    /// Leftmost point of maximum membership
    SmallestOfMaximum,
    /// Weighted average of rule outputs
    WeightedAverage,
    /// Weighted sum of rule outputs
    WeightedSum,
}

impl DefuzzMethod {
    pub const ALL: [DefuzzMethod; 7] = [
        DefuzzMethod::Centroid,
        DefuzzMethod::Bisector,
        DefuzzMethod::MeanOfMaximum,
        DefuzzMethod::LargestOfMaximum,
        DefuzzMethod::SmallestOfMaximum,
        DefuzzMethod::WeightedAverage,
        DefuzzMethod::WeightedSum,
    ];

    /// Method installed by default for an architecture.
    pub fn default_for(architecture: Architecture) -> Self {
        match architecture {
            Architecture::Mamdani => DefuzzMethod::Centroid,
            Architecture::Sugeno | Architecture::Tsukamoto => DefuzzMethod::WeightedAverage,
        }
    }

    pub fn supports(self, architecture: Architecture) -> bool {
        match architecture {
            Architecture::Mamdani => self.requires_sampling(),
            Architecture::Sugeno => matches!(
                self,
                DefuzzMethod::WeightedAverage | DefuzzMethod::WeightedSum
            ),
            Architecture::Tsukamoto => self == DefuzzMethod::WeightedAverage,
        }
    }

    /// Whether the method works on the sampled aggregated curve.
    pub fn requires_sampling(self) -> bool {
        !matches!(
            self,
            DefuzzMethod::WeightedAverage | DefuzzMethod::WeightedSum
        )
    }

    /// Fresh accumulator for an output spanning `io`.
    pub fn init(self, io: &FisIo) -> Accumulator {
        match self {
            DefuzzMethod::Centroid => Accumulator::Centroid {
                sum_xy: 0.0,
                sum_y: 0.0,
            },
            DefuzzMethod::Bisector => Accumulator::Area {
                total: 0.0,
                half: 0.0,
                current: 0.0,
                crossing: io.min,
            },
            DefuzzMethod::MeanOfMaximum
            | DefuzzMethod::LargestOfMaximum
            | DefuzzMethod::SmallestOfMaximum => Accumulator::Maximum {
                y_max: -1.0,
                x_smallest: io.min,
                x_largest: io.max,
                plateau: false,
            },
            DefuzzMethod::WeightedAverage | DefuzzMethod::WeightedSum => Accumulator::Weighted {
                sum_wz: 0.0,
                sum_w: 0.0,
            },
        }
    }

    /// Feed the aggregated degree `y` sampled at `x`.
    pub fn accumulate(self, acc: &mut Accumulator, x: f64, y: f64) {
        match (self, acc) {
            (DefuzzMethod::Centroid, Accumulator::Centroid { sum_xy, sum_y }) => {
                *sum_xy += x * y;
                *sum_y += y;
            }
            (DefuzzMethod::Bisector, Accumulator::Area { total, .. }) => {
                *total += y;
            }
            (
                DefuzzMethod::LargestOfMaximum,
                Accumulator::Maximum {
                    y_max, x_largest, ..
                },
            ) => {
                if y > *y_max + PLATEAU_TOLERANCE {
                    *y_max = y;
                    *x_largest = x;
                } else if (y - *y_max).abs() <= PLATEAU_TOLERANCE {
                    *x_largest = x;
                }
            }
            (
                DefuzzMethod::SmallestOfMaximum,
                Accumulator::Maximum {
                    y_max, x_smallest, ..
                },
            ) if y > *y_max + PLATEAU_TOLERANCE => {
                *y_max = y;
                *x_smallest = x;
            }
            (
                DefuzzMethod::MeanOfMaximum,
                Accumulator::Maximum {
                    y_max,
                    x_smallest,
                    x_largest,
                    plateau,
                },
            ) => {
                if y > *y_max + PLATEAU_TOLERANCE {
                    *y_max = y;
                    *x_smallest = x;
                    *x_largest = x;
                    *plateau = true;
                } else if (y - *y_max).abs() <= PLATEAU_TOLERANCE {
                    if *plateau {
                        *x_largest = x;
                    }
                } else {
                    // only the first plateau counts
                    *plateau = false;
                }
            }
            _ => {}
        }
    }

    /// Crisp value held by a completed accumulator. Bisection needs
    /// [`Accumulator::scan_area`] to have run first.
    ///
    /// An accumulator that saw no membership mass yields NaN.
    pub fn finalize(self, acc: &Accumulator) -> f64 {
        match (self, acc) {
            (DefuzzMethod::Centroid, Accumulator::Centroid { sum_xy, sum_y }) => sum_xy / sum_y,
            (_, Accumulator::Area { total, .. }) | (_, Accumulator::Maximum { y_max: total, .. })
                if *total <= 0.0 =>
            {
                f64::NAN
            }
            (DefuzzMethod::Bisector, Accumulator::Area { crossing, .. }) => *crossing,
            (DefuzzMethod::MeanOfMaximum, Accumulator::Maximum { x_smallest, x_largest, .. }) => {
                0.5 * (x_smallest + x_largest)
            }
            (DefuzzMethod::LargestOfMaximum, Accumulator::Maximum { x_largest, .. }) => *x_largest,
            (DefuzzMethod::SmallestOfMaximum, Accumulator::Maximum { x_smallest, .. }) => {
                *x_smallest
            }
            (DefuzzMethod::WeightedAverage, Accumulator::Weighted { sum_wz, sum_w }) => sum_wz / sum_w,
            (DefuzzMethod::WeightedSum, Accumulator::Weighted { sum_wz, .. }) => *sum_wz,
            _ => f64::NAN,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DefuzzMethod::Centroid => "centroid",
            DefuzzMethod::Bisector => "bisector",
            DefuzzMethod::MeanOfMaximum => "mom",
            DefuzzMethod::LargestOfMaximum => "lom",
            DefuzzMethod::SmallestOfMaximum => "som",
            DefuzzMethod::WeightedAverage => "wtaver",
            DefuzzMethod::WeightedSum => "wtsum",
        }
    }
}

impl fmt::Display for DefuzzMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Running state of a defuzzification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Accumulator {
    #[default]
    Idle,
    Centroid {
        sum_xy: f64,
        sum_y: f64,
    },
    Area {
        total: f64,
        half: f64,
        current: f64,
        crossing: f64,
    },
    Maximum {
        y_max: f64,
        x_smallest: f64,
        x_largest: f64,
        plateau: bool,
    },
    Weighted {
        sum_wz: f64,
        sum_w: f64,
    },
}

impl Accumulator {
    /// Add one rule output `z` with strength `w`.
    pub fn add_weighted(&mut self, w: f64, z: f64) {
        if let Accumulator::Weighted { sum_wz, sum_w } = self {
            *sum_wz += w * z;
            *sum_w += w;
        }
    }

    /// Prepare a second sweep locating the half-area point.
    pub fn begin_bisection(&mut self) {
        if let Accumulator::Area {
            total,
            half,
            current,
            ..
        } = self
        {
            *half = 0.5 * *total;
            *current = 0.0;
        }
    }

    /// Advance the bisection sweep; true once half the area is covered.
    pub fn scan_area(&mut self, x: f64, y: f64) -> bool {
        match self {
            Accumulator::Area {
                half,
                current,
                crossing,
                ..
            } => {
                *current += y;
                *crossing = x;
                *current >= *half
            }
            _ => true,
        }
    }
}
