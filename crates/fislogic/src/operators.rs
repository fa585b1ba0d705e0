//! Fuzzy operators and the roles they can be bound to.
//!
//! Every operator maps `[0,1] × [0,1] → [0,1]`; results are clamped so a
//! `Sum` aggregation cannot leave the unit interval.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary operator applied to membership degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuzzyOperator {
    /// `min(a, b)`, the Zadeh t-norm
    Min,
    /// `a * b`
    Product,
    /// `max(a, b)`, the Zadeh t-conorm
    Max,
    /// Probabilistic sum: `a + b - a*b`
    ProbabilisticOr,
    /// Bounded sum: `min(1, a + b)`
    Sum,
}

impl FuzzyOperator {
    pub const ALL: [FuzzyOperator; 5] = [
        FuzzyOperator::Min,
        FuzzyOperator::Product,
        FuzzyOperator::Max,
        FuzzyOperator::ProbabilisticOr,
        FuzzyOperator::Sum,
    ];

    pub fn apply(self, a: f64, b: f64) -> f64 {
        let y = match self {
            FuzzyOperator::Min => {
                if a < b {
                    a
                } else {
                    b
                }
            }
            FuzzyOperator::Product => a * b,
            FuzzyOperator::Max => {
                if a > b {
                    a
                } else {
                    b
                }
            }
            FuzzyOperator::ProbabilisticOr => a + b - a * b,
            FuzzyOperator::Sum => a + b,
        };
        bound(y, 0.0, 1.0)
    }

    pub fn name(self) -> &'static str {
        match self {
            FuzzyOperator::Min => "min",
            FuzzyOperator::Product => "product",
            FuzzyOperator::Max => "max",
            FuzzyOperator::ProbabilisticOr => "probor",
            FuzzyOperator::Sum => "sum",
        }
    }
}

impl fmt::Display for FuzzyOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Slot of the inference pipeline an operator is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorRole {
    /// Antecedent conjunction
    And,
    /// Antecedent disjunction
    Or,
    /// Rule strength against consequent degree
    Implication,
    /// Folding of rule contributions into an output
    Aggregation,
}

impl OperatorRole {
    pub const ALL: [OperatorRole; 4] = [
        OperatorRole::And,
        OperatorRole::Or,
        OperatorRole::Implication,
        OperatorRole::Aggregation,
    ];

    /// Operators this role can be bound to.
    pub fn allowed(self) -> &'static [FuzzyOperator] {
        use FuzzyOperator::*;
        match self {
            OperatorRole::And => &[Min, Product],
            OperatorRole::Or => &[Max, ProbabilisticOr],
            OperatorRole::Implication => &[Min, Product, Max, ProbabilisticOr],
            OperatorRole::Aggregation => &[Max, ProbabilisticOr, Sum],
        }
    }

    pub fn accepts(self, operator: FuzzyOperator) -> bool {
        self.allowed().contains(&operator)
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatorRole::And => "AND",
            OperatorRole::Or => "OR",
            OperatorRole::Implication => "implication",
            OperatorRole::Aggregation => "aggregation",
        };
        f.write_str(name)
    }
}

/// Clamp `y` into `[min, max]`; NaN collapses to `min`.
pub(crate) fn bound(y: f64, min: f64, max: f64) -> f64 {
    if y.is_nan() || y < min {
        min
    } else if y > max {
        max
    } else {
        y
    }
}
