//! Engine parameters and presets.
//!
//! A [`FisConfig`] bundles the operator bound to each role, the
//! defuzzification method and the number of evaluation points. Rule streams
//! and membership tables are not part of it.

use serde::{Deserialize, Serialize};

use crate::defuzz::{Architecture, DefuzzMethod};
use crate::error::{FisError, FisResult};
use crate::operators::{FuzzyOperator, OperatorRole};

/// Default number of points the output universe is sampled at.
pub const DEFAULT_EVAL_POINTS: usize = 100;

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FisConfig {
    /// Operator for AND connectors
    pub and_operator: FuzzyOperator,
    /// Operator for OR connectors
    pub or_operator: FuzzyOperator,
    /// Operator combining rule strength and consequent degree
    pub implication: FuzzyOperator,
    /// Operator folding rule contributions into an output
    pub aggregation: FuzzyOperator,
    pub defuzz_method: DefuzzMethod,
    /// Samples per output for Mamdani defuzzification (default: 100)
    pub eval_points: usize,
}

impl Default for FisConfig {
    fn default() -> Self {
        Self::mamdani_classic()
    }
}

impl FisConfig {
    /// Min/Max operators with the default method of `architecture`.
    pub fn for_architecture(architecture: Architecture) -> Self {
        Self {
            defuzz_method: DefuzzMethod::default_for(architecture),
            ..Self::mamdani_classic()
        }
    }

    /// Zadeh operators with centroid defuzzification.
    pub fn mamdani_classic() -> Self {
        Self {
            and_operator: FuzzyOperator::Min,
            or_operator: FuzzyOperator::Max,
            implication: FuzzyOperator::Min,
            aggregation: FuzzyOperator::Max,
            defuzz_method: DefuzzMethod::Centroid,
            eval_points: DEFAULT_EVAL_POINTS,
        }
    }

    /// Product t-norm, probabilistic sum and product implication
    /// ("larsen" inference).
    pub fn mamdani_product() -> Self {
        Self {
            and_operator: FuzzyOperator::Product,
            or_operator: FuzzyOperator::ProbabilisticOr,
            implication: FuzzyOperator::Product,
            aggregation: FuzzyOperator::ProbabilisticOr,
            defuzz_method: DefuzzMethod::Centroid,
            eval_points: DEFAULT_EVAL_POINTS,
        }
    }

    /// Zadeh operators with weighted-average defuzzification.
    pub fn sugeno_weighted_average() -> Self {
        Self {
            defuzz_method: DefuzzMethod::WeightedAverage,
            ..Self::mamdani_classic()
        }
    }

    /// Create a custom configuration.
    pub fn custom() -> FisConfigBuilder {
        FisConfigBuilder::default()
    }

    pub fn operator(&self, role: OperatorRole) -> FuzzyOperator {
        match role {
            OperatorRole::And => self.and_operator,
            OperatorRole::Or => self.or_operator,
            OperatorRole::Implication => self.implication,
            OperatorRole::Aggregation => self.aggregation,
        }
    }

    /// Rebind one role, rejecting operators the role does not admit.
    pub fn with_operator(mut self, role: OperatorRole, operator: FuzzyOperator) -> FisResult<Self> {
        if !role.accepts(operator) {
            return Err(FisError::OperatorNotAllowed { role, operator });
        }
        match role {
            OperatorRole::And => self.and_operator = operator,
            OperatorRole::Or => self.or_operator = operator,
            OperatorRole::Implication => self.implication = operator,
            OperatorRole::Aggregation => self.aggregation = operator,
        }
        Ok(self)
    }

    pub fn with_defuzz_method(mut self, method: DefuzzMethod) -> Self {
        self.defuzz_method = method;
        self
    }

    pub fn with_eval_points(mut self, points: usize) -> Self {
        self.eval_points = points;
        self
    }

    /// Check every setting against `architecture`.
    pub fn validate(&self, architecture: Architecture) -> FisResult<()> {
        for role in OperatorRole::ALL {
            let operator = self.operator(role);
            if !role.accepts(operator) {
                return Err(FisError::OperatorNotAllowed { role, operator });
            }
        }
        if !self.defuzz_method.supports(architecture) {
            return Err(FisError::DefuzzNotSupported {
                method: self.defuzz_method,
                architecture,
            });
        }
        if self.eval_points == 0 {
            return Err(FisError::InvalidEvalPoints);
        }
        Ok(())
    }
}

/// Builder for custom configurations.
#[derive(Debug, Clone, Default)]
pub struct FisConfigBuilder {
    and_operator: Option<FuzzyOperator>,
    or_operator: Option<FuzzyOperator>,
    implication: Option<FuzzyOperator>,
    aggregation: Option<FuzzyOperator>,
    defuzz_method: Option<DefuzzMethod>,
    eval_points: Option<usize>,
}

impl FisConfigBuilder {
    pub fn and_operator(mut self, operator: FuzzyOperator) -> Self {
        self.and_operator = Some(operator);
        self
    }

    pub fn or_operator(mut self, operator: FuzzyOperator) -> Self {
        self.or_operator = Some(operator);
        self
    }

    pub fn implication(mut self, operator: FuzzyOperator) -> Self {
        self.implication = Some(operator);
        self
    }

    pub fn aggregation(mut self, operator: FuzzyOperator) -> Self {
        self.aggregation = Some(operator);
        self
    }

    pub fn defuzz_method(mut self, method: DefuzzMethod) -> Self {
        self.defuzz_method = Some(method);
        self
    }

    pub fn eval_points(mut self, points: usize) -> Self {
        self.eval_points = Some(points);
        self
    }

    /// Build the configuration.
    ///
    /// Unset fields take their [`FisConfig::mamdani_classic`] values. The
    /// result is not validated; the engine does that when it is applied.
    pub fn build(self) -> FisConfig {
        self.build_on(FisConfig::mamdani_classic())
    }

    /// Build on top of the defaults of `architecture`.
    pub fn build_for(self, architecture: Architecture) -> FisConfig {
        self.build_on(FisConfig::for_architecture(architecture))
    }

    fn build_on(self, base: FisConfig) -> FisConfig {
        FisConfig {
            and_operator: self.and_operator.unwrap_or(base.and_operator),
            or_operator: self.or_operator.unwrap_or(base.or_operator),
            implication: self.implication.unwrap_or(base.implication),
            aggregation: self.aggregation.unwrap_or(base.aggregation),
            defuzz_method: self.defuzz_method.unwrap_or(base.defuzz_method),
            eval_points: self.eval_points.unwrap_or(base.eval_points),
        }
    }
}
