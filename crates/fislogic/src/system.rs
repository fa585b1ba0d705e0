//! Fixed-capacity fuzzy system that owns its tables.
//!
//! [`FisSystem`] sizes every table with const generics, so a complete
//! controller can live in a `static` or on the stack. Each call lends the
//! tables to a short-lived [`Fis`].

use std::array;

use tracing::debug;

use crate::config::FisConfig;
use crate::defuzz::Architecture;
use crate::engine::{Fis, FisStorage};
use crate::error::FisResult;
use crate::io::{FisInput, FisOutput};
use crate::membership::MembershipFunction;
use crate::rules::{FisTag, RuleItem};

/// A fuzzy system with `NI` inputs, `NO` outputs, `NMI` input and `NMO`
/// output membership functions and `NR` rules.
#[derive(Debug)]
pub struct FisSystem<
    const NI: usize,
    const NO: usize,
    const NMI: usize,
    const NMO: usize,
    const NR: usize,
> {
    architecture: Architecture,
    config: FisConfig,
    inputs: [FisInput; NI],
    outputs: [FisOutput<'static>; NO],
    input_mfs: [MembershipFunction<'static>; NMI],
    output_mfs: [MembershipFunction<'static>; NMO],
    rules: &'static [RuleItem],
    strengths: [f64; NR],
    weights: Option<[f64; NR]>,
}

impl<const NI: usize, const NO: usize, const NMI: usize, const NMO: usize, const NR: usize>
    FisSystem<NI, NO, NMI, NMO, NR>
{
    pub fn new(architecture: Architecture, rules: &'static [RuleItem]) -> FisResult<Self> {
        Self::with_config(architecture, rules, FisConfig::for_architecture(architecture))
    }

    pub fn with_config(
        architecture: Architecture,
        rules: &'static [RuleItem],
        config: FisConfig,
    ) -> FisResult<Self> {
        let mut system = Self {
            architecture,
            config,
            inputs: [FisInput::default(); NI],
            outputs: array::from_fn(|_| FisOutput::new()),
            input_mfs: [MembershipFunction::new(); NMI],
            output_mfs: [MembershipFunction::new(); NMO],
            rules,
            strengths: [0.0; NR],
            weights: None,
        };
        system.engine()?;
        debug!(
            "Created {} system with capacity {}x{} io, {}x{} membership functions, {} rules",
            architecture, NI, NO, NMI, NMO, NR
        );
        Ok(system)
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn config(&self) -> &FisConfig {
        &self.config
    }

    /// Replace the engine parameters; the current ones are kept on error.
    pub fn set_config(&mut self, config: FisConfig) -> FisResult<()> {
        config.validate(self.architecture)?;
        self.config = config;
        Ok(())
    }

    pub fn set_rule_weights(&mut self, weights: [f64; NR]) {
        self.weights = Some(weights);
    }

    /// Lend the tables to an engine.
    ///
    /// Changes to ranges and membership functions persist; parameter
    /// changes made through the engine do not, use [`FisSystem::configure`]
    /// for those.
    pub fn engine(&mut self) -> FisResult<Fis<'_, 'static>> {
        let storage = FisStorage {
            inputs: &mut self.inputs,
            outputs: &mut self.outputs,
            input_mfs: &mut self.input_mfs,
            output_mfs: &mut self.output_mfs,
            rules: self.rules,
            rule_strengths: &mut self.strengths,
        };
        let mut fis = Fis::assemble(self.architecture, storage, NR, self.config)?;
        if let Some(weights) = self.weights.as_ref() {
            fis.set_rule_weights(weights)?;
        }
        Ok(fis)
    }

    /// Run `f` against an engine and keep the parameters it leaves behind.
    pub fn configure<F>(&mut self, f: F) -> FisResult<()>
    where
        F: FnOnce(&mut Fis<'_, 'static>) -> FisResult<()>,
    {
        let mut fis = self.engine()?;
        f(&mut fis)?;
        let config = *fis.config();
        self.config = config;
        Ok(())
    }

    /// One full cycle: set every input, fuzzify, infer and defuzzify.
    pub fn evaluate(&mut self, values: &[f64; NI]) -> FisResult<[f64; NO]> {
        for (input, &value) in self.inputs.iter_mut().zip(values) {
            input.value = value;
        }
        let mut fis = self.engine()?;
        fis.fuzzify();
        fis.inference()?;
        fis.defuzzify()?;
        Ok(array::from_fn(|o| self.outputs[o].value()))
    }

    pub fn output(&self, tag: FisTag) -> Option<f64> {
        let o = usize::try_from(tag).ok()?;
        self.outputs.get(o).map(FisOutput::value)
    }

    pub fn rule_strength(&self, rule: usize) -> Option<f64> {
        self.strengths.get(rule).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defuzz::DefuzzMethod;
    use crate::error::FisError;
    use crate::fis_rules;
    use crate::membership::Shape;
    use crate::operators::{FuzzyOperator, OperatorRole};
    use approx::assert_abs_diff_eq;

    const X: FisTag = 0;
    const Z: FisTag = 0;
    const LOW: FisTag = 0;
    const HIGH: FisTag = 1;
    const SMALL: FisTag = 0;
    const LARGE: FisTag = 1;

    static RULES: [RuleItem; 12] = fis_rules! {
        IF X IS LOW THEN Z IS SMALL END
        IF X IS HIGH THEN Z IS LARGE END
    };
    static RAMP_LOW: [f64; 2] = [0.0, 1.0];
    static RAMP_HIGH: [f64; 2] = [0.0, 1.0];
    static SMALL_K: [f64; 1] = [10.0];
    static LARGE_K: [f64; 1] = [30.0];

    type Ramp = FisSystem<1, 1, 2, 2, 2>;

    fn ramp() -> Ramp {
        let mut system = Ramp::new(Architecture::Sugeno, &RULES).unwrap();
        system
            .configure(|fis| {
                fis.setup_input(X, 0.0, 1.0)?;
                fis.setup_output(Z, 0.0, 40.0)?;
                fis.set_input_mf(X, LOW, Shape::LinearZ, &RAMP_LOW)?;
                fis.set_input_mf(X, HIGH, Shape::LinearS, &RAMP_HIGH)?;
                fis.set_output_mf(Z, SMALL, Shape::Constant, &SMALL_K)?;
                fis.set_output_mf(Z, LARGE, Shape::Constant, &LARGE_K)
            })
            .unwrap();
        system
    }

    #[test]
    fn test_evaluate_interpolates() {
        let mut system = ramp();
        let [z] = system.evaluate(&[0.25]).unwrap();
        assert_abs_diff_eq!(z, 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(system.output(Z).unwrap(), z);
        assert_abs_diff_eq!(system.rule_strength(0).unwrap(), 0.75);
    }

    #[test]
    fn test_configure_keeps_parameters() {
        let mut system = ramp();
        system
            .configure(|fis| fis.set_defuzz_method(DefuzzMethod::WeightedSum))
            .unwrap();
        assert_eq!(system.config().defuzz_method, DefuzzMethod::WeightedSum);
        let [z] = system.evaluate(&[0.25]).unwrap();
        assert_abs_diff_eq!(z, 15.0, epsilon = 1e-12);

        let err = system
            .configure(|fis| fis.set_parameter(OperatorRole::And, FuzzyOperator::Sum))
            .unwrap_err();
        assert!(matches!(err, FisError::OperatorNotAllowed { .. }));
    }

    #[test]
    fn test_rule_weights() {
        let mut system = ramp();
        system.set_rule_weights([1.0, 0.0]);
        let [z] = system.evaluate(&[0.25]).unwrap();
        assert_abs_diff_eq!(z, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_config_validates() {
        let mut system = ramp();
        assert!(system.set_config(FisConfig::mamdani_classic()).is_err());
        assert_eq!(system.config().defuzz_method, DefuzzMethod::WeightedAverage);
    }

    #[test]
    fn test_rule_count_is_checked() {
        let mut system: FisSystem<1, 1, 2, 2, 3> =
            FisSystem::new(Architecture::Sugeno, &RULES).unwrap();
        assert_eq!(
            system.evaluate(&[0.5]),
            Err(FisError::RuleCountMismatch {
                expected: 3,
                parsed: 2
            })
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result: FisResult<FisSystem<0, 1, 1, 1, 1>> =
            FisSystem::new(Architecture::Sugeno, &RULES);
        assert!(matches!(
            result,
            Err(FisError::EmptyStorage { what: "inputs" })
        ));
    }
}
