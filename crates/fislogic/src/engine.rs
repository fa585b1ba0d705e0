//! Fuzzy inference engine over caller-owned storage.
//!
//! A [`Fis`] borrows every table it works on and never allocates. One
//! evaluation cycle is
//!
//! ```text
//! set_input* -> fuzzify -> inference -> defuzzify -> output*
//! ```
//!
//! `defuzzify` refuses to run unless the most recent `inference` succeeded
//! after the last `fuzzify`.

use std::ops::Index;
use std::slice;

use tracing::{debug, trace, warn};

use crate::config::FisConfig;
use crate::defuzz::{Architecture, DefuzzMethod};
use crate::error::{FisError, FisResult, IoKind};
use crate::interpreter::{
    AggregationEffect, AggregationState, Connective, InferenceEffect, InferenceState,
};
use crate::io::{FisInput, FisIo, FisOutput};
use crate::membership::{MembershipFunction, Shape};
use crate::operators::{bound, FuzzyOperator, OperatorRole};
use crate::rules::{
    ClauseLimits, FisTag, MfRef, RuleItem, RuleReader, Token, MAX_REFERENCE, MAX_TAGS,
};

/// Tables lent to an engine.
///
/// `'a` is the borrow of the tables themselves, `'p` the lifetime of the
/// coefficient and aggregated-region buffers the tables point into.
#[derive(Debug)]
pub struct FisStorage<'a, 'p> {
    pub inputs: &'a mut [FisInput],
    pub outputs: &'a mut [FisOutput<'p>],
    pub input_mfs: &'a mut [MembershipFunction<'p>],
    pub output_mfs: &'a mut [MembershipFunction<'p>],
    pub rules: &'a [RuleItem],
    /// One slot per rule, receives the rule strengths.
    pub rule_strengths: &'a mut [f64],
}

/// Outcome of the most recent inference pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InferenceStatus {
    /// No inference since setup or since the last fuzzification.
    #[default]
    NotRun,
    Succeeded,
    Failed,
}

/// Fuzzy inference system.
#[derive(Debug)]
pub struct Fis<'a, 'p> {
    architecture: Architecture,
    config: FisConfig,
    inputs: &'a mut [FisInput],
    outputs: &'a mut [FisOutput<'p>],
    input_mfs: &'a mut [MembershipFunction<'p>],
    output_mfs: &'a mut [MembershipFunction<'p>],
    rules: RuleReader<'a>,
    strengths: &'a mut [f64],
    rule_weights: Option<&'a [f64]>,
    n_rules: usize,
    completed: usize,
    status: InferenceStatus,
}

fn rejected(err: FisError) -> FisError {
    warn!("Configuration rejected: {}", err);
    err
}

fn slot(tag: FisTag, count: usize, kind: IoKind) -> FisResult<usize> {
    usize::try_from(tag)
        .ok()
        .filter(|&t| t < count)
        .ok_or(FisError::TagOutOfRange {
            kind,
            tag: i32::from(tag),
            count,
        })
}

fn invalid_range(min: f64, max: f64) -> bool {
    min.is_nan() || max.is_nan() || min >= max
}

fn mf_slot(tag: FisTag, count: usize) -> FisResult<usize> {
    usize::try_from(tag)
        .ok()
        .filter(|&t| t < count)
        .ok_or(FisError::MembershipOutOfRange {
            tag: i32::from(tag),
            count,
        })
}

impl<'a, 'p> Fis<'a, 'p> {
    /// Bind an engine of the given architecture to `storage`, with the
    /// default parameters of that architecture.
    pub fn setup(
        architecture: Architecture,
        storage: FisStorage<'a, 'p>,
        n_rules: usize,
    ) -> FisResult<Self> {
        Self::setup_with_config(
            architecture,
            storage,
            n_rules,
            FisConfig::for_architecture(architecture),
        )
    }

    pub fn setup_with_config(
        architecture: Architecture,
        storage: FisStorage<'a, 'p>,
        n_rules: usize,
        config: FisConfig,
    ) -> FisResult<Self> {
        let fis = Self::assemble(architecture, storage, n_rules, config).map_err(rejected)?;
        debug!(
            "Configured {} system: {} inputs, {} outputs, {} rules, {} defuzzification",
            architecture,
            fis.inputs.len(),
            fis.outputs.len(),
            n_rules,
            fis.config.defuzz_method
        );
        Ok(fis)
    }

    /// Validate and bind without logging.
    pub(crate) fn assemble(
        architecture: Architecture,
        storage: FisStorage<'a, 'p>,
        n_rules: usize,
        config: FisConfig,
    ) -> FisResult<Self> {
        let FisStorage {
            inputs,
            outputs,
            input_mfs,
            output_mfs,
            rules,
            rule_strengths,
        } = storage;

        let tables = [
            ("inputs", inputs.len(), MAX_TAGS),
            ("outputs", outputs.len(), MAX_TAGS),
            ("input membership", input_mfs.len(), MAX_REFERENCE),
            ("output membership", output_mfs.len(), MAX_REFERENCE),
        ];
        for (what, actual, max) in tables {
            if actual == 0 {
                return Err(FisError::EmptyStorage { what });
            }
            if actual > max {
                return Err(FisError::TooManyEntries { what, actual, max });
            }
        }
        if rules.is_empty() || n_rules == 0 {
            return Err(FisError::EmptyStorage { what: "rules" });
        }
        if rule_strengths.len() < n_rules {
            return Err(FisError::RuleBufferTooSmall {
                required: n_rules,
                actual: rule_strengths.len(),
            });
        }
        config.validate(architecture)?;

        Ok(Self {
            architecture,
            config,
            inputs,
            outputs,
            input_mfs,
            output_mfs,
            rules: RuleReader::new(rules),
            strengths: rule_strengths,
            rule_weights: None,
            n_rules,
            completed: 0,
            status: InferenceStatus::NotRun,
        })
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn config(&self) -> &FisConfig {
        &self.config
    }

    pub fn setup_input(&mut self, tag: FisTag, min: f64, max: f64) -> FisResult<()> {
        let i = slot(tag, self.inputs.len(), IoKind::Input).map_err(rejected)?;
        if invalid_range(min, max) {
            return Err(rejected(FisError::InvalidRange { min, max }));
        }
        let input = &mut self.inputs[i];
        input.min = min;
        input.max = max;
        Ok(())
    }

    pub fn setup_output(&mut self, tag: FisTag, min: f64, max: f64) -> FisResult<()> {
        let o = slot(tag, self.outputs.len(), IoKind::Output).map_err(rejected)?;
        if invalid_range(min, max) {
            return Err(rejected(FisError::InvalidRange { min, max }));
        }
        let io = &mut self.outputs[o].io;
        io.min = min;
        io.max = max;
        Ok(())
    }

    pub fn set_input_mf(
        &mut self,
        input: FisTag,
        mf: FisTag,
        shape: Shape,
        coefficients: &'p [f64],
    ) -> FisResult<()> {
        self.set_input_mf_scaled(input, mf, shape, coefficients, 1.0)
    }

    /// Like [`Fis::set_input_mf`] with a height the degree is scaled by,
    /// clamped to `[0, 1]`.
    pub fn set_input_mf_scaled(
        &mut self,
        input: FisTag,
        mf: FisTag,
        shape: Shape,
        coefficients: &'p [f64],
        height: f64,
    ) -> FisResult<()> {
        let io = slot(input, self.inputs.len(), IoKind::Input).map_err(rejected)?;
        let m = mf_slot(mf, self.input_mfs.len()).map_err(rejected)?;
        self.check_shape(shape, IoKind::Input, coefficients)
            .map_err(rejected)?;
        self.input_mfs[m].configure(io, shape, coefficients, height);
        Ok(())
    }

    pub fn set_output_mf(
        &mut self,
        output: FisTag,
        mf: FisTag,
        shape: Shape,
        coefficients: &'p [f64],
    ) -> FisResult<()> {
        self.set_output_mf_scaled(output, mf, shape, coefficients, 1.0)
    }

    /// Like [`Fis::set_output_mf`] with a height. Only Mamdani consequents
    /// are scaled by it.
    pub fn set_output_mf_scaled(
        &mut self,
        output: FisTag,
        mf: FisTag,
        shape: Shape,
        coefficients: &'p [f64],
        height: f64,
    ) -> FisResult<()> {
        let io = slot(output, self.outputs.len(), IoKind::Output).map_err(rejected)?;
        let m = mf_slot(mf, self.output_mfs.len()).map_err(rejected)?;
        self.check_shape(shape, IoKind::Output, coefficients)
            .map_err(rejected)?;
        self.output_mfs[m].configure(io, shape, coefficients, height);
        Ok(())
    }

    fn check_shape(&self, shape: Shape, kind: IoKind, coefficients: &[f64]) -> FisResult<()> {
        if !shape.allowed_for(kind, self.architecture) {
            return Err(FisError::ShapeNotAllowed {
                shape: shape.name(),
                kind,
                architecture: self.architecture,
            });
        }
        let expected = shape.arity(self.inputs.len());
        if coefficients.len() < expected {
            return Err(FisError::MissingCoefficients {
                shape: shape.name(),
                expected,
                actual: coefficients.len(),
            });
        }
        Ok(())
    }

    /// Bind `operator` to `role`. The previous binding is kept on error.
    pub fn set_parameter(&mut self, role: OperatorRole, operator: FuzzyOperator) -> FisResult<()> {
        self.config = self
            .config
            .with_operator(role, operator)
            .map_err(rejected)?;
        Ok(())
    }

    /// Select the defuzzification method. The previous method is kept on
    /// error.
    pub fn set_defuzz_method(&mut self, method: DefuzzMethod) -> FisResult<()> {
        if !method.supports(self.architecture) {
            return Err(rejected(FisError::DefuzzNotSupported {
                method,
                architecture: self.architecture,
            }));
        }
        self.config.defuzz_method = method;
        Ok(())
    }

    /// Number of samples per output for Mamdani defuzzification.
    pub fn set_eval_points(&mut self, points: usize) -> FisResult<()> {
        if points == 0 {
            return Err(rejected(FisError::InvalidEvalPoints));
        }
        for output in self.outputs.iter() {
            if let Some(actual) = output.region_capacity() {
                if actual < points {
                    return Err(rejected(FisError::RegionTooShort {
                        required: points,
                        actual,
                    }));
                }
            }
        }
        self.config.eval_points = points;
        Ok(())
    }

    /// External per-rule weights, clamped to `[0, 1]` and multiplied into
    /// each rule strength.
    pub fn set_rule_weights(&mut self, weights: &'a [f64]) -> FisResult<()> {
        if weights.len() < self.n_rules {
            return Err(rejected(FisError::RuleWeightsTooSmall {
                required: self.n_rules,
                actual: weights.len(),
            }));
        }
        self.rule_weights = Some(weights);
        Ok(())
    }

    /// Record the sampled aggregated curve of `output` into `x` and `y` on
    /// every Mamdani defuzzification.
    pub fn store_aggregated_region(
        &mut self,
        output: FisTag,
        x: &'p mut [f64],
        y: &'p mut [f64],
    ) -> FisResult<()> {
        let o = slot(output, self.outputs.len(), IoKind::Output).map_err(rejected)?;
        let actual = x.len().min(y.len());
        if actual < self.config.eval_points {
            return Err(rejected(FisError::RegionTooShort {
                required: self.config.eval_points,
                actual,
            }));
        }
        self.outputs[o].attach_region(x, y);
        Ok(())
    }

    pub fn set_input(&mut self, tag: FisTag, value: f64) -> FisResult<()> {
        let i = slot(tag, self.inputs.len(), IoKind::Input)?;
        self.inputs[i].value = value;
        Ok(())
    }

    pub fn input(&self, tag: FisTag) -> FisResult<f64> {
        let i = slot(tag, self.inputs.len(), IoKind::Input)?;
        Ok(self.inputs[i].value)
    }

    /// Crisp value of an output after defuzzification.
    pub fn output(&self, tag: FisTag) -> FisResult<f64> {
        let o = slot(tag, self.outputs.len(), IoKind::Output)?;
        Ok(self.outputs[o].value())
    }

    pub fn output_state(&self, tag: FisTag) -> FisResult<&FisOutput<'p>> {
        let o = slot(tag, self.outputs.len(), IoKind::Output)?;
        Ok(&self.outputs[o])
    }

    /// Clamp every input to its range and cache the degree of every input
    /// membership function.
    pub fn fuzzify(&mut self) {
        for input in self.inputs.iter_mut() {
            input.truncate();
        }
        for mf in self.input_mfs.iter_mut() {
            mf.fuzzify(&*self.inputs);
        }
        self.status = InferenceStatus::NotRun;
    }

    /// Walk the rule stream and compute the strength of every rule.
    pub fn inference(&mut self) -> FisResult<()> {
        match self.walk_antecedents() {
            Ok(()) => {
                self.status = InferenceStatus::Succeeded;
                trace!("Inference complete: {} rules", self.completed);
                Ok(())
            }
            Err(err) => {
                self.status = InferenceStatus::Failed;
                warn!(
                    "Inference failed after {} of {} rules: {}",
                    self.completed, self.n_rules, err
                );
                Err(err)
            }
        }
    }

    fn walk_antecedents(&mut self) -> FisResult<()> {
        self.completed = 0;
        self.rules.expect_begin()?;

        let input_limits = self.limits(IoKind::Input);
        let output_limits = self.limits(IoKind::Output);
        let mut state = InferenceState::default();
        let mut strength = 0.0;
        let mut i = 1;

        while self.completed < self.n_rules {
            if self.rules.token(i)? == Token::End {
                break;
            }
            let limits = match state {
                InferenceState::Antecedent { .. } => input_limits,
                InferenceState::ReachEnd => output_limits,
            };
            let clause = self.rules.clause(i, limits)?;
            let transition = state.step(&clause, i)?;

            match transition.effect {
                InferenceEffect::Compose { connective } => {
                    let operator = match connective {
                        Some(Connective::And) => self.config.and_operator,
                        Some(Connective::Or) => self.config.or_operator,
                        None => FuzzyOperator::Sum,
                    };
                    let degree = bound(self.input_mfs[clause.reference.index].degree(), 0.0, 1.0);
                    strength = operator.apply(strength, clause.reference.apply(degree));
                }
                InferenceEffect::Continue => {}
                InferenceEffect::CloseRule => {
                    let weight = self
                        .rule_weights
                        .and_then(|w| w.get(self.completed))
                        .map_or(1.0, |&w| bound(w, 0.0, 1.0));
                    self.strengths[self.completed] = strength * weight;
                    strength = 0.0;
                    self.completed += 1;
                }
            }

            state = transition.next;
            i += transition.advance;
        }

        match self.rules.token(i)? {
            Token::End if self.completed == self.n_rules => Ok(()),
            _ => Err(FisError::RuleCountMismatch {
                expected: self.n_rules,
                parsed: self.completed,
            }),
        }
    }

    /// Turn the rule strengths into a crisp value per output.
    pub fn defuzzify(&mut self) -> FisResult<()> {
        if self.status != InferenceStatus::Succeeded {
            return Err(FisError::InferenceNotValid);
        }
        let method = self.config.defuzz_method;
        for output in self.outputs.iter_mut() {
            output.acc = method.init(&output.io);
        }

        match self.architecture {
            Architecture::Mamdani => {
                let points = self.config.eval_points;
                for k in 0..points {
                    for output in self.outputs.iter_mut() {
                        output.begin_sample(k, points);
                    }
                    self.aggregate(None)?;
                    for output in self.outputs.iter_mut() {
                        method.accumulate(&mut output.acc, output.x, output.y);
                        output.record_sample(k);
                    }
                }
                if method == DefuzzMethod::Bisector {
                    for o in 0..self.outputs.len() {
                        self.bisect(o)?;
                    }
                }
            }
            Architecture::Sugeno | Architecture::Tsukamoto => self.aggregate(None)?,
        }

        for output in self.outputs.iter_mut() {
            let crisp = method.finalize(&output.acc);
            output.io.value = bound(crisp, output.io.min, output.io.max);
        }
        debug!("Defuzzification complete ({})", method);
        Ok(())
    }

    /// Second sweep of the bisector: re-sample output `o` until half of
    /// its area is covered.
    fn bisect(&mut self, o: usize) -> FisResult<()> {
        let points = self.config.eval_points;
        self.outputs[o].acc.begin_bisection();
        for k in 0..points {
            self.outputs[o].begin_sample(k, points);
            self.aggregate(Some(o))?;
            let output = &mut self.outputs[o];
            if output.acc.scan_area(output.x, output.y) {
                break;
            }
        }
        Ok(())
    }

    /// Walk the consequents of every rule, folding them into the outputs
    /// (only into output `only` when set).
    fn aggregate(&mut self, only: Option<usize>) -> FisResult<()> {
        let limits = self.limits(IoKind::Output);
        let mut state = AggregationState::default();
        let mut rule = 0;
        let mut i = 1;

        while rule < self.n_rules {
            let token = self.rules.token(i)?;
            if token == Token::End {
                break;
            }
            let transition = match state {
                AggregationState::FindConsequent => AggregationState::seek(token),
                AggregationState::ApplyConsequent => {
                    let clause = self.rules.clause(i, limits)?;
                    let strength = self.strengths[rule];
                    if strength > 0.0 && only.map_or(true, |o| o == clause.tag) {
                        self.apply_consequent(clause.tag, clause.reference, strength);
                    }
                    AggregationState::apply(&clause)
                }
            };
            if let AggregationEffect::Apply { closes_rule: true } = transition.effect {
                rule += 1;
            }
            state = transition.next;
            i += transition.advance;
        }
        Ok(())
    }

    fn apply_consequent(&mut self, tag: usize, reference: MfRef, strength: f64) {
        let mf = &self.output_mfs[reference.index];
        let output = &mut self.outputs[tag];

        match self.architecture {
            Architecture::Mamdani => {
                let degree = reference.apply(mf.evaluate_scaled(&output.io));
                let implied = self.config.implication.apply(strength, degree);
                output.y = self.config.aggregation.apply(output.y, implied);
            }
            Architecture::Sugeno => {
                let z = mf.evaluate(&*self.inputs);
                output.acc.add_weighted(strength, z);
            }
            Architecture::Tsukamoto => {
                let level = FisIo {
                    min: output.io.min,
                    max: output.io.max,
                    value: strength,
                };
                let z = bound(
                    mf.evaluate(slice::from_ref(&level)),
                    output.io.min,
                    output.io.max,
                );
                output.acc.add_weighted(strength, z);
            }
        }
    }

    fn limits(&self, kind: IoKind) -> ClauseLimits {
        match kind {
            IoKind::Input => ClauseLimits {
                kind,
                tags: self.inputs.len(),
                memberships: self.input_mfs.len(),
            },
            IoKind::Output => ClauseLimits {
                kind,
                tags: self.outputs.len(),
                memberships: self.output_mfs.len(),
            },
        }
    }

    pub fn inference_status(&self) -> InferenceStatus {
        self.status
    }

    /// Number of rules the last inference pass completed.
    pub fn completed_rules(&self) -> usize {
        self.completed
    }

    pub fn rule_count(&self) -> usize {
        self.n_rules
    }

    /// Strength of rule `rule` computed by the last inference pass.
    pub fn rule_strength(&self, rule: usize) -> Option<f64> {
        if rule < self.n_rules {
            self.strengths.get(rule).copied()
        } else {
            None
        }
    }

    /// Degree of input membership function `mf` cached by the last
    /// fuzzification.
    pub fn membership_degree(&self, mf: FisTag) -> Option<f64> {
        let m = mf_slot(mf, self.input_mfs.len()).ok()?;
        Some(self.input_mfs[m].degree())
    }
}

impl Index<FisTag> for Fis<'_, '_> {
    type Output = f64;

    /// Crisp value of an output. Panics on an unknown tag.
    fn index(&self, tag: FisTag) -> &f64 {
        let o = usize::try_from(tag).unwrap_or(usize::MAX);
        &self.outputs[o].io.value
    }
}
