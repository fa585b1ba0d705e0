//! # fislogic
//!
//! **Allocation-free fuzzy inference for control loops**
//!
//! This crate evaluates fuzzy inference systems (FIS) over storage owned by
//! the caller: inputs, outputs, membership tables, the rule base and the
//! rule strength buffer are all borrowed, so a full evaluation cycle never
//! touches the heap and runs in time bounded by the rule count (times the
//! number of evaluation points for Mamdani systems).
//!
//! ## Overview
//!
//! A cycle has four stages:
//!
//! 1. **Fuzzification**: inputs are clamped to their range and every input
//!    membership function is evaluated once, its degree cached.
//! 2. **Inference**: the rule stream is walked and antecedent degrees are
//!    composed into one strength per rule with the AND / OR operators.
//! 3. **Aggregation**: consequents are applied with the implication
//!    operator and folded into their outputs with the aggregation operator.
//! 4. **Defuzzification**: each output is turned into a crisp value.
//!
//! ## Core Components
//!
//! - [`rules`]: the signed-integer rule stream, its sentinels, a validating
//!   [`RuleReader`] and the [`fis_rules!`] authoring macro
//! - [`interpreter`]: the inference and aggregation state machines
//! - [`membership`]: the [`Shape`] catalogue and [`MembershipFunction`]
//! - [`operators`]: [`FuzzyOperator`] and the roles it can be bound to
//! - [`defuzz`]: the three [`Architecture`]s and seven [`DefuzzMethod`]s
//! - [`config`]: serializable engine parameters with presets
//! - [`engine`]: the [`Fis`] engine over borrowed [`FisStorage`]
//! - [`system`]: [`FisSystem`], a const-generic owner of all tables
//!
//! ## Quick Start
//!
//! ```
//! use fislogic::prelude::*;
//!
//! const X: FisTag = 0;
//! const Y: FisTag = 0;
//! const LOW: FisTag = 0;
//! const HIGH: FisTag = 1;
//! const SLOW: FisTag = 0;
//! const FAST: FisTag = 1;
//!
//! static RULES: [RuleItem; 12] = fis_rules! {
//!     IF X IS LOW THEN Y IS SLOW END
//!     IF X IS HIGH THEN Y IS FAST END
//! };
//! static RAMP: [f64; 2] = [0.0, 1.0];
//! static SLOW_K: [f64; 1] = [10.0];
//! static FAST_K: [f64; 1] = [50.0];
//!
//! # fn main() -> Result<(), FisError> {
//! let mut inputs = [FisInput::default(); 1];
//! let mut outputs = [FisOutput::new()];
//! let mut input_mfs = [MembershipFunction::new(); 2];
//! let mut output_mfs = [MembershipFunction::new(); 2];
//! let mut strengths = [0.0; 2];
//!
//! let mut fis = Fis::setup(
//!     Architecture::Sugeno,
//!     FisStorage {
//!         inputs: &mut inputs,
//!         outputs: &mut outputs,
//!         input_mfs: &mut input_mfs,
//!         output_mfs: &mut output_mfs,
//!         rules: &RULES,
//!         rule_strengths: &mut strengths,
//!     },
//!     2,
//! )?;
//! fis.setup_input(X, 0.0, 1.0)?;
//! fis.setup_output(Y, 0.0, 60.0)?;
//! fis.set_input_mf(X, LOW, Shape::LinearZ, &RAMP)?;
//! fis.set_input_mf(X, HIGH, Shape::LinearS, &RAMP)?;
//! fis.set_output_mf(Y, SLOW, Shape::Constant, &SLOW_K)?;
//! fis.set_output_mf(Y, FAST, Shape::Constant, &FAST_K)?;
//!
//! fis.set_input(X, 0.5)?;
//! fis.fuzzify();
//! fis.inference()?;
//! fis.defuzzify()?;
//! assert!((fis.output(Y)? - 30.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod defuzz;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod membership;
pub mod operators;
pub mod rules;
pub mod system;

pub use config::{FisConfig, FisConfigBuilder, DEFAULT_EVAL_POINTS};
pub use defuzz::{Accumulator, Architecture, DefuzzMethod};
pub use engine::{Fis, FisStorage, InferenceStatus};
pub use error::{FisError, FisResult, IoKind, StreamFault};
pub use io::{FisInput, FisIo, FisOutput};
pub use membership::{CustomShapeFn, MembershipFunction, Shape};
pub use operators::{FuzzyOperator, OperatorRole};
pub use rules::{FisTag, RuleItem, RuleReader, Token};
pub use system::FisSystem;

/// Everything needed to build and run a system.
pub mod prelude {
    pub use crate::fis_rules;
    pub use crate::{
        Architecture, DefuzzMethod, Fis, FisConfig, FisError, FisInput, FisOutput, FisResult,
        FisStorage, FisSystem, FisTag, FuzzyOperator, MembershipFunction, OperatorRole, RuleItem,
        Shape,
    };
}
