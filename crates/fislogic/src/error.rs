//! Error types for the fuzzy inference engine.
//!
//! Variants only carry `Copy` data so that reporting a failure never
//! allocates.

use thiserror::Error;

use crate::defuzz::{Architecture, DefuzzMethod};
use crate::operators::{FuzzyOperator, OperatorRole};

/// Which side of the system a tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoKind {
    Input,
    Output,
}

impl std::fmt::Display for IoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoKind::Input => write!(f, "input"),
            IoKind::Output => write!(f, "output"),
        }
    }
}

/// A defect found while walking a rule stream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFault {
    #[error("rule stream does not start with the begin sentinel")]
    MissingBegin,
    #[error("rule stream ends at index {index} without the end sentinel")]
    Truncated { index: usize },
    #[error("unexpected item {found} at index {index}")]
    UnexpectedToken { index: usize, found: i32 },
    #[error("{kind} tag {tag} at index {index} out of range (count: {count})")]
    TagOutOfRange {
        index: usize,
        kind: IoKind,
        tag: i32,
        count: usize,
    },
    #[error("membership reference {reference} at index {index} out of range (count: {count})")]
    MembershipOutOfRange {
        index: usize,
        reference: i32,
        count: usize,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FisError {
    #[error("{what} storage cannot be empty")]
    EmptyStorage { what: &'static str },
    #[error("{what} holds {actual} entries, at most {max} can be addressed by the rule stream")]
    TooManyEntries {
        what: &'static str,
        actual: usize,
        max: usize,
    },
    #[error("rule strength buffer holds {actual} entries, {required} rules configured")]
    RuleBufferTooSmall { required: usize, actual: usize },
    #[error("rule weight buffer holds {actual} entries, {required} rules configured")]
    RuleWeightsTooSmall { required: usize, actual: usize },
    #[error("{kind} tag {tag} out of range (count: {count})")]
    TagOutOfRange { kind: IoKind, tag: i32, count: usize },
    #[error("membership function {tag} out of range (count: {count})")]
    MembershipOutOfRange { tag: i32, count: usize },
    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
    #[error("shape {shape} needs {expected} coefficients, got {actual}")]
    MissingCoefficients {
        shape: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("shape {shape} cannot be used as {kind} membership function of a {architecture} system")]
    ShapeNotAllowed {
        shape: &'static str,
        kind: IoKind,
        architecture: Architecture,
    },
    #[error("operator {operator} cannot be used as {role}")]
    OperatorNotAllowed {
        role: OperatorRole,
        operator: FuzzyOperator,
    },
    #[error("defuzzification method {method} is not available for {architecture} systems")]
    DefuzzNotSupported {
        method: DefuzzMethod,
        architecture: Architecture,
    },
    #[error("number of evaluation points must be positive")]
    InvalidEvalPoints,
    #[error("aggregated region buffers hold {actual} points, {required} required")]
    RegionTooShort { required: usize, actual: usize },
    #[error("malformed rule stream: {0}")]
    Stream(#[from] StreamFault),
    #[error("parsed {parsed} rules, {expected} configured")]
    RuleCountMismatch { expected: usize, parsed: usize },
    #[error("defuzzification requires a successful inference pass")]
    InferenceNotValid,
}

pub type FisResult<T> = Result<T, FisError>;
