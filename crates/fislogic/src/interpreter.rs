//! Rule stream state machines.
//!
//! Two walks share the same stream. The inference walk composes antecedent
//! degrees into one strength per rule; the aggregation walk skips the
//! antecedents and applies every consequent of a rule whose strength is
//! known. Both are expressed as `(state, input) -> Transition` with no
//! numeric side effects; the engine interprets the returned effect.

use crate::error::StreamFault;
use crate::rules::{Clause, Token};

/// Antecedent connective remembered between clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// Outcome of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub next: S,
    pub effect: E,
    /// Number of stream items consumed.
    pub advance: usize,
}

/// States of the inference walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceState {
    /// Reading `tag ref` pairs of a rule's premise. `connective` is the
    /// connector that preceded the current pair; `None` on the first pair.
    Antecedent { connective: Option<Connective> },
    /// Reading the consequents of a rule.
    ReachEnd,
}

impl Default for InferenceState {
    fn default() -> Self {
        InferenceState::Antecedent { connective: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceEffect {
    /// Fold the clause degree into the running strength. The operator is
    /// the one bound to `connective`, or the neutral sum seed when `None`.
    Compose { connective: Option<Connective> },
    /// Consequent of a rule that has more consequents.
    Continue,
    /// Last consequent of a rule: store its strength.
    CloseRule,
}

impl InferenceState {
    pub fn step(
        self,
        clause: &Clause,
        index: usize,
    ) -> Result<Transition<Self, InferenceEffect>, StreamFault> {
        match self {
            InferenceState::Antecedent { connective } => {
                let next = match clause.follow {
                    Token::And => InferenceState::Antecedent {
                        connective: Some(Connective::And),
                    },
                    Token::Or => InferenceState::Antecedent {
                        connective: Some(Connective::Or),
                    },
                    Token::Then => InferenceState::ReachEnd,
                    other => {
                        return Err(StreamFault::UnexpectedToken {
                            index: index + 2,
                            found: other.raw() as i32,
                        })
                    }
                };
                Ok(Transition {
                    next,
                    effect: InferenceEffect::Compose { connective },
                    advance: 3,
                })
            }
            InferenceState::ReachEnd => Ok(if clause.follow == Token::And {
                Transition {
                    next: InferenceState::ReachEnd,
                    effect: InferenceEffect::Continue,
                    advance: 3,
                }
            } else {
                Transition {
                    next: InferenceState::default(),
                    effect: InferenceEffect::CloseRule,
                    advance: 2,
                }
            }),
        }
    }
}

/// States of the aggregation walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationState {
    /// Skipping antecedent items up to `THEN`.
    #[default]
    FindConsequent,
    /// Applying `tag ref` consequent pairs.
    ApplyConsequent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationEffect {
    Skip,
    /// Apply the consequent to its output; `closes_rule` moves the rule
    /// cursor forward.
    Apply { closes_rule: bool },
}

impl AggregationState {
    /// Transition out of [`AggregationState::FindConsequent`].
    pub fn seek(token: Token) -> Transition<Self, AggregationEffect> {
        let next = if token == Token::Then {
            AggregationState::ApplyConsequent
        } else {
            AggregationState::FindConsequent
        };
        Transition {
            next,
            effect: AggregationEffect::Skip,
            advance: 1,
        }
    }

    /// Transition out of [`AggregationState::ApplyConsequent`].
    pub fn apply(clause: &Clause) -> Transition<Self, AggregationEffect> {
        if clause.follow == Token::And {
            Transition {
                next: AggregationState::ApplyConsequent,
                effect: AggregationEffect::Apply { closes_rule: false },
                advance: 3,
            }
        } else {
            Transition {
                next: AggregationState::FindConsequent,
                effect: AggregationEffect::Apply { closes_rule: true },
                advance: 2,
            }
        }
    }
}
