//! Rule stream encoding.
//!
//! A rule base is a flat array of signed integers. Each rule reads
//!
//! ```text
//! tag ref {AND|OR tag ref}* THEN tag ref {AND tag ref}*
//! ```
//!
//! where `tag` is an input (antecedent) or output (consequent) tag and
//! `ref` is the membership function tag plus one, negated for `IS NOT`.
//! The whole stream is enclosed by [`RULES_BEGIN`] and [`RULES_END`]. The
//! five sentinels occupy the lowest values of [`RuleItem`], below every
//! legal membership reference.
//!
//! Streams are usually written with [`fis_rules!`](crate::fis_rules) and
//! walked with a [`RuleReader`], which validates every item before handing
//! out a typed [`Token`] or [`Clause`].

use crate::error::{IoKind, StreamFault};

/// Integer type of a rule stream item.
#[cfg(not(feature = "wide-rules"))]
pub type RuleItem = i8;

/// Integer type of a rule stream item.
#[cfg(feature = "wide-rules")]
pub type RuleItem = i16;

/// Integer type used to name inputs, outputs and membership functions.
pub type FisTag = RuleItem;

pub const RULES_BEGIN: RuleItem = RuleItem::MIN;
pub const RULES_END: RuleItem = RuleItem::MIN + 1;
pub const RULE_AND: RuleItem = RuleItem::MIN + 2;
pub const RULE_OR: RuleItem = RuleItem::MIN + 3;
pub const RULE_THEN: RuleItem = RuleItem::MIN + 4;

/// Largest membership reference magnitude that cannot collide with a
/// sentinel, i.e. the maximum number of membership functions per side.
pub const MAX_REFERENCE: usize = (-(RULE_THEN as i32) - 1) as usize;

/// Maximum number of inputs or outputs a stream can address.
pub const MAX_TAGS: usize = RuleItem::MAX as usize + 1;

/// Encode a membership tag as a stream reference.
///
/// `mf` must lie in `0..MAX_REFERENCE`; anything else would collide with
/// a sentinel or overflow, and panics (a compile error inside `fis_rules!`
/// statics).
pub const fn membership_ref(mf: FisTag, negated: bool) -> RuleItem {
    assert!(
        mf >= 0 && (mf as usize) < MAX_REFERENCE,
        "membership tag out of encodable range"
    );
    if negated {
        -(mf + 1)
    } else {
        mf + 1
    }
}

/// A classified stream item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Begin,
    End,
    And,
    Or,
    Then,
    /// Tag or membership reference.
    Item(RuleItem),
}

impl Token {
    pub fn classify(raw: RuleItem) -> Self {
        match raw {
            RULES_BEGIN => Token::Begin,
            RULES_END => Token::End,
            RULE_AND => Token::And,
            RULE_OR => Token::Or,
            RULE_THEN => Token::Then,
            other => Token::Item(other),
        }
    }

    pub fn raw(self) -> RuleItem {
        match self {
            Token::Begin => RULES_BEGIN,
            Token::End => RULES_END,
            Token::And => RULE_AND,
            Token::Or => RULE_OR,
            Token::Then => RULE_THEN,
            Token::Item(raw) => raw,
        }
    }

    pub fn is_sentinel(self) -> bool {
        !matches!(self, Token::Item(_))
    }
}

/// A decoded membership reference (`IS` / `IS NOT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MfRef {
    /// Zero based index into the membership table.
    pub index: usize,
    pub negated: bool,
}

impl MfRef {
    pub fn decode(raw: RuleItem) -> Option<Self> {
        if raw == 0 || Token::classify(raw).is_sentinel() {
            return None;
        }
        let magnitude = (raw as i32).unsigned_abs() as usize;
        Some(Self {
            index: magnitude - 1,
            negated: raw < 0,
        })
    }

    /// Apply the reference polarity to a membership degree.
    pub fn apply(self, degree: f64) -> f64 {
        if self.negated {
            1.0 - degree
        } else {
            degree
        }
    }
}

/// Bounds a clause is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseLimits {
    pub kind: IoKind,
    pub tags: usize,
    pub memberships: usize,
}

/// `tag IS [NOT] mf` followed by the next stream token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub tag: usize,
    pub reference: MfRef,
    pub follow: Token,
}

/// Bounds-checked cursor over a rule stream.
#[derive(Debug, Clone, Copy)]
pub struct RuleReader<'r> {
    items: &'r [RuleItem],
}

impl<'r> RuleReader<'r> {
    pub fn new(items: &'r [RuleItem]) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn token(&self, index: usize) -> Result<Token, StreamFault> {
        self.items
            .get(index)
            .copied()
            .map(Token::classify)
            .ok_or(StreamFault::Truncated { index })
    }

    pub fn expect_begin(&self) -> Result<(), StreamFault> {
        match self.token(0) {
            Ok(Token::Begin) => Ok(()),
            _ => Err(StreamFault::MissingBegin),
        }
    }

    /// Decode the clause starting at `index`, consuming three items of
    /// lookahead (tag, reference, follower).
    pub fn clause(&self, index: usize, limits: ClauseLimits) -> Result<Clause, StreamFault> {
        let tag = match self.token(index)? {
            Token::Item(raw) if raw >= 0 && (raw as usize) < limits.tags => raw as usize,
            Token::Item(raw) => {
                return Err(StreamFault::TagOutOfRange {
                    index,
                    kind: limits.kind,
                    tag: raw as i32,
                    count: limits.tags,
                })
            }
            other => {
                return Err(StreamFault::UnexpectedToken {
                    index,
                    found: other.raw() as i32,
                })
            }
        };

        let raw = match self.token(index + 1)? {
            Token::Item(raw) => raw,
            other => {
                return Err(StreamFault::UnexpectedToken {
                    index: index + 1,
                    found: other.raw() as i32,
                })
            }
        };
        let reference = MfRef::decode(raw)
            .filter(|r| r.index < limits.memberships)
            .ok_or(StreamFault::MembershipOutOfRange {
                index: index + 1,
                reference: raw as i32,
                count: limits.memberships,
            })?;

        let follow = self.token(index + 2)?;

        Ok(Clause {
            tag,
            reference,
            follow,
        })
    }
}

/// Build a rule stream from rule sentences.
///
/// Tags and membership tags are single token trees: identifiers of
/// constants, literals, or parenthesized expressions such as
/// `(Input::Speed)`.
///
/// ```
/// use fislogic::fis_rules;
/// use fislogic::rules::{RuleItem, RULES_BEGIN, RULES_END, RULE_OR, RULE_THEN};
///
/// const SERVICE: RuleItem = 0;
/// const FOOD: RuleItem = 1;
/// const TIP: RuleItem = 0;
/// const POOR: RuleItem = 0;
/// const RANCID: RuleItem = 1;
/// const CHEAP: RuleItem = 0;
///
/// const RULES: &[RuleItem] = &fis_rules! {
///     IF SERVICE IS POOR OR FOOD IS NOT RANCID THEN TIP IS CHEAP END
/// };
///
/// assert_eq!(
///     RULES,
///     &[RULES_BEGIN, 0, 1, RULE_OR, 1, -2, RULE_THEN, 0, 1, RULES_END]
/// );
/// ```
#[macro_export]
macro_rules! fis_rules {
    ($($body:tt)*) => {
        $crate::__fis_rules!(@munch [$crate::rules::RULES_BEGIN] $($body)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __fis_rules {
    (@munch [$($out:expr),*]) => {
        [$($out,)* $crate::rules::RULES_END]
    };
    (@munch [$($out:expr),*] END $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out),*] $($rest)*)
    };
    (@munch [$($out:expr),*] IF $tag:tt IS NOT $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, true)] $($rest)*)
    };
    (@munch [$($out:expr),*] IF $tag:tt IS $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, false)] $($rest)*)
    };
    (@munch [$($out:expr),*] AND $tag:tt IS NOT $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::rules::RULE_AND, $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, true)] $($rest)*)
    };
    (@munch [$($out:expr),*] AND $tag:tt IS $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::rules::RULE_AND, $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, false)] $($rest)*)
    };
    (@munch [$($out:expr),*] OR $tag:tt IS NOT $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::rules::RULE_OR, $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, true)] $($rest)*)
    };
    (@munch [$($out:expr),*] OR $tag:tt IS $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::rules::RULE_OR, $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, false)] $($rest)*)
    };
    (@munch [$($out:expr),*] THEN $tag:tt IS NOT $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::rules::RULE_THEN, $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, true)] $($rest)*)
    };
    (@munch [$($out:expr),*] THEN $tag:tt IS $mf:tt $($rest:tt)*) => {
        $crate::__fis_rules!(@munch [$($out,)* $crate::rules::RULE_THEN, $crate::__fis_rules!(@tag $tag), $crate::__fis_rules!(@ref $mf, false)] $($rest)*)
    };
    (@tag $tag:tt) => {
        ($tag) as $crate::rules::RuleItem
    };
    (@ref $mf:tt, $negated:expr) => {
        $crate::rules::membership_ref(($mf) as $crate::rules::RuleItem, $negated)
    };
}
