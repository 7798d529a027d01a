//! Error types for group mutations and engine invariants.
//!
//! A [`ValidationError`] is rejected caller input. An [`InvariantViolation`]
//! is an engine defect and is reported separately.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// A mutation was rejected because it would break an entity invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("group name must not be empty")]
    EmptyGroupName,

    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("expense amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    #[error("expense needs at least one beneficiary")]
    NoBeneficiaries,

    #[error("{0} is already a member of the group")]
    DuplicateMember(String),

    #[error("{0} is not a member of the group")]
    NotAMember(String),

    #[error("payer {0} is not a member of the group")]
    PayerNotMember(String),

    #[error("beneficiary {0} is not a member of the group")]
    BeneficiaryNotMember(String),

    #[error("{name} cannot be removed: referenced by {expense_count} expense(s)")]
    MemberHasExpenses { name: String, expense_count: usize },
}

/// Which side of the settlement a leftover belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debtor,
    Creditor,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Debtor => write!(f, "debtor"),
            Side::Creditor => write!(f, "creditor"),
        }
    }
}

/// An internal consistency check failed.
///
/// Never produced for a group built through the documented mutation
/// operations; seeing one means the engine has a defect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("balances sum to {sum}, outside tolerance {tolerance}")]
    Unbalanced { sum: Decimal, tolerance: Decimal },

    #[error("settlement left {remaining} unmatched on the {side} side ({person})")]
    UnsettledRemainder {
        side: Side,
        person: String,
        remaining: Decimal,
    },
}
