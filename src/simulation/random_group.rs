//! Random group generation for benchmarks, property tests and the CLI.

use crate::core::error::ValidationError;
use crate::core::expense::{Expense, MAX_AMOUNT};
use crate::core::group::Group;
use crate::core::person::Person;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members.
    pub member_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Minimum expense amount.
    pub min_amount: f64,
    /// Maximum expense amount.
    pub max_amount: f64,
    /// Upper bound on beneficiaries per expense (capped at `member_count`).
    pub max_beneficiaries: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            member_count: 6,
            expense_count: 20,
            min_amount: 1.0,
            max_amount: 500.0,
            max_beneficiaries: 6,
        }
    }
}

/// Sampling bounds for expense amounts.
///
/// A non-finite or non-positive minimum falls back to one cent. A maximum
/// that is not above the minimum (or not finite) becomes `min + 1`.
/// Both ends stay at or below [`MAX_AMOUNT`].
fn amount_range(config: &GroupConfig) -> (f64, f64) {
    let ceiling = MAX_AMOUNT.to_f64().unwrap_or(f64::MAX);
    let low = if config.min_amount.is_finite() && config.min_amount > 0.0 {
        config.min_amount.min(ceiling - 1.0)
    } else {
        0.01
    };
    let high = if config.max_amount.is_finite() && config.max_amount > low {
        config.max_amount.min(ceiling)
    } else {
        low + 1.0
    };
    (low, high)
}

/// Generate a random group whose expenses all respect the group invariants.
pub fn generate_random_group(config: &GroupConfig) -> Result<Group, ValidationError> {
    let mut rng = rand::thread_rng();
    let mut group = Group::new(format!("Random group ({} members)", config.member_count))?;

    let members: Vec<Person> = (0..config.member_count)
        .map(|i| Person::new(format!("MEMBER-{:03}", i)))
        .collect();
    for member in &members {
        group.add_member(member.clone())?;
    }
    if members.is_empty() {
        return Ok(group);
    }

    let max_beneficiaries = config.max_beneficiaries.clamp(1, members.len());
    let (low, high) = amount_range(config);

    for i in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].clone();
        let count = rng.gen_range(1..=max_beneficiaries);
        let beneficiaries: Vec<Person> = members
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect();

        let amount = Decimal::from_f64_retain(rng.gen_range(low..high))
            .unwrap_or(Decimal::ONE)
            .round_dp(2)
            .clamp(Decimal::new(1, 2), MAX_AMOUNT);

        let expense = Expense::new(payer, amount, format!("Expense #{}", i + 1), beneficiaries)?;
        group.add_expense(expense)?;
    }

    Ok(group)
}
