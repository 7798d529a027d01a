use crate::core::config::EngineConfig;
use crate::core::error::InvariantViolation;
use crate::core::group::Group;
use crate::core::person::Person;
use crate::engine::settlement::Transfer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net position of every member of a group.
///
/// A positive balance means the person owes the group (net debtor).
/// A negative balance means the person is owed (net creditor).
///
/// Entries follow the group's member order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    entries: Vec<(Person, Decimal)>,
}

impl Balances {
    /// Net balance of `person`, zero if unknown.
    pub fn get(&self, person: &Person) -> Decimal {
        self.entries
            .iter()
            .find(|(p, _)| p == person)
            .map(|(_, b)| *b)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Person, Decimal)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Signed sum of all balances. Zero for a consistent group.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, b)| *b).sum()
    }

    /// Sum of positive balances: the amount that has to change hands.
    pub fn total_owed(&self) -> Decimal {
        self.entries
            .iter()
            .map(|(_, b)| *b)
            .filter(|b| *b > Decimal::ZERO)
            .sum()
    }

    /// Apply a transfer: the payer's debt shrinks, the receiver's credit shrinks.
    pub fn apply(&mut self, transfer: &Transfer) {
        for (person, balance) in self.entries.iter_mut() {
            if person == &transfer.from {
                *balance -= transfer.amount;
            } else if person == &transfer.to {
                *balance += transfer.amount;
            }
        }
    }

    /// Whether every balance is within `tolerance` of zero.
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.entries.iter().all(|(_, b)| b.abs() <= tolerance)
    }
}

impl FromIterator<(Person, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (Person, Decimal)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Members with an outstanding position, as `(person, absolute amount)`.
pub type Positions = Vec<(Person, Decimal)>;

/// Derives net balances from a group's recorded expenses.
///
/// Pure computation over already-validated entities: it never fails for a
/// structurally valid group, including one with no members or no expenses.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceEngine {
    config: EngineConfig,
}

impl BalanceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tolerance(&self) -> Decimal {
        self.config.tolerance
    }

    /// Compute every member's net balance.
    ///
    /// # Algorithm
    ///
    /// For each expense, the payer is credited the full amount and each
    /// beneficiary is debited one equal share. Balance = debited − credited.
    /// Accumulation is a plain sum, so expense order does not matter.
    pub fn compute_balances(&self, group: &Group) -> Balances {
        let mut net: HashMap<&Person, Decimal> = HashMap::with_capacity(group.members().len());

        for expense in group.expenses() {
            *net.entry(expense.payer()).or_insert(Decimal::ZERO) -= expense.amount();

            let share = expense.share();
            for beneficiary in expense.beneficiaries() {
                *net.entry(beneficiary).or_insert(Decimal::ZERO) += share;
            }
        }

        group
            .members()
            .iter()
            .map(|m| (m.clone(), net.get(m).copied().unwrap_or(Decimal::ZERO)))
            .collect()
    }

    /// Split members into debtors and creditors, each with an absolute amount.
    ///
    /// Members within the tolerance of zero appear in neither list.
    /// Both lists keep the group's member order.
    pub fn debtors_and_creditors(&self, group: &Group) -> (Positions, Positions) {
        self.partition(&self.compute_balances(group))
    }

    /// Same split as [`debtors_and_creditors`](Self::debtors_and_creditors)
    /// over precomputed balances.
    pub fn partition(&self, balances: &Balances) -> (Positions, Positions) {
        let tolerance = self.config.tolerance;
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for (person, balance) in balances.iter() {
            if *balance > tolerance {
                debtors.push((person.clone(), *balance));
            } else if *balance < -tolerance {
                creditors.push((person.clone(), balance.abs()));
            }
        }

        (debtors, creditors)
    }

    /// Whether the group's balances sum to zero within the tolerance.
    pub fn is_balanced(&self, group: &Group) -> bool {
        self.check_conservation(&self.compute_balances(group)).is_ok()
    }

    /// Verify the conservation invariant on computed balances.
    pub fn check_conservation(&self, balances: &Balances) -> Result<(), InvariantViolation> {
        let sum = balances.total();
        if sum.abs() > self.config.tolerance {
            log::error!("conservation violated: balances sum to {}", sum);
            return Err(InvariantViolation::Unbalanced {
                sum,
                tolerance: self.config.tolerance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::Expense;
    use rust_decimal_macros::dec;

    fn group_of(names: &[&str]) -> (Group, Vec<Person>) {
        let mut group = Group::new("test").unwrap();
        let people: Vec<Person> = names.iter().map(|n| Person::new(*n)).collect();
        for p in &people {
            group.add_member(p.clone()).unwrap();
        }
        (group, people)
    }

    #[test]
    fn test_single_payer_equal_split() {
        let (mut group, p) = group_of(&["A", "B", "C", "D"]);
        group
            .add_expense(Expense::new(p[0].clone(), dec!(400), "Hotel", p.clone()).unwrap())
            .unwrap();

        let balances = BalanceEngine::new().compute_balances(&group);
        assert_eq!(balances.get(&p[0]), dec!(-300));
        assert_eq!(balances.get(&p[1]), dec!(100));
        assert_eq!(balances.get(&p[2]), dec!(100));
        assert_eq!(balances.get(&p[3]), dec!(100));
        assert_eq!(balances.total(), Decimal::ZERO);
    }

    #[test]
    fn test_member_without_expenses_is_zero() {
        let (mut group, p) = group_of(&["A", "B", "C"]);
        group
            .add_expense(
                Expense::new(p[0].clone(), dec!(50), "x", vec![p[1].clone()]).unwrap(),
            )
            .unwrap();

        let balances = BalanceEngine::new().compute_balances(&group);
        assert_eq!(balances.len(), 3);
        assert_eq!(balances.get(&p[2]), Decimal::ZERO);
    }

    #[test]
    fn test_empty_group() {
        let group = Group::new("empty").unwrap();
        let engine = BalanceEngine::new();
        let balances = engine.compute_balances(&group);
        assert!(balances.is_empty());
        assert!(engine.is_balanced(&group));
        let (debtors, creditors) = engine.debtors_and_creditors(&group);
        assert!(debtors.is_empty());
        assert!(creditors.is_empty());
    }

    #[test]
    fn test_uneven_split_still_conserves() {
        let (mut group, p) = group_of(&["A", "B", "C"]);
        group
            .add_expense(Expense::new(p[0].clone(), dec!(100), "x", p.clone()).unwrap())
            .unwrap();

        let engine = BalanceEngine::new();
        let balances = engine.compute_balances(&group);
        assert!(balances.total().abs() <= dec!(0.01));
        assert!(engine.is_balanced(&group));
    }

    #[test]
    fn test_partition_keeps_member_order_and_drops_dust() {
        let (_, p) = group_of(&["A", "B", "C", "D", "E"]);
        let balances: Balances = vec![
            (p[0].clone(), dec!(20)),
            (p[1].clone(), dec!(-35)),
            (p[2].clone(), dec!(0.004)),
            (p[3].clone(), dec!(15)),
            (p[4].clone(), dec!(-0.004)),
        ]
        .into_iter()
        .collect();

        let (debtors, creditors) = BalanceEngine::new().partition(&balances);
        assert_eq!(debtors, vec![(p[0].clone(), dec!(20)), (p[3].clone(), dec!(15))]);
        assert_eq!(creditors, vec![(p[1].clone(), dec!(35))]);
    }

    #[test]
    fn test_check_conservation_flags_imbalance() {
        let (_, p) = group_of(&["A", "B"]);
        let balances: Balances = vec![(p[0].clone(), dec!(10)), (p[1].clone(), dec!(-9))]
            .into_iter()
            .collect();

        let err = BalanceEngine::new().check_conservation(&balances).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::Unbalanced {
                sum: dec!(1),
                tolerance: dec!(0.01)
            }
        );
    }

    #[test]
    fn test_apply_transfer() {
        let (_, p) = group_of(&["A", "B"]);
        let mut balances: Balances = vec![(p[0].clone(), dec!(40)), (p[1].clone(), dec!(-40))]
            .into_iter()
            .collect();
        balances.apply(&Transfer {
            from: p[0].clone(),
            to: p[1].clone(),
            amount: dec!(40),
        });
        assert!(balances.is_settled(Decimal::ZERO));
    }
}
