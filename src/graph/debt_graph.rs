use crate::core::group::Group;
use crate::core::person::Person;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// The unsimplified who-owes-whom view of a group.
///
/// Each edge `debtor -> creditor` aggregates every share the debtor
/// consumed from expenses the creditor paid for. This is how the debts
/// look before any settlement: one edge per pair that shared a bill.
///
/// # Examples
///
/// ```
/// use split_settle::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut group = Group::new("Lunch").unwrap();
/// let a = Person::new("A");
/// let b = Person::new("B");
/// group.add_member(a.clone()).unwrap();
/// group.add_member(b.clone()).unwrap();
/// group.add_expense(Expense::new(a.clone(), dec!(20), "Pizza", vec![a.clone(), b.clone()]).unwrap()).unwrap();
///
/// let graph = DebtGraph::from_group(&group);
/// assert_eq!(graph.edge_amount(&b, &a), dec!(10));
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DebtGraph {
    /// Members in group order; edge listing follows this order.
    members: Vec<Person>,
    /// Aggregated edges: (debtor, creditor) -> total amount
    edges: HashMap<(Person, Person), Decimal>,
}

impl DebtGraph {
    /// Build the pairwise view from a group's expenses.
    ///
    /// A beneficiary's share of their own payment creates no edge.
    pub fn from_group(group: &Group) -> Self {
        let mut edges: HashMap<(Person, Person), Decimal> = HashMap::new();
        for expense in group.expenses() {
            let share = expense.share();
            for beneficiary in expense.beneficiaries() {
                if beneficiary == expense.payer() {
                    continue;
                }
                *edges
                    .entry((beneficiary.clone(), expense.payer().clone()))
                    .or_insert(Decimal::ZERO) += share;
            }
        }
        Self {
            members: group.members().to_vec(),
            edges,
        }
    }

    /// Number of distinct debtor -> creditor edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sum of all edge amounts.
    pub fn gross_total(&self) -> Decimal {
        self.edges.values().copied().sum()
    }

    /// Aggregated amount `debtor` owes `creditor` directly.
    pub fn edge_amount(&self, debtor: &Person, creditor: &Person) -> Decimal {
        self.edges
            .get(&(debtor.clone(), creditor.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All edges as (debtor, creditor, amount), ordered by debtor then
    /// creditor position in the group.
    pub fn edges(&self) -> Vec<(&Person, &Person, Decimal)> {
        let rank = |p: &Person| self.members.iter().position(|m| m == p).unwrap_or(usize::MAX);
        let mut edges: Vec<(&Person, &Person, Decimal)> = self
            .edges
            .iter()
            .map(|((d, c), &amt)| (d, c, amt))
            .collect();
        edges.sort_by_key(|(d, c, _)| (rank(*d), rank(*c)));
        edges
    }

    /// What `person` owes along outgoing edges minus what they are owed
    /// along incoming ones. Matches the person's net balance.
    pub fn net_position(&self, person: &Person) -> Decimal {
        self.edges
            .iter()
            .map(|((d, c), &amt)| {
                if d == person {
                    amt
                } else if c == person {
                    -amt
                } else {
                    Decimal::ZERO
                }
            })
            .sum()
    }

    /// Offset each pair's mutual debts, keeping only the net direction.
    ///
    /// If A owes B 100 and B owes A 60, the result has a single edge
    /// A -> B of 40. Pairs that cancel exactly disappear.
    pub fn bilateral_net(&self) -> Self {
        let mut edges = HashMap::new();
        for ((debtor, creditor), &amount) in &self.edges {
            let reverse = self.edge_amount(creditor, debtor);
            let net = amount - reverse;
            if net > Decimal::ZERO {
                edges.insert((debtor.clone(), creditor.clone()), net);
            }
        }
        Self {
            members: self.members.clone(),
            edges,
        }
    }
}
