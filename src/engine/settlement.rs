use crate::core::config::EngineConfig;
use crate::core::error::{InvariantViolation, Side};
use crate::core::group::Group;
use crate::core::person::Person;
use crate::engine::balance::{BalanceEngine, Balances};
use crate::engine::efficiency::EfficiencyReport;
use crate::graph::debt_graph::DebtGraph;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

/// A single payment that settles part of the group's debts: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Person,
    pub to: Person,
    /// Always positive.
    pub amount: Decimal,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {:.2}", self.from, self.to, self.amount)
    }
}

/// Everything the settlement engine derives from a group.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
    pub efficiency: EfficiencyReport,
}

/// Heap entry for one side of the matching.
///
/// Ordered by remaining amount, then by member rank so that the
/// earlier member wins a tie.
#[derive(Debug, Clone)]
struct Outstanding {
    remaining: Decimal,
    rank: usize,
    person: Person,
}

impl Ord for Outstanding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialEq for Outstanding {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Outstanding {}

impl PartialOrd for Outstanding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open positions of one settlement run, ranked by member order.
///
/// Positions beyond the tolerance go on the heaps. Positions within it,
/// and whatever an entry still holds when it drops out of the heap, are
/// kept as dust for the final pass.
#[derive(Debug, Default)]
struct Book {
    debtors: BinaryHeap<Outstanding>,
    creditors: BinaryHeap<Outstanding>,
    debtor_dust: Vec<Outstanding>,
    creditor_dust: Vec<Outstanding>,
}

impl Book {
    fn open(balances: &Balances, tolerance: Decimal) -> Self {
        let mut book = Self::default();
        for (rank, (person, balance)) in balances.iter().enumerate() {
            let entry = Outstanding {
                remaining: balance.abs(),
                rank,
                person: person.clone(),
            };
            if *balance > tolerance {
                book.debtors.push(entry);
            } else if *balance < -tolerance {
                book.creditors.push(entry);
            } else if *balance > Decimal::ZERO {
                book.debtor_dust.push(entry);
            } else if *balance < Decimal::ZERO {
                book.creditor_dust.push(entry);
            }
        }
        book
    }
}

fn transfer(side: Side, entry: &Outstanding, counterpart: &Outstanding, amount: Decimal) -> Transfer {
    let (from, to) = match side {
        Side::Debtor => (entry, counterpart),
        Side::Creditor => (counterpart, entry),
    };
    Transfer {
        from: from.person.clone(),
        to: to.person.clone(),
        amount,
    }
}

/// Reduces a group's web of debts to a short list of direct transfers.
pub struct SettlementEngine {
    balances: BalanceEngine,
}

impl SettlementEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            balances: BalanceEngine::with_config(config),
        }
    }

    /// The balance engine this settlement engine reads from.
    pub fn balance_engine(&self) -> &BalanceEngine {
        &self.balances
    }

    /// Compute the transfers that settle every balance in the group.
    ///
    /// # Algorithm
    ///
    /// Greedy largest-pair matching:
    ///
    /// 1. Split balances into debtors and creditors (member order).
    /// 2. Keep each side in a max-heap keyed by remaining amount,
    ///    ties going to the earlier member.
    /// 3. Pop the largest debtor and largest creditor, transfer the
    ///    smaller of the two amounts, and push back whichever side
    ///    still has more than the tolerance left.
    /// 4. Stop when either side is empty.
    /// 5. Anything still above the tolerance on the other side is matched
    ///    against the opposite side's sub-tolerance positions, largest
    ///    first.
    ///
    /// Afterwards every balance is within the tolerance of zero. Without
    /// sub-tolerance positions the result has at most
    /// `|debtors| + |creditors| - 1` transfers. Runs in O(n log n).
    ///
    /// # Errors
    ///
    /// An [`InvariantViolation`] if the balances do not sum to zero or a
    /// remainder above the tolerance is left unmatched. Neither can happen
    /// for a group built through its mutation operations.
    pub fn simplify_debts(&self, group: &Group) -> Result<Vec<Transfer>, InvariantViolation> {
        let balances = self.balances.compute_balances(group);
        self.simplify_balances(&balances)
    }

    /// [`simplify_debts`](Self::simplify_debts) over precomputed balances.
    pub fn simplify_balances(&self, balances: &Balances) -> Result<Vec<Transfer>, InvariantViolation> {
        self.balances.check_conservation(balances)?;

        let tolerance = self.balances.tolerance();
        let mut book = Book::open(balances, tolerance);
        if book.debtors.is_empty() && book.creditors.is_empty() {
            return Ok(Vec::new());
        }

        let mut transfers = Vec::with_capacity(book.debtors.len() + book.creditors.len());
        while !book.debtors.is_empty() && !book.creditors.is_empty() {
            let (Some(mut debtor), Some(mut creditor)) = (book.debtors.pop(), book.creditors.pop())
            else {
                break;
            };
            let amount = debtor.remaining.min(creditor.remaining);
            log::debug!("{} pays {} {}", debtor.person, creditor.person, amount);
            transfers.push(transfer(Side::Debtor, &debtor, &creditor, amount));

            debtor.remaining -= amount;
            creditor.remaining -= amount;
            if debtor.remaining > tolerance {
                book.debtors.push(debtor);
            } else if debtor.remaining > Decimal::ZERO {
                book.debtor_dust.push(debtor);
            }
            if creditor.remaining > tolerance {
                book.creditors.push(creditor);
            } else if creditor.remaining > Decimal::ZERO {
                book.creditor_dust.push(creditor);
            }
        }

        self.settle_against_dust(book.debtors, book.creditor_dust, Side::Debtor, &mut transfers)?;
        self.settle_against_dust(book.creditors, book.debtor_dust, Side::Creditor, &mut transfers)?;

        log::info!(
            "settled {} balances with {} transfers",
            balances.len(),
            transfers.len()
        );
        Ok(transfers)
    }

    /// Match each `leftover` entry on `side` against the opposite side's
    /// `dust` until it is within the tolerance.
    fn settle_against_dust(
        &self,
        leftover: BinaryHeap<Outstanding>,
        dust: Vec<Outstanding>,
        side: Side,
        transfers: &mut Vec<Transfer>,
    ) -> Result<(), InvariantViolation> {
        if leftover.is_empty() {
            return Ok(());
        }

        let tolerance = self.balances.tolerance();
        let mut pool: VecDeque<Outstanding> = BinaryHeap::from(dust)
            .into_sorted_vec()
            .into_iter()
            .rev()
            .collect();

        for mut entry in leftover.into_sorted_vec().into_iter().rev() {
            while entry.remaining > tolerance {
                let Some(mut counterpart) = pool.pop_front() else {
                    log::error!(
                        "settlement left {} unmatched on the {} side",
                        entry.remaining,
                        side
                    );
                    return Err(InvariantViolation::UnsettledRemainder {
                        side,
                        person: entry.person.name().to_string(),
                        remaining: entry.remaining,
                    });
                };
                let amount = entry.remaining.min(counterpart.remaining);
                log::debug!(
                    "{} settled against {} for {}",
                    entry.person,
                    counterpart.person,
                    amount
                );
                transfers.push(transfer(side, &entry, &counterpart, amount));

                entry.remaining -= amount;
                counterpart.remaining -= amount;
                if counterpart.remaining > Decimal::ZERO {
                    pool.push_front(counterpart);
                }
            }
        }
        Ok(())
    }

    /// Balances, transfers and efficiency report in one pass.
    pub fn settle(&self, group: &Group) -> Result<Settlement, InvariantViolation> {
        let balances = self.balances.compute_balances(group);
        let transfers = self.simplify_balances(&balances)?;
        let (debtors, creditors) = self.balances.partition(&balances);
        let pairwise = DebtGraph::from_group(group).bilateral_net();

        let efficiency = EfficiencyReport::new(
            debtors.len() * creditors.len(),
            &transfers,
            pairwise.edge_count(),
        );
        Ok(Settlement {
            balances,
            transfers,
            efficiency,
        })
    }

    /// Measure how much the simplification reduced the number of payments.
    pub fn efficiency_metrics(&self, group: &Group) -> Result<EfficiencyReport, InvariantViolation> {
        self.settle(group).map(|s| s.efficiency)
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new()
    }
}
