//! Plain-text rendering for terminals.

use crate::core::group::Group;
use crate::engine::balance::{Balances, Positions};
use crate::engine::settlement::Transfer;
use rust_decimal::Decimal;
use std::fmt;

/// Per-member balances with an owes / is owed / settled label.
pub struct BalanceTable<'a> {
    pub group_name: &'a str,
    pub balances: &'a Balances,
    pub tolerance: Decimal,
}

impl fmt::Display for BalanceTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Balances: {} ===", self.group_name)?;
        for (person, balance) in self.balances.iter() {
            if *balance > self.tolerance {
                writeln!(f, "  {:<20} owes       {:>12.2}", person.name(), balance)?;
            } else if *balance < -self.tolerance {
                writeln!(f, "  {:<20} is owed    {:>12.2}", person.name(), balance.abs())?;
            } else {
                writeln!(f, "  {:<20} settled", person.name())?;
            }
        }
        Ok(())
    }
}

/// Numbered list of transfers.
pub struct TransferList<'a>(pub &'a [Transfer]);

impl fmt::Display for TransferList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Nothing to settle: every balance is zero.");
        }
        writeln!(f, "=== Transfers ===")?;
        for (i, transfer) in self.0.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, transfer)?;
        }
        Ok(())
    }
}

/// Debtors and creditors side by side, as produced by the balance engine.
pub struct PositionSummary<'a> {
    pub debtors: &'a Positions,
    pub creditors: &'a Positions,
}

impl fmt::Display for PositionSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.debtors.is_empty() {
            writeln!(f, "Debtors:")?;
            for (person, amount) in self.debtors {
                writeln!(f, "  {:<20} {:>12.2}", person.name(), amount)?;
            }
        }
        if !self.creditors.is_empty() {
            writeln!(f, "Creditors:")?;
            for (person, amount) in self.creditors {
                writeln!(f, "  {:<20} {:>12.2}", person.name(), amount)?;
            }
        }
        Ok(())
    }
}

/// Group header plus every recorded expense.
pub struct ExpenseList<'a>(pub &'a Group);

impl fmt::Display for ExpenseList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self.0;
        writeln!(f, "=== Group: {} ===", group.name())?;
        writeln!(f, "Members ({}):", group.members().len())?;
        for member in group.members() {
            writeln!(f, "  - {}", member.name())?;
        }

        if group.expenses().is_empty() {
            return writeln!(f, "No expenses recorded.");
        }

        writeln!(f, "Expenses ({}, total {:.2}):", group.expenses().len(), group.total_expenses())?;
        for (i, expense) in group.expenses().iter().enumerate() {
            let names: Vec<&str> = expense.beneficiaries().iter().map(|b| b.name()).collect();
            writeln!(
                f,
                "  {}. {} paid {:.2} for {}",
                i + 1,
                expense.payer().name(),
                expense.amount(),
                expense.description()
            )?;
            writeln!(f, "     Shared by:  {}", names.join(", "))?;
            writeln!(f, "     Per person: {:.2}", expense.share())?;
            writeln!(f, "     Date:       {}", expense.created_at().format("%Y-%m-%d %H:%M"))?;
        }
        Ok(())
    }
}
