use crate::engine::settlement::Transfer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How much simplification reduced the number of payments in a group.
///
/// The baseline, `original_debt_count`, is `|debtors| × |creditors|`: the
/// number of payments if every debtor paid every creditor a slice of
/// their debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    /// Naive pairwise payment count before simplification.
    pub original_debt_count: usize,
    /// Number of transfers after simplification.
    pub transfer_count: usize,
    /// `(1 - transfer_count / original_debt_count) * 100`, in `[0, 100]`.
    pub reduction_percent: f64,
    /// Sum of all transfer amounts (equals the sum of positive balances).
    pub total_transfer_amount: Decimal,
    /// Distinct who-owes-whom edges implied directly by the expenses,
    /// after offsetting mutual debts.
    pub pairwise_debt_count: usize,
}

impl EfficiencyReport {
    pub fn new(original_debt_count: usize, transfers: &[Transfer], pairwise_debt_count: usize) -> Self {
        let transfer_count = transfers.len();
        Self {
            original_debt_count,
            transfer_count,
            reduction_percent: reduction_percent(original_debt_count, transfer_count),
            total_transfer_amount: transfers.iter().map(|t| t.amount).sum(),
            pairwise_debt_count,
        }
    }

    /// Payments avoided compared to the baseline.
    pub fn transfers_saved(&self) -> usize {
        self.original_debt_count.saturating_sub(self.transfer_count)
    }
}

fn reduction_percent(original: usize, transfers: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let pct = (1.0 - transfers as f64 / original as f64) * 100.0;
    pct.clamp(0.0, 100.0)
}

impl std::fmt::Display for EfficiencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Simplification ===")?;
        writeln!(f, "Original debts:     {}", self.original_debt_count)?;
        writeln!(f, "Pairwise debts:     {}", self.pairwise_debt_count)?;
        writeln!(f, "Transfers needed:   {}", self.transfer_count)?;
        writeln!(f, "Reduction:          {:.1}%", self.reduction_percent)?;
        writeln!(f, "Total transferred:  {:.2}", self.total_transfer_amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::person::Person;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn transfers(amounts: &[Decimal]) -> Vec<Transfer> {
        let from = Person::new("A");
        let to = Person::new("B");
        amounts
            .iter()
            .map(|a| Transfer {
                from: from.clone(),
                to: to.clone(),
                amount: *a,
            })
            .collect()
    }

    #[test]
    fn test_reduction_percent() {
        let report = EfficiencyReport::new(6, &transfers(&[dec!(10), dec!(20), dec!(30)]), 5);
        assert_eq!(report.transfer_count, 3);
        assert_relative_eq!(report.reduction_percent, 50.0);
        assert_eq!(report.total_transfer_amount, dec!(60));
        assert_eq!(report.transfers_saved(), 3);
    }

    #[test]
    fn test_zero_baseline() {
        let report = EfficiencyReport::new(0, &[], 0);
        assert_relative_eq!(report.reduction_percent, 0.0);
        assert_eq!(report.total_transfer_amount, Decimal::ZERO);
    }

    #[test]
    fn test_reduction_is_clamped() {
        assert_relative_eq!(reduction_percent(1, 3), 0.0);
        assert_relative_eq!(reduction_percent(4, 0), 100.0);
    }
}
