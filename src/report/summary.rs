use crate::core::group::Group;
use crate::engine::efficiency::EfficiencyReport;
use crate::engine::settlement::{Settlement, SettlementEngine};
use crate::report::ReportError;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round for display. Engine values are never rounded.
pub fn display_amount(amount: Decimal) -> f64 {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Total spending spread over the calendar days from the first expense
/// to the last, both included.
fn average_daily(total: Decimal, period: Option<(DateTime<Utc>, DateTime<Utc>)>) -> Option<Decimal> {
    let (first, last) = period?;
    let days = (last.date_naive() - first.date_naive()).num_days() + 1;
    Some(total / Decimal::from(days.max(1)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub person: String,
    pub paid: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLine {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyLine {
    pub original_debt_count: usize,
    pub pairwise_debt_count: usize,
    pub transfer_count: usize,
    pub reduction_percent: f64,
    pub total_transfer_amount: f64,
}

impl From<&EfficiencyReport> for EfficiencyLine {
    fn from(report: &EfficiencyReport) -> Self {
        Self {
            original_debt_count: report.original_debt_count,
            pairwise_debt_count: report.pairwise_debt_count,
            transfer_count: report.transfer_count,
            reduction_percent: (report.reduction_percent * 10.0).round() / 10.0,
            total_transfer_amount: display_amount(report.total_transfer_amount),
        }
    }
}

/// A structured, display-ready snapshot of a group and its settlement.
///
/// All amounts are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub generated_at: DateTime<Utc>,
    pub members: Vec<String>,
    pub expense_count: usize,
    pub total_expenses: f64,
    pub first_expense_at: Option<DateTime<Utc>>,
    pub last_expense_at: Option<DateTime<Utc>>,
    pub average_daily_spending: Option<f64>,
    pub balanced: bool,
    pub balances: Vec<BalanceLine>,
    pub transfers: Vec<TransferLine>,
    pub efficiency: EfficiencyLine,
}

impl GroupSummary {
    pub fn build(group: &Group, engine: &SettlementEngine) -> Result<Self, ReportError> {
        let Settlement {
            balances,
            transfers,
            efficiency,
        } = engine.settle(group)?;
        let period = group.expense_period();

        Ok(Self {
            group: group.name().to_string(),
            generated_at: Utc::now(),
            members: group.members().iter().map(|m| m.name().to_string()).collect(),
            expense_count: group.expenses().len(),
            total_expenses: display_amount(group.total_expenses()),
            first_expense_at: period.map(|(first, _)| first),
            last_expense_at: period.map(|(_, last)| last),
            average_daily_spending: average_daily(group.total_expenses(), period).map(display_amount),
            balanced: engine.balance_engine().check_conservation(&balances).is_ok(),
            balances: balances
                .iter()
                .map(|(person, balance)| BalanceLine {
                    person: person.name().to_string(),
                    paid: display_amount(group.total_paid_by(person)),
                    balance: display_amount(*balance),
                })
                .collect(),
            transfers: transfers
                .iter()
                .map(|t| TransferLine {
                    from: t.from.name().to_string(),
                    to: t.to.name().to_string(),
                    amount: display_amount(t.amount),
                })
                .collect(),
            efficiency: EfficiencyLine::from(&efficiency),
        })
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
