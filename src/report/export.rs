//! CSV export of balances and transfers.

use crate::engine::balance::Balances;
use crate::engine::settlement::Transfer;
use crate::report::ReportError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow<'a> {
    person: &'a str,
    balance: String,
}

#[derive(Serialize)]
struct TransferRow<'a> {
    from: &'a str,
    to: &'a str,
    amount: String,
}

fn two_places(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Write `person,balance` rows in member order.
pub fn write_balances_csv<W: Write>(writer: W, balances: &Balances) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (person, balance) in balances.iter() {
        csv.serialize(BalanceRow {
            person: person.name(),
            balance: two_places(*balance),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `from,to,amount` rows in settlement order.
pub fn write_transfers_csv<W: Write>(writer: W, transfers: &[Transfer]) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for transfer in transfers {
        csv.serialize(TransferRow {
            from: transfer.from.name(),
            to: transfer.to.name(),
            amount: two_places(transfer.amount),
        })?;
    }
    csv.flush()?;
    Ok(())
}
