//! A four-person weekend trip, from expenses to settlement.
//!
//! Records seven expenses, prints every balance, then the short list
//! of transfers that settles the group.

use split_settle::prelude::*;
use split_settle::report::console::{BalanceTable, ExpenseList, TransferList};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔═══════════════════════════════════════╗");
    println!("║  split-settle: Mountain Trip Example  ║");
    println!("╚═══════════════════════════════════════╝\n");

    let mut group = Group::new("Mountain trip")?;
    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let charlie = Person::new("Charlie");
    let diana = Person::new("Diana");
    let everyone = vec![alice.clone(), bob.clone(), charlie.clone(), diana.clone()];
    for person in &everyone {
        group.add_member(person.clone())?;
    }

    group.add_expense(Expense::new(alice.clone(), dec!(400), "Hotel for two nights", everyone.clone())?)?;
    group.add_expense(Expense::new(bob.clone(), dec!(120), "Fuel", everyone.clone())?)?;
    group.add_expense(Expense::new(charlie.clone(), dec!(80), "Friday dinner", everyone.clone())?)?;
    group.add_expense(Expense::new(diana.clone(), dec!(60), "Saturday lunch", everyone.clone())?)?;
    group.add_expense(Expense::new(alice.clone(), dec!(40), "Road snacks", everyone.clone())?)?;
    group.add_expense(Expense::new(
        bob.clone(),
        dec!(32),
        "Museum tickets",
        vec![bob.clone(), charlie.clone(), diana.clone()],
    )?)?;
    group.add_expense(Expense::new(
        charlie.clone(),
        dec!(24),
        "Ice cream",
        vec![charlie.clone(), diana.clone()],
    )?)?;

    println!("━━━ Expenses ━━━\n");
    println!("{}", ExpenseList(&group));

    let engine = SettlementEngine::new();
    let settlement = engine.settle(&group)?;

    println!("━━━ Balances ━━━\n");
    println!(
        "{}",
        BalanceTable {
            group_name: group.name(),
            balances: &settlement.balances,
            tolerance: engine.balance_engine().tolerance(),
        }
    );

    println!("━━━ Settlement ━━━\n");
    println!("{}", TransferList(&settlement.transfers));
    println!("{}", settlement.efficiency);

    Ok(())
}
