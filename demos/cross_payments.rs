//! Members paying for each other: raw debts versus simplified transfers.
//!
//! Shows the unsimplified who-owes-whom graph, the same graph after
//! offsetting mutual debts, and the greedy settlement.

use split_settle::prelude::*;
use split_settle::report::console::{PositionSummary, TransferList};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔═════════════════════════════════════════╗");
    println!("║  split-settle: Cross Payments Example   ║");
    println!("╚═════════════════════════════════════════╝\n");

    let mut group = Group::new("Flat share")?;
    let names = ["Ana", "Ben", "Cleo", "Dev", "Eli"];
    let people: Vec<Person> = names.iter().map(|n| Person::new(*n)).collect();
    for person in &people {
        group.add_member(person.clone())?;
    }
    let (ana, ben, cleo, dev, eli) = (&people[0], &people[1], &people[2], &people[3], &people[4]);

    group.add_expense(Expense::new(ana.clone(), dec!(150), "Groceries", people.clone())?)?;
    group.add_expense(Expense::new(ben.clone(), dec!(90), "Internet", people.clone())?)?;
    group.add_expense(Expense::new(cleo.clone(), dec!(60), "Cleaning supplies", vec![ana.clone(), ben.clone(), cleo.clone()])?)?;
    group.add_expense(Expense::new(dev.clone(), dec!(45), "Pizza", vec![ana.clone(), dev.clone(), eli.clone()])?)?;
    group.add_expense(Expense::new(eli.clone(), dec!(20), "Coffee", vec![ben.clone()])?)?;

    // --- Scenario 1: the raw debt graph ---
    println!("━━━ Scenario 1: Every share as its own debt ━━━\n");
    let graph = DebtGraph::from_group(&group);
    for (debtor, creditor, amount) in graph.edges() {
        println!("  {:>5} owes {:<5} {:>8.2}", debtor.name(), creditor.name(), amount);
    }
    println!("\n  {} debts, {:.2} in total\n", graph.edge_count(), graph.gross_total());

    // --- Scenario 2: mutual debts offset ---
    println!("━━━ Scenario 2: Mutual debts offset ━━━\n");
    let netted = graph.bilateral_net();
    for (debtor, creditor, amount) in netted.edges() {
        println!("  {:>5} owes {:<5} {:>8.2}", debtor.name(), creditor.name(), amount);
    }
    println!("\n  {} debts, {:.2} in total\n", netted.edge_count(), netted.gross_total());

    // --- Scenario 3: greedy settlement ---
    println!("━━━ Scenario 3: Simplified settlement ━━━\n");
    let engine = SettlementEngine::new();
    let (debtors, creditors) = engine.balance_engine().debtors_and_creditors(&group);
    println!(
        "{}",
        PositionSummary {
            debtors: &debtors,
            creditors: &creditors,
        }
    );

    let settlement = engine.settle(&group)?;
    println!("{}", TransferList(&settlement.transfers));
    println!("{}", settlement.efficiency);

    Ok(())
}
