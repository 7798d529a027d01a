use approx::assert_relative_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use split_settle::core::error::ValidationError;
use split_settle::input::GroupFile;
use split_settle::prelude::*;
use split_settle::report::export::write_transfers_csv;
use split_settle::report::summary::GroupSummary;

const TOLERANCE: Decimal = dec!(0.01);

fn group_with(names: &[&str]) -> (Group, Vec<Person>) {
    let mut group = Group::new("test group").unwrap();
    let people: Vec<Person> = names.iter().map(|n| Person::new(*n)).collect();
    for p in &people {
        group.add_member(p.clone()).unwrap();
    }
    (group, people)
}

fn settle_and_apply(group: &Group) -> (Vec<Transfer>, Balances) {
    let engine = SettlementEngine::new();
    let transfers = engine.simplify_debts(group).unwrap();
    let mut balances = engine.balance_engine().compute_balances(group);
    for t in &transfers {
        balances.apply(t);
    }
    (transfers, balances)
}

/// One payer covers 500 for five people including themself.
#[test]
fn scenario_a_single_payer_five_way_split() {
    let (mut group, p) = group_with(&["P", "Q", "R", "S", "T"]);
    group
        .add_expense(Expense::new(p[0].clone(), dec!(500), "Cabin", p.clone()).unwrap())
        .unwrap();

    let balances = BalanceEngine::new().compute_balances(&group);
    assert_eq!(balances.get(&p[0]), dec!(-400));
    for member in &p[1..] {
        assert_eq!(balances.get(member), dec!(100));
    }

    let transfers = SettlementEngine::new().simplify_debts(&group).unwrap();
    assert_eq!(transfers.len(), 4);
    for (transfer, member) in transfers.iter().zip(&p[1..]) {
        assert_eq!(&transfer.from, member);
        assert_eq!(transfer.to, p[0]);
        assert_eq!(transfer.amount, dec!(100));
    }
}

/// Three members each pay 30 for everyone: all debts cancel.
#[test]
fn scenario_b_cross_payments_cancel() {
    let (mut group, p) = group_with(&["Alice", "Bob", "Charlie"]);
    for payer in &p {
        group
            .add_expense(Expense::new(payer.clone(), dec!(30), "Round", p.clone()).unwrap())
            .unwrap();
    }

    let balances = BalanceEngine::new().compute_balances(&group);
    for member in &p {
        assert_eq!(balances.get(member), Decimal::ZERO);
    }
    assert!(SettlementEngine::new().simplify_debts(&group).unwrap().is_empty());
}

/// A payer who is the only beneficiary creates no debt.
#[test]
fn scenario_c_personal_expense() {
    let (mut group, p) = group_with(&["Alice", "Bob"]);
    group
        .add_expense(Expense::new(p[0].clone(), dec!(25), "Own lunch", vec![p[0].clone()]).unwrap())
        .unwrap();

    let balances = BalanceEngine::new().compute_balances(&group);
    assert_eq!(balances.get(&p[0]), Decimal::ZERO);
    assert_eq!(balances.get(&p[1]), Decimal::ZERO);
    assert!(SettlementEngine::new().simplify_debts(&group).unwrap().is_empty());
}

/// A owes 50, B owes 30, C is owed 80: largest debtor pays first.
#[test]
fn scenario_d_greedy_order() {
    let (mut group, p) = group_with(&["A", "B", "C"]);
    let (a, b, c) = (&p[0], &p[1], &p[2]);
    group
        .add_expense(Expense::new(c.clone(), dec!(50), "For A", vec![a.clone()]).unwrap())
        .unwrap();
    group
        .add_expense(Expense::new(c.clone(), dec!(30), "For B", vec![b.clone()]).unwrap())
        .unwrap();

    let engine = SettlementEngine::new();
    let transfers = engine.simplify_debts(&group).unwrap();
    assert_eq!(
        transfers,
        vec![
            Transfer { from: a.clone(), to: c.clone(), amount: dec!(50) },
            Transfer { from: b.clone(), to: c.clone(), amount: dec!(30) },
        ]
    );

    let report = engine.efficiency_metrics(&group).unwrap();
    assert_eq!(report.transfer_count, 2);
    assert_eq!(report.original_debt_count, 2);
    assert_eq!(report.total_transfer_amount, dec!(80));
    assert_relative_eq!(report.reduction_percent, 0.0);
}

/// The four-person trip: seven expenses, some not shared by everyone.
#[test]
fn mountain_trip() {
    let (mut group, p) = group_with(&["Alice", "Bob", "Charlie", "Diana"]);
    let (alice, bob, charlie, diana) = (&p[0], &p[1], &p[2], &p[3]);
    let expenses = [
        (alice, dec!(400), "Hotel for two nights", p.clone()),
        (bob, dec!(120), "Fuel", p.clone()),
        (charlie, dec!(80), "Friday dinner", p.clone()),
        (diana, dec!(60), "Saturday lunch", p.clone()),
        (alice, dec!(40), "Road snacks", p.clone()),
        (bob, dec!(32), "Museum tickets", vec![bob.clone(), charlie.clone(), diana.clone()]),
        (charlie, dec!(24), "Ice cream", vec![charlie.clone(), diana.clone()]),
    ];
    for (payer, amount, description, beneficiaries) in expenses {
        group
            .add_expense(Expense::new(payer.clone(), amount, description, beneficiaries).unwrap())
            .unwrap();
    }

    let engine = SettlementEngine::new();
    let balances = engine.balance_engine().compute_balances(&group);
    // Shared by all four: 700 / 4 = 175 each.
    assert_eq!(balances.get(alice), dec!(-265));
    let bob_expected = dec!(175) + dec!(32) / dec!(3) - dec!(152);
    assert!((balances.get(bob) - bob_expected).abs() < dec!(0.000001));
    assert!(engine.balance_engine().is_balanced(&group));

    let (debtors, creditors) = engine.balance_engine().debtors_and_creditors(&group);
    let (transfers, after) = settle_and_apply(&group);
    assert!(after.is_settled(TOLERANCE));
    assert!(transfers.len() <= debtors.len() + creditors.len() - 1);
    assert!(transfers.iter().all(|t| creditors.iter().any(|(c, _)| c == &t.to)));

    let total: Decimal = transfers.iter().map(|t| t.amount).sum();
    assert!((total - balances.total_owed()).abs() <= TOLERANCE);
}

#[test]
fn rejected_mutations_leave_group_unchanged() {
    let (mut group, p) = group_with(&["A", "B"]);
    let outsider = Person::new("Z");

    assert!(group.add_member(p[0].clone()).is_err());
    let ex = Expense::new(p[0].clone(), dec!(10), "x", vec![outsider.clone()]).unwrap();
    assert_eq!(
        group.add_expense(ex).unwrap_err(),
        ValidationError::BeneficiaryNotMember("Z".into())
    );

    group
        .add_expense(Expense::new(p[0].clone(), dec!(10), "x", vec![p[1].clone()]).unwrap())
        .unwrap();
    assert!(group.remove_member(&p[1]).is_err());

    assert_eq!(group.members().len(), 2);
    assert_eq!(group.expenses().len(), 1);
    assert!(BalanceEngine::new().is_balanced(&group));
}

#[test]
fn namesakes_are_settled_separately() {
    let (mut group, p) = group_with(&["Sam", "Sam", "Kim"]);
    group
        .add_expense(Expense::new(p[2].clone(), dec!(60), "Tickets", vec![p[0].clone(), p[1].clone()]).unwrap())
        .unwrap();

    let transfers = SettlementEngine::new().simplify_debts(&group).unwrap();
    assert_eq!(transfers.len(), 2);
    assert_eq!(transfers[0].from, p[0]);
    assert_eq!(transfers[1].from, p[1]);
    assert_ne!(transfers[0].from, transfers[1].from);
}

#[test]
fn empty_group_produces_empty_results() {
    let group = Group::new("nobody").unwrap();
    let engine = SettlementEngine::new();

    assert!(engine.balance_engine().is_balanced(&group));
    assert!(engine.simplify_debts(&group).unwrap().is_empty());

    let report = engine.efficiency_metrics(&group).unwrap();
    assert_eq!(report.original_debt_count, 0);
    assert_eq!(report.transfer_count, 0);
    assert_relative_eq!(report.reduction_percent, 0.0);
    assert_eq!(report.total_transfer_amount, Decimal::ZERO);
}

#[test]
fn json_file_to_summary_and_csv() {
    let json = r#"{
        "name": "Weekend",
        "members": ["Alice", "Bob", "Charlie"],
        "expenses": [
            { "payer": "Alice", "amount": "90", "description": "Groceries",
              "beneficiaries": ["Alice", "Bob", "Charlie"] },
            { "payer": "Bob", "amount": "30", "description": "Parking",
              "beneficiaries": ["Bob", "Charlie"] }
        ]
    }"#;
    let (group, roster) = GroupFile::from_json(json).unwrap().build().unwrap();
    let engine = SettlementEngine::new();

    let summary = GroupSummary::build(&group, &engine).unwrap();
    assert_eq!(summary.total_expenses, 120.0);
    assert_eq!(summary.balances.len(), 3);
    // Alice -60, Bob 30 - 30 + 15 = 15, Charlie 30 + 15 = 45
    assert_eq!(summary.balances[0].balance, -60.0);
    assert_eq!(summary.balances[1].balance, 15.0);
    assert_eq!(summary.balances[2].balance, 45.0);

    let parsed: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
    assert_eq!(parsed["group"], "Weekend");
    assert_eq!(parsed["transfers"][0]["from"], "Charlie");
    assert_eq!(parsed["transfers"][0]["amount"], 45.0);

    let transfers = engine.simplify_debts(&group).unwrap();
    assert_eq!(transfers[0].from, *roster.get("Charlie").unwrap());
    let mut csv = Vec::new();
    write_transfers_csv(&mut csv, &transfers).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "from,to,amount\nCharlie,Alice,45.00\nBob,Alice,15.00\n"
    );
}

#[test]
fn pairwise_view_matches_balances() {
    let (mut group, p) = group_with(&["A", "B", "C", "D"]);
    group
        .add_expense(Expense::new(p[0].clone(), dec!(120), "x", p.clone()).unwrap())
        .unwrap();
    group
        .add_expense(Expense::new(p[1].clone(), dec!(45), "y", vec![p[0].clone(), p[2].clone()]).unwrap())
        .unwrap();
    group
        .add_expense(Expense::new(p[3].clone(), dec!(10), "z", vec![p[3].clone()]).unwrap())
        .unwrap();

    let graph = DebtGraph::from_group(&group);
    let balances = BalanceEngine::new().compute_balances(&group);
    for member in &p {
        assert_eq!(graph.net_position(member), balances.get(member));
    }

    let report = SettlementEngine::new().efficiency_metrics(&group).unwrap();
    // A and B owe each other; after offsetting, B->A, C->A, D->A, C->B remain.
    assert_eq!(report.pairwise_debt_count, 4);
}

/// One member covers 0.09 for ten others: every share is under a cent.
#[test]
fn sub_cent_shares_still_repay_the_payer() {
    let names: Vec<String> = (0..11).map(|i| format!("P{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (mut group, p) = group_with(&name_refs);
    let payer = p[10].clone();
    group
        .add_expense(Expense::new(payer.clone(), dec!(0.09), "Gum", p[..10].to_vec()).unwrap())
        .unwrap();

    let (debtors, creditors) = BalanceEngine::new().debtors_and_creditors(&group);
    assert!(debtors.is_empty());
    assert_eq!(creditors, vec![(payer.clone(), dec!(0.09))]);

    let (transfers, after) = settle_and_apply(&group);
    assert_eq!(transfers.len(), 9);
    assert!(transfers.iter().all(|t| t.to == payer && t.amount == dec!(0.009)));
    assert_eq!(transfers[0].from, p[0]);
    assert!(after.is_settled(TOLERANCE));
    assert_eq!(after.get(&payer), dec!(-0.009));
}
