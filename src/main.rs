//! split-settle CLI
//!
//! Compute balances and settlement transfers for a group from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show each member's balance
//! split-settle balances --input trip.json
//!
//! # Show the transfers that settle the group
//! split-settle settle --input trip.json --format json
//!
//! # Export transfers as CSV
//! split-settle export --input trip.json --kind transfers --output transfers.csv
//!
//! # Generate a random group for testing
//! split-settle generate --members 8 --expenses 40
//! ```

use rust_decimal::Decimal;
use split_settle::core::config::EngineConfig;
use split_settle::core::group::Group;
use split_settle::engine::settlement::SettlementEngine;
use split_settle::input::{load_group_file, GroupFile};
use split_settle::report::console::{BalanceTable, ExpenseList, PositionSummary, TransferList};
use split_settle::report::export::{write_balances_csv, write_transfers_csv};
use split_settle::report::summary::GroupSummary;
use split_settle::report::ReportError;
use split_settle::simulation::random_group::{generate_random_group, GroupConfig};
use std::fs;
use std::io;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-settle: shared expense balances and debt simplification

USAGE:
    split-settle <COMMAND> [OPTIONS]

COMMANDS:
    balances    Show each member's net balance
    settle      Show the transfers that settle every balance
    summary     Show members, expenses, debtors and creditors
    export      Write balances, transfers or a full summary
    generate    Generate a random group file (for testing)
    help        Show this message

OPTIONS (balances, settle, summary, export):
    --input <FILE>        Path to JSON group file
    --tolerance <AMOUNT>  Balances within this of zero count as settled (default: 0.01)

OPTIONS (balances, settle):
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (export):
    --kind <KIND>         balances (CSV), transfers (CSV) or summary (JSON)
    --output <FILE>       Write to file instead of stdout

OPTIONS (generate):
    --members <N>         Number of members (default: 6)
    --expenses <N>        Number of expenses (default: 20)
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    split-settle balances --input trip.json
    split-settle settle --input trip.json --format json
    split-settle export --input trip.json --kind summary --output summary.json
    split-settle generate --members 5 --expenses 30 --output random.json"#
    );
}

/// Options shared by the commands that read a group file.
struct GroupArgs {
    input: Option<String>,
    format: String,
    tolerance: Option<Decimal>,
    kind: Option<String>,
    output: Option<String>,
}

fn take_value(args: &[String], i: usize, flag: &str, hint: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, hint);
        process::exit(1);
    })
}

fn parse_group_args(args: &[String]) -> GroupArgs {
    let mut parsed = GroupArgs {
        input: None,
        format: "text".to_string(),
        tolerance: None,
        kind: None,
        output: None,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                parsed.input = Some(take_value(args, i, "--input", "a file path"));
            }
            "--format" => {
                i += 1;
                parsed.format = take_value(args, i, "--format", "'text' or 'json'");
            }
            "--tolerance" => {
                i += 1;
                let raw = take_value(args, i, "--tolerance", "an amount");
                parsed.tolerance = Some(raw.parse().unwrap_or_else(|e| {
                    eprintln!("Invalid tolerance '{}': {}", raw, e);
                    process::exit(1);
                }));
            }
            "--kind" => {
                i += 1;
                parsed.kind = Some(take_value(
                    args,
                    i,
                    "--kind",
                    "'balances', 'transfers' or 'summary'",
                ));
            }
            "--output" => {
                i += 1;
                parsed.output = Some(take_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn load_group(args: &GroupArgs) -> Group {
    let path = args.input.as_deref().unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let file = load_group_file(path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "name": "Mountain trip",
  "members": ["Alice", "Bob"],
  "expenses": [
    {{ "payer": "Alice", "amount": "400", "description": "Hotel", "beneficiaries": ["Alice", "Bob"] }}
  ]
}}"#
        );
        process::exit(1);
    });

    file.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
    .0
}

fn engine_for(args: &GroupArgs) -> SettlementEngine {
    let config = args
        .tolerance
        .map(EngineConfig::with_tolerance)
        .unwrap_or_default();
    SettlementEngine::with_config(config)
}

/// Report failures inside the engine separately from bad input.
fn fail(error: ReportError) -> ! {
    match error {
        ReportError::Invariant(violation) => {
            eprintln!("internal error: {}", violation);
            eprintln!("This is a bug in split-settle, not a problem with the input.");
            process::exit(2);
        }
        other => {
            eprintln!("Error: {}", other);
            process::exit(1);
        }
    }
}

fn cmd_balances(args: &[String]) {
    let args = parse_group_args(args);
    let group = load_group(&args);
    let engine = engine_for(&args);
    let balance_engine = engine.balance_engine();
    let balances = balance_engine.compute_balances(&group);

    if args.format == "json" {
        let summary = GroupSummary::build(&group, &engine).unwrap_or_else(|e| fail(e));
        let json = serde_json::to_string_pretty(&summary.balances)
            .unwrap_or_else(|e| fail(e.into()));
        println!("{}", json);
        return;
    }

    print!(
        "{}",
        BalanceTable {
            group_name: group.name(),
            balances: &balances,
            tolerance: balance_engine.tolerance(),
        }
    );
    match balance_engine.check_conservation(&balances) {
        Ok(()) => println!("\nBalances sum to zero."),
        Err(violation) => fail(violation.into()),
    }
}

fn cmd_settle(args: &[String]) {
    let args = parse_group_args(args);
    let group = load_group(&args);
    let engine = engine_for(&args);

    if args.format == "json" {
        let summary = GroupSummary::build(&group, &engine).unwrap_or_else(|e| fail(e));
        #[derive(serde::Serialize)]
        struct SettleOutput<'a> {
            transfers: &'a [split_settle::report::summary::TransferLine],
            efficiency: &'a split_settle::report::summary::EfficiencyLine,
        }
        let output = SettleOutput {
            transfers: &summary.transfers,
            efficiency: &summary.efficiency,
        };
        let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e.into()));
        println!("{}", json);
        return;
    }

    let settlement = engine.settle(&group).unwrap_or_else(|e| fail(e.into()));
    print!("{}", TransferList(&settlement.transfers));
    if !settlement.transfers.is_empty() {
        println!();
        print!("{}", settlement.efficiency);
    }
}

fn cmd_summary(args: &[String]) {
    let args = parse_group_args(args);
    let group = load_group(&args);
    let engine = engine_for(&args);
    let (debtors, creditors) = engine.balance_engine().debtors_and_creditors(&group);

    print!("{}", ExpenseList(&group));
    println!();
    print!(
        "{}",
        PositionSummary {
            debtors: &debtors,
            creditors: &creditors,
        }
    );
}

fn cmd_export(args: &[String]) {
    let args = parse_group_args(args);
    let group = load_group(&args);
    let engine = engine_for(&args);
    let kind = args.kind.clone().unwrap_or_else(|| "summary".to_string());

    let mut buffer: Vec<u8> = Vec::new();
    let result = match kind.as_str() {
        "balances" => {
            let balances = engine.balance_engine().compute_balances(&group);
            write_balances_csv(&mut buffer, &balances)
        }
        "transfers" => engine
            .simplify_debts(&group)
            .map_err(ReportError::from)
            .and_then(|transfers| write_transfers_csv(&mut buffer, &transfers)),
        "summary" => GroupSummary::build(&group, &engine)
            .and_then(|summary| summary.to_json())
            .map(|json| buffer.extend_from_slice(json.as_bytes())),
        other => {
            eprintln!("Unknown export kind: {}", other);
            process::exit(1);
        }
    };
    if let Err(e) = result {
        fail(e);
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &buffer).unwrap_or_else(|e| {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            });
            eprintln!("Exported {} for '{}' → {}", kind, group.name(), path);
        }
        None => {
            use std::io::Write;
            io::stdout()
                .write_all(&buffer)
                .unwrap_or_else(|e| fail(e.into()));
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                config.member_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--members requires a number");
                        process::exit(1);
                    });
                config.max_beneficiaries = config.member_count;
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(take_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let group = generate_random_group(&config).unwrap_or_else(|e| {
        eprintln!("Error generating group: {}", e);
        process::exit(1);
    });
    let json = GroupFile::from_group(&group).to_json().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} members → {}",
            group.expenses().len(),
            group.members().len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "summary" => cmd_summary(rest),
        "export" => cmd_export(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
