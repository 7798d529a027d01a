//! # split-settle
//!
//! Shared expense tracking and debt simplification.
//!
//! Given a group of people and the expenses they paid for each other,
//! this crate computes everyone's net balance and a short list of direct
//! transfers that settles all of them.
//!
//! ## Architecture
//!
//! - **core**: Entities: people, expenses, groups, error types, engine config
//! - **engine**: Balance computation, greedy settlement, efficiency report
//! - **graph**: The unsimplified pairwise who-owes-whom view
//! - **report**: Text, JSON and CSV presentation of engine results
//! - **input**: JSON group files and the name → person roster
//! - **simulation**: Random group generation

pub mod core;
pub mod engine;
pub mod graph;
pub mod input;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::config::EngineConfig;
    pub use crate::core::error::{InvariantViolation, ValidationError};
    pub use crate::core::expense::Expense;
    pub use crate::core::group::Group;
    pub use crate::core::person::Person;
    pub use crate::engine::balance::{BalanceEngine, Balances};
    pub use crate::engine::efficiency::EfficiencyReport;
    pub use crate::engine::settlement::{Settlement, SettlementEngine, Transfer};
    pub use crate::graph::debt_graph::DebtGraph;
}
