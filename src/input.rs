//! JSON group files and the name → person roster used to load them.
//!
//! Files refer to people by display name. The [`Roster`] resolves each name
//! to one [`Person`] once, so the core only ever compares identities.
//!
//! ```json
//! {
//!   "name": "Mountain trip",
//!   "members": ["Alice", "Bob"],
//!   "expenses": [
//!     { "payer": "Alice", "amount": "400", "description": "Hotel",
//!       "beneficiaries": ["Alice", "Bob"] }
//!   ]
//! }
//! ```

use crate::core::error::ValidationError;
use crate::core::expense::Expense;
use crate::core::group::Group;
use crate::core::person::Person;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a group file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid group file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("'{0}' is not listed in members")]
    UnknownMember(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub payer: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub beneficiaries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// On-disk shape of a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupFile {
    pub name: String,
    pub members: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
}

/// Mapping from display name to the single person registered under it.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_name: HashMap<String, Person>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The person registered as `name`, registering a new one if needed.
    pub fn register(&mut self, name: &str) -> Person {
        self.by_name
            .entry(name.to_string())
            .or_insert_with(|| Person::new(name))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<&Person> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn resolve(&self, name: &str) -> Result<Person, InputError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| InputError::UnknownMember(name.to_string()))
    }
}

impl GroupFile {
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a validated group. Every payer and beneficiary must be a listed member.
    pub fn build(&self) -> Result<(Group, Roster), InputError> {
        let mut group = Group::new(self.name.as_str())?;
        let mut roster = Roster::new();

        for name in &self.members {
            let person = roster.register(name.trim());
            group.add_member(person)?;
        }

        for input in &self.expenses {
            let payer = roster.resolve(input.payer.trim())?;
            let beneficiaries = input
                .beneficiaries
                .iter()
                .map(|name| roster.resolve(name.trim()))
                .collect::<Result<Vec<_>, _>>()?;

            let mut expense =
                Expense::new(payer, input.amount, input.description.as_str(), beneficiaries)?;
            if let Some(created_at) = input.created_at {
                expense = expense.with_created_at(created_at);
            }
            group.add_expense(expense)?;
        }

        log::debug!(
            "loaded group {} with {} members and {} expenses",
            group.name(),
            group.members().len(),
            group.expenses().len()
        );
        Ok((group, roster))
    }

    /// Describe an existing group by member names.
    pub fn from_group(group: &Group) -> Self {
        Self {
            name: group.name().to_string(),
            members: group.members().iter().map(|m| m.name().to_string()).collect(),
            expenses: group
                .expenses()
                .iter()
                .map(|e| ExpenseInput {
                    payer: e.payer().name().to_string(),
                    amount: e.amount(),
                    description: e.description().to_string(),
                    beneficiaries: e.beneficiaries().iter().map(|b| b.name().to_string()).collect(),
                    created_at: Some(e.created_at()),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read and parse a group file from disk.
pub fn load_group_file(path: impl AsRef<Path>) -> Result<GroupFile, InputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    GroupFile::from_json(&content)
}
