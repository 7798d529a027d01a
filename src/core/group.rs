use crate::core::error::ValidationError;
use crate::core::expense::Expense;
use crate::core::person::Person;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A named set of members and the expenses recorded between them.
///
/// Members are kept in insertion order; that order is the tie-breaker
/// the engines use, so it is part of the group's observable state.
/// Expenses are append-only: once added they are never edited or
/// removed, so every balance computation sees a frozen history.
///
/// # Examples
///
/// ```
/// use split_settle::core::group::Group;
/// use split_settle::core::person::Person;
///
/// let mut group = Group::new("Flatmates").unwrap();
/// let ana = Person::new("Ana");
/// assert!(group.add_member(ana.clone()).is_ok());
/// assert!(group.add_member(ana).is_err());
/// assert_eq!(group.members().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    name: String,
    members: Vec<Person>,
    expenses: Vec<Expense>,
}

impl Group {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGroupName);
        }
        Ok(Self {
            name: name.to_string(),
            members: Vec::new(),
            expenses: Vec::new(),
        })
    }

    /// Add a member. Rejected if the same identity is already present.
    pub fn add_member(&mut self, person: Person) -> Result<(), ValidationError> {
        if self.is_member(&person) {
            log::warn!("rejected duplicate member {} in group {}", person, self.name);
            return Err(ValidationError::DuplicateMember(person.name().to_string()));
        }
        self.members.push(person);
        Ok(())
    }

    /// Remove a member who is not referenced by any expense.
    ///
    /// Returns the removed person.
    pub fn remove_member(&mut self, person: &Person) -> Result<Person, ValidationError> {
        let idx = self
            .member_rank(person)
            .ok_or_else(|| ValidationError::NotAMember(person.name().to_string()))?;

        let expense_count = self.expenses.iter().filter(|e| e.involves(person)).count();
        if expense_count > 0 {
            log::warn!(
                "rejected removal of {} from group {}: {} expense(s) reference them",
                person,
                self.name,
                expense_count
            );
            return Err(ValidationError::MemberHasExpenses {
                name: person.name().to_string(),
                expense_count,
            });
        }

        Ok(self.members.remove(idx))
    }

    /// Record an expense. Payer and every beneficiary must be current members.
    pub fn add_expense(&mut self, expense: Expense) -> Result<(), ValidationError> {
        if !self.is_member(expense.payer()) {
            return Err(ValidationError::PayerNotMember(
                expense.payer().name().to_string(),
            ));
        }
        if let Some(outsider) = expense.beneficiaries().iter().find(|b| !self.is_member(b)) {
            return Err(ValidationError::BeneficiaryNotMember(
                outsider.name().to_string(),
            ));
        }
        log::debug!(
            "group {}: {} paid {} for {:?}",
            self.name,
            expense.payer(),
            expense.amount(),
            expense.description()
        );
        self.expenses.push(expense);
        Ok(())
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Person] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_member(&self, person: &Person) -> bool {
        self.members.contains(person)
    }

    /// Position of `person` in the member list.
    pub fn member_rank(&self, person: &Person) -> Option<usize> {
        self.members.iter().position(|m| m == person)
    }

    /// Sum of all recorded expense amounts.
    pub fn total_expenses(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// Expenses paid by `person`, in recording order.
    pub fn expenses_paid_by<'a>(&'a self, person: &'a Person) -> impl Iterator<Item = &'a Expense> {
        self.expenses.iter().filter(move |e| e.payer() == person)
    }

    /// Total amount advanced by `person`.
    pub fn total_paid_by(&self, person: &Person) -> Decimal {
        self.expenses_paid_by(person).map(|e| e.amount()).sum()
    }

    /// Total paid by each member, in member order.
    pub fn spending_by_person(&self) -> Vec<(Person, Decimal)> {
        self.members
            .iter()
            .map(|m| (m.clone(), self.total_paid_by(m)))
            .collect()
    }

    /// Earliest and latest expense timestamps, if any expense exists.
    pub fn expense_period(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.expenses.iter().map(|e| e.created_at()).min()?;
        let last = self.expenses.iter().map(|e| e.created_at()).max()?;
        Some((first, last))
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} members, {} expenses)",
            self.name,
            self.members.len(),
            self.expenses.len()
        )
    }
}
