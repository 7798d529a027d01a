use crate::core::error::ValidationError;
use crate::core::person::Person;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const UNTITLED: &str = "Untitled expense";

/// Largest amount a single expense may carry.
///
/// Keeps every sum of balances well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// A single payment made by one member on behalf of some members.
///
/// The payer advanced `amount`; every beneficiary consumed an equal
/// share of it. The payer may or may not be a beneficiary.
///
/// Expenses are immutable once created. A [`Group`](crate::core::group::Group)
/// takes ownership when the expense is added.
///
/// # Examples
///
/// ```
/// use split_settle::core::expense::Expense;
/// use split_settle::core::person::Person;
/// use rust_decimal_macros::dec;
///
/// let alice = Person::new("Alice");
/// let bob = Person::new("Bob");
/// let dinner = Expense::new(
///     alice.clone(),
///     dec!(90),
///     "Dinner",
///     vec![alice, bob],
/// ).unwrap();
///
/// assert_eq!(dinner.share(), dec!(45));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    /// The member who paid.
    payer: Person,
    /// Total paid. Always positive.
    amount: Decimal,
    description: String,
    /// Members sharing the cost. Non-empty, no repeated identities.
    beneficiaries: Vec<Person>,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense split equally among `beneficiaries`.
    ///
    /// Repeated beneficiaries are collapsed to their first occurrence.
    /// A blank description is replaced by a placeholder.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NonPositiveAmount`] if `amount <= 0`,
    /// [`ValidationError::AmountTooLarge`] if `amount` exceeds [`MAX_AMOUNT`],
    /// [`ValidationError::NoBeneficiaries`] if `beneficiaries` is empty.
    pub fn new(
        payer: Person,
        amount: Decimal,
        description: impl Into<String>,
        beneficiaries: Vec<Person>,
    ) -> Result<Self, ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge {
                amount,
                max: MAX_AMOUNT,
            });
        }
        if beneficiaries.is_empty() {
            return Err(ValidationError::NoBeneficiaries);
        }

        let mut unique: Vec<Person> = Vec::with_capacity(beneficiaries.len());
        for person in beneficiaries {
            if !unique.contains(&person) {
                unique.push(person);
            }
        }

        let description = description.into();
        let description = if description.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            description.trim().to_string()
        };

        Ok(Self {
            payer,
            amount,
            description,
            beneficiaries: unique,
            created_at: Utc::now(),
        })
    }

    /// Set the creation timestamp (e.g. when importing recorded expenses).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // --- Accessors ---

    pub fn payer(&self) -> &Person {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn beneficiaries(&self) -> &[Person] {
        &self.beneficiaries
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Amount each beneficiary consumed.
    pub fn share(&self) -> Decimal {
        self.amount / Decimal::from(self.beneficiaries.len())
    }

    /// Whether `person` paid for or shares in this expense.
    pub fn involves(&self, person: &Person) -> bool {
        &self.payer == person || self.beneficiaries.contains(person)
    }
}
