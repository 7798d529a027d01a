use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A participant who pays for or shares in group expenses.
///
/// Identity is the `id`, never the display name: two people called
/// "Alex" are different participants. Equality, hashing and ordering
/// all go through the id.
///
/// # Examples
///
/// ```
/// use split_settle::core::person::Person;
///
/// let a = Person::new("Alex");
/// let b = Person::new("Alex");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    id: Uuid,
    name: String,
}

impl Person {
    /// Create a new participant with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// Create a participant with a known identity (useful for testing / determinism).
    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Person {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_name_is_distinct() {
        let a = Person::new("Sam");
        let b = Person::new("Sam");
        assert_ne!(a, b);

        let set: HashSet<Person> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_equality_ignores_name() {
        let id = Uuid::new_v4();
        let a = Person::with_id(id, "Sam");
        let b = Person::with_id(id, "Samantha");
        assert_eq!(a, b);
    }

    #[test]
    fn test_person_display() {
        let p = Person::new("Diana");
        assert_eq!(format!("{}", p), "Diana");
    }
}
