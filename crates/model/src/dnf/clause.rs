use super::condition::Condition;
use serde::{Deserialize, Serialize};

/// Conditions that must all hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Clause {
    pub conditions: Vec<Condition>,
}

impl Clause {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn single(condition: Condition) -> Self {
        Self {
            conditions: vec![condition],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    /// Conditions of `self` followed by those of `other`.
    pub fn join(&self, other: &Clause) -> Clause {
        let mut conditions = Vec::with_capacity(self.len() + other.len());
        conditions.extend(self.conditions.iter().cloned());
        conditions.extend(other.conditions.iter().cloned());
        Clause { conditions }
    }
}

/// Disjunctive normal form: clauses of which at least one must hold.
/// An empty `Dnf` places no constraint at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dnf {
    pub clauses: Vec<Clause>,
}

impl Dnf {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(condition: Condition) -> Self {
        Self {
            clauses: vec![Clause::single(condition)],
        }
    }

    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// OR: the clauses of both operands.
    pub fn concat(mut self, other: Dnf) -> Dnf {
        self.clauses.extend(other.clauses);
        self
    }

    /// AND: every clause of `self` joined with every clause of `other`,
    /// in row-major order.
    pub fn cross(&self, other: &Dnf) -> Dnf {
        let mut clauses = Vec::with_capacity(self.product_len(other));
        for left in &self.clauses {
            for right in &other.clauses {
                clauses.push(left.join(right));
            }
        }
        Dnf { clauses }
    }

    /// Number of clauses `cross` would produce.
    pub fn product_len(&self, other: &Dnf) -> usize {
        self.len().saturating_mul(other.len())
    }

    /// Drop clauses without conditions, returning how many were removed.
    pub fn strip_empty_clauses(&mut self) -> usize {
        let before = self.clauses.len();
        self.clauses.retain(|clause| !clause.is_empty());
        before - self.clauses.len()
    }
}

impl IntoIterator for Dnf {
    type Item = Clause;
    type IntoIter = std::vec::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}
