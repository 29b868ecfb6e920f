use crate::{eval::condition_holds, leaf::Emitter};
use model::{Condition, Dnf};

/// Collects leaf conditions into a DNF fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnfEmitter;

impl Emitter for DnfEmitter {
    type Output = Dnf;

    fn condition(&self, condition: Condition) -> Dnf {
        Dnf::single(condition)
    }

    fn all_of(&self, parts: Vec<Dnf>) -> Dnf {
        parts
            .into_iter()
            .reduce(|acc, part| acc.cross(&part))
            .unwrap_or_default()
    }

    fn any_of(&self, parts: Vec<Dnf>) -> Dnf {
        parts.into_iter().fold(Dnf::empty(), Dnf::concat)
    }
}

/// Evaluates leaf conditions directly against one JSON record.
#[derive(Debug, Clone, Copy)]
pub struct RecordEmitter<'a> {
    record: &'a serde_json::Value,
}

impl<'a> RecordEmitter<'a> {
    pub fn new(record: &'a serde_json::Value) -> Self {
        Self { record }
    }
}

impl Emitter for RecordEmitter<'_> {
    type Output = bool;

    fn condition(&self, condition: Condition) -> bool {
        condition_holds(&condition, self.record)
    }

    fn all_of(&self, parts: Vec<bool>) -> bool {
        parts.into_iter().all(|held| held)
    }

    fn any_of(&self, parts: Vec<bool>) -> bool {
        parts.into_iter().any(|held| held)
    }
}
