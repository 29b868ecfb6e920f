use super::path::ColumnPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive comparison operators the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    Ilike,
    In,
    Overlap,
}

impl ConditionOp {
    /// Operator token in the backend's predicate grammar.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOp::Eq => "eq",
            ConditionOp::Gt => "gt",
            ConditionOp::Lt => "lt",
            ConditionOp::Gte => "gte",
            ConditionOp::Lte => "lte",
            ConditionOp::Ilike => "ilike",
            ConditionOp::In => "in",
            ConditionOp::Overlap => "ov",
        }
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Right-hand side of a condition. The variant tells both the serializer
/// and in-memory evaluation how to treat the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Operand {
    Null,
    Text(String),
    Number(f64),
    /// Kept as the raw string the user entered; the backend casts it.
    Date(String),
    List(Vec<String>),
}

/// One backend-addressable comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ColumnPath,
    pub op: ConditionOp,
    pub value: Operand,
    #[serde(default)]
    pub negate: bool,
}

impl Condition {
    pub fn new(column: ColumnPath, op: ConditionOp, value: Operand) -> Self {
        Self {
            column,
            op,
            value,
            negate: false,
        }
    }

    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// `column IS NULL`, or `IS NOT NULL` when negated.
    pub fn is_null(column: ColumnPath) -> Self {
        Self::new(column, ConditionOp::Eq, Operand::Null)
    }
}
