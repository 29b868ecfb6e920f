pub mod core;
pub mod dnf;
pub mod error;
pub mod filter;

pub use dnf::{
    clause::{Clause, Dnf},
    condition::{Condition, ConditionOp, Operand},
    path::ColumnPath,
};
pub use filter::{
    config::{CustomResolver, FieldConfigMap, FieldFilterConfig, JoinType},
    field::{FieldType, FilterField, Operator},
    tree::{ActiveFilter, FilterGroup, FilterNode, GroupOperator},
};
