pub mod clause;
pub mod condition;
pub mod path;
