use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Value type a filterable field is compared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Multiselect,
    /// Any type name this crate does not know. Leaves of this type are inert.
    #[serde(other)]
    Unknown,
}

/// Operator of a single leaf predicate, as offered by the filter builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Contains,
    NotContains,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Before,
    After,
    Between,
    Is,
    IsNot,
    /// Any operator name this crate does not know. Leaves using it are inert.
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Operators the compiler understands for this type.
    pub fn default_operators(&self) -> &'static [Operator] {
        use Operator::*;
        match self {
            FieldType::Text => &[Contains, NotContains, Equals, NotEquals],
            FieldType::Number => &[Equals, NotEquals, GreaterThan, LessThan],
            FieldType::Date => &[Equals, Before, After, Between],
            FieldType::Select | FieldType::Multiselect => &[Is, IsNot],
            FieldType::Unknown => &[],
        }
    }

    pub fn supports(&self, op: Operator) -> bool {
        self.default_operators().contains(&op)
    }

    /// Select-like types compare against a fixed set of options.
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "select" => Ok(FieldType::Select),
            "multiselect" => Ok(FieldType::Multiselect),
            other => Err(ModelError::UnknownFieldType(other.to_string())),
        }
    }
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::Between => "between",
            Operator::Is => "is",
            Operator::IsNot => "isNot",
            Operator::Unknown => "unknown",
        }
    }

    /// Minimum number of non-blank values a leaf needs before it constrains
    /// anything.
    pub fn required_values(&self) -> usize {
        match self {
            Operator::Between => 2,
            _ => 1,
        }
    }

    /// Whether extra values beyond the first are meaningful.
    pub fn accepts_many(&self) -> bool {
        matches!(self, Operator::Is | Operator::IsNot)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Operator::*;
        [
            Contains,
            NotContains,
            Equals,
            NotEquals,
            GreaterThan,
            LessThan,
            Before,
            After,
            Between,
            Is,
            IsNot,
        ]
        .into_iter()
        .find(|op| op.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| ModelError::UnknownOperator(s.to_string()))
    }
}

/// Describes one filterable field of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FilterField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            operators: field_type.default_operators().to_vec(),
            options: None,
        }
    }

    pub fn with_operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = operators.into_iter().collect();
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the filter builder offers `op` for this field. An empty
    /// operator list falls back to the type's defaults.
    pub fn offers(&self, op: Operator) -> bool {
        if self.operators.is_empty() {
            self.field_type.supports(op)
        } else {
            self.operators.contains(&op)
        }
    }
}
