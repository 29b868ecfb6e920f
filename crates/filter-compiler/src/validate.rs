use model::{
    ActiveFilter, FieldType, FilterField, FilterGroup, FilterNode, Operator,
    core::value::{parse_number, parse_timestamp},
};
use std::{collections::HashMap, fmt};

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Type of filter tree validation issue
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssueKind {
    // Field catalog
    UnknownField { field_id: String },
    OperatorNotOffered { field_id: String, operator: Operator },
    UnsupportedOperator { field_type: FieldType, operator: Operator },

    // Values
    MissingValue { field_id: String },
    InvalidValueCount { field_id: String, expected: usize, found: usize },
    MalformedValue { field_id: String, value: String, expected: FieldType },
    UnknownOption { field_id: String, value: String },

    // Structure (warnings)
    EmptyGroup,
}

impl fmt::Display for ValidationIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssueKind::UnknownField { field_id } => {
                write!(f, "unknown field '{}'", field_id)
            }
            ValidationIssueKind::OperatorNotOffered { field_id, operator } => {
                write!(f, "operator '{}' is not offered by field '{}'", operator, field_id)
            }
            ValidationIssueKind::UnsupportedOperator {
                field_type,
                operator,
            } => {
                write!(f, "operator '{}' does not apply to {} fields", operator, field_type)
            }
            ValidationIssueKind::MissingValue { field_id } => {
                write!(f, "filter on '{}' has no value", field_id)
            }
            ValidationIssueKind::InvalidValueCount {
                field_id,
                expected,
                found,
            } => {
                write!(
                    f,
                    "filter on '{}' expects {} value(s) but has {}",
                    field_id, expected, found
                )
            }
            ValidationIssueKind::MalformedValue {
                field_id,
                value,
                expected,
            } => {
                write!(f, "'{}' is not a valid {} for '{}'", value, expected, field_id)
            }
            ValidationIssueKind::UnknownOption { field_id, value } => {
                write!(f, "'{}' is not an option of '{}'", value, field_id)
            }
            ValidationIssueKind::EmptyGroup => write!(f, "empty group"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: ValidationIssueKind,
    /// Id of the tree node the issue was found on
    pub node_id: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(kind: ValidationIssueKind, node_id: impl Into<String>) -> Self {
        let message = kind.to_string();
        Self {
            severity: Severity::Error,
            kind,
            node_id: node_id.into(),
            message,
        }
    }

    pub fn warning(kind: ValidationIssueKind, node_id: impl Into<String>) -> Self {
        let message = kind.to_string();
        Self {
            severity: Severity::Warning,
            kind,
            node_id: node_id.into(),
            message,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at node '{}': {}", self.severity, self.node_id, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return write!(f, "No validation issues");
        }

        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }

        for warning in &self.warnings {
            writeln!(f, "{}", warning)?;
        }

        Ok(())
    }
}

/// Check a tree against the field catalog it was built from. Nothing here
/// stops compilation; callers decide whether errors block a request.
pub fn validate_tree(tree: &FilterGroup, fields: &[FilterField]) -> ValidationResult {
    let catalog: HashMap<&str, &FilterField> =
        fields.iter().map(|field| (field.id.as_str(), field)).collect();

    let mut result = ValidationResult::new();
    for child in &tree.children {
        validate_node(child, &catalog, &mut result);
    }
    result
}

fn validate_node(
    node: &FilterNode,
    catalog: &HashMap<&str, &FilterField>,
    result: &mut ValidationResult,
) {
    match node {
        FilterNode::Leaf(filter) => validate_leaf(filter, catalog, result),
        FilterNode::Group(group) => {
            if group.is_empty() {
                result.add_issue(ValidationIssue::warning(
                    ValidationIssueKind::EmptyGroup,
                    &group.id,
                ));
            }
            for child in &group.children {
                validate_node(child, catalog, result);
            }
        }
    }
}

fn validate_leaf(
    filter: &ActiveFilter,
    catalog: &HashMap<&str, &FilterField>,
    result: &mut ValidationResult,
) {
    let field_id = filter.field_id.clone();
    let operator = filter.operator;

    let Some(field) = catalog.get(filter.field_id.as_str()) else {
        result.add_issue(ValidationIssue::error(
            ValidationIssueKind::UnknownField { field_id },
            &filter.id,
        ));
        return;
    };

    if !field.field_type.supports(operator) {
        result.add_issue(ValidationIssue::error(
            ValidationIssueKind::UnsupportedOperator {
                field_type: field.field_type,
                operator,
            },
            &filter.id,
        ));
        return;
    }

    if !field.offers(operator) {
        result.add_issue(ValidationIssue::error(
            ValidationIssueKind::OperatorNotOffered {
                field_id: field_id.clone(),
                operator,
            },
            &filter.id,
        ));
    }

    let values = filter.present_values();
    if values.is_empty() {
        result.add_issue(ValidationIssue::warning(
            ValidationIssueKind::MissingValue { field_id },
            &filter.id,
        ));
        return;
    }

    let expected = operator.required_values();
    if values.len() < expected || (values.len() > expected && !operator.accepts_many()) {
        result.add_issue(ValidationIssue::warning(
            ValidationIssueKind::InvalidValueCount {
                field_id: field_id.clone(),
                expected,
                found: values.len(),
            },
            &filter.id,
        ));
    }

    for value in values {
        let well_formed = match field.field_type {
            FieldType::Number => parse_number(value).is_some(),
            FieldType::Date => parse_timestamp(value).is_some(),
            FieldType::Text
            | FieldType::Select
            | FieldType::Multiselect
            | FieldType::Unknown => true,
        };
        if !well_formed {
            result.add_issue(ValidationIssue::error(
                ValidationIssueKind::MalformedValue {
                    field_id: field_id.clone(),
                    value: value.to_string(),
                    expected: field.field_type,
                },
                &filter.id,
            ));
            continue;
        }

        let unknown_option = field
            .options
            .as_ref()
            .is_some_and(|options| !options.iter().any(|option| option == value));
        if field.field_type.is_choice() && unknown_option {
            result.add_issue(ValidationIssue::warning(
                ValidationIssueKind::UnknownOption {
                    field_id: field_id.clone(),
                    value: value.to_string(),
                },
                &filter.id,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<FilterField> {
        vec![
            FilterField::new("age", "Age", FieldType::Number),
            FilterField::new("created", "Created", FieldType::Date),
            FilterField::new("status", "Status", FieldType::Select)
                .with_options(["active", "archived"]),
            FilterField::new("city", "City", FieldType::Text).with_operators([Operator::Contains]),
        ]
    }

    fn validate(children: Vec<FilterNode>) -> ValidationResult {
        validate_tree(&FilterGroup::and(children), &catalog())
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
    }

    #[test]
    fn test_valid_tree() {
        let result = validate(vec![
            ActiveFilter::new("age", FieldType::Number, Operator::GreaterThan, ["30"]).into(),
            ActiveFilter::new("status", FieldType::Select, Operator::Is, ["active", "archived"])
                .into(),
        ]);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
        assert_eq!(result.to_string(), "No validation issues");
    }

    #[test]
    fn test_unknown_field_and_operators() {
        let result = validate(vec![
            ActiveFilter::new("zip", FieldType::Text, Operator::Contains, ["9"]).into(),
            ActiveFilter::new("age", FieldType::Number, Operator::Before, ["9"]).into(),
            ActiveFilter::new("city", FieldType::Text, Operator::Equals, ["Haifa"]).into(),
        ]);

        let kinds: Vec<_> = result.errors.iter().map(|issue| &issue.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &ValidationIssueKind::UnknownField {
                    field_id: "zip".into()
                },
                &ValidationIssueKind::UnsupportedOperator {
                    field_type: FieldType::Number,
                    operator: Operator::Before
                },
                &ValidationIssueKind::OperatorNotOffered {
                    field_id: "city".into(),
                    operator: Operator::Equals
                },
            ]
        );
    }

    #[test]
    fn test_unrecognised_operator_is_unsupported() {
        let result = validate(vec![
            ActiveFilter::new("city", FieldType::Text, Operator::Unknown, ["Da"]).into(),
        ]);
        assert_eq!(
            result.errors[0].kind,
            ValidationIssueKind::UnsupportedOperator {
                field_type: FieldType::Text,
                operator: Operator::Unknown
            }
        );
        assert!(result.errors[0].message.contains("operator 'unknown'"));
    }

    #[test]
    fn test_value_checks() {
        let result = validate(vec![
            ActiveFilter::new("age", FieldType::Number, Operator::Equals, ["old"]).into(),
            ActiveFilter::new("created", FieldType::Date, Operator::Between, ["2024-01-01"]).into(),
            ActiveFilter::new("status", FieldType::Select, Operator::Is, ["deleted"]).into(),
            ActiveFilter::new("city", FieldType::Text, Operator::Contains, [" "]).into(),
        ]);

        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].kind,
            ValidationIssueKind::MalformedValue { .. }
        ));

        let warnings: Vec<_> = result.warnings.iter().map(|issue| &issue.kind).collect();
        assert!(matches!(
            warnings[0],
            ValidationIssueKind::InvalidValueCount {
                expected: 2,
                found: 1,
                ..
            }
        ));
        assert!(matches!(warnings[1], ValidationIssueKind::UnknownOption { .. }));
        assert!(matches!(warnings[2], ValidationIssueKind::MissingValue { .. }));
    }

    #[test]
    fn test_empty_nested_group_warns() {
        let empty = FilterGroup::or(vec![]);
        let id = empty.id.clone();
        let result = validate(vec![empty.into()]);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].node_id, id);
        assert!(result.warnings[0].to_string().starts_with("warning at node"));
    }
}
