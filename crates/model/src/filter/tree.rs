use super::field::{FieldType, Operator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single typed predicate of the filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    #[serde(default)]
    pub id: String,
    pub field_id: String,
    pub operator: Operator,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl ActiveFilter {
    pub fn new<I, S>(
        field_id: impl Into<String>,
        field_type: FieldType,
        operator: Operator,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4().to_string(),
            field_id: field_id.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
            field_type,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Trimmed, non-blank values. A filter still being edited usually
    /// carries empty strings here.
    pub fn present_values(&self) -> Vec<&str> {
        self.values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
}

/// An AND/OR group of child nodes, optionally negated as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default)]
    pub id: String,
    pub operator: GroupOperator,
    #[serde(default)]
    pub not: bool,
    pub children: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn new(operator: GroupOperator, children: Vec<FilterNode>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operator,
            not: false,
            children,
        }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::new(GroupOperator::And, children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::new(GroupOperator::Or, children)
    }

    /// Flip the group's negation flag.
    pub fn negated(mut self) -> Self {
        self.not = !self.not;
        self
    }

    pub fn push(&mut self, child: impl Into<FilterNode>) {
        self.children.push(child.into());
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every leaf in the tree, depth first.
    pub fn leaves(&self) -> Vec<&ActiveFilter> {
        let mut out = Vec::new();
        collect_leaves(&self.children, &mut out);
        out
    }
}

fn collect_leaves<'a>(nodes: &'a [FilterNode], out: &mut Vec<&'a ActiveFilter>) {
    for node in nodes {
        match node {
            FilterNode::Leaf(filter) => out.push(filter),
            FilterNode::Group(group) => collect_leaves(&group.children, out),
        }
    }
}

/// A node of the filter tree. Groups are recognised by their `children`
/// key when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Leaf(ActiveFilter),
}

impl From<ActiveFilter> for FilterNode {
    fn from(filter: ActiveFilter) -> Self {
        FilterNode::Leaf(filter)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nested_tree() {
        let json = r#"{
            "id": "root",
            "operator": "and",
            "children": [
                {"id": "f1", "fieldId": "status", "operator": "is", "values": ["active"], "type": "select"},
                {
                    "id": "g1",
                    "operator": "OR",
                    "not": true,
                    "children": [
                        {"id": "f2", "fieldId": "age", "operator": "greaterThan", "values": ["30"], "type": "number"}
                    ]
                }
            ]
        }"#;

        let tree: FilterGroup = serde_json::from_str(json).unwrap();
        assert_eq!(tree.operator, GroupOperator::And);
        assert!(!tree.not);
        assert_eq!(tree.children.len(), 2);

        match &tree.children[1] {
            FilterNode::Group(group) => {
                assert!(group.not);
                assert_eq!(group.operator, GroupOperator::Or);
            }
            other => panic!("expected group, got {other:?}"),
        }

        let ids: Vec<&str> = tree.leaves().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[test]
    fn test_present_values_skips_blanks() {
        let filter = ActiveFilter::new(
            "city",
            FieldType::Text,
            Operator::Contains,
            ["  tel ", "", "   "],
        );
        assert_eq!(filter.present_values(), vec!["tel"]);
    }

    #[test]
    fn test_negated_toggles() {
        let group = FilterGroup::and(vec![]).negated();
        assert!(group.not);
        assert!(!group.negated().not);
    }
}
