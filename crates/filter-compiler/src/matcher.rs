use crate::{
    emit::RecordEmitter,
    eval::dnf_holds,
    leaf::{custom_fragment, lower_leaf},
    resolve::{LeafTarget, resolve_target},
};
use model::{ActiveFilter, FieldConfigMap, FilterGroup, FilterNode, GroupOperator};

/// Whether `record` satisfies `tree`. A tree that constrains nothing
/// matches every record.
pub fn matches(record: &serde_json::Value, tree: &FilterGroup, configs: &FieldConfigMap) -> bool {
    Matcher { record, configs }
        .group(tree, false)
        .unwrap_or(true)
}

struct Matcher<'a> {
    record: &'a serde_json::Value,
    configs: &'a FieldConfigMap,
}

impl Matcher<'_> {
    /// `None` when the node places no constraint.
    fn node(&self, node: &FilterNode, negate: bool) -> Option<bool> {
        match node {
            FilterNode::Leaf(filter) => self.leaf(filter, negate),
            FilterNode::Group(group) => self.group(group, negate),
        }
    }

    fn group(&self, group: &FilterGroup, negate: bool) -> Option<bool> {
        let negate = group.not != negate;
        let conjunctive = matches!(
            (group.operator, negate),
            (GroupOperator::And, false) | (GroupOperator::Or, true)
        );

        let mut constrained = false;
        for child in &group.children {
            let Some(held) = self.node(child, negate) else {
                continue;
            };
            constrained = true;
            if held != conjunctive {
                return Some(held);
            }
        }

        constrained.then_some(conjunctive)
    }

    fn leaf(&self, filter: &ActiveFilter, negate: bool) -> Option<bool> {
        match resolve_target(filter, self.configs) {
            LeafTarget::Custom(resolver) => {
                let fragment = custom_fragment(&resolver, filter, negate);
                (!fragment.is_empty()).then(|| dnf_holds(&fragment, self.record))
            }
            LeafTarget::Column {
                column,
                field_type,
                is_array,
            } => lower_leaf(
                filter,
                field_type,
                is_array,
                &column,
                negate,
                &RecordEmitter::new(self.record),
            ),
        }
    }
}
