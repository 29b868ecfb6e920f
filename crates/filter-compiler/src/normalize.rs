use crate::{
    error::{CompileError, Result},
    leaf::resolve_leaf,
    settings::CompilerSettings,
};
use model::{Dnf, FieldConfigMap, FilterGroup, FilterNode, GroupOperator};
use tracing::{debug, trace};

/// Flattens a filter tree into DNF, pushing negation down to the leaves
/// with De Morgan's laws.
pub struct Normalizer<'a> {
    configs: &'a FieldConfigMap,
    settings: &'a CompilerSettings,
}

impl<'a> Normalizer<'a> {
    pub fn new(configs: &'a FieldConfigMap, settings: &'a CompilerSettings) -> Self {
        Self { configs, settings }
    }

    pub fn normalize(&self, node: &FilterNode, negate: bool) -> Result<Dnf> {
        match node {
            FilterNode::Leaf(filter) => {
                let fragment = resolve_leaf(filter, negate, self.configs);
                self.check_limit(fragment.len())?;
                Ok(fragment)
            }
            FilterNode::Group(group) => self.normalize_group(group, negate),
        }
    }

    pub fn normalize_group(&self, group: &FilterGroup, negate: bool) -> Result<Dnf> {
        let negate = group.not != negate;
        // NOT(a AND b) = NOT a OR NOT b, and NOT(a OR b) = NOT a AND NOT b
        let distribute = matches!(
            (group.operator, negate),
            (GroupOperator::And, false) | (GroupOperator::Or, true)
        );

        let mut acc: Option<Dnf> = None;
        for child in &group.children {
            let fragment = self.normalize(child, negate)?;
            if fragment.is_empty() {
                continue;
            }

            acc = Some(match acc {
                None => fragment,
                Some(acc) if distribute => {
                    self.check_limit(acc.product_len(&fragment))?;
                    acc.cross(&fragment)
                }
                Some(acc) => {
                    self.check_limit(acc.len().saturating_add(fragment.len()))?;
                    acc.concat(fragment)
                }
            });
        }

        let dnf = acc.unwrap_or_default();
        trace!(group = %group.id, negate, clauses = dnf.len(), "Normalized group");
        Ok(dnf)
    }

    fn check_limit(&self, attempted: usize) -> Result<()> {
        let limit = self.settings.max_clauses;
        if attempted > limit {
            return Err(CompileError::ClauseLimitExceeded { limit, attempted });
        }
        Ok(())
    }
}

/// Normalize a whole tree. A missing tree compiles to an empty DNF.
pub fn normalize(
    tree: Option<&FilterGroup>,
    configs: &FieldConfigMap,
    settings: &CompilerSettings,
) -> Result<Dnf> {
    let Some(tree) = tree else {
        return Ok(Dnf::empty());
    };

    let dnf = Normalizer::new(configs, settings).normalize_group(tree, false)?;
    debug!(
        clauses = dnf.len(),
        conditions = dnf.iter().map(|c| c.len()).sum::<usize>(),
        "Compiled filter tree"
    );
    Ok(dnf)
}
