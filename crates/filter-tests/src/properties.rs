//! Property-based checks over generated filter trees.

#[cfg(test)]
mod tests {
    use crate::{
        backend::FixtureBackend,
        fixtures::{configs, ids, leaf_pool, records},
    };
    use filter_compiler::{CompileError, FilterCompiler, MatcherCompiler, QueryCompiler, matches};
    use model::{FilterGroup, FilterNode, GroupOperator};
    use proptest::prelude::*;

    // =========================================================================
    // Strategies
    // =========================================================================

    fn arb_leaf() -> impl Strategy<Value = FilterNode> {
        prop::sample::select(leaf_pool()).prop_map(FilterNode::from)
    }

    fn arb_group(
        children: impl Strategy<Value = Vec<FilterNode>>,
    ) -> impl Strategy<Value = FilterGroup> {
        (any::<bool>(), any::<bool>(), children).prop_map(|(or, negated, children)| {
            let operator = if or { GroupOperator::Or } else { GroupOperator::And };
            let group = FilterGroup::new(operator, children);
            if negated { group.negated() } else { group }
        })
    }

    fn arb_node() -> impl Strategy<Value = FilterNode> {
        arb_leaf().prop_recursive(3, 24, 4, |inner| {
            arb_group(prop::collection::vec(inner, 0..4)).prop_map(FilterNode::from)
        })
    }

    fn arb_tree() -> impl Strategy<Value = FilterGroup> {
        arb_group(prop::collection::vec(arb_node(), 0..4))
    }

    fn not(node: FilterNode) -> FilterNode {
        FilterGroup::and(vec![node]).negated().into()
    }

    fn matched_ids(tree: &FilterGroup) -> Vec<i64> {
        let configs = configs();
        ids(records().iter().filter(|r| matches(r, tree, &configs)))
    }

    /// Ids the fixture backend returns for the compiled predicate, or `None`
    /// when the tree is too large to compile.
    fn queried_ids(tree: &FilterGroup) -> Option<Vec<i64>> {
        let configs = configs();
        let query = QueryCompiler::new(&configs).compile(Some(tree)).ok()?;
        let backend = FixtureBackend::new(records());
        Some(ids(backend.query(query.predicate()).unwrap()))
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        /// The compiled predicate selects exactly the rows the in-memory
        /// matcher keeps.
        #[test]
        fn predicate_and_matcher_agree(tree in arb_tree()) {
            let configs = configs();
            let records = records();

            let query = match QueryCompiler::new(&configs).compile(Some(&tree)) {
                Ok(query) => query,
                Err(CompileError::ClauseLimitExceeded { .. }) => return Ok(()),
                Err(err) => return Err(TestCaseError::fail(err.to_string())),
            };
            let matcher = MatcherCompiler::new(&configs).compile(Some(&tree)).unwrap();

            let backend = FixtureBackend::new(records.clone());
            let rows = backend.query(query.predicate()).unwrap();
            prop_assert_eq!(ids(rows), ids(matcher.apply(&records)));

            let evaluated = ids(records.iter().filter(|r| query.eval(r)));
            prop_assert_eq!(evaluated, ids(matcher.apply(&records)));
        }

        /// NOT(NOT(T)) matches the same records as T.
        #[test]
        fn double_negation_is_identity(tree in arb_tree()) {
            let twice = FilterGroup::and(vec![not(not(tree.clone().into()))]);
            prop_assert_eq!(matched_ids(&twice), matched_ids(&tree));
        }

        /// NOT(A AND B) matches the same records as NOT A OR NOT B.
        #[test]
        fn de_morgan(a in arb_node(), b in arb_node()) {
            let left = FilterGroup::and(vec![a.clone(), b.clone()]).negated();
            let right = FilterGroup::or(vec![not(a), not(b)]);
            prop_assert_eq!(matched_ids(&left), matched_ids(&right));
        }

        /// NOT(NOT(T)) compiles to the same DNF and predicate as T.
        #[test]
        fn double_negation_compiled(tree in arb_tree()) {
            let configs = configs();
            let compiler = QueryCompiler::new(&configs);
            let twice = FilterGroup::and(vec![not(not(tree.clone().into()))]);

            match (compiler.compile(Some(&twice)), compiler.compile(Some(&tree))) {
                (Ok(twice), Ok(once)) => {
                    prop_assert_eq!(&twice.dnf, &once.dnf);
                    prop_assert_eq!(twice.predicate(), once.predicate());
                }
                (Err(twice), Err(once)) => prop_assert_eq!(twice, once),
                (twice, once) => {
                    return Err(TestCaseError::fail(format!("{twice:?} vs {once:?}")));
                }
            }
        }

        /// NOT(A AND B) and NOT A OR NOT B compile to predicates selecting the
        /// same rows.
        #[test]
        fn de_morgan_and_compiled(a in arb_node(), b in arb_node()) {
            let left = FilterGroup::and(vec![a.clone(), b.clone()]).negated();
            let right = FilterGroup::or(vec![not(a), not(b)]);

            if let (Some(left), Some(right)) = (queried_ids(&left), queried_ids(&right)) {
                prop_assert_eq!(left, right);
            }
        }

        /// NOT(A OR B) and NOT A AND NOT B compile to predicates selecting the
        /// same rows.
        #[test]
        fn de_morgan_or_compiled(a in arb_node(), b in arb_node()) {
            let left = FilterGroup::or(vec![a.clone(), b.clone()]).negated();
            let right = FilterGroup::and(vec![not(a), not(b)]);

            if let (Some(left), Some(right)) = (queried_ids(&left), queried_ids(&right)) {
                prop_assert_eq!(left, right);
            }
        }

        /// An empty group compiles to nothing however it is wrapped.
        #[test]
        fn empty_groups_are_inert(or in any::<bool>(), negated in any::<bool>()) {
            let operator = if or { GroupOperator::Or } else { GroupOperator::And };
            let mut tree = FilterGroup::new(operator, vec![]);
            if negated {
                tree = tree.negated();
            }
            let configs = configs();
            let query = QueryCompiler::new(&configs).compile(Some(&tree)).unwrap();
            prop_assert!(query.is_empty());
            prop_assert_eq!(matched_ids(&tree).len(), records().len());
        }
    }
}
