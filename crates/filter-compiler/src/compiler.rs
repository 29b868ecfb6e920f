use crate::{
    error::Result, eval::dnf_holds, matcher::matches, normalize::normalize,
    serialize::serialize, settings::CompilerSettings,
};
use model::{Dnf, FieldConfigMap, FilterGroup};

/// A trait for compiling filter trees into a specific target.
pub trait FilterCompiler {
    /// The type of filter that this compiler produces.
    type Filter;

    /// Compile the tree into a filter. `None` compiles to a filter that
    /// accepts everything.
    fn compile(&self, tree: Option<&FilterGroup>) -> Result<Self::Filter>;
}

/// Compiles trees into backend query predicates.
pub struct QueryCompiler<'a> {
    configs: &'a FieldConfigMap,
    settings: CompilerSettings,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(configs: &'a FieldConfigMap) -> Self {
        Self::with_settings(configs, CompilerSettings::default())
    }

    pub fn with_settings(configs: &'a FieldConfigMap, settings: CompilerSettings) -> Self {
        Self { configs, settings }
    }
}

impl FilterCompiler for QueryCompiler<'_> {
    type Filter = QueryFilter;

    fn compile(&self, tree: Option<&FilterGroup>) -> Result<QueryFilter> {
        let dnf = normalize(tree, self.configs, &self.settings)?;
        let predicate = serialize(&dnf);
        Ok(QueryFilter { dnf, predicate })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub dnf: Dnf,
    pub predicate: Option<String>,
}

impl QueryFilter {
    pub fn is_empty(&self) -> bool {
        self.predicate.is_none()
    }

    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }

    /// The predicate as a query string parameter, `or=(...)`.
    pub fn or_param(&self) -> Option<String> {
        self.predicate.as_ref().map(|p| format!("or=({p})"))
    }

    /// Evaluate the compiled DNF against a record.
    pub fn eval(&self, record: &serde_json::Value) -> bool {
        dnf_holds(&self.dnf, record)
    }
}

/// Compiles trees into in-memory record filters.
pub struct MatcherCompiler<'a> {
    configs: &'a FieldConfigMap,
}

impl<'a> MatcherCompiler<'a> {
    pub fn new(configs: &'a FieldConfigMap) -> Self {
        Self { configs }
    }
}

impl<'a> FilterCompiler for MatcherCompiler<'a> {
    type Filter = RecordFilter<'a>;

    fn compile(&self, tree: Option<&FilterGroup>) -> Result<RecordFilter<'a>> {
        Ok(RecordFilter {
            tree: tree.cloned(),
            configs: self.configs,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecordFilter<'a> {
    tree: Option<FilterGroup>,
    configs: &'a FieldConfigMap,
}

impl RecordFilter<'_> {
    pub fn eval(&self, record: &serde_json::Value) -> bool {
        self.tree
            .as_ref()
            .is_none_or(|tree| matches(record, tree, self.configs))
    }

    pub fn apply<'r>(&self, records: &'r [serde_json::Value]) -> Vec<&'r serde_json::Value> {
        records.iter().filter(|record| self.eval(record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use model::{ActiveFilter, FieldType, Operator};
    use serde_json::json;

    fn tree() -> FilterGroup {
        FilterGroup::or(vec![
            ActiveFilter::new("age", FieldType::Number, Operator::LessThan, ["18"]).into(),
            ActiveFilter::new("city", FieldType::Text, Operator::Equals, ["Haifa"]).into(),
        ])
    }

    #[test]
    fn test_query_compiler() {
        let configs = FieldConfigMap::new();
        let filter = QueryCompiler::new(&configs).compile(Some(&tree())).unwrap();
        assert_eq!(filter.predicate(), Some("age.lt.18,city.ilike.Haifa"));
        assert_eq!(
            filter.or_param().unwrap(),
            "or=(age.lt.18,city.ilike.Haifa)"
        );

        let empty = QueryCompiler::new(&configs).compile(None).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.or_param(), None);
    }

    #[test]
    fn test_query_compiler_limit() {
        let configs = FieldConfigMap::new();
        let settings = CompilerSettings::builder().max_clauses(1).build().unwrap();
        let err = QueryCompiler::with_settings(&configs, settings)
            .compile(Some(&tree()))
            .unwrap_err();
        assert!(matches!(err, CompileError::ClauseLimitExceeded { limit: 1, attempted: 2 }));
    }

    #[test]
    fn test_both_targets_agree() {
        let configs = FieldConfigMap::new();
        let records = vec![
            json!({ "age": 12, "city": "Tel Aviv" }),
            json!({ "age": 40, "city": "haifa" }),
            json!({ "age": 40, "city": "Eilat" }),
            json!({ "city": null }),
        ];

        let tree = tree().negated();
        let query = QueryCompiler::new(&configs).compile(Some(&tree)).unwrap();
        let matcher = MatcherCompiler::new(&configs).compile(Some(&tree)).unwrap();

        let by_query: Vec<_> = records.iter().filter(|r| query.eval(r)).collect();
        assert_eq!(by_query, matcher.apply(&records));
        assert_eq!(matcher.apply(&records), vec![&records[2]]);
    }

    #[test]
    fn test_missing_tree_accepts_everything() {
        let configs = FieldConfigMap::new();
        let matcher = MatcherCompiler::new(&configs).compile(None).unwrap();
        assert!(matcher.eval(&json!({ "anything": 1 })));
    }
}
