use model::{
    ActiveFilter, ColumnPath, CustomResolver, FieldConfigMap, FieldFilterConfig, FieldType,
    JoinType,
};

/// Where a field's data lives, as decided by its filter config.
#[derive(Debug, Clone)]
pub enum PathStrategy {
    Direct(String),
    Json(String, String),
    Relation(String, String),
    Custom(CustomResolver),
}

impl PathStrategy {
    /// The navigable column for this strategy. `None` for custom resolvers,
    /// which never address a column themselves.
    pub fn column(&self) -> Option<ColumnPath> {
        match self {
            PathStrategy::Direct(column) => Some(ColumnPath::direct(column)),
            PathStrategy::Json(base, key) => Some(ColumnPath::json(base, key)),
            PathStrategy::Relation(entity, field) => Some(ColumnPath::relation(entity, field)),
            PathStrategy::Custom(_) => None,
        }
    }
}

impl From<ColumnPath> for PathStrategy {
    fn from(path: ColumnPath) -> Self {
        match path {
            ColumnPath::Direct { column } => PathStrategy::Direct(column),
            ColumnPath::Json { base, key } => PathStrategy::Json(base, key),
            ColumnPath::Relation { entity, field } => PathStrategy::Relation(entity, field),
        }
    }
}

pub fn resolve_column(field_id: &str, config: Option<&FieldFilterConfig>) -> PathStrategy {
    let Some(config) = config else {
        return PathStrategy::Direct(field_id.to_string());
    };

    if let Some(custom) = &config.custom {
        return PathStrategy::Custom(custom.clone());
    }

    if let Some(path) = &config.related_path {
        return ColumnPath::parse(path).into();
    }

    if let Some(related) = &config.related_entity {
        let (entity, subfield) = field_id
            .split_once('.')
            .unwrap_or((related.as_str(), field_id));

        return match config.join_type.unwrap_or_default() {
            JoinType::Jsonb => PathStrategy::Json(format!("{entity}_data"), subfield.to_string()),
            JoinType::Through | JoinType::Direct => {
                PathStrategy::Relation(entity.to_string(), subfield.to_string())
            }
        };
    }

    PathStrategy::Direct(
        config
            .column
            .clone()
            .unwrap_or_else(|| field_id.to_string()),
    )
}

/// A leaf after its config has been applied.
#[derive(Debug, Clone)]
pub(crate) enum LeafTarget {
    Custom(CustomResolver),
    Column {
        column: ColumnPath,
        field_type: FieldType,
        is_array: bool,
    },
}

pub(crate) fn resolve_target(filter: &ActiveFilter, configs: &FieldConfigMap) -> LeafTarget {
    let config = configs.get(&filter.field_id);
    let column = match resolve_column(&filter.field_id, config) {
        PathStrategy::Custom(resolver) => return LeafTarget::Custom(resolver),
        PathStrategy::Direct(column) => ColumnPath::Direct { column },
        PathStrategy::Json(base, key) => ColumnPath::Json { base, key },
        PathStrategy::Relation(entity, field) => ColumnPath::Relation { entity, field },
    };

    LeafTarget::Column {
        column,
        field_type: config.map_or(filter.field_type, |c| c.effective_type(filter)),
        is_array: config.is_some_and(|c| c.is_array),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Dnf, Operator};

    fn column_of(strategy: PathStrategy) -> String {
        strategy.column().map(|c| c.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_no_config_uses_field_id() {
        assert_eq!(column_of(resolve_column("status", None)), "status");
    }

    #[test]
    fn test_explicit_column() {
        let config = FieldFilterConfig::column("order_status");
        assert_eq!(
            column_of(resolve_column("status", Some(&config))),
            "order_status"
        );
    }

    #[test]
    fn test_related_path_wins_over_entity() {
        let config = FieldFilterConfig::related("customer", JoinType::Jsonb)
            .with_related_path("profile->>'tier'");
        let strategy = resolve_column("customer.tier", Some(&config));
        assert!(matches!(
            &strategy,
            PathStrategy::Json(base, key) if base == "profile" && key == "tier"
        ));
    }

    #[test]
    fn test_jsonb_join_builds_data_column() {
        let config = FieldFilterConfig::related("customer", JoinType::Jsonb);
        assert_eq!(
            column_of(resolve_column("customer.email", Some(&config))),
            "customer_data->>'email'"
        );
        // No dot: the related entity supplies the prefix
        assert_eq!(
            column_of(resolve_column("email", Some(&config))),
            "customer_data->>'email'"
        );
    }

    #[test]
    fn test_through_join_builds_relation() {
        let config = FieldFilterConfig::related("customer", JoinType::Through);
        assert_eq!(
            column_of(resolve_column("customer.city", Some(&config))),
            "customer.city"
        );

        let config = FieldFilterConfig {
            related_entity: Some("team".into()),
            ..FieldFilterConfig::default()
        };
        assert!(matches!(
            resolve_column("name", Some(&config)),
            PathStrategy::Relation(entity, field) if entity == "team" && field == "name"
        ));
    }

    #[test]
    fn test_custom_short_circuits() {
        let config = FieldFilterConfig::custom(|_, _| Dnf::empty()).with_related_path("ignored");
        let strategy = resolve_column("anything", Some(&config));
        assert!(matches!(strategy, PathStrategy::Custom(_)));
        assert!(strategy.column().is_none());
    }

    #[test]
    fn test_target_uses_config_type() {
        let mut configs = FieldConfigMap::new();
        configs.insert(
            "tags".into(),
            FieldFilterConfig::column("tags")
                .with_type(FieldType::Multiselect)
                .array(),
        );
        let leaf = ActiveFilter::new("tags", FieldType::Select, Operator::Is, ["a"]);

        match resolve_target(&leaf, &configs) {
            LeafTarget::Column {
                field_type,
                is_array,
                ..
            } => {
                assert_eq!(field_type, FieldType::Multiselect);
                assert!(is_array);
            }
            LeafTarget::Custom(_) => panic!("expected a column target"),
        }
    }
}
