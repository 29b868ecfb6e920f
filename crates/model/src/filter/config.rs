use super::{field::FieldType, tree::ActiveFilter};
use crate::dnf::clause::Dnf;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};

/// How a related-entity field reaches its data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Direct,
    Through,
    Jsonb,
}

type ResolverFn = dyn Fn(&ActiveFilter, bool) -> Dnf + Send + Sync;

/// Fully custom leaf resolution. Receives the leaf and the ambient negate
/// flag and returns the DNF fragment to use in its place.
#[derive(Clone)]
pub struct CustomResolver(Arc<ResolverFn>);

impl CustomResolver {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&ActiveFilter, bool) -> Dnf + Send + Sync + 'static,
    {
        Self(Arc::new(resolver))
    }

    pub fn resolve(&self, filter: &ActiveFilter, negate: bool) -> Dnf {
        (self.0)(filter, negate)
    }
}

impl fmt::Debug for CustomResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomResolver(..)")
    }
}

/// Per-field compiler hints supplied by the resource being filtered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFilterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_array: bool,
    #[serde(skip)]
    pub custom: Option<CustomResolver>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_type: Option<JoinType>,
}

impl FieldFilterConfig {
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ..Self::default()
        }
    }

    pub fn related(entity: impl Into<String>, join_type: JoinType) -> Self {
        Self {
            related_entity: Some(entity.into()),
            join_type: Some(join_type),
            ..Self::default()
        }
    }

    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(&ActiveFilter, bool) -> Dnf + Send + Sync + 'static,
    {
        Self {
            custom: Some(CustomResolver::new(resolver)),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_related_path(mut self, path: impl Into<String>) -> Self {
        self.related_path = Some(path.into());
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// The type the compiler should use for `filter`: the configured type
    /// wins over the one the leaf carries.
    pub fn effective_type(&self, filter: &ActiveFilter) -> FieldType {
        self.field_type.unwrap_or(filter.field_type)
    }
}

/// Field id → compiler hints.
pub type FieldConfigMap = HashMap<String, FieldFilterConfig>;
