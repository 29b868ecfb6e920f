use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete, backend-addressable location of a field's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColumnPath {
    /// A plain column on the filtered table.
    Direct { column: String },
    /// Text access into a JSON column: `base->>'key'`.
    Json { base: String, key: String },
    /// A column of an embedded related entity: `entity.field`.
    Relation { entity: String, field: String },
}

impl ColumnPath {
    pub fn direct(column: impl Into<String>) -> Self {
        ColumnPath::Direct {
            column: column.into(),
        }
    }

    pub fn json(base: impl Into<String>, key: impl Into<String>) -> Self {
        ColumnPath::Json {
            base: base.into(),
            key: key.into(),
        }
    }

    pub fn relation(entity: impl Into<String>, field: impl Into<String>) -> Self {
        ColumnPath::Relation {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Recognise a literal path. Only `base->>'key'` and `entity.field`
    /// with plain identifier segments are lifted; everything else stays a
    /// verbatim `Direct` column, so rendering never changes the input.
    pub fn parse(raw: &str) -> Self {
        if let Some((base, rest)) = raw.split_once("->>") {
            let key = rest.strip_prefix('\'').and_then(|r| r.strip_suffix('\''));
            return match key {
                Some(key) if is_plain(base) && !key.is_empty() && !key.contains('\'') => {
                    ColumnPath::json(base, key)
                }
                _ => ColumnPath::direct(raw),
            };
        }

        match raw.split_once('.') {
            Some((entity, field)) if is_plain(entity) && is_plain(field) => {
                ColumnPath::relation(entity, field)
            }
            _ => ColumnPath::direct(raw),
        }
    }

    /// Navigate a JSON record to the value this path addresses.
    pub fn lookup<'a>(&self, record: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        match self {
            ColumnPath::Direct { column } => record.get(column),
            ColumnPath::Json { base, key } => record.get(base)?.get(key),
            ColumnPath::Relation { entity, field } => record.get(entity)?.get(field),
        }
    }
}

fn is_plain(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnPath::Direct { column } => write!(f, "{column}"),
            ColumnPath::Json { base, key } => write!(f, "{base}->>'{key}'"),
            ColumnPath::Relation { entity, field } => write!(f, "{entity}.{field}"),
        }
    }
}
