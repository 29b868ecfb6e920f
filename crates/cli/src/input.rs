use crate::error::CliError;
use model::{FieldConfigMap, FilterField, FilterGroup};
use serde::Deserialize;
use std::path::Path;

/// Field catalog document: the fields the filter builder offers and the
/// per-field compiler configs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub fields: Vec<FilterField>,
    #[serde(default)]
    pub configs: FieldConfigMap,
}

pub async fn load_catalog(path: Option<&str>) -> Result<Catalog, CliError> {
    match path {
        Some(path) => {
            let source = tokio::fs::read_to_string(path).await?;
            Ok(serde_json::from_str(&source)?)
        }
        None => Ok(Catalog::default()),
    }
}

/// Read a filter tree. A missing path or a `null` document means no filter.
pub async fn load_tree(path: Option<&str>) -> Result<Option<FilterGroup>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let source = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&source).map_err(|err| {
        CliError::InvalidTree(format!("{}: {err}", Path::new(path).display()))
    })
}

pub async fn load_records(path: &str) -> Result<Vec<serde_json::Value>, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{FieldType, JoinType};
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let file = write_temp(
            r#"{
                "fields": [{ "id": "tier", "label": "Tier", "type": "select", "options": ["gold"] }],
                "configs": { "tier": { "relatedEntity": "customer", "joinType": "jsonb" } }
            }"#,
        );
        let catalog = load_catalog(file.path().to_str()).await.unwrap();
        assert_eq!(catalog.fields[0].field_type, FieldType::Select);
        assert_eq!(catalog.configs["tier"].join_type, Some(JoinType::Jsonb));

        assert!(load_catalog(None).await.unwrap().fields.is_empty());
    }

    #[tokio::test]
    async fn test_load_tree() {
        let null = write_temp("null");
        assert!(load_tree(null.path().to_str()).await.unwrap().is_none());

        let broken = write_temp(r#"{ "operator": "xor", "children": [] }"#);
        assert!(matches!(
            load_tree(broken.path().to_str()).await,
            Err(CliError::InvalidTree(_))
        ));
    }
}
