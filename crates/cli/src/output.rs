use crate::{commands::OutputFormat, error::CliError};
use filter_compiler::QueryFilter;

/// Render a compiled filter. An empty filter renders as an empty string in
/// the text formats.
pub fn render(filter: &QueryFilter, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Predicate => Ok(filter.predicate().unwrap_or_default().to_string()),
        OutputFormat::Param => Ok(filter.or_param().unwrap_or_default()),
        OutputFormat::Dnf => {
            serde_json::to_string_pretty(&filter.dnf).map_err(CliError::JsonSerialize)
        }
    }
}

pub async fn write_records(
    records: &[&serde_json::Value],
    path: Option<&str>,
) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(records).map_err(CliError::JsonSerialize)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}
