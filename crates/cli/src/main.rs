use crate::{
    commands::{Commands, TreeInput},
    env::EnvManager,
    error::CliError,
    input::{Catalog, load_catalog, load_records, load_tree},
};
use clap::Parser;
use filter_compiler::{
    CompilerSettings, FilterCompiler, MatcherCompiler, QueryCompiler, validate_tree, with_search,
};
use model::FilterGroup;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod input;
mod output;

#[derive(Parser)]
#[command(name = "filterc", version = "0.1.0", about = "Filter tree compiler")]
struct Cli {
    #[arg(long, global = true, help = "Load environment variables from this .env file")]
    env_file: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Maximum number of clauses a compiled filter may expand to"
    )]
    max_clauses: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.env_file.as_deref(), cli.max_clauses)?;

    match cli.command {
        Commands::Compile { input, format } => {
            let (tree, catalog) = load_input(&input).await?;
            let filter = QueryCompiler::with_settings(&catalog.configs, settings)
                .compile(tree.as_ref())?;

            info!(clauses = filter.dnf.len(), "Compiled filter");
            println!("{}", output::render(&filter, format)?);
        }
        Commands::Filter {
            input,
            records,
            output,
        } => {
            let (tree, catalog) = load_input(&input).await?;
            let records = load_records(&records).await?;

            let filter = MatcherCompiler::new(&catalog.configs).compile(tree.as_ref())?;
            let matched = filter.apply(&records);

            info!(total = records.len(), matched = matched.len(), "Filtered records");
            output::write_records(&matched, output.as_deref()).await?;
        }
        Commands::Validate { tree, fields } => validate(&tree, &fields).await?,
    }

    Ok(())
}

/// Clause limit precedence: `--max-clauses`, then `FILTERC_MAX_CLAUSES`
/// (process environment or `--env-file`), then the default.
fn load_settings(
    env_file: Option<&str>,
    max_clauses: Option<usize>,
) -> Result<CompilerSettings, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }

    let mut builder = CompilerSettings::builder();
    let limit = match max_clauses {
        Some(limit) => Some(limit),
        None => env.max_clauses()?,
    };
    if let Some(limit) = limit {
        builder = builder.max_clauses(limit);
    }
    Ok(builder.build()?)
}

/// Print every issue found in `tree_path`; fails when any of them is an error.
async fn validate(tree_path: &str, fields_path: &str) -> Result<(), CliError> {
    let catalog = load_catalog(Some(fields_path)).await?;
    let tree = load_tree(Some(tree_path))
        .await?
        .unwrap_or_else(|| FilterGroup::and(vec![]));

    let result = validate_tree(&tree, &catalog.fields);
    print!("{result}");
    if result.has_errors() {
        return Err(CliError::ValidationFailed(result.errors.len()));
    }
    Ok(())
}

async fn load_input(input: &TreeInput) -> Result<(Option<FilterGroup>, Catalog), CliError> {
    let catalog = load_catalog(input.fields.as_deref()).await?;
    let mut tree = load_tree(input.tree.as_deref()).await?;

    if let Some(text) = &input.search {
        if input.search_fields.is_empty() {
            warn!("--search given without --search-fields, ignoring");
        }
        tree = with_search(tree, &input.search_fields, text);
    }

    Ok((tree, catalog))
}
