use clap::{Args, Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter tree into a backend predicate
    Compile {
        #[command(flatten)]
        input: TreeInput,

        #[arg(long, value_enum, default_value_t = OutputFormat::Predicate)]
        format: OutputFormat,
    },
    /// Apply a filter tree to a JSON array of records
    Filter {
        #[command(flatten)]
        input: TreeInput,

        #[arg(long, help = "JSON file holding an array of records")]
        records: String,

        #[arg(
            long,
            help = "If specified, writes the matching records to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Check a filter tree against the field catalog
    Validate {
        #[arg(long, help = "Filter tree JSON file")]
        tree: String,

        #[arg(long, help = "Field catalog JSON file")]
        fields: String,
    },
}

#[derive(Args)]
pub struct TreeInput {
    #[arg(long, help = "Filter tree JSON file")]
    pub tree: Option<String>,

    #[arg(long, help = "Field catalog JSON file with `fields` and `configs`")]
    pub fields: Option<String>,

    #[arg(long, help = "Free-text search merged into the tree")]
    pub search: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Fields the search text is matched against")]
    pub search_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bare predicate body
    Predicate,
    /// `or=(...)` query parameter
    Param,
    /// Normalized clauses as JSON
    Dnf,
}
