pub mod compiler;
pub mod emit;
pub mod error;
pub mod eval;
pub mod leaf;
pub mod matcher;
pub mod normalize;
pub mod resolve;
pub mod search;
pub mod serialize;
pub mod settings;
pub mod validate;

pub use compiler::{FilterCompiler, MatcherCompiler, QueryCompiler, QueryFilter, RecordFilter};
pub use error::{CompileError, Result};
pub use leaf::{Emitter, lower_leaf, resolve_leaf};
pub use matcher::matches;
pub use normalize::{Normalizer, normalize};
pub use resolve::{PathStrategy, resolve_column};
pub use search::with_search;
pub use serialize::serialize;
pub use settings::{CompilerSettings, CompilerSettingsBuilder, DEFAULT_MAX_CLAUSES};
pub use validate::{Severity, ValidationIssue, ValidationIssueKind, ValidationResult, validate_tree};
