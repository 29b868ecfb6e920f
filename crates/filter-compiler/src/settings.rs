use crate::error::{CompileError, Result};

pub const DEFAULT_MAX_CLAUSES: usize = 1024;

/// Immutable settings used by every compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Upper bound on the number of clauses a compiled DNF may contain
    pub max_clauses: usize,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_clauses: DEFAULT_MAX_CLAUSES,
        }
    }
}

impl CompilerSettings {
    pub fn builder() -> CompilerSettingsBuilder {
        CompilerSettingsBuilder::default()
    }

    pub fn max_clauses(&self) -> usize {
        self.max_clauses
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompilerSettingsBuilder {
    max_clauses: Option<usize>,
}

impl CompilerSettingsBuilder {
    pub fn max_clauses(mut self, max_clauses: usize) -> Self {
        self.max_clauses = Some(max_clauses);
        self
    }

    pub fn build(self) -> Result<CompilerSettings> {
        let max_clauses = self.max_clauses.unwrap_or(DEFAULT_MAX_CLAUSES);
        if max_clauses == 0 {
            return Err(CompileError::InvalidSettings(
                "max_clauses must be at least 1".to_string(),
            ));
        }
        Ok(CompilerSettings { max_clauses })
    }
}
