//! Compile filter expressions to the reference SQL backend

use super::{CliError, dialect_by_name};
use crate::sql::{SqlBuilder, SqlPredicate};

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// The filter expression to compile
    pub expression: String,
    /// Dialect selector ("keyword" or "symbolic")
    pub dialect: String,
    /// Reference paths treated as collection-valued
    pub collections: Vec<String>,
}

/// Parse an expression and render it as a parameterized WHERE clause.
pub fn execute_compile(options: &CompileOptions) -> Result<SqlPredicate, CliError> {
    let dialect = dialect_by_name(&options.dialect)
        .ok_or_else(|| CliError::UnknownDialect(options.dialect.clone()))?;

    let ast = dialect.parse(&options.expression)?;

    let mut builder = SqlBuilder::new();
    for path in &options.collections {
        builder = builder.collection(path.clone());
    }
    Ok(builder.render(&ast)?)
}
