use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type of the crate.
///
/// Construction errors (`Schema`, `Projection`, `EmptyFold`) and render errors
/// (`Unsupported`) indicate a programming mistake and are never retried.
/// `Execution` is terminal for the transaction that produced it.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    EmptyFold(#[from] EmptyFoldError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstructError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Malformed table or column declaration, detected when the table is built.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },
    #[error("table `{table}` declares more than one primary key column")]
    MultiplePrimaryKeys { table: String },
    #[error("identity column `{column}` of table `{table}` must have an integer type")]
    IdentityNotInteger { table: String, column: String },
    #[error(
        "column `{table}.{column}` references `{target_table}.{target_column}` which is not a primary key"
    )]
    ReferenceNotPrimaryKey {
        table: String,
        column: String,
        target_table: String,
        target_column: String,
    },
    #[error("table `{table}` has no identity column")]
    NoIdentityColumn { table: String },
}

/// Malformed query construction, detected when the query is built.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("column `{column}` does not belong to table `{table}`")]
    ForeignColumn { table: String, column: String },
    #[error("sub-query projects {found} columns where {expected} are required")]
    SubQueryArity { expected: usize, found: usize },
}

/// Folding an empty sequence of expressions has no identity to expose.
#[derive(Debug, Error)]
#[error("cannot fold zero expressions with {operator}")]
pub struct EmptyFoldError {
    pub operator: &'static str,
}

/// Mismatch between an application value and a column type, detected at the
/// encode / decode boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("column `{column}` expects {expected} but received {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("column `{column}` is not nullable but received an absent value")]
    NullNotAllowed { column: String },
    #[error("cannot convert {value} to {target}")]
    Conversion { value: String, target: String },
    #[error("value {value} is out of range for {target}")]
    OutOfRange { value: String, target: String },
}

/// The targeted dialect has no spelling for the requested construct.
#[derive(Debug, Error)]
#[error("dialect `{dialect}` cannot express {construct}")]
pub struct UnsupportedConstructError {
    pub dialect: &'static str,
    pub construct: String,
}

/// Driver level failure. Always terminal for the current transaction.
///
/// Carries the statement text without its parameter values so diagnostics do
/// not leak literals into logs.
#[derive(Debug, Error)]
#[error("execution failed on `{dialect}`: {source}\nstatement: {statement}")]
pub struct ExecutionError {
    pub dialect: &'static str,
    pub statement: String,
    #[source]
    pub source: anyhow::Error,
}

impl ExecutionError {
    pub fn new(dialect: &'static str, statement: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            dialect,
            statement: statement.into(),
            source,
        }
    }
}
