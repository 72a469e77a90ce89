use crate::{AsValue, Column, ColumnTrait, Driver, Prepared, Result, Value, truncate_long};
use std::{
    fmt::{self, Display, Formatter},
    sync::Arc,
};

/// Rendered SQL text plus its ordered parameter list.
///
/// Literal values never appear in `sql`; they travel in `params`, in the
/// order their placeholders occur in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(&self.sql))
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::new(sql.to_owned(), Vec::new())
    }
}

impl From<String> for Statement {
    fn from(sql: String) -> Self {
        Statement::new(sql, Vec::new())
    }
}

/// A query ready to be executed: raw SQL with parameters, or a driver
/// prepared handle carrying backend parsing state.
#[derive(Debug)]
pub enum Query<D: Driver> {
    Raw(Statement),
    Prepared(D::Prepared),
}

impl<D: Driver> Query<D> {
    pub fn is_prepared(&self) -> bool {
        matches!(self, Query::Prepared(..))
    }

    /// Remove all the previously bound values.
    pub fn clear_bindings(&mut self) -> Result<&mut Self> {
        match self {
            Self::Raw(statement) => {
                statement.params.clear();
            }
            Self::Prepared(prepared) => {
                prepared.clear_bindings()?;
            }
        }
        Ok(self)
    }

    /// Append a parameter value.
    pub fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        match self {
            Self::Raw(statement) => {
                statement.params.push(value.as_value());
            }
            Self::Prepared(prepared) => {
                prepared.bind(value)?;
            }
        }
        Ok(self)
    }
}

impl<D: Driver> From<Statement> for Query<D> {
    fn from(statement: Statement) -> Self {
        Query::Raw(statement)
    }
}

impl<D: Driver> Display for Query<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(statement) => statement.fmt(f),
            Query::Prepared(prepared) => prepared.fmt(f),
        }
    }
}

/// Effect summary of a modify statement.
#[derive(Default, Debug, Clone, Copy)]
pub struct RowsAffected {
    pub rows_affected: u64,
    /// Backend assigned identifier of the last inserted row, when the
    /// dialect retrieves identities that way.
    pub last_affected_id: Option<i64>,
}

/// Shared column name list of a result set.
pub type RowNames = Arc<[String]>;
/// Cell values of one row, aligned by index with the names.
pub type RowValues = Box<[Value]>;

/// One result row: labels plus values.
///
/// Produced fresh per retrieved record and owned by the caller. Rows coming
/// out of [`Select::rows`](crate::Select::rows) hold values already decoded
/// to the declared column variants; use [`RowLabeled::get`] to move them into
/// native types.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: RowValues,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: RowValues) -> Self {
        Self { labels, values }
    }

    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|label| label == name)
            .map(|i| &self.values[i])
    }

    /// Typed access by column handle.
    pub fn get<T: AsValue>(&self, column: &Column<T>) -> Result<T> {
        let value = self
            .value_of(column.def().name())
            .cloned()
            .unwrap_or_default();
        T::try_from_value(value)
    }
}

/// Heterogeneous items emitted by [`Executor::run`](crate::Executor::run).
#[derive(Debug)]
pub enum QueryResult {
    Row(RowLabeled),
    Affected(RowsAffected),
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
