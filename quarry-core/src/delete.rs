use crate::{Context, Driver, Executor, Expr, Query, Result, RowsAffected, SqlWriter, Statement, Table};

/// A `DELETE` descriptor.
#[derive(Debug, Clone)]
pub struct Delete {
    pub table: Table,
    /// Absent means every row is deleted.
    pub predicate: Option<Expr>,
}

impl Delete {
    pub(crate) fn new(table: Table, predicate: Option<Expr>) -> Self {
        Self { table, predicate }
    }

    pub fn to_statement(&self, writer: &dyn crate::SqlWriter) -> Result<Statement> {
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        writer.write_delete(&mut context, &mut sql, self)?;
        Ok(Statement::new(sql, context.take_params()))
    }

    pub async fn execute<E: Executor>(&self, executor: &mut E) -> Result<RowsAffected> {
        let writer = executor.driver().sql_writer();
        let statement = self.to_statement(writer.as_dyn())?;
        executor.execute(Query::Raw(statement)).await
    }
}
