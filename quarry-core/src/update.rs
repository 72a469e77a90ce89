use crate::{
    AsValue, Column, ColumnDef, ColumnTrait, Context, Driver, Executor, Expr, ProjectionError, Query,
    Result, RowsAffected, SqlWriter, Statement, Table, Value, codec,
};
use std::sync::Arc;

/// An `UPDATE` under construction. Assignments pass the codec check when
/// they are attached.
#[derive(Debug, Clone)]
pub struct Update {
    pub table: Table,
    /// Absent means every row is updated.
    pub predicate: Option<Expr>,
    pub sets: Vec<(Arc<ColumnDef>, Value)>,
}

impl Update {
    pub(crate) fn new(table: Table, predicate: Option<Expr>) -> Self {
        Self {
            table,
            predicate,
            sets: Vec::new(),
        }
    }

    pub fn set<T: AsValue>(self, column: &Column<T>, value: T) -> Result<Self> {
        self.set_value(column, value.as_value())
    }

    pub fn set_value(mut self, column: &dyn ColumnTrait, value: Value) -> Result<Self> {
        let def = column.def();
        if !self.table.contains(&def.column_ref) {
            return Err(ProjectionError::ForeignColumn {
                table: self.table.name().to_string(),
                column: def.name().to_string(),
            }
            .into());
        }
        codec::check(def, &value)?;
        if let Some(entry) = self
            .sets
            .iter_mut()
            .find(|(c, _)| c.column_ref == def.column_ref)
        {
            entry.1 = value;
        } else {
            self.sets.push((def.clone(), value));
        }
        Ok(self)
    }

    pub fn to_statement(&self, writer: &dyn crate::SqlWriter) -> Result<Statement> {
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        writer.write_update(&mut context, &mut sql, self)?;
        Ok(Statement::new(sql, context.take_params()))
    }

    pub async fn execute<E: Executor>(&self, executor: &mut E) -> Result<RowsAffected> {
        let writer = executor.driver().sql_writer();
        let statement = self.to_statement(writer.as_dyn())?;
        executor.execute(Query::Raw(statement)).await
    }
}
