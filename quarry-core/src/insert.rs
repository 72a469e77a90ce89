use crate::{
    AsValue, Column, ColumnDef, ColumnTrait, Context, Driver, Executor, ExecutionError, IdentityRetrieval,
    ProjectionError, Query, Result, RowsAffected, SchemaError, SqlWriter, Statement, Table, Value, codec,
    stream::TryStreamExt,
};
use anyhow::anyhow;
use std::{pin::pin, sync::Arc};

/// An `INSERT` of one row under construction.
///
/// Values pass the codec check when they are attached: a type or nullability
/// mismatch surfaces here, before any SQL exists.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: Table,
    pub sets: Vec<(Arc<ColumnDef>, Value)>,
}

impl Insert {
    pub(crate) fn new(table: Table) -> Self {
        Self {
            table,
            sets: Vec::new(),
        }
    }

    pub fn set<T: AsValue>(self, column: &Column<T>, value: T) -> Result<Self> {
        self.set_value(column, value.as_value())
    }

    /// Untyped entry point; the codec rejects a value whose runtime type
    /// does not match the column declaration.
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

    pub fn to_statement(
        &self,
        writer: &dyn crate::SqlWriter,
        returning_identity: bool,
    ) -> Result<Statement> {
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        writer.write_insert(&mut context, &mut sql, self, returning_identity)?;
        Ok(Statement::new(sql, context.take_params()))
    }

    pub async fn execute<E: Executor>(&self, executor: &mut E) -> Result<RowsAffected> {
        let writer = executor.driver().sql_writer();
        let statement = self.to_statement(writer.as_dyn(), false)?;
        executor.execute(Query::Raw(statement)).await
    }

    /// Execute and hand back the auto generated identity value, decoded
    /// through the same codec used for reads: the value is immediately
    /// usable as a filter operand of the identity column's type.
    pub async fn execute_returning_id<T: AsValue, E: Executor>(
        &self,
        executor: &mut E,
    ) -> Result<T> {
        let identity = self.table.identity().cloned().ok_or_else(|| {
            crate::Error::Schema(SchemaError::NoIdentityColumn {
                table: self.table.name().to_string(),
            })
        })?;
        let writer = executor.driver().sql_writer();
        let statement = self.to_statement(writer.as_dyn(), true)?;
        let sql = statement.sql.clone();
        match writer.identity_retrieval() {
            IdentityRetrieval::Returning => {
                let mut rows = pin!(executor.fetch(Query::Raw(statement)));
                let row = rows.try_next().await?.ok_or_else(|| {
                    ExecutionError::new(writer.dialect(), sql, anyhow!("RETURNING produced no row"))
                })?;
                let value =
                    codec::from_wire(&identity, row.values.first().cloned().unwrap_or_default())?;
                T::try_from_value(value)
            }
            IdentityRetrieval::LastInsertId => {
                let affected = executor.execute(Query::Raw(statement)).await?;
                let id = affected.last_affected_id.ok_or_else(|| {
                    ExecutionError::new(
                        writer.dialect(),
                        sql,
                        anyhow!("the driver did not report an inserted identifier"),
                    )
                })?;
                let value = codec::from_wire(&identity, Value::Int64(Some(id)))?;
                T::try_from_value(value)
            }
        }
    }
}
