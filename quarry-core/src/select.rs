use crate::{
    AsValue, ColumnDef, ColumnTrait, Context, Driver, EmptinessProbe, Executor, ExecutionError, Expr,
    Order, ProjectionError, Query, Result, RowLabeled, RowValues, SqlWriter, Statement, Table,
    codec,
    stream::{Stream, StreamExt, TryStreamExt},
};
use anyhow::anyhow;
use futures::future::{self, Either};
use std::{pin::pin, sync::Arc};

/// Immutable description of a `SELECT`.
///
/// Produced by [`Table::select`] / [`Table::select_all`], narrowed by the
/// builder methods, consumed by the terminal operations. A `Select` carries
/// no cursor state: every call to [`Select::rows`] re-renders and re-executes
/// the statement, nothing is cached across iterations.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: Table,
    /// Projected columns, defaults to every column of the source.
    pub projection: Vec<Arc<ColumnDef>>,
    /// Absent means every row matches.
    pub predicate: Option<Expr>,
    pub distinct: bool,
    pub order: Vec<(Arc<ColumnDef>, Order)>,
    pub limit: Option<u64>,
}

impl Select {
    pub(crate) fn new(table: Table, predicate: Option<Expr>) -> Self {
        let projection = table.columns().to_vec();
        Self {
            table,
            projection,
            predicate,
            distinct: false,
            order: Vec::new(),
            limit: None,
        }
    }

    /// Narrow the projection. Replaces any previous narrowing; fails when a
    /// column does not belong to the source table.
    pub fn slice(mut self, columns: &[&dyn ColumnTrait]) -> Result<Self> {
        let mut projection = Vec::with_capacity(columns.len());
        for column in columns {
            let def = column.def();
            if !self.table.contains(&def.column_ref) {
                return Err(ProjectionError::ForeignColumn {
                    table: self.table.name().to_string(),
                    column: def.name().to_string(),
                }
                .into());
            }
            projection.push(def.clone());
        }
        self.projection = projection;
        Ok(self)
    }

    /// Collapse duplicate projected tuples. Idempotent.
    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append an ordering term. A later call for a column already ordered
    /// replaces the earlier term, and the column takes the new position at
    /// the end of the sequence.
    pub fn order_by(mut self, column: &dyn ColumnTrait, order: Order) -> Self {
        let def = column.def();
        self.order.retain(|(c, _)| c.column_ref != def.column_ref);
        self.order.push((def.clone(), order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of projected columns.
    pub fn arity(&self) -> usize {
        self.projection.len()
    }

    /// Render into SQL text plus the ordered parameter list.
    pub fn to_statement(&self, writer: &dyn SqlWriter) -> Result<Statement> {
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        writer.write_select(&mut context, &mut sql, self)?;
        Ok(Statement::new(sql, context.take_params()))
    }

    /// Execute and stream the matching rows, decoded to the declared column
    /// variants.
    ///
    /// The stream is lazy and the query restartable: call again to
    /// re-execute, no result is retained in between.
    pub fn rows<'e, E: Executor>(
        &self,
        executor: &'e mut E,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + use<'e, E> {
        let writer = executor.driver().sql_writer();
        let statement = self.to_statement(writer.as_dyn());
        let columns: Arc<[Arc<ColumnDef>]> = self.projection.iter().cloned().collect();
        match statement {
            Ok(statement) => Either::Left(executor.fetch(Query::Raw(statement)).map(
                move |item| {
                    let row = item?;
                    let values = columns
                        .iter()
                        .zip(row.values.into_vec())
                        .map(|(column, value)| codec::from_wire(column, value))
                        .collect::<Result<RowValues>>()?;
                    Ok(RowLabeled::new(row.labels, values))
                },
            )),
            Err(e) => Either::Right(futures::stream::once(future::ready(Err(e)))),
        }
    }

    /// Number of matching rows, lowered to the dialect's `COUNT` form.
    pub async fn count<E: Executor>(&self, executor: &mut E) -> Result<u64> {
        let writer = executor.driver().sql_writer();
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        writer.write_count(&mut context, &mut sql, self)?;
        let statement = Statement::new(sql.clone(), context.take_params());
        let mut rows = pin!(executor.fetch(Query::Raw(statement)));
        let row = rows.try_next().await?.ok_or_else(|| {
            ExecutionError::new(writer.dialect(), sql, anyhow!("COUNT returned no row"))
        })?;
        let count = i64::try_from_value(row.values.first().cloned().unwrap_or_default())?;
        Ok(count as u64)
    }

    /// Whether no row matches, lowered to the dialect's emptiness probe
    /// rather than materializing the result set.
    pub async fn is_empty<E: Executor>(&self, executor: &mut E) -> Result<bool> {
        let writer = executor.driver().sql_writer();
        let mut context = Context::new();
        let mut sql = String::with_capacity(256);
        writer.write_exists_probe(&mut context, &mut sql, self)?;
        let statement = Statement::new(sql, context.take_params());
        match writer.emptiness_probe() {
            EmptinessProbe::Exists => {
                let mut rows = pin!(executor.fetch(Query::Raw(statement)));
                let row = rows.try_next().await?.ok_or_else(|| {
                    ExecutionError::new(
                        writer.dialect(),
                        String::new(),
                        anyhow!("EXISTS returned no row"),
                    )
                })?;
                let exists = bool::try_from_value(row.values.first().cloned().unwrap_or_default())?;
                Ok(!exists)
            }
            EmptinessProbe::LimitOne => {
                let mut rows = pin!(executor.fetch(Query::Raw(statement)));
                Ok(rows.try_next().await?.is_none())
            }
        }
    }
}
