use crate::{
    Driver, Query, QueryResult, Result, RowLabeled, RowsAffected, Statement,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::future::Future;

/// Something that can run statements: a connection, or a transaction scoped
/// onto one.
///
/// All methods take `&mut self`: one in-flight statement at a time per
/// executor is an invariant the borrow checker enforces, not a convention.
pub trait Executor: Send {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Pre-parse a statement into a reusable prepared handle.
    fn prepare(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<Query<Self::Driver>>> + Send;

    /// Send any query and stream every kind of result it produces.
    fn run(&mut self, query: Query<Self::Driver>)
    -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the query and stream its rows.
    fn fetch(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(query).filter_map(|item| async move {
            match item {
                Ok(QueryResult::Row(row)) => Some(Ok(row)),
                Ok(QueryResult::Affected(..)) => None,
                Err(e) => Some(Err(e)),
            }
        })
    }

    /// Execute the query and return the aggregated modify effect.
    fn execute(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|item| async move {
                match item {
                    Ok(QueryResult::Affected(affected)) => Some(Ok(affected)),
                    Ok(QueryResult::Row(..)) => None,
                    Err(e) => Some(Err(e)),
                }
            })
            .try_fold(RowsAffected::default(), |mut acc, item| async move {
                acc.rows_affected += item.rows_affected;
                if item.last_affected_id.is_some() {
                    acc.last_affected_id = item.last_affected_id;
                }
                Ok(acc)
            })
    }
}
