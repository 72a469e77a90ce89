use crate::{MemoryConnection, MemoryDriver, connection::execution_error, engine};
use anyhow::anyhow;
use async_stream::try_stream;
use quarry_core::{
    Executor, Query, QueryResult, Result, Statement, Transaction,
    stream::Stream,
};
use tokio::sync::OwnedMutexGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Committed,
    RolledBack,
}

/// A transaction over a memory database.
///
/// Holds both the storage lock and the mutable borrow of its connection for
/// its whole lifetime, so statements of concurrent transactions serialize
/// and nothing else can slip onto this connection in between. A snapshot
/// taken at begin is what rollback, drop without commit, and any execution
/// error restore.
pub struct MemoryTransaction<'c> {
    connection: &'c mut MemoryConnection,
    guard: OwnedMutexGuard<engine::Database>,
    snapshot: engine::Database,
    state: State,
}

impl<'c> MemoryTransaction<'c> {
    pub(crate) async fn new(connection: &'c mut MemoryConnection) -> Result<Self> {
        let guard = connection.database.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Self {
            connection,
            guard,
            snapshot,
            state: State::Active,
        })
    }

    fn ensure_active(&self, statement: &str) -> Result<()> {
        if self.state != State::Active {
            return Err(execution_error(
                statement,
                anyhow!("the transaction was already terminated"),
            ));
        }
        Ok(())
    }
}

impl Executor for MemoryTransaction<'_> {
    type Driver = MemoryDriver;

    fn driver(&self) -> &Self::Driver {
        self.connection.driver()
    }

    async fn prepare(&mut self, statement: Statement) -> Result<Query<Self::Driver>> {
        self.connection.prepare(statement).await
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        try_stream! {
            let (sql, stmt, params) = MemoryConnection::unpack(query)?;
            self.ensure_active(&sql)?;
            // An execution failure is terminal: restore the snapshot and
            // refuse everything submitted after it.
            let results = engine::execute(&mut self.guard, &stmt, &params).map_err(|e| {
                *self.guard = self.snapshot.clone();
                self.state = State::RolledBack;
                execution_error(&sql, e)
            })?;
            for result in results {
                yield result;
            }
        }
    }
}

impl<'c> Transaction<'c> for MemoryTransaction<'c> {
    async fn commit(mut self) -> Result<()> {
        if self.state != State::Active {
            return Err(execution_error(
                "COMMIT",
                anyhow!("the transaction was already terminated"),
            ));
        }
        self.state = State::Committed;
        Ok(())
    }

    async fn rollback(mut self) -> Result<()> {
        if self.state != State::Active {
            return Err(execution_error(
                "ROLLBACK",
                anyhow!("the transaction was already terminated"),
            ));
        }
        *self.guard = std::mem::take(&mut self.snapshot);
        self.state = State::RolledBack;
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        // Dropping an uncommitted transaction rolls back; the storage lock
        // is released either way.
        if self.state == State::Active {
            *self.guard = std::mem::take(&mut self.snapshot);
        }
    }
}
