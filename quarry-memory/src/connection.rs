use crate::{MemoryDriver, MemoryPrepared, MemoryTransaction, engine};
use anyhow::anyhow;
use async_stream::try_stream;
use quarry_core::{
    Connection, Driver, Error, Executor, ExecutionError, Query, QueryResult, Result, Statement,
    Value,
    stream::Stream,
};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex as StdMutex},
};
use tokio::sync::Mutex;
use url::Url;

/// Named databases shared by every connection in the process, the way a
/// file engine shares a database file between connections.
static DATABASES: LazyLock<StdMutex<HashMap<String, Arc<Mutex<engine::Database>>>>> =
    LazyLock::new(|| StdMutex::new(HashMap::new()));

pub struct MemoryConnection {
    pub(crate) database: Arc<Mutex<engine::Database>>,
}

impl MemoryConnection {
    /// Parse the query into its executable parts, surfacing parse failures
    /// as execution errors.
    pub(crate) fn unpack(query: Query<MemoryDriver>) -> Result<(String, engine::Stmt, Vec<Value>)> {
        match query {
            Query::Raw(Statement { sql, params }) => {
                let stmt = engine::parse(&sql).map_err(|e| execution_error(&sql, e))?;
                Ok((sql, stmt, params))
            }
            Query::Prepared(MemoryPrepared { sql, stmt, params }) => Ok((sql, stmt, params)),
        }
    }
}

/// Wrap a driver failure, keeping the statement text but never its
/// parameter values, and log it at the boundary.
pub(crate) fn execution_error(sql: &str, source: anyhow::Error) -> Error {
    let error = ExecutionError::new(MemoryDriver::NAME, sql.to_string(), source);
    log::error!("{}", error);
    error.into()
}

impl Executor for MemoryConnection {
    type Driver = MemoryDriver;

    fn driver(&self) -> &Self::Driver {
        &MemoryDriver
    }

    async fn prepare(&mut self, statement: Statement) -> Result<Query<Self::Driver>> {
        let stmt =
            engine::parse(&statement.sql).map_err(|e| execution_error(&statement.sql, e))?;
        Ok(Query::Prepared(MemoryPrepared::new(
            statement.sql,
            stmt,
            statement.params,
        )))
    }

    fn run(
        &mut self,
        query: Query<Self::Driver>,
    ) -> impl Stream<Item = Result<QueryResult>> + Send {
        let database = self.database.clone();
        try_stream! {
            let (sql, stmt, params) = Self::unpack(query)?;
            let results = {
                let mut db = database.lock().await;
                engine::execute(&mut db, &stmt, &params)
                    .map_err(|e| execution_error(&sql, e))?
            };
            for result in results {
                yield result;
            }
        }
    }
}

impl Connection for MemoryConnection {
    async fn connect(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| execution_error(url, anyhow!("malformed connection URL: {}", e)))?;
        if parsed.scheme() != MemoryDriver::NAME {
            return Err(execution_error(
                url,
                anyhow!(
                    "expected the connection URL to start with `{}://`",
                    MemoryDriver::NAME,
                ),
            ));
        }
        let name = parsed.host_str().unwrap_or_default();
        let database = if name.is_empty() {
            // Anonymous database, private to this connection.
            Arc::new(Mutex::new(engine::Database::default()))
        } else {
            DATABASES
                .lock()
                .expect("database registry poisoned")
                .entry(name.to_string())
                .or_default()
                .clone()
        };
        Ok(Self { database })
    }

    #[allow(refining_impl_trait)]
    async fn begin(&mut self) -> Result<MemoryTransaction<'_>> {
        MemoryTransaction::new(self).await
    }
}
