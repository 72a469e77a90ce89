use crate::{Executor, Result, Transaction};
use std::future::Future;

/// A pooled database connection.
pub trait Connection: Executor {
    /// Open a connection to the given URL.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send
    where
        Self: Sized;

    /// Start a transaction scoped onto this connection.
    ///
    /// The transaction borrows the connection mutably for its whole
    /// lifetime: nothing else can run on the connection until the
    /// transaction is committed, rolled back or dropped.
    fn begin(&mut self) -> impl Future<Output = Result<impl Transaction<'_>>> + Send;
}
