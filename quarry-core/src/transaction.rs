use crate::{Executor, Result};
use std::future::Future;

/// A transaction scope over a borrowed connection.
///
/// Statements submitted through the [`Executor`] surface run strictly
/// sequentially on the one connection held for the transaction's lifetime.
/// Both terminal operations consume the scope; dropping an uncommitted
/// transaction rolls it back, so the connection is released on every exit
/// path.
pub trait Transaction<'c>: Executor {
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}
