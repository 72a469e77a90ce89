use crate::{Connection, Prepared, SqlWriter};

/// A database backend: ties together its connection type, its dialect writer
/// and its prepared statement handle.
pub trait Driver: Send + Sync + Sized + 'static {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
