use crate::{MemoryConnection, MemoryPrepared};
use quarry_core::{Driver, SqliteSqlWriter};

#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryDriver;

impl MemoryDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MemoryDriver {
    type Connection = MemoryConnection;
    type SqlWriter = SqliteSqlWriter;
    type Prepared = MemoryPrepared;

    const NAME: &'static str = "memory";

    fn sql_writer(&self) -> Self::SqlWriter {
        SqliteSqlWriter::new()
    }
}
