use crate::engine::Stmt;
use quarry_core::{AsValue, Prepared, Result, Value, WireCodec, codec, truncate_long};
use std::fmt::{self, Display, Formatter};

/// A statement parsed once, re-runnable with fresh bindings.
#[derive(Debug, Clone)]
pub struct MemoryPrepared {
    pub(crate) sql: String,
    pub(crate) stmt: Stmt,
    pub(crate) params: Vec<Value>,
}

impl MemoryPrepared {
    pub(crate) fn new(sql: String, stmt: Stmt, params: Vec<Value>) -> Self {
        Self { sql, stmt, params }
    }
}

impl Prepared for MemoryPrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.params.clear();
        Ok(self)
    }

    fn bind(&mut self, value: impl AsValue) -> Result<&mut Self> {
        // Bound values take the same storage class lowering the renderer
        // applies to literals.
        self.params
            .push(codec::to_wire(&WireCodec::storage_classes(), value.as_value())?);
        Ok(self)
    }
}

impl Display for MemoryPrepared {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(&self.sql))
    }
}
