//! In-memory driver for Quarry.
//!
//! Speaks the file dialect family (`SqliteSqlWriter`): statements rendered by
//! the core are parsed and executed against process-local storage, so the
//! whole pipeline, from typed declaration down to wire values and back, runs
//! end to end without a database server. Databases are addressed as
//! `memory://name`; every connection to the same name shares one store.

mod connection;
mod driver;
mod engine;
mod prepared;
mod transaction;

pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub use transaction::*;
