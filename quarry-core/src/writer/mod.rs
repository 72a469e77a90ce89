mod context;
mod generic;
mod postgres;
mod sql_writer;
mod sqlite;

pub use context::*;
pub use generic::*;
pub use postgres::*;
pub use sql_writer::*;
pub use sqlite::*;
