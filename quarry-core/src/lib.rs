//! Core of Quarry: the typed query construction and execution layer.
//!
//! Applications declare [`Table`]s and typed [`Column`]s, combine them into
//! immutable [`Expr`] predicate trees, wrap those into [`Select`] / [`Insert`]
//! / [`Update`] / [`Delete`] descriptors, and hand the descriptors to an
//! [`Executor`]. A dialect [`SqlWriter`] lowers every descriptor into SQL
//! text plus an ordered parameter list; the [`codec`] moves values between
//! their declared variants and the dialect's wire representation on the way
//! in and out.

mod as_value;
pub mod codec;
mod column;
mod connection;
mod delete;
mod driver;
mod error;
mod executor;
mod expression;
mod insert;
mod prepared;
mod query;
mod select;
mod table;
mod transaction;
mod update;
mod util;
mod value;
mod writer;

pub use as_value::*;
pub use codec::WireCodec;
pub use column::*;
pub use connection::*;
pub use delete::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use insert::*;
pub use prepared::*;
pub use query::*;
pub use select::*;
pub use table::*;
pub use transaction::*;
pub use update::*;
pub use util::*;
pub use value::*;
pub use writer::*;

pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
