//! Behavioural test suite any [`Connection`] implementation must pass.
//!
//! Driver crates call [`execute_tests`] from their own test binary with a
//! freshly connected backend; everything here goes through the public
//! builder / executor surface only.

mod compound;
mod distinct;
mod dml;
mod fixtures;
mod membership;
mod roundtrip;
mod select;
mod transactions;

pub use fixtures::Dataset;

use log::LevelFilter;
use quarry::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(mut connection: C) {
    select::select_basics(&mut connection).await;
    select::sized_queries(&mut connection).await;
    membership::in_list(&mut connection).await;
    membership::empty_in_list(&mut connection).await;
    membership::row_tuple_in_list(&mut connection).await;
    membership::tuple_partition(&mut connection).await;
    membership::sub_queries(&mut connection).await;
    compound::compound_folds(&mut connection).await;
    distinct::distinct_projection(&mut connection).await;
    distinct::order_by_override(&mut connection).await;
    dml::insert_update_delete(&mut connection).await;
    dml::identity_round_trip(&mut connection).await;
    transactions::transactions(&mut connection).await;
    roundtrip::value_round_trip(&mut connection).await;
}
