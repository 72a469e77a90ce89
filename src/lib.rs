//! Quarry: a typed query construction and execution layer.
//!
//! This crate is a facade over [`quarry_core`]. Applications declare tables
//! and columns as typed values, combine them into predicate trees, and run
//! the resulting queries through a driver crate (such as `quarry-memory`)
//! implementing the [`Driver`]/[`Connection`] capabilities.
pub use quarry_core::*;
