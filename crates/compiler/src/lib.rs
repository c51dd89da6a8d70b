//! Compiles validated filter lists into native queries for SQL engines,
//! MongoDB, Elasticsearch and Cassandra.
//!
//! Every compiler skips conditions that are incomplete or carry an unknown
//! operator. Run [`model::filter::validator::validate`] first when such
//! conditions should be reported rather than dropped.

pub mod cassandra;
pub mod elastic;
pub mod error;
pub mod escape;
pub mod mongo;
pub mod sql;
pub mod target;
