//! Integration tests for sqlout.

pub mod common;
pub mod connection_test;
pub mod query_test;
