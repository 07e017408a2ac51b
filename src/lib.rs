//! sqlout - run one SQL statement and write the result as delimited text.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod classify;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod output;
pub mod runner;
