//! Mock database clients for testing.
//!
//! Provide in-memory stand-ins for a real connection so the run pipeline can
//! be exercised without a database server.

use super::{DatabaseClient, QueryResult};
use crate::error::{Result, SqloutError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Which trait method a mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Update(String),
    Query(String),
    Close,
}

/// Shared log of the calls a mock received, readable after the mock is boxed.
pub type CallLog = Arc<Mutex<Vec<MockCall>>>;

/// A mock database client that returns predefined results.
#[derive(Default)]
pub struct MockDatabaseClient {
    result: QueryResult,
    rows_affected: u64,
    calls: CallLog,
}

impl MockDatabaseClient {
    /// Creates a mock that returns an empty result and zero affected rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result returned by `execute_query`.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = result;
        self
    }

    /// Sets the count returned by `execute_update`.
    pub fn with_rows_affected(mut self, rows_affected: u64) -> Self {
        self.rows_affected = rows_affected;
        self
    }

    /// Returns a handle to the call log.
    pub fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_update(&mut self, sql: &str) -> Result<u64> {
        self.record(MockCall::Update(sql.to_string()));
        Ok(self.rows_affected)
    }

    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        self.record(MockCall::Query(sql.to_string()));
        Ok(self.result.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.record(MockCall::Close);
        Ok(())
    }
}

/// A mock client whose statements always fail, and whose close can fail too.
#[derive(Default)]
pub struct FailingDatabaseClient {
    fail_close: bool,
    calls: CallLog,
}

impl FailingDatabaseClient {
    /// Creates a client whose statements fail but whose close succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `close` fail as well.
    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Returns a handle to the call log.
    pub fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn failure(sql: &str) -> SqloutError {
        SqloutError::statement_with_source(
            format!("ERROR: mock failure for: {sql}"),
            sqlx::Error::Protocol("mock protocol error".to_string()),
        )
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_update(&mut self, sql: &str) -> Result<u64> {
        self.record(MockCall::Update(sql.to_string()));
        Err(Self::failure(sql))
    }

    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        self.record(MockCall::Query(sql.to_string()));
        Err(Self::failure(sql))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.record(MockCall::Close);
        if self.fail_close {
            Err(SqloutError::connection_close("mock close failure"))
        } else {
            Ok(())
        }
    }
}
