//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using sqlx.

use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult, Row};
use crate::error::{Result, SqloutError};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, Connection, Executor, Row as SqlxRow, Statement, ValueRef};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::debug;

/// Connection timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL database client holding a single connection.
pub struct PostgresClient {
    conn: PgConnection,
}

impl PostgresClient {
    /// Opens a connection to the server described by `config`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;
        let options = PgConnectOptions::from_str(&conn_str)
            .map_err(|e| SqloutError::connection(format!("Invalid connection options: {e}")))?
            .application_name(env!("CARGO_PKG_NAME"));

        debug!("Connecting to {}", config.display_string());

        let conn = tokio::time::timeout(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            PgConnection::connect_with(&options),
        )
        .await
        .map_err(|_| {
            SqloutError::connection(format!(
                "Connection to {}:{} timed out after {CONNECT_TIMEOUT_SECS} seconds.",
                config.host,
                config.effective_port()
            ))
        })?
        .map_err(|e| map_connection_error(e, config))?;

        debug!("Successfully connected to database");
        Ok(Self { conn })
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_update(&mut self, sql: &str) -> Result<u64> {
        // Simple-query protocol so transaction control and DDL go through unprepared.
        let result = self
            .conn
            .execute(sqlx::raw_sql(sql))
            .await
            .map_err(statement_error)?;

        Ok(result.rows_affected())
    }

    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        // Column labels come from the prepared statement so an empty result keeps them.
        let statement = self.conn.prepare(sql).await.map_err(statement_error)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        // Rows are fetched in text format, which renders every type the way the server prints it.
        let pg_rows: Vec<PgRow> = self
            .conn
            .fetch_all(sqlx::raw_sql(sql))
            .await
            .map_err(statement_error)?;

        let rows = pg_rows
            .iter()
            .map(convert_row)
            .collect::<Result<Vec<Row>>>()?;

        debug!("Fetched {} rows with {} columns", rows.len(), columns.len());

        Ok(QueryResult::with_data(columns, rows).with_execution_time(start.elapsed()))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| SqloutError::connection_close(e.to_string()))
    }
}

/// Converts a text-format PgRow to our Row type.
fn convert_row(row: &PgRow) -> Result<Row> {
    (0..row.len())
        .map(|index| -> Result<Option<String>> {
            let value = row
                .try_get_raw(index)
                .map_err(|e| SqloutError::statement_with_source("Cannot read column", e))?;
            if value.is_null() {
                return Ok(None);
            }
            value.as_str().map(|s| Some(s.to_string())).map_err(|e| {
                SqloutError::statement(format!("Cannot decode column {}: {e}", index + 1))
            })
        })
        .collect()
}

fn statement_error(error: sqlx::Error) -> SqloutError {
    let message = format_query_error(&error);
    SqloutError::statement_with_source(message, error)
}

/// Maps sqlx connection errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> SqloutError {
    let host = &config.host;
    let port = config.effective_port();
    let user = &config.user;
    let database = config.database.as_deref().unwrap_or(user);

    let error_str = error.to_string().to_lowercase();

    if error_str.contains("connection refused") || error_str.contains("could not connect") {
        SqloutError::connection(format!(
            "Cannot connect to {host}:{port}. Check that the server is running."
        ))
    } else if error_str.contains("password authentication failed")
        || error_str.contains("authentication failed")
    {
        SqloutError::connection(format!(
            "Authentication failed for user '{user}'. Check your credentials."
        ))
    } else if error_str.contains("does not exist") && error_str.contains("database") {
        SqloutError::connection(format!("Database '{database}' does not exist."))
    } else if error_str.contains("ssl") || error_str.contains("tls") {
        SqloutError::connection(format!("TLS negotiation with {host}:{port} failed: {error}"))
    } else if error_str.contains("timed out") || error_str.contains("timeout") {
        SqloutError::connection(format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        ))
    } else {
        SqloutError::connection(error.to_string())
    }
}

/// Formats a query error with PostgreSQL detail and hint lines if available.
fn format_query_error(error: &sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }

        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }

        if let Some(table) = pg_error.table() {
            result.push_str("\n  TABLE: ");
            result.push_str(table);
        }

        if let Some(column) = pg_error.column() {
            result.push_str("\n  COLUMN: ");
            result.push_str(column);
        }

        if let Some(constraint) = pg_error.constraint() {
            result.push_str("\n  CONSTRAINT: ");
            result.push_str(constraint);
        }
    }

    result
}
