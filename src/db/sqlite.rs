//! SQLite database client implementation.
//!
//! The hostname names the database file; `:memory:` opens a private
//! in-memory database. Username and password are ignored.

use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult, Row};
use crate::error::{Result, SqloutError};
use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Decode, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

const IN_MEMORY: &str = ":memory:";

/// SQLite database client holding a single connection.
pub struct SqliteClient {
    conn: SqliteConnection,
}

impl SqliteClient {
    /// Opens the database file named by `config.host`.
    ///
    /// A missing file is a connection error; it is never created.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = if config.host == IN_MEMORY {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| SqloutError::connection(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.host)
                .create_if_missing(false)
        };

        debug!("Opening {}", config.display_string());

        let conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| {
                SqloutError::connection(format!("Cannot open database '{}': {e}", config.host))
            })?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn execute_update(&mut self, sql: &str) -> Result<u64> {
        let result = self
            .conn
            .execute(sqlx::raw_sql(sql))
            .await
            .map_err(statement_error)?;

        Ok(result.rows_affected())
    }

    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let statement = self.conn.prepare(sql).await.map_err(statement_error)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let sqlite_rows: Vec<SqliteRow> = statement
            .query()
            .fetch_all(&mut self.conn)
            .await
            .map_err(statement_error)?;

        let rows = sqlite_rows
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

/// Converts a SqliteRow to our Row type.
///
/// Values are rendered with SQLite's own text conversion, so `2.0` stays
/// `2.0`. Blobs are raw bytes and render as lossy UTF-8.
fn convert_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len())
        .map(|index| -> Result<Option<String>> {
            let value = row
                .try_get_raw(index)
                .map_err(|e| SqloutError::statement_with_source("Cannot read column", e))?;
            if value.is_null() {
                return Ok(None);
            }

            let text = if value.type_info().name().eq_ignore_ascii_case("BLOB") {
                <Vec<u8> as Decode<Sqlite>>::decode(value)
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            } else {
                <String as Decode<Sqlite>>::decode(value)
            };

            text.map(Some).map_err(|e| {
                SqloutError::statement(format!("Cannot decode column {}: {e}", index + 1))
            })
        })
        .collect()
}

fn statement_error(error: sqlx::Error) -> SqloutError {
    let message = match error.as_database_error() {
        Some(db_error) => format!("ERROR: {}", db_error.message()),
        None => error.to_string(),
    };
    SqloutError::statement_with_source(message, error)
}
