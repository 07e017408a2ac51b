//! Statement execution for a single invocation.
//!
//! Owns the connection and the output for the length of one run, and
//! releases both on every path: output first, then the connection.

use crate::classify::{classify_sql, StatementKind};
use crate::config::{ConnectionConfig, OutputConfig};
use crate::db::{self, DatabaseClient};
use crate::error::{Result, SqloutError};
use crate::format::{write_outcome, ExecutionOutcome};
use crate::output::OutputSink;
use tracing::{debug, info, warn};

/// What a run that reached cleanup accomplished.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Lines written to the output.
    pub lines_written: usize,

    /// Execution or write failure that was reported and recovered from.
    pub statement_error: Option<SqloutError>,
}

impl RunReport {
    /// Returns true if the statement ran and its output was written.
    pub fn succeeded(&self) -> bool {
        self.statement_error.is_none()
    }
}

/// Classifies `sql` and issues the matching call on `client`.
pub async fn execute_statement(
    client: &mut dyn DatabaseClient,
    sql: &str,
) -> Result<ExecutionOutcome> {
    let kind = classify_sql(sql);
    debug!("Statement classified as {}", kind);

    match kind {
        StatementKind::Mutating(keyword) => {
            let count = client.execute_update(sql).await?;
            info!("{} affected {} rows", kind, count);
            Ok(ExecutionOutcome::rows_affected(keyword, count))
        }
        StatementKind::Query => {
            let result = client.execute_query(sql).await?;
            info!(
                "Query returned {} rows in {:?}",
                result.row_count(),
                result.execution_time
            );
            Ok(ExecutionOutcome::Rows(result))
        }
    }
}

/// Connects, then runs `sql` through [`run`].
///
/// The output is closed before a connection error is returned.
pub async fn connect_and_run(
    connection: &ConnectionConfig,
    sql: &str,
    config: &OutputConfig,
    output: OutputSink,
) -> Result<RunReport> {
    info!("Connecting to {}", connection.display_string());
    let client = match db::connect(connection).await {
        Ok(client) => client,
        Err(e) => return Err(abandon(output, e)),
    };

    run(client, sql, config, output).await
}

/// Executes `sql`, writes its outcome, then closes the output and the connection.
///
/// Statement and write failures are returned inside the report so that
/// cleanup still happens. A failure to close either resource is the error,
/// and carries any statement or write failure that came before it.
pub async fn run(
    mut client: Box<dyn DatabaseClient>,
    sql: &str,
    config: &OutputConfig,
    mut output: OutputSink,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    match execute_statement(client.as_mut(), sql).await {
        Ok(outcome) => match write_outcome(&outcome, config, &mut output) {
            Ok(lines) => report.lines_written = lines,
            Err(e) => {
                report.statement_error = Some(SqloutError::output_write(format!(
                    "{}: {e}",
                    output.label()
                )))
            }
        },
        Err(e) if e.is_recoverable() => report.statement_error = Some(e),
        Err(e) => return Err(abandon_all(output, client, e).await),
    }

    let output_closed = output.close();
    let connection_closed = client.close().await;

    let mut close_failure = None;
    for error in [output_closed, connection_closed]
        .into_iter()
        .filter_map(Result::err)
    {
        close_failure = Some(SqloutError::release(close_failure.take(), error));
    }
    if let Some(error) = close_failure {
        return Err(SqloutError::release(report.statement_error, error));
    }

    debug!("Released output and connection");
    Ok(report)
}

/// Closes `output` on an early-exit path and hands back the original error.
pub fn abandon(output: OutputSink, error: SqloutError) -> SqloutError {
    if let Err(close_error) = output.close() {
        warn!("While handling '{}': {}", error, close_error);
    }
    error
}

async fn abandon_all(
    output: OutputSink,
    client: Box<dyn DatabaseClient>,
    error: SqloutError,
) -> SqloutError {
    let error = abandon(output, error);
    if let Err(close_error) = client.close().await {
        warn!("While handling '{}': {}", error, close_error);
    }
    error
}
