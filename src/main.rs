//! sqlout - run one SQL statement and write the result as delimited text.

use sqlout::cli::Cli;
use sqlout::error::Result;
use sqlout::logging;
use sqlout::output::OutputSink;
use sqlout::runner::{self, RunReport};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    match run().await {
        Ok(Some(report)) => {
            if let Some(e) = &report.statement_error {
                eprint!("{}", e.report());
            }
            debug!("Wrote {} lines", report.lines_written);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{}: {}", e.category(), e);
            eprint!("{}", e.report());
            ExitCode::from(e.exit_code())
        }
    }
}

/// Parses arguments, opens the output, then connects and runs the statement.
///
/// Returns `None` when only help or version text was requested.
async fn run() -> Result<Option<RunReport>> {
    let Some(cli) = Cli::parse_args()? else {
        return Ok(None);
    };

    let output_config = cli.output_config();
    let output = OutputSink::open(cli.output_target())?;

    let connection = match cli.connection_config() {
        Ok(connection) => connection,
        Err(e) => return Err(runner::abandon(output, e)),
    };

    runner::connect_and_run(&connection, &cli.query, &output_config, output)
        .await
        .map(Some)
}
