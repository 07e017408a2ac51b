//! Command-line argument parsing for sqlout.
//!
//! Uses clap to parse CLI arguments. Connection options fall back to
//! `SQLOUT_*` environment variables.

use crate::config::{ConnectionConfig, OutputConfig};
use crate::db::DatabaseBackend;
use crate::error::{Result, SqloutError};
use crate::output::OutputTarget;
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

const EXAMPLE: &str = "Example:\n  sqlout -H dbhost -u johndoe -p mypassword -o current_date.txt -d '|' -f text -r 'select current_date'";

/// Run one SQL statement and write the result as delimited text.
#[derive(Parser, Debug)]
#[command(name = "sqlout")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true, after_help = EXAMPLE)]
pub struct Cli {
    /// The SQL to run
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Connect as this username
    #[arg(short = 'u', long, env = "SQLOUT_USERNAME", value_name = "USERNAME")]
    pub username: String,

    /// Connect with this password
    #[arg(
        short = 'p',
        long,
        env = "SQLOUT_PASSWORD",
        hide_env_values = true,
        value_name = "PASSWORD"
    )]
    pub password: String,

    /// Connect to this hostname (the database file for sqlite)
    #[arg(short = 'H', long, env = "SQLOUT_HOSTNAME", value_name = "HOSTNAME")]
    pub hostname: String,

    /// Write output to this file (default is stdout)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format: text or csv (text is tab-separated)
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Field delimiter; overrides the format's delimiter
    #[arg(short = 'd', long, value_name = "DELIMITER", allow_hyphen_values = true)]
    pub delimiter: Option<String>,

    /// Print column names as the first line
    #[arg(short = 'r', long)]
    pub header: bool,

    /// Database backend: postgres or sqlite
    #[arg(
        short = 'b',
        long,
        env = "SQLOUT_BACKEND",
        value_name = "BACKEND",
        default_value = "postgres"
    )]
    pub backend: String,

    /// Server port (backend default when omitted)
    #[arg(short = 'P', long, env = "SQLOUT_PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Database name (server default when omitted)
    #[arg(short = 'D', long, env = "SQLOUT_DATABASE", value_name = "DATABASE")]
    pub database: Option<String>,
}

impl Cli {
    /// Parses the process arguments.
    ///
    /// Returns `Ok(None)` after help or version text has been printed.
    pub fn parse_args() -> Result<Option<Self>> {
        Self::parse_args_from(std::env::args_os())
    }

    /// Parses the given arguments; the first is the program name.
    pub fn parse_args_from<I, T>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(Some(cli)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                // Writes to stdout for these kinds.
                let _ = e.print();
                Ok(None)
            }
            Err(e) => Err(SqloutError::argument(e.render().to_string())),
        }
    }

    /// Resolves how rows are rendered.
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::resolve(Some(&self.format), self.delimiter.as_deref(), self.header)
    }

    /// Resolves where output is written.
    pub fn output_target(&self) -> OutputTarget {
        OutputTarget::from_arg(self.output.as_deref())
    }

    /// Resolves the connection settings, including the driver to use.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        Ok(ConnectionConfig {
            backend: DatabaseBackend::resolve(&self.backend)?,
            host: self.hostname.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.username.clone(),
            password: self.password.clone(),
        })
    }
}
