//! Resolved run configuration for sqlout.
//!
//! Turns raw option values into the immutable settings a run works from:
//! where to connect and how to render rows.

use crate::db::DatabaseBackend;
use crate::error::{Result, SqloutError};
use tracing::warn;
use url::Url;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated text.
    #[default]
    Text,
    /// Comma-separated values.
    Csv,
}

impl OutputFormat {
    /// Parses a format name. `tsv` is accepted as an alias for `text`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "tsv" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Returns the delimiter used when none is given explicitly.
    pub fn default_delimiter(&self) -> &'static str {
        match self {
            Self::Text => "\t",
            Self::Csv => ",",
        }
    }
}

/// How result rows are rendered as text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Field separator placed between cells.
    pub delimiter: String,

    /// Whether to emit a line of column names first.
    pub header: bool,
}

impl OutputConfig {
    /// Resolves the delimiter from the format name and an optional override.
    ///
    /// A non-empty explicit delimiter always wins. Otherwise `csv` gives `,`
    /// and every other format gives a tab.
    pub fn resolve(format: Option<&str>, delimiter: Option<&str>, header: bool) -> Self {
        let delimiter = match delimiter.filter(|d| !d.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => {
                let format = match format {
                    Some(name) => OutputFormat::parse(name).unwrap_or_else(|| {
                        warn!("Unknown output format '{}', using tab-separated text", name);
                        OutputFormat::Text
                    }),
                    None => OutputFormat::default(),
                };
                format.default_delimiter().to_string()
            }
        };

        Self { delimiter, header }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: OutputFormat::default().default_delimiter().to_string(),
            header: false,
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Which driver to connect with.
    pub backend: DatabaseBackend,

    /// Server hostname, or the database file path for SQLite.
    pub host: String,

    /// Server port; the backend default when unset.
    pub port: Option<u16>,

    /// Database name; the server picks its default when unset.
    pub database: Option<String>,

    /// Database user.
    pub user: String,

    /// Database password.
    pub password: String,
}

impl ConnectionConfig {
    /// Returns the port to connect to, falling back to the backend default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.backend.default_port())
    }

    /// Converts the connection config to a server connection string.
    ///
    /// Credentials are percent-encoded so passwords may contain any character.
    pub fn to_connection_string(&self) -> Result<String> {
        let scheme = self.backend.url_scheme();
        let mut url = Url::parse(&format!("{scheme}://localhost"))
            .map_err(|e| SqloutError::connection(format!("Invalid connection URL: {e}")))?;

        url.set_host(Some(&self.host))
            .map_err(|e| SqloutError::connection(format!("Invalid hostname '{}': {e}", self.host)))?;
        url.set_port(Some(self.effective_port()))
            .map_err(|_| SqloutError::connection("Invalid port"))?;
        url.set_username(&self.user)
            .map_err(|_| SqloutError::connection("Invalid username"))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| SqloutError::connection("Invalid password"))?;
        }
        if let Some(database) = &self.database {
            url.set_path(database);
        }

        Ok(url.to_string())
    }

    /// Returns a display-safe string (no password) for log output.
    pub fn display_string(&self) -> String {
        match self.backend {
            DatabaseBackend::Sqlite => format!("sqlite:{}", self.host),
            DatabaseBackend::Postgres => {
                let database = self.database.as_deref().unwrap_or(&self.user);
                format!(
                    "{}@{}:{}/{}",
                    self.user,
                    self.host,
                    self.effective_port(),
                    database
                )
            }
        }
    }
}
