//! Error types for sqlout.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for sqlout operations.
#[derive(Error, Debug)]
pub enum SqloutError {
    /// Malformed or missing command-line options.
    #[error("Argument error: {0}")]
    Argument(String),

    /// The output file could not be created.
    #[error("Cannot open output file: {0}")]
    OutputOpen(String),

    /// No compiled-in driver serves the requested backend.
    #[error("Driver unavailable: {0}")]
    DriverUnavailable(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution errors (syntax errors, constraint violations, etc.)
    #[error("Statement error: {message}")]
    Statement {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Writing a formatted line to the output failed.
    #[error("Output error: {0}")]
    OutputWrite(String),

    /// Flushing or closing the output failed.
    #[error("Cannot close output file: {0}")]
    OutputClose(String),

    /// Closing the database connection failed.
    #[error("Cannot close connection to database: {0}")]
    ConnectionClose(String),

    /// A close failure that followed an earlier, already-recorded error.
    #[error("{close}")]
    Release {
        earlier: Box<SqloutError>,
        close: Box<SqloutError>,
    },
}

impl SqloutError {
    /// Creates an argument error with the given message.
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Creates an output-open error with the given message.
    pub fn output_open(msg: impl Into<String>) -> Self {
        Self::OutputOpen(msg.into())
    }

    /// Creates a driver-unavailable error with the given message.
    pub fn driver_unavailable(msg: impl Into<String>) -> Self {
        Self::DriverUnavailable(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a statement error with no underlying driver error.
    pub fn statement(msg: impl Into<String>) -> Self {
        Self::Statement {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a statement error that keeps the driver error as its source.
    pub fn statement_with_source(msg: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Statement {
            message: msg.into(),
            source: Some(source),
        }
    }

    /// Creates an output write error with the given message.
    pub fn output_write(msg: impl Into<String>) -> Self {
        Self::OutputWrite(msg.into())
    }

    /// Creates an output close error with the given message.
    pub fn output_close(msg: impl Into<String>) -> Self {
        Self::OutputClose(msg.into())
    }

    /// Creates a connection close error with the given message.
    pub fn connection_close(msg: impl Into<String>) -> Self {
        Self::ConnectionClose(msg.into())
    }

    /// Attaches an earlier error to a close failure so both are reported.
    pub fn release(earlier: Option<Self>, close: Self) -> Self {
        match earlier {
            Some(earlier) => Self::Release {
                earlier: Box::new(earlier),
                close: Box::new(close),
            },
            None => close,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Argument(_) => "Argument Error",
            Self::OutputOpen(_) => "Output Open Error",
            Self::DriverUnavailable(_) => "Driver Error",
            Self::Connection(_) => "Connection Error",
            Self::Statement { .. } => "Statement Error",
            Self::OutputWrite(_) => "Output Error",
            Self::OutputClose(_) => "Output Close Error",
            Self::ConnectionClose(_) => "Connection Close Error",
            Self::Release { close, .. } => close.category(),
        }
    }

    /// Returns true for errors that are reported and then recovered from,
    /// letting the run continue to cleanup.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Statement { .. } | Self::OutputWrite(_))
    }

    /// Process exit code for a run that terminated with this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_recoverable() {
            0
        } else {
            1
        }
    }

    /// Returns this error's message followed by each nested cause.
    pub fn causes(&self) -> Vec<String> {
        let mut causes = vec![self.to_string()];
        let mut current = std::error::Error::source(self);
        while let Some(err) = current {
            causes.push(err.to_string());
            current = err.source();
        }
        causes
    }

    /// Renders the message printed to stderr for this error.
    ///
    /// Argument errors carry clap's rendered usage text and are printed as-is.
    /// Everything else prints each cause followed by a retry hint.
    pub fn report(&self) -> String {
        match self {
            Self::Argument(usage) => usage.clone(),
            Self::Release { earlier, close } => earlier.report() + &close.report(),
            _ => self
                .causes()
                .iter()
                .map(|cause| format!("{cause}\nPlease try again.\n"))
                .collect(),
        }
    }
}

/// Result type alias using SqloutError.
pub type Result<T> = std::result::Result<T, SqloutError>;
