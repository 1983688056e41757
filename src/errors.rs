//! Unified error type for Petrichor.
//!
//! Database failures are converted to `bool`/`Option` at the `DatabaseManager`
//! boundary, so most of these variants only surface during startup or inside
//! command handlers, where poise's `on_error` logs and reports them.

use thiserror::Error;

/// All errors produced by the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration (environment or TOML)
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Error raised by the database driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A table or column name that is not a plain SQL identifier
    #[error("Invalid SQL identifier: '{name}'")]
    InvalidIdentifier {
        /// The rejected identifier
        name: String,
    },

    /// The catalog reported no columns for a table
    #[error("Table '{table}' has no columns or does not exist")]
    UnknownTable {
        /// The table name that was looked up
        table: String,
    },

    /// The number of supplied values does not match the writable columns
    #[error("Table '{table}' expects {expected} values, got {actual}")]
    ValueCount {
        /// Target table
        table: String,
        /// Writable (non engine-filled) column count
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// I/O error (reading the TOML configuration)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
