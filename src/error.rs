//! Error types for redis-compat.
//!
//! Native client failures arrive as [`NativeError`], a flat set of error
//! categories reported by the client library. [`translate`] maps each
//! category onto the closed [`ErrorKind`] taxonomy exposed to callers.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Boxed error used as the cause of a [`DataAccessError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

const CONNECT_FAILED: &str = "Could not connect to server";
const POOL_TIMED_OUT: &str = "Connection pool timed out. Could not get connection";
const UNEXPECTED_CLIENT_ERROR: &str = "Unexpected client error";

/// The closed set of error kinds seen by the data-access layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad API usage or a data/protocol level error reported by the server.
    DataAccess,
    /// Network or host failure, including unknown hosts and pool timeouts.
    ConnectionFailure,
    /// Anything unexpected or uncategorized.
    System,
}

/// Error category reported by the native client library.
#[derive(Debug, Error)]
pub enum NativeError {
    /// Data or protocol level error (e.g. `WRONGTYPE`, `ERR syntax error`).
    #[error("{0}")]
    Data(String),

    /// Connection level error raised by the client.
    #[error("{0}")]
    Connection(String),

    /// Generic top-level client error that is neither data nor connection.
    #[error("{0}")]
    Client(String),

    /// Host name could not be resolved.
    #[error("{0}")]
    UnknownHost(io::Error),

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Timed out waiting for a pooled connection.
    #[error("{0}")]
    PoolTimeout(String),

    /// An error that did not originate in the client library.
    #[error(transparent)]
    Foreign(BoxError),
}

impl NativeError {
    /// Wrap an arbitrary error that is not a client library error.
    pub fn foreign(err: impl Into<BoxError>) -> Self {
        Self::Foreign(err.into())
    }
}

/// Error surfaced to the data-access layer.
///
/// Every variant keeps the error it was built from as its `source()`.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("{message}")]
    InvalidDataAccess {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("{message}")]
    ConnectionFailure {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("{message}")]
    System {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl DataAccessError {
    /// Create an invalid data access error.
    pub fn invalid(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::InvalidDataAccess {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create a connection failure.
    pub fn connection(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ConnectionFailure {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create a system error.
    pub fn system(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::System {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDataAccess { .. } => ErrorKind::DataAccess,
            Self::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            Self::System { .. } => ErrorKind::System,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidDataAccess { message, .. }
            | Self::ConnectionFailure { message, .. }
            | Self::System { message, .. } => message,
        }
    }
}

/// Result type alias for data-access operations.
pub type DataAccessResult<T> = Result<T, DataAccessError>;

/// Outcome of [`translate`].
#[derive(Debug)]
pub enum Translation {
    /// The native error was mapped onto the taxonomy.
    Converted(DataAccessError),
    /// The error is not a client library error; it is handed back untouched
    /// so the caller can apply its own fallback.
    NotHandled(NativeError),
}

/// Translate a native client error.
///
/// A pool timeout is returned as `Err` so that `?` propagates it straight
/// away; it is never handed back as a [`Translation`].
pub fn translate(err: NativeError) -> DataAccessResult<Translation> {
    let converted = match err {
        NativeError::Data(ref msg) => DataAccessError::invalid(msg.clone(), err),
        NativeError::Connection(ref msg) => DataAccessError::connection(msg.clone(), err),
        NativeError::UnknownHost(ref io_err) => {
            DataAccessError::connection(format!("Unknown host: {}", io_err), err)
        }
        NativeError::Io(_) => DataAccessError::connection(CONNECT_FAILED, err),
        NativeError::PoolTimeout(_) => {
            return Err(DataAccessError::connection(POOL_TIMED_OUT, err));
        }
        NativeError::Foreign(_) => return Ok(Translation::NotHandled(err)),
        // fallback to invalid data access
        NativeError::Client(ref msg) => DataAccessError::invalid(msg.clone(), err),
    };

    Ok(Translation::Converted(converted))
}

/// Translate a native error, wrapping anything unhandled into
/// [`ErrorKind::System`].
pub fn into_data_access(err: NativeError) -> DataAccessError {
    match translate(err) {
        Ok(Translation::Converted(converted)) => converted,
        Ok(Translation::NotHandled(original)) => {
            DataAccessError::system(UNEXPECTED_CLIENT_ERROR, original)
        }
        Err(fatal) => fatal,
    }
}

impl From<NativeError> for DataAccessError {
    fn from(err: NativeError) -> Self {
        into_data_access(err)
    }
}
