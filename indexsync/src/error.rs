//! Error types and result definitions for index synchronization.
//!
//! Provides a kind-classified error type with captured diagnostic metadata
//! for all pipeline operations. Errors carry a static description, optional
//! dynamic detail, an optional source error, the callsite location, and a
//! backtrace.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for synchronization operations using [`SyncError`]
/// as the error type.
pub type SyncResult<T> = Result<T, SyncError>;

/// Specific categories of errors that can occur during synchronization.
///
/// Kinds are neutral with respect to which side of the pipeline they occur
/// on; the fetch or publish stage provides that context when the error is
/// reported.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Could not reach the search service.
    ConnectionFailed,
    /// The search service rejected or failed a request.
    RequestFailed,
    /// A request exceeded the configured timeout.
    RequestTimeout,
    /// The search service rejected the supplied credentials.
    AuthenticationError,
    /// Encoding a request payload failed.
    SerializationError,
    /// Decoding a response payload failed.
    DeserializationError,
    /// A record or cursor did not have the expected shape.
    InvalidData,
    /// Configuration was structurally valid but unusable.
    ConfigError,
    /// An I/O operation failed.
    IoError,
    /// Uncategorized failure.
    Unknown,
}

/// Main error type for synchronization operations.
///
/// [`SyncError`] couples an [`ErrorKind`] with a human-readable description
/// and captured diagnostics. Construct instances with the [`sync_error!`] and
/// [`bail!`] macros or the `From` conversions below.
///
/// [`sync_error!`]: crate::sync_error
/// [`bail!`]: crate::bail
#[derive(Debug, Clone)]
pub struct SyncError {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

impl SyncError {
    /// Creates a [`SyncError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        SyncError {
            kind,
            description,
            detail,
            source,
            location: Location::caller(),
            backtrace: Arc::new(Backtrace::capture()),
        }
    }

    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> &Backtrace {
        self.backtrace.as_ref()
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance.
    ///
    /// The stored source is preserved across clones and exposed via
    /// [`error::Error::source`].
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }
}

impl PartialEq for SyncError {
    /// Compares errors by kind only; diagnostics are ignored.
    fn eq(&self, other: &SyncError) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            self.kind,
            self.description,
            self.location.file(),
            self.location.line(),
            self.location.column()
        )?;

        if let Some(detail) = self.detail.as_deref() {
            write!(f, "\n  Detail: {detail}")?;
        }

        Ok(())
    }
}

impl error::Error for SyncError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Creates a [`SyncError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for SyncError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> SyncError {
        SyncError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`SyncError`] from an error kind, static description, and
/// dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for SyncError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> SyncError {
        SyncError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`std::io::Error`] to [`SyncError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for SyncError {
    #[track_caller]
    fn from(err: std::io::Error) -> SyncError {
        let detail = err.to_string();
        let source = Arc::new(err);
        SyncError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

/// Converts [`serde_json::Error`] to [`SyncError`] with the appropriate
/// error kind based on error classification.
impl From<serde_json::Error> for SyncError {
    #[track_caller]
    fn from(err: serde_json::Error) -> SyncError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Data
            | serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        let detail = err.to_string();
        let source = Arc::new(err);
        SyncError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

/// Converts [`reqwest::Error`] to [`SyncError`] with the appropriate error
/// kind.
///
/// Timeouts and connection failures map onto their dedicated kinds so that
/// callers can distinguish an unreachable service from one that rejected a
/// request.
impl From<reqwest::Error> for SyncError {
    #[track_caller]
    fn from(err: reqwest::Error) -> SyncError {
        let (kind, description) = if err.is_timeout() {
            (
                ErrorKind::RequestTimeout,
                "Search service request timed out",
            )
        } else if err.is_connect() {
            (
                ErrorKind::ConnectionFailed,
                "Search service connection failed",
            )
        } else if err.is_decode() {
            (
                ErrorKind::DeserializationError,
                "Search service response decoding failed",
            )
        } else {
            (ErrorKind::RequestFailed, "Search service request failed")
        };

        let detail = err.to_string();
        let source = Arc::new(err);
        SyncError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync_error;

    #[test]
    fn errors_compare_by_kind() {
        let a = sync_error!(ErrorKind::RequestFailed, "first");
        let b = sync_error!(ErrorKind::RequestFailed, "second", "with detail");
        let c = sync_error!(ErrorKind::ConnectionFailed, "third");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn detail_and_location_are_captured() {
        let err = sync_error!(ErrorKind::InvalidData, "Bad cursor", "offset=abc");

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.detail(), Some("offset=abc"));
        assert!(err.location().file().ends_with("error.rs"));
        assert!(format!("{err}").contains("Bad cursor"));
    }

    #[test]
    fn source_is_exposed_through_error_trait() {
        use std::error::Error;

        let io_err = std::io::Error::other("disk unplugged");
        let err = sync_error!(ErrorKind::IoError, "I/O failed", source: io_err);

        assert!(err.source().is_some());
    }
}
