//! Error types for the assetfs filesystem core.
//!
//! These errors never cross the [`FilesystemNode`](crate::FilesystemNode)
//! boundary: the node logs them and degrades to `false`, `-1` or `None`.

use std::path::PathBuf;

/// Filesystem error type with contextual variants.
///
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use assetfs::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/game/Title.xyz") };
/// assert_eq!(err.to_string(), "not found: /game/Title.xyz");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Expected a regular resource but found something else.
    #[error("not a file: {path}")]
    NotAFile {
        /// The path that is not a file.
        path: PathBuf,
    },

    /// Expected a directory but found something else.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },

    /// The backend does not support writing.
    #[error("read-only filesystem: {operation}")]
    ReadOnly {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Operation is not supported by this channel or backend.
    #[error("operation not supported: {operation}")]
    NotSupported {
        /// The unsupported operation.
        operation: &'static str,
    },

    /// The stream was already closed.
    #[error("stream closed: {name}")]
    Closed {
        /// Logical name of the stream.
        name: String,
    },

    /// Generic backend error (e.g. a platform bridge refused a request).
    #[error("backend error: {0}")]
    Backend(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wrap an I/O error with the operation and path it belongs to.
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            _ => FsError::Io {
                operation,
                path: path.into(),
                source,
            },
        }
    }
}

impl From<std::io::Error> for FsError {
    fn from(error: std::io::Error) -> Self {
        // an FsError that went through io::Error comes back unchanged
        if error.get_ref().is_some_and(|inner| inner.is::<FsError>()) {
            if let Some(inner) = error.into_inner() {
                if let Ok(fs_error) = inner.downcast::<FsError>() {
                    return *fs_error;
                }
            }
            return FsError::Backend("unrecoverable wrapped error".into());
        }
        match error.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound {
                path: PathBuf::new(),
            },
            std::io::ErrorKind::Unsupported => FsError::NotSupported { operation: "io" },
            _ => FsError::Io {
                operation: "io",
                path: PathBuf::new(),
                source: error,
            },
        }
    }
}

impl From<FsError> for std::io::Error {
    fn from(error: FsError) -> Self {
        match error {
            FsError::Io { source, .. } => source,
            FsError::NotFound { .. } => std::io::Error::new(std::io::ErrorKind::NotFound, error),
            FsError::NotSupported { .. } | FsError::ReadOnly { .. } => {
                std::io::Error::new(std::io::ErrorKind::Unsupported, error)
            }
            FsError::Closed { .. } => std::io::Error::new(std::io::ErrorKind::NotConnected, error),
            other => std::io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_survives_io_round_trip() {
        let io_err: std::io::Error = FsError::Closed {
            name: "Save01.lsd".into(),
        }
        .into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotConnected);
        match FsError::from(io_err) {
            FsError::Closed { name } => assert_eq!(name, "Save01.lsd"),
            other => panic!("expected Closed, got {other:?}"),
        }
    }

    #[test]
    fn fs_error_not_found_display() {
        let err = FsError::NotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.to_string(), "not found: /missing");
    }

    #[test]
    fn fs_error_read_only_display() {
        let err = FsError::ReadOnly {
            operation: "open_output",
        };
        assert_eq!(err.to_string(), "read-only filesystem: open_output");
    }

    #[test]
    fn fs_error_closed_display() {
        let err = FsError::Closed {
            name: "Save01.lsd".into(),
        };
        assert_eq!(err.to_string(), "stream closed: Save01.lsd");
    }

    #[test]
    fn fs_error_from_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let fs_err = FsError::from(io_err);
        assert!(matches!(fs_err, FsError::NotFound { .. }));
    }

    #[test]
    fn fs_error_from_io_other() {
        let io_err = std::io::Error::other("test");
        let fs_err = FsError::from(io_err);
        assert!(matches!(fs_err, FsError::Io { .. }));
    }

    #[test]
    fn fs_error_io_helper_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let fs_err = FsError::io("open_input", "/game/a.bin", io_err);
        assert_eq!(
            fs_err.to_string(),
            "open_input failed for /game/a.bin: nope"
        );
    }

    #[test]
    fn fs_error_into_io_closed_kind() {
        let io_err: std::io::Error = FsError::Closed { name: "x".into() }.into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotConnected);
    }
}
