use thiserror::Error;

use crate::diff::fetcher::FetchError;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or filesystem access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The diff backend could not deliver nodes.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A configuration value was rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// An external program exited unsuccessfully.
    #[error("`{executable}` exited with status {status}")]
    Open { executable: String, status: i32 },
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Sort field outside `path`, `kind`, `size`, `alloc`, `files`, `folders`.
    #[error("Unknown sort field `{0}`")]
    UnknownSortField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn fetch_error_is_transparent() {
        let err: AppError = FetchError::Backend("no diff loaded".into()).into();
        assert!(matches!(err, AppError::Fetch(_)));
        assert_eq!(err.to_string(), "Diff backend error: no diff loaded");
    }

    #[test]
    fn unknown_sort_field_display() {
        let err: AppError = ConfigurationError::UnknownSortField("colour".into()).into();
        assert_eq!(err.to_string(), "Unknown sort field `colour`");
    }

    #[test]
    fn open_error_display() {
        let err = AppError::Open {
            executable: "xdg-open /tmp".into(),
            status: 3,
        };
        assert_eq!(err.to_string(), "`xdg-open /tmp` exited with status 3");
    }
}
