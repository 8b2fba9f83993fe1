use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure outcome of a webview command.
///
/// Every command either succeeds or resolves to exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebviewError {
    #[error("webview with id '{0}' already exists")]
    DuplicateId(String),

    #[error("webview with id '{0}' not found")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("script error: {0}")]
    ScriptError(String),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("webview service unavailable: {0}")]
    Unavailable(String),
}

impl WebviewError {
    /// Stable machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "DUPLICATE_ID",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::ScriptError(_) => "SCRIPT_ERROR",
            Self::SurfaceCreation(_) => "SURFACE_CREATION_ERROR",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MultiviewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Webview(#[from] WebviewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("service.event_capacity = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: service.event_capacity = 0"
        );
    }

    #[test]
    fn webview_error_display() {
        let err = WebviewError::DuplicateId("a".into());
        assert_eq!(err.to_string(), "webview with id 'a' already exists");

        let err = WebviewError::NotFound("b".into());
        assert_eq!(err.to_string(), "webview with id 'b' not found");

        let err = WebviewError::InvalidArgument("must provide url".into());
        assert_eq!(err.to_string(), "invalid argument: must provide url");

        let err = WebviewError::ScriptError("ReferenceError: x".into());
        assert_eq!(err.to_string(), "script error: ReferenceError: x");

        let err = WebviewError::SurfaceCreation("no parent window".into());
        assert_eq!(err.to_string(), "failed to create surface: no parent window");
    }

    #[test]
    fn webview_error_codes_are_stable() {
        assert_eq!(WebviewError::DuplicateId(String::new()).code(), "DUPLICATE_ID");
        assert_eq!(WebviewError::NotFound(String::new()).code(), "NOT_FOUND");
        assert_eq!(
            WebviewError::InvalidArgument(String::new()).code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(WebviewError::ScriptError(String::new()).code(), "SCRIPT_ERROR");
        assert_eq!(
            WebviewError::SurfaceCreation(String::new()).code(),
            "SURFACE_CREATION_ERROR"
        );
        assert_eq!(WebviewError::Unavailable(String::new()).code(), "UNAVAILABLE");
    }

    #[test]
    fn multiview_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: MultiviewError = config_err.into();
        assert!(matches!(err, MultiviewError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn multiview_error_from_webview() {
        let err: MultiviewError = WebviewError::NotFound("x".into()).into();
        assert!(matches!(err, MultiviewError::Webview(_)));
        assert_eq!(err.to_string(), "webview with id 'x' not found");
    }

    #[test]
    fn multiview_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: MultiviewError = io_err.into();
        assert!(matches!(err, MultiviewError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }
}
