//! Unified error types for the theme manager.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ThemeError
// ---------------------------------------------------------------------------

/// Errors from parsing theme identifiers.
#[derive(Debug)]
pub enum ThemeError {
    /// The input did not match `author/name[@version]`.
    InvalidIdentifier(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier(input) => {
                write!(
                    f,
                    "invalid theme identifier `{input}` (expected author/name[@version])"
                )
            }
        }
    }
}

impl std::error::Error for ThemeError {}

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Errors from the on-disk theme cache.
#[derive(Debug)]
pub enum CacheError {
    /// Filesystem failure at a specific cache path.
    Io(PathBuf, std::io::Error),
    /// No cached entry exists for the identifier.
    NotFound(String),
    /// Refused to delete the entry the live configuration points at.
    CurrentlyActive(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "cache io at {}: {e}", path.display()),
            Self::NotFound(theme) => write!(f, "theme not found in cache: {theme}"),
            Self::CurrentlyActive(theme) => {
                write!(f, "theme is currently active: {theme}")
            }
        }
    }
}

impl std::error::Error for CacheError {}

// ---------------------------------------------------------------------------
// ActivateError
// ---------------------------------------------------------------------------

/// Errors from swapping the live configuration pointer.
#[derive(Debug)]
pub enum ActivateError {
    /// Copying the pre-existing configuration aside failed; nothing was changed.
    BackupFailed(PathBuf, std::io::Error),
    /// Creating or renaming the replacement symlink failed; the live path is untouched.
    ActivationFailed(PathBuf, std::io::Error),
    /// The live path exists but is a regular file not managed by this tool.
    NotASymlink(PathBuf),
    /// The live path does not exist.
    NotFound(PathBuf),
}

impl fmt::Display for ActivateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackupFailed(path, e) => {
                write!(f, "failed to back up {}: {e}", path.display())
            }
            Self::ActivationFailed(path, e) => {
                write!(f, "failed to activate {}: {e}", path.display())
            }
            Self::NotASymlink(path) => {
                write!(
                    f,
                    "{} is not managed by nebula (not a symlink)",
                    path.display()
                )
            }
            Self::NotFound(path) => write!(f, "{} does not exist", path.display()),
        }
    }
}

impl std::error::Error for ActivateError {}

// ---------------------------------------------------------------------------
// StateError
// ---------------------------------------------------------------------------

/// Errors when loading or persisting the state record.
#[derive(Debug)]
pub enum StateError {
    Io(PathBuf, std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "state io at {}: {e}", path.display()),
            Self::Json(e) => write!(f, "state json: {e}"),
        }
    }
}

impl std::error::Error for StateError {}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// ValidateError
// ---------------------------------------------------------------------------

/// Errors from validating downloaded theme content.
#[derive(Debug)]
pub enum ValidateError {
    /// The content is not syntactically valid TOML.
    Toml(toml::de::Error),
    /// The content exceeds the size cap.
    TooLarge(usize),
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(e) => write!(f, "invalid toml: {e}"),
            Self::TooLarge(size) => write!(f, "config too large ({size} bytes, max 100KB)"),
        }
    }
}

impl std::error::Error for ValidateError {}

impl From<toml::de::Error> for ValidateError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the hub HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the hub.
    Status(u16, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, detail) => write!(f, "hub returned {code}: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// CliError — top-level
// ---------------------------------------------------------------------------

/// Top-level error type for command handlers.
#[derive(Debug)]
pub enum CliError {
    Theme(ThemeError),
    Cache(CacheError),
    Activate(ActivateError),
    State(StateError),
    Validate(ValidateError),
    Api(ApiError),
    /// Self-update failure with a user-facing description.
    Update(String),
    /// Preview-terminal launch failure with a user-facing description.
    Preview(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theme(e) => write!(f, "{e}"),
            Self::Cache(e) => write!(f, "{e}"),
            Self::Activate(e) => write!(f, "{e}"),
            Self::State(e) => write!(f, "{e}"),
            Self::Validate(e) => write!(f, "{e}"),
            Self::Api(e) => write!(f, "{e}"),
            Self::Update(msg) => write!(f, "update failed: {msg}"),
            Self::Preview(msg) => write!(f, "preview failed: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ThemeError> for CliError {
    fn from(e: ThemeError) -> Self {
        Self::Theme(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e)
    }
}

impl From<ActivateError> for CliError {
    fn from(e: ActivateError) -> Self {
        Self::Activate(e)
    }
}

impl From<StateError> for CliError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<ValidateError> for CliError {
    fn from(e: ValidateError) -> Self {
        Self::Validate(e)
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn theme_error_display_includes_input() {
        let e = ThemeError::InvalidIdentifier("bad id".into());
        assert_eq!(
            e.to_string(),
            "invalid theme identifier `bad id` (expected author/name[@version])"
        );
    }

    #[test]
    fn cache_error_display_variants() {
        let e = CacheError::NotFound("alice/rainbow".into());
        assert_eq!(e.to_string(), "theme not found in cache: alice/rainbow");
        let e = CacheError::CurrentlyActive("alice/rainbow@1.2".into());
        assert_eq!(e.to_string(), "theme is currently active: alice/rainbow@1.2");
    }

    #[test]
    fn activate_error_display_contains_path() {
        let path = Path::new("/tmp/starship.toml").to_path_buf();
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = ActivateError::ActivationFailed(path, io);
        let s = e.to_string();
        assert!(s.starts_with("failed to activate"), "got: {s}");
        assert!(s.contains("starship.toml"));
    }

    #[test]
    fn state_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = StateError::from(json_err);
        assert!(e.to_string().starts_with("state json:"));
    }

    #[test]
    fn validate_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ValidateError::from(toml_err);
        assert!(e.to_string().starts_with("invalid toml:"));
    }

    #[test]
    fn cli_error_wraps_domain_errors() {
        let e = CliError::from(ThemeError::InvalidIdentifier("x".into()));
        assert!(e.to_string().contains("invalid theme identifier"));
        let e = CliError::Update("checksum mismatch".into());
        assert_eq!(e.to_string(), "update failed: checksum mismatch");
    }
}
