//! Mapping of failures to transport status codes.
//!
//! Services embedding the parser answer malformed queries with a client error and everything
//! else with a server error; `gq` reports the same codes in its JSON output.

use std::io::ErrorKind;

use gq_config::ConfigError;
use gq_query::QueryError;

use super::error::CliError;

/// Status for input the caller must fix.
pub const BAD_REQUEST: u16 = 400;
/// Status for a missing resource.
pub const NOT_FOUND: u16 = 404;
/// Status for everything else.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Converts an error to an HTTP status code.
pub fn status_code(err: &CliError) -> u16 {
    match err {
        CliError::Query(QueryError::Internal(_)) => INTERNAL_SERVER_ERROR,
        CliError::Query(_) | CliError::MaxDepth { .. } => BAD_REQUEST,
        CliError::Config(ConfigError::ReadFile { source, .. })
            if source.kind() == ErrorKind::NotFound =>
        {
            NOT_FOUND
        }
        _ => INTERNAL_SERVER_ERROR,
    }
}

/// Returns the error's message, or `default` if the message is empty.
pub fn message_or(err: &CliError, default: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        default.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use std::{io, path::PathBuf};

    use gq_query::{BuilderError, parse};

    use super::*;

    #[test]
    fn malformed_query_is_bad_request() {
        let err = CliError::from(parse("").unwrap_err());
        assert_eq!(status_code(&err), BAD_REQUEST);

        let err = CliError::from(parse("'open").unwrap_err());
        assert_eq!(status_code(&err), BAD_REQUEST);
    }

    #[test]
    fn parser_defect_is_server_error() {
        let err = CliError::from(QueryError::from(BuilderError::CloseRoot));
        assert_eq!(status_code(&err), INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_config_is_not_found() {
        let err = CliError::from(ConfigError::ReadFile {
            path: PathBuf::from("missing.toml"),
            source: io::Error::from(ErrorKind::NotFound),
        });
        assert_eq!(status_code(&err), NOT_FOUND);

        let err = CliError::from(ConfigError::ReadFile {
            path: PathBuf::from("locked.toml"),
            source: io::Error::from(ErrorKind::PermissionDenied),
        });
        assert_eq!(status_code(&err), INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_override_is_bad_request() {
        let err = CliError::MaxDepth {
            value: 1,
            minimum: 3,
            maximum: 60,
        };
        assert_eq!(status_code(&err), BAD_REQUEST);
    }

    #[test]
    fn message_uses_error_text() {
        let err = CliError::NoCanonicalForm;
        assert_eq!(message_or(&err, "fallback"), "query has no canonical text form");

        let err = CliError::CurrentDir(io::Error::other(""));
        assert!(message_or(&err, "fallback").starts_with("could not determine"));
    }
}
