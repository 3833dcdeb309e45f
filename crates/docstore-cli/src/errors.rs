//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use docstore_core::{DocstoreError, KdfError};

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store root, document)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong passphrase, tampered document)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Document name already taken
    AlreadyExists { message: String, hint: String },

    /// Stored file is not an envelope we can read
    Malformed(String),

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::AlreadyExists { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::Malformed(message) | CliError::InvalidInput(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Translate a core error into its user-facing form, if it has one.
    pub fn from_core(err: &DocstoreError) -> Option<Self> {
        let mapped = match err {
            DocstoreError::NotFound(name) => CliError::not_found(
                format!("Document \"{}\" not found", name),
                "Check the name and the store root (--root).",
            ),
            DocstoreError::AlreadyExists(name) => CliError::AlreadyExists {
                message: format!("Document \"{}\" already exists", name),
                hint: "Choose another name; existing documents are never overwritten.".to_string(),
            },
            DocstoreError::AuthenticationFailed => CliError::auth_failed_with_hint(
                "Incorrect passphrase or corrupted document",
                "Use the passphrase the document was written with.",
            ),
            DocstoreError::MalformedEnvelope(detail) => {
                CliError::Malformed(format!("Not a readable encrypted document: {}", detail))
            }
            DocstoreError::InvalidName(detail) => CliError::invalid_input(detail.clone()),
            DocstoreError::KeyDerivationFailed(KdfError::Parameter(detail)) => {
                CliError::invalid_input(detail.clone())
            }
            _ => return None,
        };
        Some(mapped)
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::AlreadyExists { .. } => exit_codes::ALREADY_EXISTS,
            CliError::Malformed(_) => exit_codes::MALFORMED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}
