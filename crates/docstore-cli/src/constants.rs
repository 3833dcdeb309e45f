//! Constants used throughout the CLI.

/// Environment variable holding the passphrase for non-interactive use.
pub const PASSPHRASE_ENV: &str = "DOCSTORE_PASSPHRASE";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "DOCSTORE_LOG";

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Document, store root or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase or tampered document).
    pub const AUTH_FAILED: i32 = 5;

    /// A document with this name already exists.
    pub const ALREADY_EXISTS: i32 = 6;

    /// Stored file is not a readable envelope.
    pub const MALFORMED: i32 = 7;
}
