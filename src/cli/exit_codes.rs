//! exit codes for ifactions commands
//!
//! 0 = success, non-zero = error; distinct codes let scripts tell failure
//! types apart

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// invalid command-line arguments (e.g. a malformed replay step)
pub const INVALID_ARGS: i32 = 2;

/// configuration file missing, unreadable, or without the requested section
pub const CONFIG_ERROR: i32 = 3;

/// `check` found an expression or pattern that does not parse
pub const CHECK_FAILED: i32 = 4;
