pub mod comment;
pub mod read;
pub mod verify;

/// Some comment requests failed; the output was still written
pub const EXIT_PARTIAL: u8 = 1;
/// Nothing could be done: unreadable package, batch file or settings
pub const EXIT_FATAL: u8 = 2;
