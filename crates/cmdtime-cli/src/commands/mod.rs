pub mod clock;
pub mod completions;
pub mod config;
pub mod finish;
pub mod format;
pub mod init;
pub mod shell;
