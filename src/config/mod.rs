#[cfg(feature = "cli")]
pub mod cli;
pub mod output;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use output::OutputFile;

/// Largest secret the command will download.
pub const MAX_OBJECT_SIZE: usize = 10 * 1024 * 1024;
