//! Error taxonomy for a single launcher invocation.
//!
//! Nothing is retried. Each variant is surfaced once through the transcript
//! and then mapped onto a process exit status by [`LaunchError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    /// Bad or missing command line / config file input
    #[error("{0}")]
    Usage(String),

    /// An explicitly requested compiler is not on the search path
    #[error("Specified compiler '{name}' not found")]
    ToolchainUnavailable { name: String },

    /// Auto-detection found none of the supported compilers
    #[error("No supported compiler found in your system (tried: {tried})")]
    NoToolchain { tried: String },

    /// Extension probing found no candidate file
    #[error("No source file found for '{}' (tried extensions: {tried})", .path.display())]
    SourceNotFound { path: PathBuf, tried: String },

    /// Compiler exited non-zero or could not be spawned
    #[error("Compilation failed: {0}")]
    CompileFailure(String),

    /// Binary exited non-zero, was missing, or could not be spawned
    #[error("Failed to run the binary: {0}")]
    RunFailure(String),

    /// No terminal emulator or window mechanism on this host
    #[error("No supported terminal emulator found ({0})")]
    TerminalUnavailable(String),

    #[error("Failed to write launcher script {}: {source}", .path.display())]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LaunchError {
    /// Exit status the CLI uses after reporting this error.
    ///
    /// A failing child program is not a launcher crash, so run-phase errors
    /// exit normally.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::RunFailure(_) | LaunchError::TerminalUnavailable(_) => 0,
            LaunchError::Usage(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_phase_errors_exit_normally() {
        assert_eq!(LaunchError::RunFailure("exit 3".into()).exit_code(), 0);
        assert_eq!(
            LaunchError::TerminalUnavailable("xterm".into()).exit_code(),
            0
        );
    }

    #[test]
    fn test_fatal_errors_exit_nonzero() {
        assert_eq!(LaunchError::Usage("bad".into()).exit_code(), 2);
        let unavailable = LaunchError::ToolchainUnavailable {
            name: "tcc".into(),
        };
        assert_eq!(unavailable.exit_code(), 1);
        assert!(unavailable.to_string().contains("'tcc'"));
        assert_eq!(LaunchError::CompileFailure("x".into()).exit_code(), 1);
    }
}
