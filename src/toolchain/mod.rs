//! Toolchain discovery
//!
//! Compilers are found through the executable search path only. An explicit
//! request is a hard constraint: if it is missing there is no fallback to
//! auto-detection.

pub mod types;

pub use types::{ArgvTemplate, DEFAULT_PRIORITY, OutputFlag, SplicePoint, Toolchain, ToolchainId};

use crate::error::LaunchError;
use std::path::PathBuf;
use tracing::debug;

/// Look up a command on the search path
pub fn find_on_path(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

/// Resolve the toolchain for this run against the real search path
pub fn resolve(
    explicit: Option<&str>,
    priority: &[ToolchainId],
) -> Result<Toolchain, LaunchError> {
    resolve_with(explicit, priority, find_on_path)
}

/// Resolve with an injectable lookup (`find_on_path` in production).
pub fn resolve_with<F>(
    explicit: Option<&str>,
    priority: &[ToolchainId],
    lookup: F,
) -> Result<Toolchain, LaunchError>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(command) = explicit {
        debug!(compiler = command, "checking explicitly requested compiler");
        return match lookup(command) {
            Some(program) => Ok(Toolchain {
                id: ToolchainId::family_of(command),
                command: command.to_string(),
                program,
            }),
            None => Err(LaunchError::ToolchainUnavailable {
                name: command.to_string(),
            }),
        };
    }

    for &id in priority {
        match lookup(id.command()) {
            Some(program) => {
                debug!(compiler = id.command(), path = %program.display(), "detected compiler");
                return Ok(Toolchain {
                    id,
                    command: id.command().to_string(),
                    program,
                });
            }
            None => debug!(compiler = id.command(), "not on search path"),
        }
    }

    Err(LaunchError::NoToolchain {
        tried: priority
            .iter()
            .map(|id| id.command())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Availability of every supported toolchain, in detection order
pub fn availability(priority: &[ToolchainId]) -> Vec<(ToolchainId, Option<PathBuf>)> {
    priority
        .iter()
        .map(|&id| (id, find_on_path(id.command())))
        .collect()
}
