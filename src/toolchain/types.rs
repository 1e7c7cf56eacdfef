use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::LaunchError;

/// Supported compiler types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainId {
    /// Clang/LLVM (clang)
    Clang,
    /// GNU Compiler Collection (gcc)
    Gcc,
    /// Zig's bundled C compiler (zig cc)
    Zig,
    /// Microsoft Visual C++ (cl.exe)
    Msvc,
    /// `bytes` sentinel, driven with the default argument convention
    Bytes,
}

/// Built-in detection order when the user gives no preference.
pub const DEFAULT_PRIORITY: [ToolchainId; 5] = [
    ToolchainId::Clang,
    ToolchainId::Gcc,
    ToolchainId::Zig,
    ToolchainId::Msvc,
    ToolchainId::Bytes,
];

/// Where the artifact path goes in the argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFlag {
    /// `-o <path>`: flag and path are two tokens
    Separate(&'static str),
    /// `/Fe:<path>`: flag and path fused into one token
    Fused(&'static str),
}

/// Where whitespace-split extra flags are spliced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplicePoint {
    /// Right before the trailing source path
    BeforeSource,
    /// Right after the (leading) fused output token
    AfterOutput,
}

/// Per-family invocation convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgvTemplate {
    pub compile_verb: Option<&'static str>,
    pub output: OutputFlag,
    pub splice: SplicePoint,
}

impl ToolchainId {
    /// Command name looked up on the search path
    pub fn command(&self) -> &'static str {
        match self {
            ToolchainId::Clang => "clang",
            ToolchainId::Gcc => "gcc",
            ToolchainId::Zig => "zig",
            ToolchainId::Msvc => "cl",
            ToolchainId::Bytes => "bytes",
        }
    }

    pub fn template(&self) -> ArgvTemplate {
        match self {
            ToolchainId::Zig => ArgvTemplate {
                compile_verb: Some("cc"),
                output: OutputFlag::Separate("-o"),
                splice: SplicePoint::BeforeSource,
            },
            ToolchainId::Msvc => ArgvTemplate {
                compile_verb: None,
                output: OutputFlag::Fused("/Fe:"),
                splice: SplicePoint::AfterOutput,
            },
            ToolchainId::Clang | ToolchainId::Gcc | ToolchainId::Bytes => ArgvTemplate {
                compile_verb: None,
                output: OutputFlag::Separate("-o"),
                splice: SplicePoint::BeforeSource,
            },
        }
    }

    pub fn uses_msvc_flags(&self) -> bool {
        matches!(self.template().output, OutputFlag::Fused(_))
    }

    pub fn supported_names() -> String {
        DEFAULT_PRIORITY
            .iter()
            .map(|id| id.command())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ToolchainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

impl ToolchainId {
    /// Recognize one of the supported command names (case-insensitive).
    pub fn from_command(command: &str) -> Option<Self> {
        match command.to_lowercase().as_str() {
            "clang" => Some(ToolchainId::Clang),
            "gcc" => Some(ToolchainId::Gcc),
            "zig" => Some(ToolchainId::Zig),
            "cl" | "cl.exe" => Some(ToolchainId::Msvc),
            "bytes" => Some(ToolchainId::Bytes),
            _ => None,
        }
    }

    /// Argument convention for an arbitrary compiler command.
    ///
    /// Commands that are not one of the supported names (`g++`, `clang++`,
    /// `cc`, ...) are driven like gcc: `-o <out> [extra] <src>`.
    pub fn family_of(command: &str) -> Self {
        Self::from_command(command).unwrap_or(ToolchainId::Gcc)
    }
}

impl FromStr for ToolchainId {
    type Err = LaunchError;

    /// Strict parse used for detection priority lists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("msvc") {
            return Ok(ToolchainId::Msvc);
        }
        Self::from_command(s).ok_or_else(|| {
            LaunchError::Usage(format!(
                "Unknown compiler '{}' (supported: {})",
                s,
                ToolchainId::supported_names()
            ))
        })
    }
}

/// A toolchain that was found on the search path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Argument convention the command is driven with
    pub id: ToolchainId,
    /// Command name as requested or detected (`gcc`, `g++`, `cl`, ...)
    pub command: String,
    /// Absolute path the search-path lookup resolved to
    pub program: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("clang".parse::<ToolchainId>().unwrap(), ToolchainId::Clang);
        assert_eq!("GCC".parse::<ToolchainId>().unwrap(), ToolchainId::Gcc);
        assert_eq!("cl.exe".parse::<ToolchainId>().unwrap(), ToolchainId::Msvc);
        assert_eq!("msvc".parse::<ToolchainId>().unwrap(), ToolchainId::Msvc);
        assert!("tcc".parse::<ToolchainId>().is_err());
    }

    #[test]
    fn test_unrecognized_commands_use_default_family() {
        assert_eq!(ToolchainId::family_of("g++"), ToolchainId::Gcc);
        assert_eq!(ToolchainId::family_of("clang++"), ToolchainId::Gcc);
        assert_eq!(ToolchainId::family_of("CL.EXE"), ToolchainId::Msvc);
        assert_eq!(ToolchainId::family_of("zig"), ToolchainId::Zig);
        assert_eq!(ToolchainId::from_command("g++"), None);
    }

    #[test]
    fn test_only_msvc_fuses_output() {
        for id in DEFAULT_PRIORITY {
            assert_eq!(id.uses_msvc_flags(), id == ToolchainId::Msvc);
        }
        assert_eq!(ToolchainId::Zig.template().compile_verb, Some("cc"));
    }

    #[test]
    fn test_display_is_command_name() {
        assert_eq!(ToolchainId::Msvc.to_string(), "cl");
        assert_eq!(ToolchainId::supported_names(), "clang, gcc, zig, cl, bytes");
    }
}
