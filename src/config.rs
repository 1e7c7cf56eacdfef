//! Launcher configuration.
//!
//! [`LaunchConfig`] is built once from the parsed command line merged over
//! an optional `crun.toml`, then passed by reference to every stage.

use crate::error::LaunchError;
use crate::toolchain::{DEFAULT_PRIORITY, ToolchainId};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "crun.toml";

/// Default artifact directory, relative to the working directory
pub const CACHE_DIR: &str = ".crun";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub run: RunSection,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    pub compiler: Option<String>,
    pub priority: Option<Vec<String>>,
    pub flags: Option<String>,
    pub directory: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    pub args: Option<String>,
    pub new_terminal: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str, origin: &Path) -> Result<Self, LaunchError> {
        toml::from_str(text).map_err(|e| {
            LaunchError::Usage(format!("Failed to parse {}: {}", origin.display(), e))
        })
    }

    /// `crun.toml` in `cwd`, else the user-level config, else defaults.
    pub fn discover(cwd: &Path) -> Result<Self, LaunchError> {
        let candidates = [
            Some(cwd.join(CONFIG_FILE)),
            dirs::config_dir().map(|d| d.join("crun").join("config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                let text = fs::read_to_string(&path)?;
                tracing::debug!(path = %path.display(), "loaded config file");
                return Self::parse(&text, &path);
            }
        }
        Ok(Self::default())
    }

    pub fn priority(&self) -> Result<Option<Vec<ToolchainId>>, LaunchError> {
        self.build
            .priority
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|n| n.parse::<ToolchainId>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
    }
}

/// Values the CLI layer parsed from the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub source: PathBuf,
    pub verbose: bool,
    pub recompile: bool,
    pub compiler: Option<String>,
    pub extra: Option<String>,
    pub output: Option<String>,
    pub directory: Option<PathBuf>,
    pub run_args: Option<String>,
    pub new_terminal: Option<bool>,
    pub dry_run: bool,
}

/// Everything one invocation needs. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchConfig {
    pub source: PathBuf,
    pub cwd: PathBuf,
    pub verbose: bool,
    pub force: bool,
    /// Explicit compiler command, looked up verbatim on the search path
    pub compiler: Option<String>,
    pub priority: Vec<ToolchainId>,
    pub extra_flags: Option<String>,
    pub output_name: Option<String>,
    pub output_dir: PathBuf,
    pub run_args: Option<String>,
    pub detached: bool,
    pub dry_run: bool,
}

/// Detached by default on Windows only
pub fn default_detached() -> bool {
    cfg!(windows)
}

impl LaunchConfig {
    /// Merge CLI values over file values. `detach_supported` forces inline
    /// execution on hosts without a terminal launcher.
    pub fn build(
        cli: CliOverrides,
        file: FileConfig,
        cwd: PathBuf,
        detach_supported: bool,
    ) -> Result<Self, LaunchError> {
        let compiler = cli
            .compiler
            .or(file.build.compiler.clone())
            .filter(|name| !name.trim().is_empty());

        let priority = file.priority()?.unwrap_or_else(|| DEFAULT_PRIORITY.to_vec());

        let output_dir = cli
            .directory
            .or(file.build.directory)
            .unwrap_or_else(|| PathBuf::from(CACHE_DIR));

        let detached = cli
            .new_terminal
            .or(file.run.new_terminal)
            .unwrap_or_else(default_detached)
            && detach_supported;

        Ok(Self {
            source: cli.source,
            cwd,
            verbose: cli.verbose,
            force: cli.recompile,
            compiler,
            priority,
            extra_flags: cli.extra.or(file.build.flags),
            output_name: cli.output,
            output_dir,
            run_args: cli.run_args.or(file.run.args),
            detached,
            dry_run: cli.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[build]
compiler = "gcc"
priority = ["gcc", "clang"]
flags = "-O2 -Wall"
directory = "bin"

[run]
args = "a b"
new_terminal = true
"#;

    fn cli(source: &str) -> CliOverrides {
        CliOverrides {
            source: PathBuf::from(source),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_full_file() {
        let file = FileConfig::parse(SAMPLE, Path::new("crun.toml")).unwrap();
        assert_eq!(file.build.compiler.as_deref(), Some("gcc"));
        assert_eq!(
            file.priority().unwrap(),
            Some(vec![ToolchainId::Gcc, ToolchainId::Clang])
        );
        assert_eq!(file.run.new_terminal, Some(true));
    }

    #[test]
    fn test_unknown_key_is_usage_error() {
        let err = FileConfig::parse("[build]\ncompilr = \"gcc\"\n", Path::new("crun.toml"))
            .unwrap_err();
        assert!(matches!(err, LaunchError::Usage(ref m) if m.contains("crun.toml")));
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = LaunchConfig::build(cli("main.c"), FileConfig::default(), "/w".into(), true)
            .unwrap();
        assert_eq!(cfg.compiler, None);
        assert_eq!(cfg.priority, DEFAULT_PRIORITY.to_vec());
        assert_eq!(cfg.output_dir, PathBuf::from(CACHE_DIR));
        assert_eq!(cfg.detached, default_detached());
        assert!(!cfg.force);
    }

    #[test]
    fn test_cli_wins_over_file() {
        let file = FileConfig::parse(SAMPLE, Path::new("crun.toml")).unwrap();
        let overrides = CliOverrides {
            compiler: Some("clang".into()),
            extra: Some("-g".into()),
            new_terminal: Some(false),
            ..cli("main.c")
        };
        let cfg = LaunchConfig::build(overrides, file, "/w".into(), true).unwrap();
        assert_eq!(cfg.compiler.as_deref(), Some("clang"));
        assert_eq!(cfg.extra_flags.as_deref(), Some("-g"));
        assert_eq!(cfg.run_args.as_deref(), Some("a b"));
        assert_eq!(cfg.output_dir, PathBuf::from("bin"));
        assert!(!cfg.detached);
    }

    #[test]
    fn test_detach_forced_off_when_unsupported() {
        let overrides = CliOverrides {
            new_terminal: Some(true),
            ..cli("main.c")
        };
        let cfg =
            LaunchConfig::build(overrides, FileConfig::default(), "/w".into(), false).unwrap();
        assert!(!cfg.detached);
    }

    #[test]
    fn test_any_compiler_command_accepted() {
        let overrides = CliOverrides {
            compiler: Some("clang++".into()),
            ..cli("main.cpp")
        };
        let cfg = LaunchConfig::build(overrides, FileConfig::default(), "/w".into(), true)
            .unwrap();
        assert_eq!(cfg.compiler.as_deref(), Some("clang++"));
    }

    #[test]
    fn test_unknown_priority_entry_rejected() {
        let text = "[build]\npriority = [\"gcc\", \"tcc\"]\n";
        let file = FileConfig::parse(text, Path::new("crun.toml")).unwrap();
        let err = LaunchConfig::build(cli("main.c"), file, "/w".into(), true).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
