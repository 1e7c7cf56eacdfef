//! Running external programs with the launcher's own stdio attached.

pub mod terminal;

pub use terminal::{LaunchPlan, TerminalLauncher};

use crate::build::CompileInvocation;
use crate::error::LaunchError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Why a child process did not succeed
#[derive(Error, Debug)]
pub enum ChildFailure {
    #[error("could not start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with status {code}")]
    Exit { program: String, code: i32 },
    #[error("'{program}' was terminated by a signal")]
    Killed { program: String },
}

/// Seam between the launcher and the OS process table.
pub trait ProcessRunner {
    /// Run to completion with inherited stdin/stdout/stderr.
    fn run(&mut self, program: &Path, args: &[String]) -> Result<(), ChildFailure>;

    /// Start and return immediately. The child may outlive the launcher.
    fn spawn_detached(&mut self, program: &str, args: &[String]) -> Result<(), ChildFailure>;
}

/// Real runner backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritedStdio;

impl ProcessRunner for InheritedStdio {
    fn run(&mut self, program: &Path, args: &[String]) -> Result<(), ChildFailure> {
        let name = program.to_string_lossy().to_string();
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ChildFailure::Spawn {
                program: name.clone(),
                source,
            })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(ChildFailure::Exit { program: name, code }),
            None => Err(ChildFailure::Killed { program: name }),
        }
    }

    fn spawn_detached(&mut self, program: &str, args: &[String]) -> Result<(), ChildFailure> {
        Command::new(program)
            .args(args)
            .spawn()
            .map(|_child| ())
            .map_err(|source| ChildFailure::Spawn {
                program: program.to_string(),
                source,
            })
    }
}

/// How the artifact is executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub exe_path: PathBuf,
    pub argv: Vec<String>,
    pub detached: bool,
}

pub struct Dispatcher<R: ProcessRunner> {
    runner: R,
    terminal: TerminalLauncher,
}

impl<R: ProcessRunner> Dispatcher<R> {
    pub fn new(runner: R, terminal: TerminalLauncher) -> Self {
        Self { runner, terminal }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the compiler. Failure is returned, never fatal here.
    pub fn compile(&mut self, invocation: &CompileInvocation) -> Result<(), LaunchError> {
        debug!(argv = ?invocation.argv, "invoking {}", invocation.program.display());
        self.runner
            .run(&invocation.program, &invocation.argv)
            .map_err(|e| LaunchError::CompileFailure(e.to_string()))
    }

    /// Run the artifact inline or in a new terminal window.
    pub fn run(&mut self, spec: &RunSpec) -> Result<(), LaunchError> {
        if !spec.exe_path.exists() {
            return Err(LaunchError::RunFailure(format!(
                "Executable not found: {}",
                spec.exe_path.display()
            )));
        }

        if spec.detached {
            self.launch_detached(spec)
        } else {
            self.runner
                .run(&spec.exe_path, &spec.argv)
                .map_err(|e| LaunchError::RunFailure(e.to_string()))
        }
    }

    fn launch_detached(&mut self, spec: &RunSpec) -> Result<(), LaunchError> {
        let plan = self.terminal.plan(&spec.exe_path, &spec.argv)?;
        debug!(strategy = self.terminal.name(), program = %plan.program, "launching in new terminal");

        if let Some(script) = &plan.script {
            fs::write(&script.path, &script.contents).map_err(|source| {
                LaunchError::ScriptWrite {
                    path: script.path.clone(),
                    source,
                }
            })?;
        }

        self.runner
            .spawn_detached(&plan.program, &plan.args)
            .map_err(|e| LaunchError::RunFailure(e.to_string()))
    }
}
