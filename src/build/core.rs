use super::compose::{CompileInvocation, tokenize};
use super::source::{BuildTarget, probe_source};
use super::staleness::should_rebuild;
use crate::config::LaunchConfig;
use crate::dispatch::{Dispatcher, ProcessRunner, RunSpec};
use crate::error::LaunchError;
use crate::toolchain::{self, Toolchain};
use crate::transcript::Transcript;
use colored::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a successful invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub target: BuildTarget,
    pub toolchain: Toolchain,
    pub compiled: bool,
    pub ran: bool,
}

// --- COMMAND: Build & Run a single file ---
pub fn build_and_run<R, F>(
    config: &LaunchConfig,
    dispatcher: &mut Dispatcher<R>,
    log: &mut Transcript,
    lookup: F,
) -> Result<Report, LaunchError>
where
    R: ProcessRunner,
    F: Fn(&str) -> Option<PathBuf>,
{
    log.info(format!("Provided source file: {}", config.source.display()));

    // 1. Locate Source
    let absolute = config.cwd.join(&config.source);
    let source = if absolute.extension().is_none() {
        log.info("No file extension provided, trying common extensions...");
        let found = probe_source(&absolute).inspect_err(|e| log.error(e))?;
        log.info(format!("Found file: {}", found.display()));
        log.info("If this is not the intended file, please provide the correct filename with extension.");
        found
    } else {
        absolute
    };

    let target = BuildTarget::resolve(
        &config.cwd,
        &source,
        config.output_name.as_deref(),
        &config.output_dir,
    )?;
    debug!(?target, "build target");

    // 2. Select Toolchain
    let toolchain = toolchain::resolve_with(config.compiler.as_deref(), &config.priority, lookup)
        .inspect_err(|e| log.error(e))?;
    log.info(format!("Using compiler: {}", toolchain.command.bold()));

    // 3. Compile if stale
    let compiled = if should_rebuild(&target.source_path, &target.artifact_path, config.force) {
        let invocation = CompileInvocation::new(
            &toolchain,
            &target.source_path,
            &target.artifact_path,
            config.extra_flags.as_deref(),
        );

        if config.dry_run {
            log.emit(format!("[dry-run] compile: {}", invocation.command_line()));
        } else {
            info!(command = %invocation.command_line(), "compiling");
            if let Err(e) = dispatcher.compile(&invocation) {
                log.error(&e);
                log.error("Compilation failed.");
                return Err(e);
            }
            log.success(format!(
                "Compiled successfully to: {}",
                target.artifact_path.display()
            ));
        }
        true
    } else {
        log.success("No changes detected, skipping recompilation.");
        false
    };

    // 4. Run
    let spec = RunSpec {
        exe_path: target.artifact_path.clone(),
        argv: config.run_args.as_deref().map(tokenize).unwrap_or_default(),
        detached: config.detached,
    };

    if config.dry_run {
        let mode = if spec.detached { "new terminal" } else { "inline" };
        log.emit(format!(
            "[dry-run] run ({}): {}",
            mode,
            crate::dispatch::terminal::quoted_command(&spec.exe_path, &spec.argv)
        ));
        return Ok(Report {
            target,
            toolchain,
            compiled,
            ran: false,
        });
    }

    run_artifact(&spec, dispatcher, log)?;

    Ok(Report {
        target,
        toolchain,
        compiled,
        ran: true,
    })
}

/// Hand the terminal over to the artifact. A detached launch with no
/// terminal available falls back to running inline.
pub fn run_artifact<R: ProcessRunner>(
    spec: &RunSpec,
    dispatcher: &mut Dispatcher<R>,
    log: &mut Transcript,
) -> Result<(), LaunchError> {
    log.emit(format!("{} Running the binary...", "▶".green()));
    log.collapse();

    match dispatcher.run(spec) {
        Err(LaunchError::TerminalUnavailable(reason)) => {
            log.warn(format!(
                "No supported terminal emulator found ({}), running here instead",
                reason
            ));
            let inline = RunSpec {
                detached: false,
                ..spec.clone()
            };
            dispatcher.run(&inline).inspect_err(|e| log.error(e))
        }
        other => other.inspect_err(|e| log.error(e)),
    }
}
