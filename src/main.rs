//! # crun CLI Entry Point
//!
//! Parses the command line with clap, merges it over `crun.toml`, and hands
//! the resulting configuration to the build-and-run pipeline.

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use crun::build;
use crun::config::{CliOverrides, FileConfig, LaunchConfig};
use crun::dispatch::{Dispatcher, InheritedStdio, TerminalLauncher};
use crun::error::LaunchError;
use crun::toolchain::{self, DEFAULT_PRIORITY, ToolchainId};
use crun::transcript::Transcript;
use crun::ui;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

const EXAMPLES: &str = "\
Examples:
  crun main.c
  crun -v main.cpp
  crun --verbose --recompile main.c
  crun -c gcc -e \"-O2 -Wall\" main.c
  crun -c g++ -e \"-std=c++20\" main.cpp
  crun --compiler clang --extra \"-g -fsanitize=address\" main.c
  crun -o myprogram -d ./bin main.c
  crun -r \"arg1 arg2\" main.c
  crun --no-new-terminal main.c";

#[derive(Parser)]
#[command(name = "crun")]
#[command(about = "Compile and run C/C++ files quickly", version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Source file; the extension may be omitted (.c, .cpp, .cc, .cxx, .h, .hpp, .hh, .hxx are tried)
    #[arg(required_unless_present_any = ["list_compilers", "completions"])]
    filename: Option<PathBuf>,

    /// Verbose mode - don't clear status output before running
    #[arg(short, long)]
    verbose: bool,

    /// Always recompile the source file
    #[arg(short = 'n', long)]
    recompile: bool,

    /// Manually choose compiler command (clang, gcc, zig, cl, bytes, or any gcc-style driver such as g++)
    #[arg(short, long, value_name = "NAME")]
    compiler: Option<String>,

    /// Extra flags to pass to the compiler (split on whitespace)
    #[arg(short, long, value_name = "FLAGS", allow_hyphen_values = true)]
    extra: Option<String>,

    /// Output binary name
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Directory to store the binary [default: .crun]
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Arguments to pass to the binary (split on whitespace)
    #[arg(short, long = "run-args", value_name = "ARGS", allow_hyphen_values = true)]
    run_args: Option<String>,

    /// Run the binary in a new terminal window (default on Windows)
    #[arg(long, overrides_with = "no_new_terminal")]
    new_terminal: bool,

    /// Run the binary in this terminal
    #[arg(long, alias = "std", overrides_with = "new_terminal")]
    no_new_terminal: bool,

    /// Print the compile and run commands without executing them
    #[arg(long)]
    dry_run: bool,

    /// Show which supported compilers are on the search path
    #[arg(long)]
    list_compilers: bool,

    /// Print a shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let new_terminal = if self.new_terminal {
            Some(true)
        } else if self.no_new_terminal {
            Some(false)
        } else {
            None
        };

        CliOverrides {
            source: self.filename.clone().unwrap_or_default(),
            verbose: self.verbose,
            recompile: self.recompile,
            compiler: self.compiler.clone(),
            extra: self.extra.clone(),
            output: self.output.clone(),
            directory: self.directory.clone(),
            run_args: self.run_args.clone(),
            new_terminal,
            dry_run: self.dry_run,
        }
    }
}

/// Filter used when `CRUN_LOG` is unset or invalid
fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("CRUN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() {
    enable_windows_utf8_console();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => e.exit_code(),
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<(), LaunchError> {
    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "crun", &mut std::io::stdout());
        return Ok(());
    }

    if cli.list_compilers {
        print_compilers();
        return Ok(());
    }

    let mut log = Transcript::stdout(cli.verbose);
    let terminal = TerminalLauncher::for_host();

    let config = std::env::current_dir()
        .map_err(LaunchError::from)
        .and_then(|cwd| {
            let file = FileConfig::discover(&cwd)?;
            LaunchConfig::build(cli.overrides(), file, cwd, terminal.is_supported())
        })
        .inspect_err(|e| log.error(e))?;

    if config.detached {
        tracing::debug!(strategy = terminal.name(), "detached run requested");
    }

    let mut dispatcher = Dispatcher::new(InheritedStdio, terminal);
    build::build_and_run(&config, &mut dispatcher, &mut log, toolchain::find_on_path)?;
    Ok(())
}

fn print_compilers() {
    let mut table = ui::Table::new(&["Compiler", "Command", "Status"]);
    for (id, path) in toolchain::availability(&DEFAULT_PRIORITY) {
        let status = match path {
            Some(p) => format!("{} {}", "✓".green(), p.display()),
            None => format!("{} not found", "x".red()),
        };
        table.add_row(vec![
            format!("{:?}", id),
            id.command().bold().to_string(),
            status,
        ]);
    }
    table.print();

    println!();
    println!("Supported compilers: {}", ToolchainId::supported_names());
    println!(
        "Terminal launcher: {}",
        TerminalLauncher::for_host().name().cyan()
    );
}
