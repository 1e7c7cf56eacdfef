//! # crun - compile and run a single C/C++ file
//!
//! `crun main.c` finds a compiler, rebuilds the binary only when the source
//! is newer than the last build, and runs it, inline or in a new terminal
//! window that waits for a keypress before closing.
//!
//! ## Module Organization
//!
//! - [`toolchain`] - Compiler detection and selection
//! - [`build`] - Source probing, staleness check, argument composition, pipeline
//! - [`dispatch`] - Running the compiler and the binary
//! - [`transcript`] - Status lines that are erased before the binary runs
//! - [`config`] - Command line + `crun.toml` configuration

/// Source probing, rebuild decision and the build-and-run pipeline.
pub mod build;

/// Configuration (`crun.toml` and command line merge).
pub mod config;

/// Process execution, inline or in a new terminal window.
pub mod dispatch;

/// Launcher error taxonomy.
pub mod error;

/// Toolchain detection.
pub mod toolchain;

/// Status line transcript.
pub mod transcript;

/// Terminal UI utilities (tables, colors).
pub mod ui;
