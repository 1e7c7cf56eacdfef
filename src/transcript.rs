//! Status line transcript.
//!
//! Every status line the launcher prints goes through [`Transcript::emit`],
//! which counts it. Right before the compiled program takes over the
//! terminal, [`Transcript::collapse`] moves the cursor back up and erases
//! those lines so the program's own output starts on a clean screen.
//!
//! ## Example
//!
//! ```rust,no_run
//! let mut log = crun::transcript::Transcript::stdout(false);
//! log.emit("Using compiler: clang");
//! log.collapse();
//! ```

use colored::*;
use console::Term;
use std::fmt::Display;

pub struct Transcript {
    term: Term,
    count: usize,
    verbose: bool,
}

impl Transcript {
    pub fn new(term: Term, verbose: bool) -> Self {
        Self {
            term,
            count: 0,
            verbose,
        }
    }

    pub fn stdout(verbose: bool) -> Self {
        Self::new(Term::stdout(), verbose)
    }

    /// Lines emitted since creation or the last collapse
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print one line immediately and count it.
    pub fn emit(&mut self, line: impl Display) {
        self.count += 1;
        // Write errors on stdout are ignored.
        let _ = self.term.write_line(&line.to_string());
    }

    pub fn info(&mut self, msg: impl Display) {
        self.emit(format!("{} {}", "·".cyan(), msg));
    }

    pub fn success(&mut self, msg: impl Display) {
        self.emit(format!("{} {}", "✓".green(), msg));
    }

    pub fn warn(&mut self, msg: impl Display) {
        self.emit(format!("{} {}", "!".yellow(), msg));
    }

    pub fn error(&mut self, msg: impl Display) {
        self.emit(format!("{} {}", "x".red(), msg));
    }

    /// Erase every counted line. No-op in verbose mode or when nothing was
    /// emitted; on a non-interactive sink only the counter is reset.
    pub fn collapse(&mut self) {
        if self.verbose || self.count == 0 {
            return;
        }

        if self.term.is_term() {
            let _ = self.term.clear_last_lines(self.count);
        }
        self.count = 0;
    }
}
