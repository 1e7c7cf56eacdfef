//! Launching a binary in a new terminal window that waits for a keypress.
//!
//! Each strategy only *plans* the launch: it returns the program to spawn,
//! its arguments, and (for the batch strategy) a script to write first.
//! The dispatcher executes the plan without waiting for the window.
//!
//! Arguments are wrapped in double quotes but embedded double quotes are not
//! escaped.

use crate::error::LaunchError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Terminal emulators probed on Linux/BSD, in order.
pub const EMULATOR_CANDIDATES: [&str; 5] = [
    "gnome-terminal",
    "konsole",
    "xterm",
    "lxterminal",
    "xfce4-terminal",
];

const PAUSE_PROMPT: &str = "Press any key to exit...";
const DIVIDER: &str = "----------------------------------------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalLauncher {
    /// macOS: `osascript` tells Terminal.app to run the command
    AppleScriptBridge,
    /// Linux/BSD: first emulator found on the search path
    EmulatorProbe,
    /// Windows: a `.bat` file that `start`s a new console window
    BatchScriptFile { script_path: PathBuf },
    Unsupported,
}

/// A file the launch needs on disk before spawning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub script: Option<ScriptFile>,
}

pub fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}

/// `"<exe>" "<arg>" ...`
pub fn quoted_command(exe: &Path, args: &[String]) -> String {
    let mut parts = vec![quote(&exe.to_string_lossy())];
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

/// POSIX shell line: run, divider, prompt, wait for one key.
///
/// Contains no single quotes so it can be wrapped in `bash -c '...'`.
fn shell_line(exe: &Path, args: &[String]) -> String {
    format!(
        "{}; echo; echo \"{}\"; echo \"{}\"; read -n 1 -s",
        quoted_command(exe, args),
        DIVIDER,
        PAUSE_PROMPT
    )
}

fn applescript_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl TerminalLauncher {
    /// Strategy for the OS this binary was built for
    pub fn for_host() -> Self {
        if cfg!(target_os = "macos") {
            TerminalLauncher::AppleScriptBridge
        } else if cfg!(windows) {
            TerminalLauncher::BatchScriptFile {
                script_path: std::env::temp_dir().join("launch_external_terminal.bat"),
            }
        } else if cfg!(unix) {
            TerminalLauncher::EmulatorProbe
        } else {
            TerminalLauncher::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, TerminalLauncher::Unsupported)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TerminalLauncher::AppleScriptBridge => "applescript",
            TerminalLauncher::EmulatorProbe => "emulator-probe",
            TerminalLauncher::BatchScriptFile { .. } => "batch-script",
            TerminalLauncher::Unsupported => "unsupported",
        }
    }

    pub fn plan(&self, exe: &Path, args: &[String]) -> Result<LaunchPlan, LaunchError> {
        self.plan_with(exe, args, |cmd| which::which(cmd).is_ok())
    }

    /// Plan with an injectable search-path probe.
    pub fn plan_with<F>(&self, exe: &Path, args: &[String], exists: F) -> Result<LaunchPlan, LaunchError>
    where
        F: Fn(&str) -> bool,
    {
        match self {
            TerminalLauncher::AppleScriptBridge => {
                let inner = format!("bash -c '{}'", shell_line(exe, args));
                let script = format!(
                    "tell application \"Terminal\"\n    activate\n    do script {}\nend tell",
                    applescript_string(&inner)
                );
                Ok(LaunchPlan {
                    program: "osascript".to_string(),
                    args: vec!["-e".to_string(), script],
                    script: None,
                })
            }

            TerminalLauncher::EmulatorProbe => {
                let term = EMULATOR_CANDIDATES
                    .iter()
                    .copied()
                    .find(|&t| exists(t))
                    .ok_or_else(|| {
                        LaunchError::TerminalUnavailable(format!(
                            "tried {}",
                            EMULATOR_CANDIDATES.join(", ")
                        ))
                    })?;
                debug!(terminal = term, "found terminal emulator");

                let mut term_args: Vec<String> = match term {
                    "gnome-terminal" | "xfce4-terminal" | "lxterminal" => vec!["--".into()],
                    _ => vec!["-e".into()],
                };
                term_args.extend(["bash".into(), "-c".into(), shell_line(exe, args)]);

                Ok(LaunchPlan {
                    program: term.to_string(),
                    args: term_args,
                    script: None,
                })
            }

            TerminalLauncher::BatchScriptFile { script_path } => {
                let command_line = format!(
                    "start \"\" cmd /c \"{} & echo. & echo {} & echo {} & pause > nul\"",
                    quoted_command(exe, args),
                    DIVIDER,
                    PAUSE_PROMPT
                );
                Ok(LaunchPlan {
                    program: "cmd.exe".to_string(),
                    args: vec!["/C".to_string(), script_path.to_string_lossy().to_string()],
                    script: Some(ScriptFile {
                        path: script_path.clone(),
                        contents: format!("@echo off\r\n{}\r\n", command_line),
                    }),
                })
            }

            TerminalLauncher::Unsupported => Err(LaunchError::TerminalUnavailable(format!(
                "no terminal launcher for {}",
                std::env::consts::OS
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quoted_command_is_naive() {
        let line = quoted_command(Path::new("/tmp/my app.out"), &args(&["a b", "say \"hi\""]));
        assert_eq!(line, r#""/tmp/my app.out" "a b" "say "hi"""#);
    }

    #[test]
    fn test_emulator_probe_picks_first_available() {
        let plan = TerminalLauncher::EmulatorProbe
            .plan_with(Path::new("/w/a.out"), &args(&["x"]), |t| {
                t == "xterm" || t == "xfce4-terminal"
            })
            .unwrap();
        assert_eq!(plan.program, "xterm");
        assert_eq!(plan.args[..3], args(&["-e", "bash", "-c"])[..]);
        let line = &plan.args[3];
        assert!(line.starts_with(r#""/w/a.out" "x"; "#));
        assert!(line.ends_with("read -n 1 -s"));
        assert!(line.contains(PAUSE_PROMPT));
        assert!(plan.script.is_none());
    }

    #[test]
    fn test_gnome_terminal_uses_double_dash() {
        let plan = TerminalLauncher::EmulatorProbe
            .plan_with(Path::new("/w/a.out"), &[], |t| t == "gnome-terminal")
            .unwrap();
        assert_eq!(plan.args[0], "--");
    }

    #[test]
    fn test_emulator_probe_none_found() {
        let err = TerminalLauncher::EmulatorProbe
            .plan_with(Path::new("/w/a.out"), &[], |_| false)
            .unwrap_err();
        assert!(matches!(err, LaunchError::TerminalUnavailable(_)));
    }

    #[test]
    fn test_applescript_escapes_quotes() {
        let plan = TerminalLauncher::AppleScriptBridge
            .plan_with(Path::new("/w/a.out"), &args(&["1"]), |_| false)
            .unwrap();
        assert_eq!(plan.program, "osascript");
        assert_eq!(plan.args[0], "-e");
        let script = &plan.args[1];
        assert!(script.starts_with("tell application \"Terminal\""));
        assert!(script.contains(r#"do script "bash -c '\"/w/a.out\" \"1\"; "#));
    }

    /// The text Terminal.app is told to run, with AppleScript escapes undone.
    fn applescript_command(plan: &LaunchPlan) -> String {
        let script = &plan.args[1];
        let start = script.find("do script \"").unwrap() + "do script \"".len();
        let end = script.rfind("\"\nend tell").unwrap();
        script[start..end].replace("\\\"", "\"").replace("\\\\", "\\")
    }

    #[test]
    fn test_applescript_wraps_whole_line_in_one_bash_argument() {
        let plan = TerminalLauncher::AppleScriptBridge
            .plan_with(Path::new("/w/a.out"), &args(&["1"]), |_| false)
            .unwrap();
        let command = applescript_command(&plan);
        let line = shell_line(Path::new("/w/a.out"), &args(&["1"]));
        assert_eq!(command, format!("bash -c '{}'", line));
        assert!(!line.contains('\''));
    }

    #[cfg(unix)]
    #[test]
    fn test_applescript_command_prints_prompt_and_waits() {
        use std::process::{Command, Stdio};

        if which::which("bash").is_err() {
            eprintln!("Skipping test: bash not on PATH");
            return;
        }

        let plan = TerminalLauncher::AppleScriptBridge
            .plan_with(Path::new("true"), &[], |_| false)
            .unwrap();
        let command = applescript_command(&plan);

        // Each word the outer shell hands to the inner `bash -c`, one per line.
        let words = command.replacen("bash -c", "printf '%s\\n'", 1);
        let out = Command::new("bash").args(["-c", &words]).output().unwrap();
        let words = String::from_utf8_lossy(&out.stdout);
        assert_eq!(words.lines().count(), 1);
        assert!(words.trim_end().ends_with("read -n 1 -s"));

        // Run it for real; `read` waits for the single key on stdin.
        let mut child = Command::new("bash")
            .args(["-c", &command])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        {
            use std::io::Write;
            let mut stdin = child.stdin.take().unwrap();
            stdin.write_all(b"k").unwrap();
        }
        let out = child.wait_with_output().unwrap();
        assert!(out.status.success());
        let text = String::from_utf8_lossy(&out.stdout);
        assert!(text.contains(DIVIDER));
        assert!(text.contains(PAUSE_PROMPT));
    }

    #[test]
    fn test_batch_script_plan() {
        let launcher = TerminalLauncher::BatchScriptFile {
            script_path: PathBuf::from("C:/tmp/launch.bat"),
        };
        let plan = launcher
            .plan_with(Path::new("C:/w/a.exe"), &args(&["x"]), |_| false)
            .unwrap();
        assert_eq!(plan.program, "cmd.exe");
        assert_eq!(plan.args, args(&["/C", "C:/tmp/launch.bat"]));

        let script = plan.script.unwrap();
        assert!(script.contents.starts_with("@echo off\r\n"));
        assert!(script.contents.contains(r#"start "" cmd /c ""C:/w/a.exe" "x" & "#));
        assert!(script.contents.contains("pause > nul"));
    }

    #[test]
    fn test_unsupported_fails() {
        let launcher = TerminalLauncher::Unsupported;
        assert!(!launcher.is_supported());
        assert!(launcher.plan(Path::new("a"), &[]).is_err());
    }
}
