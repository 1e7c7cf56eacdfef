use crate::toolchain::{OutputFlag, SplicePoint, Toolchain, ToolchainId};
use std::path::{Path, PathBuf};

/// A fully composed compiler call. Consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileInvocation {
    pub toolchain: ToolchainId,
    pub command: String,
    pub program: PathBuf,
    pub argv: Vec<String>,
}

impl CompileInvocation {
    pub fn new(toolchain: &Toolchain, source: &Path, artifact: &Path, extra: Option<&str>) -> Self {
        Self {
            toolchain: toolchain.id,
            command: toolchain.command.clone(),
            program: toolchain.program.clone(),
            argv: compose(toolchain.id, source, artifact, extra),
        }
    }

    /// Printable command line (for `--dry-run` and logs)
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.command.clone()];
        parts.extend(self.argv.iter().cloned());
        parts.join(" ")
    }
}

/// Split raw flag text on whitespace. No quoting rules apply.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Build the argument vector for `toolchain`. The source path is always last.
pub fn compose(
    toolchain: ToolchainId,
    source: &Path,
    artifact: &Path,
    extra: Option<&str>,
) -> Vec<String> {
    let template = toolchain.template();
    let extra = extra.map(tokenize).unwrap_or_default();
    let artifact = artifact.to_string_lossy().to_string();

    let mut args = Vec::new();
    if let Some(verb) = template.compile_verb {
        args.push(verb.to_string());
    }

    let output_end = match template.output {
        OutputFlag::Separate(flag) => {
            args.push(flag.to_string());
            args.push(artifact);
            args.len()
        }
        OutputFlag::Fused(prefix) => {
            args.push(format!("{}{}", prefix, artifact));
            args.len()
        }
    };

    args.push(source.to_string_lossy().to_string());

    let at = match template.splice {
        SplicePoint::BeforeSource => args.len() - 1,
        SplicePoint::AfterOutput => output_end,
    };
    let tail = args.split_off(at);
    args.extend(extra);
    args.extend(tail);
    args
}
