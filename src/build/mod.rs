mod compose;
mod core;
pub mod source;
mod staleness;

pub use compose::{CompileInvocation, compose, tokenize};
pub use self::core::{Report, build_and_run, run_artifact};
pub use source::{ARTIFACT_SUFFIX, BuildTarget, SOURCE_EXTENSIONS, probe_source};
pub use staleness::should_rebuild;
