use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::trace;

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

/// Decide whether the artifact must be rebuilt.
///
/// Only mtimes are compared. Equal timestamps count as fresh.
pub fn should_rebuild(source: &Path, artifact: &Path, force: bool) -> bool {
    if force {
        return true;
    }

    // Unreadable source: build anyway so the compiler reports it.
    let Ok(src_time) = modified(source) else {
        return true;
    };
    let Ok(bin_time) = modified(artifact) else {
        return true;
    };

    trace!(?src_time, ?bin_time, "comparing modification times");
    src_time > bin_time
}
