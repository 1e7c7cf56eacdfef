use crate::error::LaunchError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional extensions probed, in order, when the filename has none.
pub const SOURCE_EXTENSIONS: [&str; 8] = ["c", "cpp", "cc", "cxx", "h", "hpp", "hh", "hxx"];

/// Suffix every artifact carries on this platform
pub const ARTIFACT_SUFFIX: &str = if cfg!(target_os = "windows") {
    ".exe"
} else {
    ".out"
};

/// Where the source lives and where its binary goes. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub source_path: PathBuf,
    pub artifact_path: PathBuf,
    pub output_dir: PathBuf,
}

/// Pick the first `<name>.<ext>` that exists.
///
/// Names that already carry an extension are returned as given; a missing
/// file then surfaces later as a compiler error.
pub fn probe_source(name: &Path) -> Result<PathBuf, LaunchError> {
    if name.extension().is_some() {
        return Ok(name.to_path_buf());
    }

    for ext in SOURCE_EXTENSIONS {
        let candidate = name.with_extension(ext);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "probed source file");
            return Ok(candidate);
        }
    }

    Err(LaunchError::SourceNotFound {
        path: name.to_path_buf(),
        tried: SOURCE_EXTENSIONS
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Artifact file name: the explicit name, or the source stem, plus the suffix.
pub fn artifact_name(source: &Path, output_name: Option<&str>) -> String {
    let base = match output_name {
        Some(name) => name.to_string(),
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "a".to_string()),
    };

    if base.ends_with(ARTIFACT_SUFFIX) {
        base
    } else {
        format!("{}{}", base, ARTIFACT_SUFFIX)
    }
}

impl BuildTarget {
    /// Derive absolute paths relative to `cwd` and create the output directory.
    pub fn resolve(
        cwd: &Path,
        source: &Path,
        output_name: Option<&str>,
        output_dir: &Path,
    ) -> Result<Self, LaunchError> {
        let source_path = absolutize(cwd, source);
        let output_dir = absolutize(cwd, output_dir);

        fs::create_dir_all(&output_dir)?;

        let artifact_path = output_dir.join(artifact_name(&source_path, output_name));

        Ok(Self {
            source_path,
            artifact_path,
            output_dir,
        })
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_probe_picks_cpp_when_only_cpp_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("myprog.cpp"), "int main(){}").unwrap();

        let found = probe_source(&dir.path().join("myprog")).unwrap();
        assert_eq!(found, dir.path().join("myprog.cpp"));
    }

    #[test]
    fn test_probe_prefers_earlier_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("main.cc"), "").unwrap();
        fs::write(dir.path().join("main.c"), "").unwrap();

        let found = probe_source(&dir.path().join("main")).unwrap();
        assert_eq!(found, dir.path().join("main.c"));
    }

    #[test]
    fn test_probe_nothing_found() {
        let dir = tempdir().unwrap();
        let err = probe_source(&dir.path().join("ghost")).unwrap_err();
        assert!(matches!(err, LaunchError::SourceNotFound { .. }));
    }

    #[test]
    fn test_probe_keeps_explicit_extension() {
        let found = probe_source(Path::new("missing.c")).unwrap();
        assert_eq!(found, PathBuf::from("missing.c"));
    }

    #[test]
    fn test_artifact_name_suffix() {
        let src = Path::new("/work/hello.c");
        assert_eq!(artifact_name(src, None), format!("hello{ARTIFACT_SUFFIX}"));
        assert_eq!(
            artifact_name(src, Some("app")),
            format!("app{ARTIFACT_SUFFIX}")
        );
        let already = format!("app{ARTIFACT_SUFFIX}");
        assert_eq!(artifact_name(src, Some(&already)), already);
    }

    #[test]
    fn test_resolve_creates_output_dir() {
        let dir = tempdir().unwrap();
        let target = BuildTarget::resolve(
            dir.path(),
            Path::new("hello.c"),
            None,
            Path::new("out/bin"),
        )
        .unwrap();

        assert!(target.output_dir.is_dir());
        assert!(target.source_path.is_absolute());
        assert!(target.artifact_path.is_absolute());
        assert_eq!(target.artifact_path.parent(), Some(target.output_dir.as_path()));
    }
}
