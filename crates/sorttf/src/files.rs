//! locating terraform/terragrunt files and replacing them in place
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory holding provider plugins and module caches, never canonicalized
const TERRAFORM_DIR: &str = ".terraform";

/// `*.tf` or `*.hcl`, excluding terraform's own `.terraform*` files (lock file)
pub fn is_supported(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
        return false;
    };

    if name.starts_with(TERRAFORM_DIR) {
        return false;
    }

    let name = name.to_ascii_lowercase();
    name.ends_with(".tf") || name.ends_with(".hcl")
}

/// Lists supported files below `root`, sorted by path
///
/// `root` may also name a single file, which then must be supported.
pub fn discover(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, DiscoverError> {
    let metadata = std::fs::metadata(root).map_err(|source| DiscoverError::Access {
        path: root.to_owned(),
        source,
    })?;

    if !metadata.is_dir() {
        if !is_supported(root) {
            return Err(DiscoverError::Unsupported(root.to_owned()));
        }
        return Ok(vec![root.to_owned()]);
    }

    let mut walker = walkdir::WalkDir::new(root).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = vec![];
    let entries = walker
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == TERRAFORM_DIR));
    for entry in entries {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported(entry.path()) {
            tracing::trace!(path = %entry.path().display(), "found file");
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = files.len(), "discovered files");
    Ok(files)
}

/// Replaces the contents of `path` without ever leaving a partially written file
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(directory)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;

    tracing::info!(path = %path.display(), "file replaced");
    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum DiscoverError {
    #[error("Unable to access {}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a supported file type (.tf or .hcl)", .0.display())]
    Unsupported(PathBuf),
    #[error("Unable to list directory")]
    Walk(#[from] walkdir::Error),
}
