//! Resolution of package arguments into directories to analyze.
//!
//! Arguments are filesystem paths; a trailing `/...` asks for the whole tree
//! under the path, walked with gitignore semantics and with VCS bookkeeping
//! directories skipped. The result is a sorted, de-duplicated set of absolute
//! paths, so downstream analysis order is deterministic.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

const RECURSIVE_SUFFIX: &str = "/...";

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("failed to resolve {arg}: {source}")]
    Resolve {
        arg: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] ignore::Error),
}

/// Resolve package arguments into the set of directories to analyze.
pub fn resolve_dirs(args: &[String]) -> Result<BTreeSet<PathBuf>, WalkError> {
    let mut dirs = BTreeSet::new();
    for arg in args {
        let (path, recursive) = match arg.strip_suffix(RECURSIVE_SUFFIX) {
            Some(rest) => (rest, true),
            None => (arg.as_str(), false),
        };
        let path = if path.is_empty() { "." } else { path };
        let root = fs::canonicalize(path).map_err(|source| WalkError::Resolve {
            arg: arg.clone(),
            source,
        })?;
        if recursive {
            walk_tree(&root, &mut dirs)?;
        } else {
            dirs.insert(root);
        }
    }
    debug!("resolved {} directories", dirs.len());
    Ok(dirs)
}

/// Collect `root` and every non-ignored directory beneath it.
fn walk_tree(root: &Path, dirs: &mut BTreeSet<PathBuf>) -> Result<(), WalkError> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .parents(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .filter_entry(|entry| !entry.file_name().to_string_lossy().starts_with(".git"))
        .build();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            dirs.insert(entry.path().to_path_buf());
        }
    }
    Ok(())
}
