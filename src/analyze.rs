//! Per-directory test discovery.
//!
//! Selects a directory's test files, parses each one, and classifies every
//! top-level declaration. Selection follows the Go toolchain: files named
//! `*_test.go` (both in-package and external `_test`-package files), minus
//! anything the build constraints exclude for the host platform.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::classify::classify;
use crate::item::TestItem;
use crate::syntax::{self, BuildContext, SyntaxError};

const TEST_FILE_SUFFIX: &str = "_test.go";

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The directory or one of its files could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A test file failed to parse. Fatal for the whole directory; there is
    /// no partial recovery within a malformed file.
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },
}

/// Discover the test-like declarations of one directory.
///
/// A directory without any test files yields an empty batch, not an error;
/// unreadable directories and malformed files are fatal.
pub fn analyze_dir(dir: &Path, ctx: &BuildContext) -> Result<Vec<TestItem>, AnalyzeError> {
    let read = |source| AnalyzeError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read)? {
        let entry = entry.map_err(read)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        // The toolchain ignores dot- and underscore-prefixed files outright.
        if name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        if !name.ends_with(TEST_FILE_SUFFIX) {
            continue;
        }
        if !syntax::filename_matches(name, ctx) {
            debug!("skipping {name}: filename excludes {}/{}", ctx.goos, ctx.goarch);
            continue;
        }
        if entry.file_type().map_err(read)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut items = Vec::new();
    for path in files {
        let src = fs::read_to_string(&path).map_err(|source| AnalyzeError::Read {
            path: path.clone(),
            source,
        })?;
        if !syntax::source_matches(&src, ctx) {
            debug!("skipping {}: build constraints exclude it", path.display());
            continue;
        }
        let file = syntax::parse_file(&src).map_err(|source| AnalyzeError::Parse {
            path: path.clone(),
            source,
        })?;
        for decl in &file.decls {
            if let Some(c) = classify(decl) {
                items.push(TestItem {
                    name: decl.name.clone(),
                    kind: c.kind,
                    suite: c.suite,
                    pkg: file.package.clone(),
                    file: path.clone(),
                });
            }
        }
    }

    debug!("{}: {} test items", dir.display(), items.len());
    Ok(items)
}
