//! gotestmatrix: discover Go tests and shard them across CI matrix workers.
//!
//! The crate walks a set of package directories, parses their `_test.go`
//! files, classifies every qualifying declaration (tests, benchmarks, fuzz
//! targets, suite methods), and either lists the result or partitions it into
//! a fixed number of shard strings suitable for a parallel CI matrix. Each
//! shard string works as a `go test -run (<entry>)/` argument.
//!
//! # Architecture
//!
//! The main components, in data-flow order:
//!
//! - **walk**: resolve package arguments into directories (`/...` recursion,
//!   gitignore-aware traversal)
//! - **syntax**: minimal Go parsing (package clause, top-level declarations,
//!   build constraints)
//! - **classify**: decide whether one declaration is a test-like item
//! - **analyze**: per-directory discovery combining the two above
//! - **catalog**: ordered aggregation across all directories
//! - **distribute**: greedy sharding with override pinning
//! - **render**: JSON and aligned-column output
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroUsize;
//!
//! use gotestmatrix::catalog::CatalogBuilder;
//! use gotestmatrix::syntax::BuildContext;
//!
//! fn main() -> anyhow::Result<()> {
//!     let dirs = gotestmatrix::resolve_dirs(&["./...".into()])?;
//!     let ctx = BuildContext::host();
//!     let mut builder = CatalogBuilder::new();
//!     for dir in &dirs {
//!         builder.add_batch(gotestmatrix::analyze_dir(dir, &ctx)?);
//!     }
//!     let catalog = builder.build()?;
//!
//!     let shards = NonZeroUsize::new(4).unwrap();
//!     let matrix = gotestmatrix::distribute(&catalog, shards, &[]);
//!     println!("{}", serde_json::to_string(&matrix)?);
//!     Ok(())
//! }
//! ```

pub mod analyze;
pub mod catalog;
pub mod classify;
pub mod distribute;
pub mod item;
pub mod render;
pub mod syntax;
pub mod walk;

// Re-export commonly used types
pub use analyze::{AnalyzeError, analyze_dir};
pub use catalog::{Catalog, CatalogBuilder, CatalogError};
pub use distribute::{KEY_SEPARATOR, distribute};
pub use item::{TestItem, TestKind};
pub use walk::{WalkError, resolve_dirs};
