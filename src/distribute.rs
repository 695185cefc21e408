//! Greedy distribution of suites across a fixed CI matrix.
//!
//! Groups the catalog's items by suite, fills shards in sorted key order
//! until each would overflow the per-shard target, and renders every shard as
//! its member keys joined by [`KEY_SEPARATOR`]. Caller-pinned overrides are
//! excluded from the automatic pass and appended verbatim, so each matrix
//! entry stays usable as a `go test -run (<entry>)/` argument.

use std::collections::{BTreeMap, HashSet};
use std::num::NonZeroUsize;

use crate::catalog::Catalog;

/// Separator between member keys inside one matrix entry.
pub const KEY_SEPARATOR: &str = "|";

/// Partition the catalog into exactly `shards` matrix entries, plus one
/// appended entry per override.
///
/// The per-shard target is `ceil(len / shards)` over the full catalog, so
/// overridden suites still count toward sizing even though they are placed
/// by hand. Shards never exceed `shards` in number: once the last shard is
/// reached it absorbs every remaining key, overflowing the target rather
/// than the matrix. Unused shards render as empty strings.
///
/// Pure: identical inputs produce identical output, and nothing outside the
/// call is touched.
pub fn distribute(catalog: &Catalog, shards: NonZeroUsize, overrides: &[String]) -> Vec<String> {
    let pinned: HashSet<&str> = overrides
        .iter()
        .flat_map(|entry| entry.split(KEY_SEPARATOR))
        .collect();

    // Suite groups, sorted by key. The map is rebuilt on every call; there is
    // no state carried between runs.
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for item in catalog {
        let key = match &item.suite {
            Some(suite) => suite.as_str(),
            // An unbound item whose name ends in "Suite" never reaches the
            // matrix. Kept bug-for-bug compatible with existing pipelines;
            // see DESIGN.md.
            None if item.name.ends_with("Suite") => continue,
            None => item.name.as_str(),
        };
        if pinned.contains(key) {
            continue;
        }
        *groups.entry(key).or_default() += 1;
    }

    let count = shards.get();
    let msize = catalog.len().div_ceil(count);

    let mut members: Vec<Vec<&str>> = vec![Vec::new(); count];
    let mut sizes = vec![0usize; count];
    let mut pos = 0;
    for (key, size) in groups {
        if sizes[pos] > 0 && pos + 1 < count && sizes[pos] + size > msize {
            pos += 1;
        }
        sizes[pos] += size;
        members[pos].push(key);
    }

    let mut matrix: Vec<String> = members
        .into_iter()
        .map(|keys| keys.join(KEY_SEPARATOR))
        .collect();
    matrix.extend(overrides.iter().cloned());
    matrix
}
