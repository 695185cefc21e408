//! Aggregation of discovered tests into one ordered catalog.

use serde::Serialize;

use crate::item::TestItem;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Zero items across every analyzed directory. A run that finds nothing
    /// almost always means a path or filter misconfiguration upstream, so it
    /// is reported instead of returned as an empty success.
    #[error("no tests were found")]
    NoTests,
}

/// Accumulates per-directory batches before the one-time sort.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<TestItem>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one directory's batch. Batches concatenate in call order, and
    /// that insertion order is what breaks sort ties.
    pub fn add_batch(&mut self, batch: Vec<TestItem>) {
        self.items.extend(batch);
    }

    /// Seal the catalog: sort by package plus name, refuse an empty result.
    pub fn build(mut self) -> Result<Catalog, CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::NoTests);
        }
        self.items.sort_by_cached_key(|item| item.sort_key());
        Ok(Catalog { items: self.items })
    }
}

/// The sorted, immutable sequence of discovered tests.
///
/// Serializes as a flat JSON array of item records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<TestItem>,
}

impl Catalog {
    pub fn items(&self) -> &[TestItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: sealed catalogs are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TestItem;
    type IntoIter = std::slice::Iter<'a, TestItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::item::TestKind;

    fn item(pkg: &str, name: &str) -> TestItem {
        TestItem {
            name: name.to_string(),
            kind: TestKind::Test,
            suite: None,
            pkg: pkg.to_string(),
            file: PathBuf::from(format!("/src/{pkg}/{pkg}_test.go")),
        }
    }

    fn names(catalog: &Catalog) -> Vec<(String, String)> {
        catalog
            .items()
            .iter()
            .map(|i| (i.pkg.clone(), i.name.clone()))
            .collect()
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let builder = CatalogBuilder::new();
        assert!(matches!(builder.build(), Err(CatalogError::NoTests)));

        let mut builder = CatalogBuilder::new();
        builder.add_batch(Vec::new());
        assert!(matches!(builder.build(), Err(CatalogError::NoTests)));
    }

    #[test]
    fn test_sorts_across_batches_by_pkg_and_name() {
        let mut builder = CatalogBuilder::new();
        builder.add_batch(vec![item("zoo", "TestZ"), item("zoo", "TestA")]);
        builder.add_batch(vec![item("alpha", "TestM")]);
        let catalog = builder.build().unwrap();
        assert_eq!(
            names(&catalog),
            vec![
                ("alpha".into(), "TestM".into()),
                ("zoo".into(), "TestA".into()),
                ("zoo".into(), "TestZ".into()),
            ]
        );
    }

    #[test]
    fn test_order_key_is_concatenation_not_tuple() {
        // Whole-string comparison: "aBTestX" < "aTestM", even though a
        // package-then-name comparison would put "a" before "aB".
        let mut builder = CatalogBuilder::new();
        builder.add_batch(vec![item("a", "TestM"), item("aB", "TestX")]);
        let catalog = builder.build().unwrap();
        assert_eq!(
            names(&catalog),
            vec![
                ("aB".into(), "TestX".into()),
                ("a".into(), "TestM".into()),
            ]
        );
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut first = item("p", "TestSame");
        first.file = PathBuf::from("/a_test.go");
        let mut second = item("p", "TestSame");
        second.file = PathBuf::from("/b_test.go");

        let mut builder = CatalogBuilder::new();
        builder.add_batch(vec![first.clone()]);
        builder.add_batch(vec![second.clone()]);
        let catalog = builder.build().unwrap();
        assert_eq!(catalog.items(), &[first, second]);
    }

    #[test]
    fn test_json_round_trip_preserves_items_and_order() {
        let mut builder = CatalogBuilder::new();
        builder.add_batch(vec![item("p", "TestB"), item("p", "TestA")]);
        let catalog = builder.build().unwrap();

        let json = serde_json::to_string(&catalog).unwrap();
        let parsed: Vec<TestItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_slice(), catalog.items());
    }
}
