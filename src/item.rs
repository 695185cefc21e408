//! The discovered-test record.

use std::fmt;
use std::path::PathBuf;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// What a discovered declaration is. Exactly one kind per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Test,
    Benchmark,
    Fuzz,
}

/// One test-like declaration found in a `_test.go` file.
///
/// Serializes to the flat record CI tooling consumes, with the kind spread
/// over two booleans:
/// `{"name": …, "benchmark": false, "fuzz": false, "suite": "", "pkg": …, "file": …}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub name: String,
    pub kind: TestKind,
    /// Suite type the declaration is a method of, if any.
    pub suite: Option<String>,
    /// Name of the declaring package.
    pub pkg: String,
    /// Path of the declaring file.
    pub file: PathBuf,
}

impl TestItem {
    /// Key the catalog orders by: package and name concatenated.
    pub(crate) fn sort_key(&self) -> String {
        format!("{}{}", self.pkg, self.name)
    }
}

impl fmt::Display for TestItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pkg, self.name, self.file.display())
    }
}

/// Wire form of [`TestItem`].
#[derive(Serialize, Deserialize)]
struct RawItem {
    name: String,
    benchmark: bool,
    fuzz: bool,
    suite: String,
    pkg: String,
    file: PathBuf,
}

impl Serialize for TestItem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawItem {
            name: self.name.clone(),
            benchmark: self.kind == TestKind::Benchmark,
            fuzz: self.kind == TestKind::Fuzz,
            suite: self.suite.clone().unwrap_or_default(),
            pkg: self.pkg.clone(),
            file: self.file.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TestItem {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawItem::deserialize(deserializer)?;
        if raw.name.is_empty() {
            return Err(D::Error::custom("test item name must not be empty"));
        }
        let kind = match (raw.benchmark, raw.fuzz) {
            (false, false) => TestKind::Test,
            (true, false) => TestKind::Benchmark,
            (false, true) => TestKind::Fuzz,
            (true, true) => {
                return Err(D::Error::custom(
                    "test item cannot be both benchmark and fuzz",
                ));
            }
        };
        Ok(TestItem {
            name: raw.name,
            kind,
            suite: (!raw.suite.is_empty()).then_some(raw.suite),
            pkg: raw.pkg,
            file: raw.file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, kind: TestKind, suite: Option<&str>) -> TestItem {
        TestItem {
            name: name.to_string(),
            kind,
            suite: suite.map(str::to_string),
            pkg: "demo".to_string(),
            file: PathBuf::from("/src/demo/demo_test.go"),
        }
    }

    #[test]
    fn test_json_record_shape() {
        let json = serde_json::to_value(item("TestAdd", TestKind::Test, None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "TestAdd",
                "benchmark": false,
                "fuzz": false,
                "suite": "",
                "pkg": "demo",
                "file": "/src/demo/demo_test.go",
            })
        );
    }

    #[test]
    fn test_suite_and_kind_round_trip() {
        for original in [
            item("TestAdd", TestKind::Test, Some("MathSuite")),
            item("BenchmarkAdd", TestKind::Benchmark, None),
            item("FuzzAdd", TestKind::Fuzz, None),
        ] {
            let json = serde_json::to_string(&original).unwrap();
            let parsed: TestItem = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, original);
        }
    }

    #[test]
    fn test_both_kind_flags_set_is_rejected() {
        let json = r#"{"name":"X","benchmark":true,"fuzz":true,"suite":"","pkg":"p","file":"f"}"#;
        assert!(serde_json::from_str::<TestItem>(json).is_err());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let json = r#"{"name":"","benchmark":false,"fuzz":false,"suite":"","pkg":"p","file":"f"}"#;
        assert!(serde_json::from_str::<TestItem>(json).is_err());
    }

    #[test]
    fn test_display_is_pkg_name_file() {
        let s = item("TestAdd", TestKind::Test, None).to_string();
        assert_eq!(s, "demo TestAdd /src/demo/demo_test.go");
    }
}
