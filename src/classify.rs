//! Declaration classification.
//!
//! Decides whether one parsed declaration is a test-like item, and if so
//! which kind and which suite it belongs to. The rules mirror what `go test`
//! itself will run: a `Test`/`Benchmark`/`Fuzz` prefix with the matching
//! single `testing` parameter, no results, an exported-shaped suffix, and an
//! optional pointer-to-`…Suite` receiver.

use crate::item::TestKind;
use crate::syntax::FuncDecl;

/// Outcome of classifying a declaration that qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: TestKind,
    /// Receiver suite type, pointer marker stripped.
    pub suite: Option<String>,
}

/// Classify one top-level declaration.
///
/// Returns `None` for anything `go test` would not treat as a test-like
/// item. This is a pure function and never fails.
pub fn classify(decl: &FuncDecl) -> Option<Classification> {
    // One parameter field with at most one name, and no results.
    let [param] = decl.params.as_slice() else {
        return None;
    };
    if param.names.len() > 1 {
        return None;
    }
    if !decl.results.is_empty() {
        return None;
    }

    let (kind, prefix) = if decl.name.starts_with("Benchmark") && param.type_expr == "*testing.B" {
        (TestKind::Benchmark, "Benchmark")
    } else if decl.name.starts_with("Fuzz") && param.type_expr == "*testing.F" {
        (TestKind::Fuzz, "Fuzz")
    } else if decl.name.starts_with("Test") && param.type_expr == "*testing.T" {
        (TestKind::Test, "Test")
    } else {
        return None;
    };

    // Only an exported-shaped suffix denotes a real test; `Testify`-style
    // helpers have a lowercase rune right after the prefix. The bare prefix
    // itself is a valid name.
    if let Some(first) = decl.name[prefix.len()..].chars().next() {
        if first.is_lowercase() {
            return None;
        }
    }

    let suite = match &decl.recv {
        None => None,
        Some(fields) => {
            let [recv] = fields.as_slice() else {
                return None;
            };
            if recv.names.len() > 1 {
                return None;
            }
            let type_name = recv.type_expr.strip_prefix('*')?;
            if !type_name.ends_with("Suite") {
                return None;
            }
            Some(type_name.to_string())
        }
    };

    Some(Classification { kind, suite })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Field;

    fn func(name: &str, param_names: &[&str], param_type: &str) -> FuncDecl {
        FuncDecl {
            name: name.to_string(),
            recv: None,
            params: vec![Field {
                names: param_names.iter().map(|n| (*n).to_string()).collect(),
                type_expr: param_type.to_string(),
            }],
            results: vec![],
        }
    }

    fn method(recv_names: &[&str], recv_type: &str, name: &str) -> FuncDecl {
        FuncDecl {
            recv: Some(vec![Field {
                names: recv_names.iter().map(|n| (*n).to_string()).collect(),
                type_expr: recv_type.to_string(),
            }]),
            ..func(name, &["t"], "*testing.T")
        }
    }

    #[test]
    fn test_plain_test_function() {
        let c = classify(&func("TestFoo", &["t"], "*testing.T")).unwrap();
        assert_eq!(c.kind, TestKind::Test);
        assert_eq!(c.suite, None);
    }

    #[test]
    fn test_unnamed_parameter_is_accepted() {
        assert!(classify(&func("TestFoo", &[], "*testing.T")).is_some());
    }

    #[test]
    fn test_benchmark_and_fuzz_kinds() {
        let b = classify(&func("BenchmarkRandInt", &["b"], "*testing.B")).unwrap();
        assert_eq!(b.kind, TestKind::Benchmark);
        let f = classify(&func("FuzzHex", &["f"], "*testing.F")).unwrap();
        assert_eq!(f.kind, TestKind::Fuzz);
    }

    #[test]
    fn test_bare_prefix_names_are_accepted() {
        assert!(classify(&func("Test", &[], "*testing.T")).is_some());
        assert!(classify(&func("Benchmark", &[], "*testing.B")).is_some());
        assert!(classify(&func("Fuzz", &[], "*testing.F")).is_some());
    }

    #[test]
    fn test_digit_after_prefix_is_accepted() {
        assert!(classify(&func("Test1", &[], "*testing.T")).is_some());
    }

    #[test]
    fn test_lowercase_after_prefix_is_rejected() {
        assert!(classify(&func("Testfoo", &["t"], "*testing.T")).is_none());
        assert!(classify(&func("TestornotTest", &["t"], "*testing.T")).is_none());
        assert!(classify(&func("Benchmarkquick", &["b"], "*testing.B")).is_none());
    }

    #[test]
    fn test_wrong_prefix_is_rejected() {
        assert!(classify(&func("NotATest", &["t"], "*testing.T")).is_none());
        assert!(classify(&func("Check", &["t"], "*testing.T")).is_none());
    }

    #[test]
    fn test_mismatched_parameter_type_is_rejected() {
        assert!(classify(&func("TestFoo", &["b"], "*testing.B")).is_none());
        assert!(classify(&func("BenchmarkFoo", &["t"], "*testing.T")).is_none());
        assert!(classify(&func("TestFoo", &["s"], "string")).is_none());
    }

    #[test]
    fn test_parameter_count_rules() {
        // Zero parameters.
        let none = FuncDecl {
            name: "TestFoo".into(),
            recv: None,
            params: vec![],
            results: vec![],
        };
        assert!(classify(&none).is_none());
        // Two parameter fields.
        let two = FuncDecl {
            params: vec![
                Field {
                    names: vec!["t".into()],
                    type_expr: "*testing.T".into(),
                },
                Field {
                    names: vec!["s".into()],
                    type_expr: "string".into(),
                },
            ],
            ..func("TestFoo", &["t"], "*testing.T")
        };
        assert!(classify(&two).is_none());
        // One field, two names: `func TestFoo(a, b *testing.T)`.
        assert!(classify(&func("TestFoo", &["a", "b"], "*testing.T")).is_none());
    }

    #[test]
    fn test_results_are_rejected() {
        let with_result = FuncDecl {
            results: vec![Field {
                names: vec![],
                type_expr: "int".into(),
            }],
            ..func("TestFoo", &["t"], "*testing.T")
        };
        assert!(classify(&with_result).is_none());
    }

    #[test]
    fn test_pointer_suite_receiver_binds_suite() {
        let c = classify(&method(&["s"], "*DemoSuite", "TestBuild")).unwrap();
        assert_eq!(c.kind, TestKind::Test);
        assert_eq!(c.suite.as_deref(), Some("DemoSuite"));
    }

    #[test]
    fn test_unnamed_pointer_suite_receiver_binds_suite() {
        let c = classify(&method(&[], "*DemoSuite", "TestBuild")).unwrap();
        assert_eq!(c.suite.as_deref(), Some("DemoSuite"));
    }

    #[test]
    fn test_value_receiver_is_rejected_entirely() {
        // Not demoted to package level: the whole declaration is discarded.
        assert!(classify(&method(&["s"], "DemoSuite", "TestBuild")).is_none());
    }

    #[test]
    fn test_pointer_to_non_suite_receiver_is_rejected() {
        assert!(classify(&method(&["f"], "*foo", "TestMethod")).is_none());
    }

    #[test]
    fn test_multi_name_receiver_is_rejected() {
        assert!(classify(&method(&["a", "b"], "*DemoSuite", "TestBuild")).is_none());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let decl = method(&["s"], "*DemoSuite", "TestRepeat");
        assert_eq!(classify(&decl), classify(&decl));
    }
}
