//! Minimal Go syntax support for test discovery.
//!
//! This module parses just enough of a Go source file to expose its package
//! clause and every top-level function or method declaration: name, receiver,
//! parameters, and results. Function bodies and non-function declarations are
//! skipped as balanced token groups.
//!
//! Type expressions are captured as normalized text (`*testing.T`,
//! `map[string]int`, `chan int`) rather than structured trees; the textual
//! form is what the classifier matches against, which keeps it independent of
//! the parser's internals.
//!
//! Build-constraint handling (`//go:build`, `// +build`, `_GOOS`/`_GOARCH`
//! filename suffixes) lives in [`constraint`] and operates on raw file text,
//! before any tokenization.

mod constraint;
mod scan;

pub use constraint::{BuildContext, filename_matches, source_matches};

use scan::{Tok, Token, scan};

/// A parse failure, with the position it was detected at.
#[derive(Debug, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// One field of a receiver, parameter, or result list.
///
/// Follows Go's grouping: `a, b T` is a single field with two names, while
/// `*testing.T` alone is a single unnamed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub type_expr: String,
}

/// A top-level function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    /// Receiver field list for methods, `None` for plain functions.
    pub recv: Option<Vec<Field>>,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// A parsed source file: package clause plus top-level function declarations.
#[derive(Debug, Clone)]
pub struct GoFile {
    pub package: String,
    pub decls: Vec<FuncDecl>,
}

/// Parse one Go source file.
///
/// Malformed syntax (unbalanced delimiters, unterminated literals, a missing
/// package clause) is an error; there is no partial recovery within a file.
pub fn parse_file(src: &str) -> Result<GoFile, SyntaxError> {
    let toks = scan(src)?;
    let mut parser = Parser { toks, pos: 0 };
    parser.file()
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

struct Parser {
    toks: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.toks.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at_punct(&self, c: char) -> bool {
        matches!(self.peek(), Some(tok) if tok.kind == Tok::Punct(c))
    }

    fn at_ident(&self, text: &str) -> bool {
        matches!(self.peek(), Some(tok) if matches!(&tok.kind, Tok::Ident(i) if i == text))
    }

    fn skip_semis(&mut self) {
        while self.at_punct(';') {
            self.bump();
        }
    }

    /// Error at the current token, or at the end of input.
    fn err_here(&self, message: impl Into<String>) -> SyntaxError {
        let (line, column) = self
            .peek()
            .or(self.toks.last())
            .map_or((1, 1), |t| (t.line, t.column));
        SyntaxError {
            message: message.into(),
            line,
            column,
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, SyntaxError> {
        if let Some(Tok::Ident(name)) = self.peek().map(|t| t.kind.clone()) {
            if !is_keyword(&name) {
                self.bump();
                return Ok(name);
            }
        }
        Err(self.err_here(format!("expected {what}")))
    }

    fn file(&mut self) -> Result<GoFile, SyntaxError> {
        self.skip_semis();
        if !self.at_ident("package") {
            return Err(self.err_here("expected package clause"));
        }
        self.bump();
        let package = self.expect_ident("package name")?;

        let mut decls = Vec::new();
        loop {
            self.skip_semis();
            if self.peek().is_none() {
                break;
            }
            if self.at_ident("func") {
                decls.push(self.func_decl()?);
            } else {
                self.skip_statement()?;
            }
        }
        Ok(GoFile { package, decls })
    }

    /// Consume tokens through the end of the current top-level statement,
    /// balancing nested delimiters.
    fn skip_statement(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            match tok.kind {
                Tok::Punct('(' | '[' | '{') => depth += 1,
                Tok::Punct(')' | ']' | '}') => {
                    depth = depth.checked_sub(1).ok_or_else(|| SyntaxError {
                        message: "unbalanced closing delimiter".into(),
                        line: tok.line,
                        column: tok.column,
                    })?;
                }
                Tok::Punct(';') if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        if depth > 0 {
            return Err(self.err_here("unexpected end of file"));
        }
        Ok(())
    }

    /// Consume a balanced delimiter group, starting at its opener.
    fn skip_group(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            match tok.kind {
                Tok::Punct('(' | '[' | '{') => depth += 1,
                Tok::Punct(')' | ']' | '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(self.err_here("unexpected end of file"))
    }

    fn func_decl(&mut self) -> Result<FuncDecl, SyntaxError> {
        self.bump(); // `func`

        // At declaration position a parenthesized group before the name can
        // only be a receiver.
        let recv = if self.at_punct('(') {
            Some(self.field_list()?)
        } else {
            None
        };

        let name = self.expect_ident("function name")?;

        // Type parameters carry no signal for discovery; skip them.
        if self.at_punct('[') {
            self.skip_group()?;
        }

        if !self.at_punct('(') {
            return Err(self.err_here("expected parameter list"));
        }
        let params = self.field_list()?;
        let results = self.results()?;

        if self.at_punct('{') {
            self.skip_group()?;
        }

        Ok(FuncDecl {
            name,
            recv,
            params,
            results,
        })
    }

    /// Parse a parenthesized field list, starting at `(`.
    fn field_list(&mut self) -> Result<Vec<Field>, SyntaxError> {
        self.bump(); // `(`
        let mut units: Vec<Vec<Tok>> = Vec::new();
        let mut unit: Vec<Tok> = Vec::new();
        let mut depth = 0usize;
        loop {
            let Some(tok) = self.bump() else {
                return Err(self.err_here("unterminated field list"));
            };
            match tok.kind {
                Tok::Punct(')') if depth == 0 => break,
                Tok::Punct(c @ ('(' | '[' | '{')) => {
                    depth += 1;
                    unit.push(Tok::Punct(c));
                }
                Tok::Punct(c @ (')' | ']' | '}')) => {
                    depth = depth.checked_sub(1).ok_or_else(|| SyntaxError {
                        message: "unbalanced closing delimiter".into(),
                        line: tok.line,
                        column: tok.column,
                    })?;
                    unit.push(Tok::Punct(c));
                }
                Tok::Punct(',') if depth == 0 => {
                    units.push(std::mem::take(&mut unit));
                }
                // Inserted semicolons from multi-line lists are noise here.
                Tok::Punct(';') if depth == 0 => {}
                kind => unit.push(kind),
            }
        }
        if !unit.is_empty() {
            units.push(unit);
        }
        Ok(group_fields(units))
    }

    /// Parse an optional result list: parenthesized fields, a single bare
    /// type, or nothing.
    fn results(&mut self) -> Result<Vec<Field>, SyntaxError> {
        if self.at_punct('(') {
            return self.field_list();
        }
        let mut unit: Vec<Tok> = Vec::new();
        let mut depth = 0usize;
        while let Some(tok) = self.peek().cloned() {
            match tok.kind {
                Tok::Punct(';') if depth == 0 => break,
                Tok::Punct('{') if depth == 0 => {
                    // A brace after `struct` or `interface` is part of the
                    // result type; otherwise it opens the function body.
                    let type_brace = matches!(
                        unit.last(),
                        Some(Tok::Ident(k)) if k == "struct" || k == "interface"
                    );
                    if !type_brace {
                        break;
                    }
                    depth += 1;
                    unit.push(Tok::Punct('{'));
                    self.bump();
                }
                Tok::Punct(c @ ('(' | '[' | '{')) => {
                    depth += 1;
                    unit.push(Tok::Punct(c));
                    self.bump();
                }
                Tok::Punct(c @ (')' | ']' | '}')) => {
                    depth = depth.checked_sub(1).ok_or(SyntaxError {
                        message: "unbalanced closing delimiter".into(),
                        line: tok.line,
                        column: tok.column,
                    })?;
                    unit.push(Tok::Punct(c));
                    self.bump();
                }
                kind => {
                    unit.push(kind);
                    self.bump();
                }
            }
        }
        if unit.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Field {
                names: Vec::new(),
                type_expr: join_type(&unit),
            }])
        }
    }
}

/// Does this unit look like `name Type` rather than a bare type expression?
fn named_shaped(unit: &[Tok]) -> bool {
    let [Tok::Ident(first), rest @ ..] = unit else {
        return false;
    };
    if is_keyword(first) {
        return false;
    }
    match rest {
        [] => false,
        [Tok::Ident(_), ..] => true,
        [Tok::Punct('*' | '[' | '(' | '<'), ..] => true,
        // Variadic: `args ...T`. A single dot continues a qualified ident.
        [Tok::Punct('.'), Tok::Punct('.'), Tok::Punct('.'), ..] => true,
        _ => false,
    }
}

/// Group comma-separated units into fields following Go's rule that a list is
/// either all-named or all-unnamed: in `a, b T` the single-ident units are
/// names belonging to the next typed unit.
fn group_fields(units: Vec<Vec<Tok>>) -> Vec<Field> {
    let named = units.iter().any(|u| named_shaped(u));
    let mut fields = Vec::new();

    if !named {
        for unit in &units {
            if unit.is_empty() {
                continue;
            }
            fields.push(Field {
                names: Vec::new(),
                type_expr: join_type(unit),
            });
        }
        return fields;
    }

    let mut pending: Vec<String> = Vec::new();
    for unit in &units {
        if let [Tok::Ident(name)] = unit.as_slice() {
            pending.push(name.clone());
            continue;
        }
        if named_shaped(unit) {
            if let [Tok::Ident(name), rest @ ..] = unit.as_slice() {
                pending.push(name.clone());
                fields.push(Field {
                    names: std::mem::take(&mut pending),
                    type_expr: join_type(rest),
                });
                continue;
            }
        }
        fields.push(Field {
            names: std::mem::take(&mut pending),
            type_expr: join_type(unit),
        });
    }
    for name in pending {
        fields.push(Field {
            names: Vec::new(),
            type_expr: name,
        });
    }
    fields
}

/// Render a type's tokens as normalized text: a space only between adjacent
/// word tokens, so `*testing.T`, `map[string]int`, and `chan int` come out in
/// their conventional spelling.
fn join_type(toks: &[Tok]) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    for tok in toks {
        match tok {
            Tok::Ident(s) | Tok::Lit(s) => {
                if prev_word {
                    out.push(' ');
                }
                out.push_str(s);
                prev_word = true;
            }
            Tok::Punct(c) => {
                out.push(*c);
                prev_word = false;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn field(names: &[&str], type_expr: &str) -> Field {
        Field {
            names: names.iter().map(|n| (*n).to_string()).collect(),
            type_expr: type_expr.to_string(),
        }
    }

    #[test]
    fn test_parse_package_clause() {
        let file = parse_file("package mypkg\n").unwrap();
        assert_eq!(file.package, "mypkg");
        assert!(file.decls.is_empty());
    }

    #[test]
    fn test_missing_package_clause_is_an_error() {
        let err = parse_file("import \"testing\"\n").unwrap_err();
        assert!(err.message.contains("package clause"));
    }

    #[test]
    fn test_parse_simple_test_function() {
        let src = "package p\n\nimport \"testing\"\n\nfunc TestFoo(t *testing.T) {\n\tt.Log(\"hi\")\n}\n";
        let file = parse_file(src).unwrap();
        assert_eq!(
            file.decls,
            vec![FuncDecl {
                name: "TestFoo".into(),
                recv: None,
                params: vec![field(&["t"], "*testing.T")],
                results: vec![],
            }]
        );
    }

    #[test]
    fn test_parse_unnamed_parameter() {
        let file = parse_file("package p\nfunc TestFoo(*testing.T) {}\n").unwrap();
        assert_eq!(file.decls[0].params, vec![field(&[], "*testing.T")]);
    }

    #[test]
    fn test_parse_grouped_parameter_names() {
        let file = parse_file("package p\nfunc f(a, b int) {}\n").unwrap();
        assert_eq!(file.decls[0].params, vec![field(&["a", "b"], "int")]);
    }

    #[test]
    fn test_parse_multiple_parameter_fields() {
        let file = parse_file("package p\nfunc f(t *testing.T, s string) {}\n").unwrap();
        assert_eq!(
            file.decls[0].params,
            vec![field(&["t"], "*testing.T"), field(&["s"], "string")]
        );
    }

    #[test]
    fn test_parse_unnamed_parameter_list() {
        // `(a, b)` is a list of two bare types, not names.
        let file = parse_file("package p\nfunc f(a, b) {}\n").unwrap();
        assert_eq!(
            file.decls[0].params,
            vec![field(&[], "a"), field(&[], "b")]
        );
    }

    #[test]
    fn test_parse_pointer_receiver() {
        let file = parse_file("package p\nfunc (s *DemoSuite) TestOne(t *testing.T) {}\n").unwrap();
        assert_eq!(
            file.decls[0].recv,
            Some(vec![field(&["s"], "*DemoSuite")])
        );
    }

    #[test]
    fn test_parse_value_receiver() {
        let file = parse_file("package p\nfunc (DemoSuite) TestOne(t *testing.T) {}\n").unwrap();
        assert_eq!(file.decls[0].recv, Some(vec![field(&[], "DemoSuite")]));
    }

    #[test]
    fn test_parse_single_bare_result() {
        let file = parse_file("package p\nfunc f() error { return nil }\n").unwrap();
        assert_eq!(file.decls[0].results, vec![field(&[], "error")]);
    }

    #[test]
    fn test_parse_parenthesized_results() {
        let file = parse_file("package p\nfunc f() (int, error) { return 0, nil }\n").unwrap();
        assert_eq!(file.decls[0].results.len(), 2);
    }

    #[test]
    fn test_parse_no_results() {
        let file = parse_file("package p\nfunc f() {}\n").unwrap();
        assert!(file.decls[0].results.is_empty());
    }

    #[test]
    fn test_bodyless_function() {
        let file = parse_file("package p\nfunc lowlevel(x int)\n").unwrap();
        assert_eq!(file.decls[0].name, "lowlevel");
    }

    #[test]
    fn test_generic_type_parameters_are_skipped() {
        let file = parse_file("package p\nfunc f[T any](v T) {}\n").unwrap();
        assert_eq!(file.decls[0].params, vec![field(&["v"], "T")]);
    }

    #[test]
    fn test_variadic_parameter() {
        let file = parse_file("package p\nfunc f(args ...int) {}\n").unwrap();
        assert_eq!(file.decls[0].params, vec![field(&["args"], "...int")]);
    }

    #[test]
    fn test_map_and_chan_types_normalize() {
        let file = parse_file("package p\nfunc f(m map[string]int, c chan int) {}\n").unwrap();
        assert_eq!(
            file.decls[0].params,
            vec![field(&["m"], "map[string]int"), field(&["c"], "chan int")]
        );
    }

    #[test]
    fn test_other_declarations_are_skipped() {
        let src = "package p\n\nimport (\n\t\"fmt\"\n\t\"testing\"\n)\n\nconst answer = 42\n\ntype foo int\n\nvar bar = fmt.Sprint(answer)\n\nfunc TestOnly(t *testing.T) {}\n";
        let file = parse_file(src).unwrap();
        assert_eq!(file.decls.len(), 1);
        assert_eq!(file.decls[0].name, "TestOnly");
    }

    #[test]
    fn test_function_literal_in_var_is_not_a_declaration() {
        let src = "package p\n\nvar helper = func(t int) {}\n\nfunc TestReal(x int) {}\n";
        let file = parse_file(src).unwrap();
        let names: Vec<_> = file.decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["TestReal"]);
    }

    #[test]
    fn test_nested_braces_in_body() {
        let src = "package p\nfunc TestNesting(t *testing.T) {\n\tif true {\n\t\tfor {\n\t\t\tbreak\n\t\t}\n\t}\n}\nfunc TestAfter(t *testing.T) {}\n";
        let file = parse_file(src).unwrap();
        assert_eq!(file.decls.len(), 2);
    }

    #[test]
    fn test_braces_in_string_do_not_unbalance() {
        let src = "package p\nfunc TestStrings(t *testing.T) {\n\ts := \"}}}{{\"\n\t_ = s\n}\n";
        let file = parse_file(src).unwrap();
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn test_unbalanced_body_is_an_error() {
        let err = parse_file("package p\nfunc f() {\n").unwrap_err();
        assert!(err.message.contains("unexpected end of file"));
    }

    #[test]
    fn test_struct_result_type() {
        let src = "package p\nfunc f() struct{ x int } {\n\treturn struct{ x int }{}\n}\n";
        let file = parse_file(src).unwrap();
        assert_eq!(file.decls[0].results.len(), 1);
        assert!(file.decls[0].results[0].type_expr.starts_with("struct{"));
    }

    #[test]
    fn test_multiline_parameter_list() {
        let src = "package p\nfunc f(\n\ta int,\n\tb string,\n) {}\n";
        let file = parse_file(src).unwrap();
        assert_eq!(
            file.decls[0].params,
            vec![field(&["a"], "int"), field(&["b"], "string")]
        );
    }
}
