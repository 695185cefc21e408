//! Build-constraint evaluation for test file selection.
//!
//! Mirrors the subset of Go's build-context rules this tool needs: filename
//! `_GOOS`/`_GOARCH` suffixes, `//go:build` expressions, and legacy
//! `// +build` lines, all evaluated against the host platform. Tags other
//! than the host OS, host architecture, and `unix` evaluate to false, which
//! matches a build with no extra tags supplied.

use std::env::consts;

const KNOWN_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "js",
    "linux",
    "nacl",
    "netbsd",
    "openbsd",
    "plan9",
    "solaris",
    "wasip1",
    "windows",
    "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386",
    "amd64",
    "amd64p32",
    "arm",
    "arm64",
    "loong64",
    "mips",
    "mips64",
    "mips64le",
    "mipsle",
    "ppc64",
    "ppc64le",
    "riscv64",
    "s390x",
    "sparc64",
    "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix",
    "android",
    "darwin",
    "dragonfly",
    "freebsd",
    "hurd",
    "illumos",
    "ios",
    "linux",
    "netbsd",
    "openbsd",
    "solaris",
];

/// The platform file selection is evaluated against.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub goos: &'static str,
    pub goarch: &'static str,
}

impl BuildContext {
    /// Context for the machine the tool runs on.
    pub fn host() -> Self {
        Self {
            goos: host_goos(),
            goarch: host_goarch(),
        }
    }

    fn tag(&self, name: &str) -> bool {
        name == self.goos
            || name == self.goarch
            || (name == "unix" && UNIX_OS.contains(&self.goos))
    }
}

fn host_goos() -> &'static str {
    match consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match consts::ARCH {
        "x86" => "386",
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "loongarch64" => "loong64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Filename-encoded constraints: `foo_linux_test.go`, `foo_arm64_test.go`,
/// `foo_linux_arm64_test.go`. The `_test` suffix is ignored, matching how the
/// Go toolchain inspects file names.
pub fn filename_matches(file_name: &str, ctx: &BuildContext) -> bool {
    let Some(stem) = file_name.strip_suffix(".go") else {
        return true;
    };
    let stem = stem.strip_suffix("_test").unwrap_or(stem);
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 2 {
        return true;
    }
    let last = parts[parts.len() - 1];
    if parts.len() >= 3 && KNOWN_OS.contains(&parts[parts.len() - 2]) && KNOWN_ARCH.contains(&last)
    {
        return parts[parts.len() - 2] == ctx.goos && last == ctx.goarch;
    }
    if KNOWN_OS.contains(&last) {
        return last == ctx.goos;
    }
    if KNOWN_ARCH.contains(&last) {
        return last == ctx.goarch;
    }
    true
}

/// Header-comment constraints. A `//go:build` expression wins; otherwise all
/// legacy `// +build` lines must hold. The header ends at the first line that
/// is neither blank nor a comment.
pub fn source_matches(src: &str, ctx: &BuildContext) -> bool {
    let mut plus_lines: Vec<&str> = Vec::new();
    let mut in_block = false;
    for line in src.lines() {
        let trimmed = line.trim();
        if in_block {
            if trimmed.contains("*/") {
                in_block = false;
            }
            continue;
        }
        if let Some(expr) = trimmed.strip_prefix("//go:build ") {
            return eval_expr(expr, ctx).unwrap_or(false);
        }
        if let Some(rest) = trimmed.strip_prefix("// +build ") {
            plus_lines.push(rest);
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.starts_with("/*") {
            if !trimmed.contains("*/") {
                in_block = true;
            }
            continue;
        }
        break;
    }
    plus_lines.iter().all(|line| eval_plus_line(line, ctx))
}

/// One `// +build` line: space-separated options OR together, comma-separated
/// terms AND together, `!` negates.
fn eval_plus_line(line: &str, ctx: &BuildContext) -> bool {
    line.split_whitespace().any(|option| {
        option.split(',').all(|term| match term.strip_prefix('!') {
            Some(tag) => !ctx.tag(tag),
            None => ctx.tag(term),
        })
    })
}

#[derive(Debug, PartialEq, Eq)]
enum ETok {
    And,
    Or,
    Not,
    LParen,
    RParen,
    Tag(String),
}

/// Evaluate a `//go:build` expression. `None` for malformed input, which
/// callers treat as "excluded".
fn eval_expr(expr: &str, ctx: &BuildContext) -> Option<bool> {
    let toks = tokenize_expr(expr)?;
    let mut parser = ExprParser { toks, pos: 0 };
    let value = parser.or_expr(ctx)?;
    if parser.pos != parser.toks.len() {
        return None;
    }
    Some(value)
}

fn tokenize_expr(expr: &str) -> Option<Vec<ETok>> {
    let mut toks = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                toks.push(ETok::LParen);
            }
            ')' => {
                chars.next();
                toks.push(ETok::RParen);
            }
            '!' => {
                chars.next();
                toks.push(ETok::Not);
            }
            '&' => {
                chars.next();
                if chars.next() != Some('&') {
                    return None;
                }
                toks.push(ETok::And);
            }
            '|' => {
                chars.next();
                if chars.next() != Some('|') {
                    return None;
                }
                toks.push(ETok::Or);
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut tag = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '.' {
                        tag.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                toks.push(ETok::Tag(tag));
            }
            _ => return None,
        }
    }
    Some(toks)
}

struct ExprParser {
    toks: Vec<ETok>,
    pos: usize,
}

impl ExprParser {
    fn eat(&mut self, tok: &ETok) -> bool {
        if self.toks.get(self.pos) == Some(tok) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn or_expr(&mut self, ctx: &BuildContext) -> Option<bool> {
        let mut value = self.and_expr(ctx)?;
        while self.eat(&ETok::Or) {
            let rhs = self.and_expr(ctx)?;
            value = value || rhs;
        }
        Some(value)
    }

    fn and_expr(&mut self, ctx: &BuildContext) -> Option<bool> {
        let mut value = self.unary(ctx)?;
        while self.eat(&ETok::And) {
            let rhs = self.unary(ctx)?;
            value = value && rhs;
        }
        Some(value)
    }

    fn unary(&mut self, ctx: &BuildContext) -> Option<bool> {
        if self.eat(&ETok::Not) {
            return Some(!self.unary(ctx)?);
        }
        if self.eat(&ETok::LParen) {
            let value = self.or_expr(ctx)?;
            if !self.eat(&ETok::RParen) {
                return None;
            }
            return Some(value);
        }
        if let Some(ETok::Tag(tag)) = self.toks.get(self.pos) {
            let value = ctx.tag(tag);
            self.pos += 1;
            return Some(value);
        }
        None
    }
}
