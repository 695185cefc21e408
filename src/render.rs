//! Output rendering for catalogs and matrices.
//!
//! Two catalog formats: the literal string `json` marshals the sorted items
//! as an array of records, and anything else is treated as a row template.
//! Whitespace splits a template into columns, `{{.Field}}` placeholders
//! substitute per item, and columns are padded into alignment in the manner
//! of elastic tab stops. Matrices always render as a JSON array of shard
//! strings.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::Catalog;
use crate::item::{TestItem, TestKind};

/// Template used when the caller does not supply one.
pub const DEFAULT_FORMAT: &str = "{{.Pkg}} {{.Name}} {{.File}}";

/// Format name selecting JSON output.
pub const JSON_FORMAT: &str = "json";

const MIN_WIDTH: usize = 5;
const PADDING: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template referenced a field the item record does not have.
    #[error("unknown template field {{{{.{0}}}}}")]
    UnknownField(String),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*\.(\w+)\s*\}\}").unwrap())
}

/// Render the catalog as a JSON array of item records.
pub fn render_json(catalog: &Catalog) -> Result<String, RenderError> {
    Ok(serde_json::to_string(catalog)?)
}

/// Render a shard matrix as a JSON array of strings.
pub fn render_matrix(matrix: &[String]) -> Result<String, RenderError> {
    Ok(serde_json::to_string(matrix)?)
}

/// Render the catalog through a row template, one line per item, with
/// columns padded into alignment.
pub fn render_table(catalog: &Catalog, format: &str) -> Result<String, RenderError> {
    let mut columns: Vec<&str> = format.split_whitespace().collect();
    if columns.is_empty() {
        columns = DEFAULT_FORMAT.split_whitespace().collect();
    }

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(catalog.len());
    for item in catalog {
        let row = columns
            .iter()
            .map(|column| expand(column, item))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let mut widths = vec![0usize; columns.len()];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let width = (widths[i] + PADDING).max(MIN_WIDTH);
                    for _ in cell.chars().count()..width {
                        line.push(' ');
                    }
                }
            }
            line
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Substitute every placeholder in one template column.
fn expand(template: &str, item: &TestItem) -> Result<String, RenderError> {
    let re = placeholder_re();
    // Validate field names first; replace_all below cannot fail.
    for caps in re.captures_iter(template) {
        let field = &caps[1];
        if field_value(item, field).is_none() {
            return Err(RenderError::UnknownField(field.to_string()));
        }
    }
    let expanded = re.replace_all(template, |caps: &regex::Captures<'_>| {
        field_value(item, &caps[1]).unwrap_or_default()
    });
    Ok(expanded.into_owned())
}

fn field_value(item: &TestItem, field: &str) -> Option<String> {
    match field {
        "Name" => Some(item.name.clone()),
        "Pkg" => Some(item.pkg.clone()),
        "File" => Some(item.file.display().to_string()),
        "Suite" => Some(item.suite.clone().unwrap_or_default()),
        "Benchmark" => Some((item.kind == TestKind::Benchmark).to_string()),
        "Fuzz" => Some((item.kind == TestKind::Fuzz).to_string()),
        _ => None,
    }
}
