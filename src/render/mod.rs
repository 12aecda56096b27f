//! Default-payload rendering.
//!
//! Turns a message schema ([`Value`] tree) into an indented, JSON-shaped
//! example document an operator can edit before calling the endpoint.
//!
//! # Data Flow
//! ```text
//! Endpoint request/response Value
//!     → Renderer::render (walk fields depth first)
//!         leaf    → strategy.rs chain → example literal
//!         message → recurse, then memoize into table.rs by type name
//!     → "{\n\t\"name\": \"example-string\"\n}"
//! ```
//!
//! # Format
//! - One tab per nesting level; top-level fields sit one tab in
//! - Keys are snake_case, quoted, followed by `": "`
//! - A message's closing brace lines up with its key
//! - Output is for humans: placeholders are bare type names, not strict JSON
//!
//! # Design Decisions
//! - The type table lives inside one [`Renderer`]; nothing is shared across
//!   requests, so rendering is a pure function of its input
//! - Schema anomalies are recorded as [`RenderWarning`]s and logged, never
//!   fatal: the rest of the document still renders

pub mod strategy;
pub mod table;

use heck::ToSnakeCase;
use thiserror::Error;

use crate::registry::Value;
use crate::render::strategy::{default_strategies, ResolveDefault};
use crate::render::table::DefaultTable;

pub use strategy::{capitalize, is_plural_of, singularize};

const INDENT: &str = "\t";

/// Problems found in a schema while rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderWarning {
    /// A field without a name cannot be keyed; it is left out.
    #[error("unnamed field of type {type_name} at depth {depth} omitted")]
    EmptyFieldName { type_name: String, depth: usize },

    /// A message nested inside a message of the same type.
    #[error("field {field} re-enters type {type_name}; rendered as placeholder")]
    RecursiveType { field: String, type_name: String },
}

/// Render a schema with a fresh type table.
pub fn render(root: Option<&Value>) -> String {
    Renderer::new().render(root)
}

/// Walks schema trees and produces example documents.
///
/// Types learned while rendering are kept for later calls on the same
/// renderer, so rendering a request and then its response lets the response
/// reuse message shapes seen in the request.
pub struct Renderer {
    table: DefaultTable,
    strategies: Vec<Box<dyn ResolveDefault>>,
    warnings: Vec<RenderWarning>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_strategies(default_strategies())
    }

    /// Use a custom resolution chain. Fields no strategy answers for fall
    /// back to their type name.
    pub fn with_strategies(strategies: Vec<Box<dyn ResolveDefault>>) -> Self {
        Self {
            table: DefaultTable::new(),
            strategies,
            warnings: Vec::new(),
        }
    }

    /// Render the fields of `root`. A missing root, or one without fields,
    /// renders as `{}`.
    pub fn render(&mut self, root: Option<&Value>) -> String {
        match root {
            Some(root) if !root.is_leaf() => {
                let mut ancestors = vec![root.type_name.clone()];
                self.render_top(&root.children, &mut ancestors)
            }
            _ => "{}".to_string(),
        }
    }

    /// Render a bare field list as a top-level document.
    pub fn render_fields(&mut self, fields: &[Value]) -> String {
        self.render_top(fields, &mut Vec::new())
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    pub fn table(&self) -> &DefaultTable {
        &self.table
    }

    fn render_top(&mut self, fields: &[Value], ancestors: &mut Vec<String>) -> String {
        let rendered: Vec<String> = fields
            .iter()
            .filter_map(|field| self.render_field(field, 0, ancestors))
            .collect();

        if rendered.is_empty() {
            return "{}".to_string();
        }
        format!("{{\n{}\n}}", rendered.join(",\n"))
    }

    /// `"key": value` for one field, indented for `depth`.
    fn render_field(
        &mut self,
        field: &Value,
        depth: usize,
        ancestors: &mut Vec<String>,
    ) -> Option<String> {
        if field.name.is_empty() {
            self.warn(RenderWarning::EmptyFieldName {
                type_name: field.type_name.clone(),
                depth,
            });
            return None;
        }

        let key = format!("{}\"{}\": ", indent(depth + 1), field.name.to_snake_case());

        if field.is_leaf() {
            return Some(key + &self.resolve_default(field, depth));
        }

        if ancestors.contains(&field.type_name) {
            self.warn(RenderWarning::RecursiveType {
                field: field.name.clone(),
                type_name: field.type_name.clone(),
            });
            return Some(key + &field.type_name);
        }

        ancestors.push(field.type_name.clone());
        let body = self.render_message(field, depth, ancestors);
        ancestors.pop();

        Some(key + &body)
    }

    /// The `{ ... }` block of a nested message, memoized by type name.
    fn render_message(&mut self, field: &Value, depth: usize, ancestors: &mut Vec<String>) -> String {
        let children: Vec<String> = field
            .children
            .iter()
            .filter_map(|child| self.render_field(child, depth + 1, ancestors))
            .collect();

        let block = if children.is_empty() {
            "{}".to_string()
        } else {
            format!("{{\n{}\n{}}}", children.join(",\n"), indent(depth + 1))
        };

        self.table.learn(&field.type_name, dedent(&block, depth));
        block
    }

    fn resolve_default(&self, field: &Value, depth: usize) -> String {
        for strategy in &self.strategies {
            if let Some(value) = strategy.resolve(field, &self.table, depth) {
                tracing::trace!(field = %field.name, type_name = %field.type_name, strategy = strategy.name(), "Resolved default");
                return value;
            }
        }
        field.type_name.clone()
    }

    fn warn(&mut self, warning: RenderWarning) {
        tracing::warn!(warning = %warning, "Schema rendering anomaly");
        self.warnings.push(warning);
    }
}

pub(crate) fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Push every line after the first `depth` levels deeper.
pub(crate) fn reindent(text: &str, depth: usize) -> String {
    if depth == 0 {
        return text.to_string();
    }
    let prefix = indent(depth);
    let mut lines = text.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        out.push_str(&prefix);
        out.push_str(line);
    }
    out
}

/// Inverse of [`reindent`].
fn dedent(text: &str, depth: usize) -> String {
    if depth == 0 {
        return text.to_string();
    }
    let prefix = indent(depth);
    text.split('\n')
        .enumerate()
        .map(|(i, line)| match i {
            0 => line,
            _ => line.strip_prefix(prefix.as_str()).unwrap_or(line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
