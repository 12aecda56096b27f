//! Default-value resolution strategies.
//!
//! A leaf field's example value is resolved by trying each strategy in rank
//! order; the first one that answers wins:
//!
//! 1. [`StaticDefault`] - scalar and repeated-scalar literals
//! 2. [`LearnedType`] - a nested message type rendered earlier
//! 3. [`RepeatedMessage`] - plural field name over a learned singular type
//! 4. [`TypePlaceholder`] - the bare type name

use crate::registry::Value;
use crate::render::table::DefaultTable;
use crate::render::{indent, reindent};

/// Number of elements synthesized for an inferred repeated message.
pub const REPEATED_ELEMENTS: usize = 3;

/// One step of the resolution chain.
pub trait ResolveDefault: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Example value for `field`, rendered for a field sitting at `depth`.
    fn resolve(&self, field: &Value, table: &DefaultTable, depth: usize) -> Option<String>;
}

/// The standard chain, in rank order.
pub fn default_strategies() -> Vec<Box<dyn ResolveDefault>> {
    vec![
        Box::new(StaticDefault),
        Box::new(LearnedType),
        Box::new(RepeatedMessage),
        Box::new(TypePlaceholder),
    ]
}

pub struct StaticDefault;

impl ResolveDefault for StaticDefault {
    fn name(&self) -> &'static str {
        "static"
    }

    fn resolve(&self, field: &Value, table: &DefaultTable, _depth: usize) -> Option<String> {
        table.scalar(&field.type_name).map(str::to_string)
    }
}

pub struct LearnedType;

impl ResolveDefault for LearnedType {
    fn name(&self) -> &'static str {
        "learned"
    }

    fn resolve(&self, field: &Value, table: &DefaultTable, depth: usize) -> Option<String> {
        table
            .learned(&field.type_name)
            .map(|rendering| reindent(rendering, depth))
    }
}

/// Infers a repeated nested message from naming convention alone: a field
/// `users` of type `[]User` repeats whatever `User` rendered as.
pub struct RepeatedMessage;

impl ResolveDefault for RepeatedMessage {
    fn name(&self) -> &'static str {
        "repeated"
    }

    fn resolve(&self, field: &Value, table: &DefaultTable, depth: usize) -> Option<String> {
        if !is_plural_of(&field.name, &field.type_name) {
            return None;
        }

        let element = singularize(&field.name)
            .iter()
            .find_map(|candidate| table.learned(candidate))?;

        let element = format!("{}{}", indent(depth + 2), reindent(element, depth + 1));
        let elements = vec![element; REPEATED_ELEMENTS];
        Some(format!("[\n{}\n{}]", elements.join(",\n"), indent(depth + 1)))
    }
}

pub struct TypePlaceholder;

impl ResolveDefault for TypePlaceholder {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn resolve(&self, field: &Value, _table: &DefaultTable, _depth: usize) -> Option<String> {
        Some(field.type_name.clone())
    }
}

/// Upper-cases the first character when it is an ASCII lowercase letter.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// True when `"[]" + Capitalize(name)` is `type_name` plus an `s` or `es`.
pub fn is_plural_of(name: &str, type_name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let repeated = format!("[]{}", capitalize(name));
    repeated == format!("{type_name}s") || repeated == format!("{type_name}es")
}

/// Candidate singular type names for a plural field name, most likely first.
///
/// `users` -> `["User"]`, `boxes` -> `["Boxe", "Box"]`.
pub fn singularize(name: &str) -> Vec<String> {
    [name.strip_suffix('s'), name.strip_suffix("es")]
        .into_iter()
        .flatten()
        .filter(|stem| !stem.is_empty())
        .map(capitalize)
        .collect()
}
