//! Registry record types.
//!
//! Field names on the wire follow the registry's JSON shape (`values` for the
//! nested fields of a [`Value`], `type` for its type name) so that dashboard
//! JSON responses and `[[services]]` config tables read the same.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered service version.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub version: String,
    pub metadata: BTreeMap<String, String>,
    pub endpoints: Vec<Endpoint>,
    pub nodes: Vec<Node>,
}

impl Service {
    /// A listing entry: name and version, nothing else.
    pub fn summary(&self) -> Self {
        Self {
            name: self.name.clone(),
            version: self.version.clone(),
            ..Self::default()
        }
    }
}

/// A live instance of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Node {
    pub id: String,
    /// `host:port` the instance listens on.
    pub address: String,
    pub metadata: BTreeMap<String, String>,
}

/// An RPC endpoint exposed by a service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoint {
    /// `Handler.Method`, e.g. `Say.Hello`.
    pub name: String,
    pub request: Option<Value>,
    pub response: Option<Value>,
    pub metadata: BTreeMap<String, String>,
}

/// One node of a message schema.
///
/// A value without children is a scalar (or repeated scalar) field; one with
/// children is a nested message. `name` keeps the casing the schema source
/// used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Value {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "values", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Value>,
}

impl Value {
    /// A scalar field.
    pub fn leaf(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            children: Vec::new(),
        }
    }

    /// A nested message field.
    pub fn message(
        name: impl Into<String>,
        type_name: impl Into<String>,
        children: Vec<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
