//! Example literals by type name.

use std::collections::HashMap;

/// Canonical example literal for every scalar and repeated-scalar type.
static SCALAR_DEFAULTS: &[(&str, &str)] = &[
    ("string", "\"example-string\""),
    ("bool", "true"),
    ("int32", "32"),
    ("int64", "64"),
    ("uint32", "32"),
    ("uint64", "64"),
    ("float32", "32.00"),
    ("float64", "64.00"),
    ("[]string", "[\"alpha\",\"beta\",\"gamma\"]"),
    ("[]bool", "[true,true,true]"),
    ("[]int32", "[32,32,32]"),
    ("[]int64", "[64,64,64]"),
    ("[]uint8", "[8,8,8]"),
    ("[]uint32", "[32,32,32]"),
    ("[]uint64", "[64,64,64]"),
    ("[]float32", "[32.00,32.00,32.00]"),
    ("[]float64", "[64.00,64.00,64.00]"),
];

/// Type name -> example literal, scoped to one render.
///
/// Holds the static scalar table plus the nested message types rendered so
/// far. Learned renderings are stored depth-independent: continuation lines
/// are indented as if the message sat at the top level.
#[derive(Debug, Default, Clone)]
pub struct DefaultTable {
    learned: HashMap<String, String>,
}

impl DefaultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(&self, type_name: &str) -> Option<&'static str> {
        SCALAR_DEFAULTS
            .iter()
            .find(|(name, _)| *name == type_name)
            .map(|(_, literal)| *literal)
    }

    pub fn learned(&self, type_name: &str) -> Option<&str> {
        self.learned.get(type_name).map(String::as_str)
    }

    /// Remember the rendering of a nested message type. Last one wins.
    pub fn learn(&mut self, type_name: &str, rendering: String) {
        self.learned.insert(type_name.to_string(), rendering);
    }

    pub fn learned_len(&self) -> usize {
        self.learned.len()
    }
}
