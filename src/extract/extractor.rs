use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

/// Alias used in synthesized queries to tag the fields to pull out.
pub const EXTRACTION_MARKER: &str = "_extracted";
pub const FIRST_HIT_POINTER: &str = "/data/search/hits/0";

/// A value found under a marker key.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue(Value);

impl ExtractedValue {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => f.write_str(text),
            other => write!(f, "{}", other),
        }
    }
}

/// Pre-order, left-to-right collection of every value whose key equals `marker`.
///
/// Object keys are visited in document order; a matching key yields its value and is
/// not descended into, any other key is recursed into. Scalars yield nothing.
pub fn extract(node: &Value, marker: &str) -> Vec<ExtractedValue> {
    let mut found = Vec::new();
    collect(node, marker, &mut found);
    found
}

fn collect(node: &Value, marker: &str, found: &mut Vec<ExtractedValue>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                if key == marker {
                    found.push(ExtractedValue(value.clone()));
                } else {
                    collect(value, marker, found);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, marker, found);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Which part of a response the extractor walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionScope {
    #[default]
    Body,
    FirstHit,
}

impl ExtractionScope {
    pub fn select<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        match self {
            ExtractionScope::Body => Some(body),
            ExtractionScope::FirstHit => body.pointer(FIRST_HIT_POINTER),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultExtractor {
    marker: String,
    scope: ExtractionScope,
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self::new(EXTRACTION_MARKER)
    }
}

impl ResultExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            scope: ExtractionScope::Body,
        }
    }

    pub fn with_scope(mut self, scope: ExtractionScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn extract(&self, body: &Value) -> Vec<ExtractedValue> {
        let Some(root) = self.scope.select(body) else {
            warn!(
                "pointeur" = FIRST_HIT_POINTER,
                "message" = "aucun résultat de recherche dans la réponse"
            );
            return Vec::new();
        };
        let values = extract(root, &self.marker);
        info!(
            "marqueur" = %self.marker,
            count = values.len(),
            "message" = "valeurs extraites"
        );
        values
    }
}
