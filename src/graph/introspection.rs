use super::endpoint::GraphEndpoint;
use crate::error::EndpointError;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

const TYPES_QUERY: &str = r#"{
  __schema {
    types {
      name,
      description
    }
  }
}"#;

/// Asks the knowledge-graph endpoint to describe its own types and fields.
pub struct SchemaIntrospector {
    endpoint: Arc<dyn GraphEndpoint>,
}

impl SchemaIntrospector {
    pub fn new(endpoint: Arc<dyn GraphEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Names and descriptions of every type in the schema, as the decoded response body.
    pub fn list_types(&self) -> Result<Value> {
        let body = self
            .endpoint
            .post_query(TYPES_QUERY)
            .context("introspection des types GraphQL impossible")?;
        let catalog: Value = serde_json::from_str(&body)
            .map_err(|err| EndpointError::decode(err.to_string()))
            .context("catalogue des types GraphQL illisible")?;
        debug!(bytes = body.len(), "catalogue des types récupéré");
        Ok(catalog)
    }

    /// Raw field listing of `type_name`.
    ///
    /// Never fails: a transport error is logged and turned into an `{"error": ...}` body
    /// so the conversation with the model can go on.
    pub fn list_fields(&self, type_name: &str) -> String {
        match self.endpoint.post_query(&fields_query(type_name)) {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "type" = %type_name,
                    "erreur" = %err,
                    "message" = "introspection des champs impossible"
                );
                json!({ "error": err.to_string() }).to_string()
            }
        }
    }
}

fn fields_query(type_name: &str) -> String {
    // A JSON string literal is also a valid GraphQL string literal.
    format!(
        r#"{{
  __type(name: {}) {{
    fields {{
      name,
      description
    }}
  }}
}}"#,
        Value::from(type_name)
    )
}
