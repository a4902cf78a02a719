use super::endpoint::GraphEndpoint;
use crate::error::{AskError, EndpointError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A query the endpoint accepted, with its response kept both raw and decoded.
#[derive(Debug, Clone)]
pub struct ExecutedQuery {
    pub query: String,
    pub raw_body: String,
    pub body: Value,
}

impl ExecutedQuery {
    /// Messages from a GraphQL `errors` envelope, if the endpoint sent one.
    pub fn graphql_errors(&self) -> Vec<String> {
        self.body
            .get("errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .map(|error| {
                        error
                            .get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| error.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub struct QueryExecutor {
    endpoint: Arc<dyn GraphEndpoint>,
}

impl QueryExecutor {
    pub fn new(endpoint: Arc<dyn GraphEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Runs `query` against the endpoint.
    ///
    /// Every failure, whatever its cause, comes back as [`AskError::CandidateRejected`].
    pub fn execute(&self, query: &str) -> Result<ExecutedQuery, AskError> {
        let outcome = self.endpoint.post_query(query).and_then(|raw_body| {
            serde_json::from_str::<Value>(&raw_body)
                .map(|body| (raw_body, body))
                .map_err(|err| EndpointError::decode(err.to_string()))
        });

        match outcome {
            Ok((raw_body, body)) => {
                let executed = ExecutedQuery {
                    query: query.to_string(),
                    raw_body,
                    body,
                };
                let errors = executed.graphql_errors();
                if let Some(first) = errors.first() {
                    warn!(
                        count = errors.len(),
                        "premiere_erreur" = %first,
                        "message" = "l'API GraphQL a répondu avec des erreurs"
                    );
                }
                debug!(bytes = executed.raw_body.len(), "requête exécutée");
                Ok(executed)
            }
            Err(failure) => {
                warn!(
                    "cause" = %failure.cause,
                    "detail" = %failure.detail,
                    "requete" = %query,
                    "message" = "requête candidate rejetée par l'API GraphQL"
                );
                Err(AskError::CandidateRejected {
                    query: query.to_string(),
                    failure,
                })
            }
        }
    }
}
