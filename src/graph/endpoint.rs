use crate::config::{AskConfig, DEFAULT_USER_AGENT};
use crate::error::EndpointError;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Single POST endpoint accepting `{"query": ...}` and answering with a JSON envelope.
pub trait GraphEndpoint: Send + Sync {
    /// Returns the raw response body, or fails on network errors and non-success statuses.
    fn post_query(&self, query: &str) -> Result<String, EndpointError>;
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

pub struct HttpGraphEndpoint {
    client: HttpClient,
    endpoint: String,
}

impl HttpGraphEndpoint {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("impossible de créer le client HTTP pour l'API GraphQL")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &AskConfig) -> Result<Self> {
        Self::new(
            config.graph_endpoint.clone(),
            &config.user_agent,
            config.timeout,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphEndpoint for HttpGraphEndpoint {
    fn post_query(&self, query: &str) -> Result<String, EndpointError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query })
            .send()
            .map_err(|err| EndpointError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| EndpointError::transport(err.to_string()))?;

        if !status.is_success() {
            return Err(EndpointError::status(
                status.as_u16(),
                truncate(&body, MAX_ERROR_BODY_CHARS),
            ));
        }

        Ok(body)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

/// Scripted endpoint replaying queued outcomes and recording every query it receives.
#[derive(Clone, Default)]
pub struct MockGraphEndpoint {
    outcomes: Arc<Mutex<VecDeque<Result<String, EndpointError>>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockGraphEndpoint {
    pub fn push_body(&self, body: impl Into<String>) {
        self.outcomes.lock().push_back(Ok(body.into()));
    }

    pub fn push_failure(&self, error: EndpointError) {
        self.outcomes.lock().push_back(Err(error));
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

impl GraphEndpoint for MockGraphEndpoint {
    fn post_query(&self, query: &str) -> Result<String, EndpointError> {
        self.queries.lock().push(query.to_string());
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(EndpointError::transport("aucune réponse mock disponible")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureCause;
    use crate::utils::{closed_url, serve_once};

    fn http_endpoint(url: String) -> HttpGraphEndpoint {
        HttpGraphEndpoint::new(url, DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn http_success_returns_raw_body() {
        let (url, server) = serve_once(200, r#"{"data":{"meta":{"name":"Open Targets"}}}"#);

        let body = http_endpoint(url).post_query("{ meta { name } }").unwrap();
        assert_eq!(body, r#"{"data":{"meta":{"name":"Open Targets"}}}"#);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /graphql"));
        assert!(request.to_lowercase().contains("accept: application/json"));
        assert!(request.ends_with(r#"{"query":"{ meta { name } }"}"#));
    }

    #[test]
    fn http_non_success_status_is_an_error() {
        let (url, server) = serve_once(400, r#"{"errors":[{"message":"Syntax Error"}]}"#);

        let err = http_endpoint(url).post_query("query broken {").unwrap_err();
        assert_eq!(err.cause, FailureCause::Status(400));
        assert!(err.detail.contains("Syntax Error"));
        server.join().unwrap();
    }

    #[test]
    fn http_unreachable_endpoint_is_a_transport_error() {
        let err = http_endpoint(closed_url()).post_query("{ meta }").unwrap_err();
        assert_eq!(err.cause, FailureCause::Transport);
    }

    #[test]
    fn request_body_wraps_query() {
        let body = serde_json::to_string(&GraphQlRequest { query: "{ meta { name } }" }).unwrap();
        assert_eq!(body, r#"{"query":"{ meta { name } }"}"#);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("éàüöç", 2), "éà…");
    }

    #[test]
    fn mock_replays_in_order_then_fails() {
        let mock = MockGraphEndpoint::default();
        mock.push_body("{}");
        mock.push_failure(EndpointError::status(400, "bad"));

        assert_eq!(mock.post_query("a").unwrap(), "{}");
        assert_eq!(
            mock.post_query("b").unwrap_err().cause,
            FailureCause::Status(400)
        );
        assert_eq!(
            mock.post_query("c").unwrap_err().cause,
            FailureCause::Transport
        );
        assert_eq!(mock.queries(), vec!["a", "b", "c"]);
    }
}
