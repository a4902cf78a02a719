use anyhow::{anyhow, Result};
use std::time::Duration;

pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://api.platform.opentargets.org/api/v4/graphql";
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_USER_AGENT: &str = "ask-opentargets/0.1";
pub const DEFAULT_MAX_TOKENS: u32 = 250;

/// Settings shared by every component of a session, read once at startup.
#[derive(Clone)]
pub struct AskConfig {
    pub api_key: String,
    pub graph_endpoint: String,
    pub completion_endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl AskConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(anyhow!("clé d'API vide: renseigner OPENAI_API_KEY"));
        }
        Ok(Self {
            api_key,
            graph_endpoint: DEFAULT_GRAPH_ENDPOINT.to_string(),
            completion_endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(120),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn with_graph_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.graph_endpoint = endpoint.into();
        self
    }

    pub fn with_completion_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.completion_endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl std::fmt::Debug for AskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AskConfig")
            .field("api_key", &"***")
            .field("graph_endpoint", &self.graph_endpoint)
            .field("completion_endpoint", &self.completion_endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_api_key() {
        assert!(AskConfig::new("   ").is_err());
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = AskConfig::new(" sk-test ")
            .unwrap()
            .with_model("gpt-4o-mini")
            .with_max_tokens(64)
            .with_graph_endpoint("http://localhost:8080/graphql");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.graph_endpoint, "http://localhost:8080/graphql");
        assert_eq!(config.completion_endpoint, DEFAULT_COMPLETION_ENDPOINT);
        assert!(!format!("{:?}", config).contains("sk-test"));
    }

    #[test]
    fn zero_token_budget_is_kept_as_given() {
        let config = AskConfig::new("sk-test").unwrap().with_max_tokens(0);
        assert_eq!(config.max_tokens, 0);
    }
}
