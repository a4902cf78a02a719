use crate::config::AskConfig;
use crate::domain::{FunctionCall, FunctionCallSpec, Message};
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::VecDeque;
use std::sync::Arc;

pub const STOP_SEQUENCE: &str = "###";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: Vec<String>,
}

impl DecodingParams {
    /// Greedy decoding with no repetition penalties.
    pub fn deterministic(max_tokens: u32) -> Self {
        Self {
            temperature: 0.0,
            max_tokens,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: vec![STOP_SEQUENCE.to_string()],
        }
    }

    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = penalty;
        self
    }
}

/// Whether the model may, or must, call one of the offered functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionChoice {
    Auto,
    Force(String),
}

impl Serialize for FunctionChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FunctionChoice::Auto => serializer.serialize_str("auto"),
            FunctionChoice::Force(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("name", name)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub params: DecodingParams,
    pub functions: Vec<FunctionCallSpec>,
    pub function_choice: Option<FunctionChoice>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>, params: DecodingParams) -> Self {
        Self {
            messages,
            params,
            functions: Vec::new(),
            function_choice: None,
        }
    }

    pub fn with_functions(mut self, functions: Vec<FunctionCallSpec>, choice: FunctionChoice) -> Self {
        self.functions = functions;
        self.function_choice = Some(choice);
        self
    }
}

pub trait CompletionClient: Send + Sync {
    /// Returns the single assistant message produced for `request`.
    fn complete(&self, request: &CompletionRequest) -> Result<Message>;
}

pub struct OpenAiCompletionClient {
    endpoint: String,
    model: String,
    api_key: String,
    http: HttpClient,
}

impl OpenAiCompletionClient {
    pub fn new(config: &AskConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("impossible d'initialiser le client HTTP pour OpenAI")?;

        Ok(Self {
            endpoint: config.completion_endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for OpenAiCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Message> {
        let payload = ChatCompletionPayload {
            model: &self.model,
            messages: &request.messages,
            params: &request.params,
            functions: &request.functions,
            function_call: request.function_choice.as_ref(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .context("appel HTTP à l'API de complétion impossible")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "l'API de complétion a renvoyé le statut {}: {}",
                status,
                body
            ));
        }

        let raw: ChatCompletionResponse = response
            .json()
            .context("réponse de l'API de complétion illisible")?;

        raw.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| anyhow!("l'API de complétion n'a renvoyé aucun choix"))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionPayload<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(flatten)]
    params: &'a DecodingParams,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    functions: &'a [FunctionCallSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<&'a FunctionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: Message,
}

/// Scripted client: replays queued assistant messages and records every request.
#[derive(Clone, Default)]
pub struct MockCompletionClient {
    responses: Arc<Mutex<VecDeque<Message>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn push_response(&self, message: Message) {
        self.responses.lock().push_back(message);
    }

    pub fn push_content(&self, content: impl Into<String>) {
        self.push_response(Message::assistant(content));
    }

    pub fn push_function_call(&self, name: impl Into<String>, arguments: impl Into<String>) {
        self.push_response(Message::assistant_function_call(FunctionCall {
            name: name.into(),
            arguments: arguments.into(),
        }));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Message> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow!("aucune réponse mock disponible"))
    }
}
