use super::examples::{Example, WORKED_EXAMPLES};
use crate::domain::Message;
use crate::graph::SchemaIntrospector;
use anyhow::{Context, Result};
use serde_json::Value;

/// Few-shot conditioning sent ahead of every question: the system instruction
/// (with the full type catalog) followed by the worked examples.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    messages: Vec<Message>,
}

impl PromptLibrary {
    pub fn new(type_catalog: &Value) -> Self {
        Self::with_examples(type_catalog, WORKED_EXAMPLES)
    }

    pub fn with_examples(type_catalog: &Value, examples: &[Example]) -> Self {
        let mut messages = Vec::with_capacity(1 + examples.len() * 2);
        messages.push(Message::system(system_instruction(type_catalog)));
        for example in examples {
            messages.push(Message::user(example.question));
            messages.push(Message::assistant(example.query));
        }
        Self { messages }
    }

    /// Snapshots the catalog once; the library never calls the endpoint again.
    pub fn from_introspector(introspector: &SchemaIntrospector) -> Result<Self> {
        let catalog = introspector
            .list_types()
            .context("impossible de construire la bibliothèque de prompts")?;
        Ok(Self::new(&catalog))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn examples_len(&self) -> usize {
        (self.messages.len() - 1) / 2
    }

    /// The library followed by `extra` turns and finally the user's question.
    pub fn conversation(&self, extra: &[Message], question: &str) -> Vec<Message> {
        let mut conversation = Vec::with_capacity(self.messages.len() + extra.len() + 1);
        conversation.extend_from_slice(&self.messages);
        conversation.extend_from_slice(extra);
        conversation.push(Message::user(question));
        conversation
    }
}

fn system_instruction(type_catalog: &Value) -> String {
    format!(
        concat!(
            "You are a code assistant that will generate GraphQL queries.\n",
            "Follow previous responses closely. Only output graphql queries.\n",
            "Do not add any extra text to the response.\n",
            "Use the types from:\n{}\n"
        ),
        type_catalog
    )
}
