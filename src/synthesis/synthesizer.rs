use super::completion::{CompletionClient, CompletionRequest, DecodingParams, FunctionChoice};
use crate::domain::{Capability, CapabilityInvocation, Message};
use crate::error::AskError;
use crate::graph::SchemaIntrospector;
use crate::prompt::PromptLibrary;
use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Negative presence penalty for the answer that follows a field lookup: the model
/// should reuse the field names it was just given.
pub const ENRICHED_PRESENCE_PENALTY: f32 = -2.0;

/// The two synthesis strategies, always tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPath {
    Bare,
    Enriched,
}

impl fmt::Display for SynthesisPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisPath::Bare => write!(f, "bare"),
            SynthesisPath::Enriched => write!(f, "enriched"),
        }
    }
}

pub struct QuerySynthesizer {
    client: Arc<dyn CompletionClient>,
    introspector: Arc<SchemaIntrospector>,
    library: Arc<PromptLibrary>,
    max_tokens: u32,
}

impl QuerySynthesizer {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        introspector: Arc<SchemaIntrospector>,
        library: Arc<PromptLibrary>,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            introspector,
            library,
            max_tokens,
        }
    }

    pub fn synthesize(&self, path: SynthesisPath, question: &str) -> Result<String> {
        match path {
            SynthesisPath::Bare => self.bare(question),
            SynthesisPath::Enriched => self.enriched(question),
        }
    }

    /// Few-shot completion only; the reply content is the candidate query, untouched.
    ///
    /// An empty reply is still a candidate and is left for the endpoint to reject.
    pub fn bare(&self, question: &str) -> Result<String> {
        let request = CompletionRequest::new(
            self.library.conversation(&[], question),
            DecodingParams::deterministic(self.max_tokens),
        );
        let reply = self
            .client
            .complete(&request)
            .context("échec de la complétion directe")?;
        Ok(reply.content.unwrap_or_default())
    }

    /// One forced field lookup, then a second completion that sees the listing.
    ///
    /// A reply that does not decode into a valid lookup is fatal for the question.
    pub fn enriched(&self, question: &str) -> Result<String> {
        let lookup = CompletionRequest::new(
            self.library.conversation(&[], question),
            DecodingParams::deterministic(self.max_tokens),
        )
        .with_functions(
            vec![Capability::FieldLookup.spec()],
            FunctionChoice::Force(Capability::FieldLookup.name().to_string()),
        );
        let reply = self
            .client
            .complete(&lookup)
            .context("échec de la complétion avec appel de fonction")?;

        let call = reply
            .function_call
            .clone()
            .ok_or(AskError::MissingFunctionCall)?;
        let invocation = Capability::decode(&call)?;
        let listing = self.invoke(&invocation);
        let lookup_turns = [reply, Message::function(call.name, listing)];

        let answer = CompletionRequest::new(
            self.library.conversation(&lookup_turns, question),
            DecodingParams::deterministic(self.max_tokens)
                .with_presence_penalty(ENRICHED_PRESENCE_PENALTY),
        );
        let reply = self
            .client
            .complete(&answer)
            .context("échec de la complétion enrichie")?;
        Ok(candidate_text(reply)?)
    }

    fn invoke(&self, invocation: &CapabilityInvocation) -> String {
        match invocation {
            CapabilityInvocation::FieldLookup { type_name } => {
                info!("type" = %type_name, "message" = "introspection des champs demandée par le modèle");
                let listing = self.introspector.list_fields(type_name);
                debug!(bytes = listing.len(), "champs récupérés");
                listing
            }
        }
    }
}

fn candidate_text(reply: Message) -> Result<String, AskError> {
    reply
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or(AskError::MissingContent)
}
