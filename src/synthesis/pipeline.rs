use super::completion::{CompletionClient, OpenAiCompletionClient};
use super::synthesizer::{QuerySynthesizer, SynthesisPath};
use crate::config::AskConfig;
use crate::graph::{
    ExecutedQuery, GraphEndpoint, HttpGraphEndpoint, QueryExecutor, SchemaIntrospector,
};
use crate::prompt::PromptLibrary;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Position in the attempt/fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Attempt,
    Fallback,
}

impl Stage {
    pub fn path(self) -> SynthesisPath {
        match self {
            Stage::Attempt => SynthesisPath::Bare,
            Stage::Fallback => SynthesisPath::Enriched,
        }
    }

    /// Where to go after a rejected candidate. Only the first attempt has a fallback.
    pub fn fallback(self) -> Option<Stage> {
        match self {
            Stage::Attempt => Some(Stage::Fallback),
            Stage::Fallback => None,
        }
    }
}

/// The first candidate the endpoint accepted.
#[derive(Debug, Clone)]
pub struct Answer {
    pub path: SynthesisPath,
    pub executed: ExecutedQuery,
}

pub struct AskPipeline {
    synthesizer: QuerySynthesizer,
    executor: QueryExecutor,
}

impl AskPipeline {
    pub fn new(synthesizer: QuerySynthesizer, executor: QueryExecutor) -> Self {
        Self {
            synthesizer,
            executor,
        }
    }

    /// Wires every component over the given transports. Introspects the type catalog once.
    pub fn assemble(
        graph: Arc<dyn GraphEndpoint>,
        completions: Arc<dyn CompletionClient>,
        max_tokens: u32,
    ) -> Result<Self> {
        let introspector = Arc::new(SchemaIntrospector::new(graph.clone()));
        let library = Arc::new(PromptLibrary::from_introspector(&introspector)?);
        info!(
            examples = library.examples_len(),
            "message" = "bibliothèque de prompts construite"
        );
        let synthesizer = QuerySynthesizer::new(completions, introspector, library, max_tokens);
        Ok(Self::new(synthesizer, QueryExecutor::new(graph)))
    }

    pub fn from_config(config: &AskConfig) -> Result<Self> {
        let graph = HttpGraphEndpoint::from_config(config)?;
        let completions = OpenAiCompletionClient::new(config)?;
        info!(
            "endpoint" = %graph.endpoint(),
            "modele" = %completions.model(),
            "message" = "connexion aux services"
        );
        Self::assemble(Arc::new(graph), Arc::new(completions), config.max_tokens)
    }

    /// Synthesizes and executes a query for `question`, falling back once to the
    /// enriched path if the endpoint rejects the first candidate.
    pub fn run(&self, question: &str) -> Result<Answer> {
        let mut stage = Stage::Attempt;
        loop {
            let path = stage.path();
            info!("chemin" = %path, "message" = "synthèse de la requête");
            let candidate = self
                .synthesizer
                .synthesize(path, question)
                .with_context(|| format!("synthèse impossible (chemin {})", path))?;

            match self.executor.execute(&candidate) {
                Ok(executed) => return Ok(Answer { path, executed }),
                Err(rejection) => match stage.fallback() {
                    Some(next) => {
                        warn!(
                            "erreur" = %rejection,
                            "message" = "requête directe rejetée, passage au chemin enrichi"
                        );
                        stage = next;
                    }
                    None => {
                        return Err(anyhow::Error::from(rejection)
                            .context("la requête enrichie a elle aussi été rejetée"));
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FIELD_LOOKUP_FUNCTION;
    use crate::error::{AskError, EndpointError};
    use crate::graph::MockGraphEndpoint;
    use crate::synthesis::MockCompletionClient;

    const CATALOG: &str = r#"{"data":{"__schema":{"types":[{"name":"Drug","description":null}]}}}"#;
    const HITS: &str = r#"{"data":{"search":{"hits":[{"object":{"linkedTargets":{"rows":[{"_extracted":"HDAC1"}]}}}]}}}"#;

    fn pipeline(graph: &MockGraphEndpoint, completions: &MockCompletionClient) -> AskPipeline {
        graph.push_body(CATALOG);
        AskPipeline::assemble(Arc::new(graph.clone()), Arc::new(completions.clone()), 250)
            .unwrap()
    }

    #[test]
    fn stage_bound_is_a_single_fallback() {
        assert_eq!(Stage::Attempt.path(), SynthesisPath::Bare);
        assert_eq!(Stage::Attempt.fallback(), Some(Stage::Fallback));
        assert_eq!(Stage::Fallback.path(), SynthesisPath::Enriched);
        assert_eq!(Stage::Fallback.fallback(), None);
    }

    #[test]
    fn accepted_bare_candidate_skips_enrichment() {
        let graph = MockGraphEndpoint::default();
        let completions = MockCompletionClient::default();
        let pipeline = pipeline(&graph, &completions);
        completions.push_content("query bare { search }");
        graph.push_body(HITS);

        let answer = pipeline.run("What are the targets of vorinostat").unwrap();
        assert_eq!(answer.path, SynthesisPath::Bare);
        assert_eq!(answer.executed.query, "query bare { search }");
        assert_eq!(completions.requests().len(), 1);
        assert_eq!(graph.queries().len(), 2);
    }

    #[test]
    fn rejected_bare_candidate_triggers_exactly_one_enrichment() {
        let graph = MockGraphEndpoint::default();
        let completions = MockCompletionClient::default();
        let pipeline = pipeline(&graph, &completions);

        completions.push_content("query broken {");
        graph.push_failure(EndpointError::status(400, "Syntax Error"));
        completions.push_function_call(FIELD_LOOKUP_FUNCTION, r#"{"typeName":"Drug"}"#);
        graph.push_body(r#"{"data":{"__type":{"fields":[]}}}"#);
        completions.push_content("query enriched { search }");
        graph.push_body(HITS);

        let answer = pipeline.run("What are the targets of vorinostat").unwrap();
        assert_eq!(answer.path, SynthesisPath::Enriched);
        assert_eq!(answer.executed.query, "query enriched { search }");
        assert_eq!(completions.requests().len(), 3);

        let queries = graph.queries();
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[1], "query broken {");
        assert!(queries[2].contains("__type"));
        assert_eq!(queries[3], "query enriched { search }");
    }

    #[test]
    fn rejected_enriched_candidate_propagates() {
        let graph = MockGraphEndpoint::default();
        let completions = MockCompletionClient::default();
        let pipeline = pipeline(&graph, &completions);

        completions.push_content("query broken {");
        graph.push_failure(EndpointError::status(400, "Syntax Error"));
        completions.push_function_call(FIELD_LOOKUP_FUNCTION, r#"{"typeName":"Drug"}"#);
        graph.push_body(r#"{"data":{"__type":null}}"#);
        completions.push_content("still broken {");
        graph.push_failure(EndpointError::status(400, "Syntax Error"));

        let err = pipeline.run("q").unwrap_err();
        let rejection = err.downcast_ref::<AskError>().unwrap();
        assert!(rejection.is_rejection());
        assert_eq!(rejection.rejected_query(), Some("still broken {"));
        assert_eq!(completions.requests().len(), 3);
        assert_eq!(graph.queries().len(), 4);
    }

    #[test]
    fn empty_bare_reply_falls_back_to_enrichment() {
        let graph = MockGraphEndpoint::default();
        let completions = MockCompletionClient::default();
        let pipeline = pipeline(&graph, &completions);

        completions.push_content("");
        graph.push_failure(EndpointError::status(400, "Must provide query string."));
        completions.push_function_call(FIELD_LOOKUP_FUNCTION, r#"{"typeName":"Drug"}"#);
        graph.push_body(r#"{"data":{"__type":{"fields":[]}}}"#);
        completions.push_content("query enriched { search }");
        graph.push_body(HITS);

        let answer = pipeline.run("q").unwrap();
        assert_eq!(answer.path, SynthesisPath::Enriched);
        assert_eq!(completions.requests().len(), 3);

        let queries = graph.queries();
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[1], "");
    }

    #[test]
    fn bare_completion_failure_is_not_a_rejection() {
        let graph = MockGraphEndpoint::default();
        let completions = MockCompletionClient::default();
        let pipeline = pipeline(&graph, &completions);

        assert!(pipeline.run("q").is_err());
        assert_eq!(completions.requests().len(), 1);
        assert_eq!(graph.queries().len(), 1);
    }

    #[test]
    fn assembly_fails_without_catalog() {
        let graph = MockGraphEndpoint::default();
        graph.push_failure(EndpointError::transport("offline"));
        let result = AskPipeline::assemble(
            Arc::new(graph),
            Arc::new(MockCompletionClient::default()),
            250,
        );
        assert!(result.is_err());
    }
}
