pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod graph;
pub mod prompt;
pub mod synthesis;
pub mod utils;

pub use config::AskConfig;
pub use domain::{Capability, FunctionCall, FunctionCallSpec, Message, Role};
pub use error::{AskError, EndpointError, FailureCause};
pub use extract::{extract, ExtractedValue, ExtractionScope, ResultExtractor, EXTRACTION_MARKER};
pub use graph::{GraphEndpoint, QueryExecutor, SchemaIntrospector};
pub use prompt::PromptLibrary;
pub use synthesis::{AskPipeline, CompletionClient, QuerySynthesizer, SynthesisPath};
