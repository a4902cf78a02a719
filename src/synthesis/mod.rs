mod completion;
mod pipeline;
mod synthesizer;

pub use completion::{
    CompletionClient, CompletionRequest, DecodingParams, FunctionChoice, MockCompletionClient,
    OpenAiCompletionClient, STOP_SEQUENCE,
};
pub use pipeline::{Answer, AskPipeline, Stage};
pub use synthesizer::{QuerySynthesizer, SynthesisPath, ENRICHED_PRESENCE_PENALTY};
