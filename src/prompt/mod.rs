mod examples;
mod library;

pub use examples::Example;
pub use library::PromptLibrary;
