pub mod ollama;
pub mod prompt;

pub use ollama::{enhance_prompt, EnhanceRequest, EnrichError};
pub use prompt::{compose_keyword_prompt, Descriptor, PromptStyle};
