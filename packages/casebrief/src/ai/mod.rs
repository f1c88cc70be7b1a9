//! Reference backend implementations.

pub mod openai;

pub use openai::OpenAIBackend;
