//! Summarization engine and run driver.
//!
//! - [`chunk`] - lossless transcript splitting
//! - [`summarize`] - tiered fallback for one request
//! - [`reduce`] - synthesis of chunk summaries
//! - [`engine`] - chunk → summarize → reduce for one transcript
//! - [`cost`] - weekly cost estimate
//! - [`prompts`] - system instructions
//! - [`run`] - the weekly run

pub mod chunk;
pub mod cost;
pub mod engine;
pub mod prompts;
pub mod reduce;
pub mod run;
pub mod summarize;

pub use chunk::{approx_tokens, split, Chunk, ChunkSize};
pub use cost::{estimate_all, estimate_cost};
pub use engine::SummaryEngine;
pub use prompts::Prompts;
pub use run::{Pipeline, RunSummary, SkippedDecision};
pub use summarize::summarize_with_fallback;
