//! Reasoning extraction for GPT-OSS Harmony model output.
//!
//! Harmony models multiplex reasoning and the final answer over one text
//! stream using channel tags:
//!
//! ```text
//! <|start|>assistant<|channel|>analysis<|message|>...<|end|>
//! <|start|>assistant<|channel|>final<|message|>...<|end|>
//! ```
//!
//! This crate separates the two channels either from a complete string or
//! incrementally from streaming deltas, where chunk boundaries may fall
//! anywhere, including inside a tag.

pub mod factory;
pub mod parsers;
pub mod tags;
pub mod traits;

pub use factory::{ParserFactory, ParserRegistry, PooledParser};
pub use parsers::GptOssParser;
pub use traits::{ExtractionResult, ParseError, ParserResult, ReasoningParser};
