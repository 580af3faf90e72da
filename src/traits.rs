use std::fmt;

/// Incremental result of parsing streamed text for reasoning content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserResult {
    /// Normal (final-answer) text attributable so far.
    pub normal_text: String,

    /// Reasoning (analysis) text attributable so far.
    pub reasoning_text: String,
}

impl ParserResult {
    /// Create a new ParserResult with the given normal and reasoning text.
    pub fn new(normal_text: String, reasoning_text: String) -> Self {
        Self {
            normal_text,
            reasoning_text,
        }
    }

    /// Create a result with only normal text.
    pub fn normal(text: String) -> Self {
        Self {
            normal_text: text,
            reasoning_text: String::new(),
        }
    }

    /// Create a result with only reasoning text.
    pub fn reasoning(text: String) -> Self {
        Self {
            normal_text: String::new(),
            reasoning_text: text,
        }
    }

    /// Check if this result contains any text.
    pub fn is_empty(&self) -> bool {
        self.normal_text.is_empty() && self.reasoning_text.is_empty()
    }
}

impl fmt::Display for ParserResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParserResult {{ normal: {} chars, reasoning: {} chars }}",
            self.normal_text.len(),
            self.reasoning_text.len()
        )
    }
}

/// Result of one-shot extraction over a complete string.
///
/// Unlike [`ParserResult`], each side is optional: `None` means the channel
/// never appeared in the input, which downstream response shaping treats
/// differently from an empty segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    /// Final-answer text, if a final segment (or untagged fallback text) was found.
    pub normal_text: Option<String>,

    /// Reasoning text, if an analysis segment was found.
    pub reasoning_text: Option<String>,
}

/// Trait for parsing reasoning content out of model output.
pub trait ReasoningParser: Send + Sync {
    /// Extract reasoning and normal text from a complete output string.
    ///
    /// Used for non-streaming responses. Deterministic on identical input and
    /// does not consult or disturb streaming state.
    fn detect_and_parse_reasoning(&mut self, text: &str) -> Result<ExtractionResult, ParseError>;

    /// Consume one streaming delta and return whatever can now be safely
    /// attributed to a channel.
    ///
    /// Maintains internal state across calls so that control tags split
    /// across chunk boundaries are never leaked into the output.
    fn parse_reasoning_streaming_incremental(
        &mut self,
        text: &str,
    ) -> Result<ParserResult, ParseError>;

    /// Flush at end of stream.
    ///
    /// Emits any text still held back (an in-flight segment whose close tag
    /// never arrived) on its channel and returns the parser to the
    /// channel-undecided state.
    fn flush(&mut self) -> ParserResult;

    /// Reset the parser state for reuse.
    ///
    /// Must be called between independent conversation turns sharing one
    /// parser instance; skipping it leaks buffered state across turns.
    fn reset(&mut self);

    /// Get the model type this parser is designed for.
    fn model_type(&self) -> &str;

    /// Check if the parser is currently inside an analysis segment.
    fn is_in_reasoning(&self) -> bool;
}

/// Error types for reasoning parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Buffer overflow: {0} bytes exceeds maximum")]
    BufferOverflow(usize),

    #[error("Unknown model type: {0}")]
    UnknownModel(String),
}
