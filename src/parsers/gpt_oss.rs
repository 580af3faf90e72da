// GPT-OSS reasoning parser operating on decoded text.
//
// Harmony-format models interleave an analysis (reasoning) segment and a
// final-answer segment in one output stream:
//
//   <|start|>assistant<|channel|>analysis<|message|>...<|end|>
//   <|start|>assistant<|channel|>final<|message|>...<|end|>
//
// The streaming path is a segmentation state machine: each chunk is appended
// to a pending buffer and the parser decides how much of that buffer can be
// attributed now versus how much must be held back because it could still be
// the prefix of a control tag arriving across a chunk boundary.

use crate::tags::{longest_matching_prefix, ANALYSIS_OPEN, FINAL_OPEN, OPEN_TAGS, SEGMENT_CLOSE};
use crate::traits::{ExtractionResult, ParseError, ParserResult, ReasoningParser};

const DEFAULT_MAX_BUFFER_SIZE: usize = 65536;

/// Which channel the parser is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    /// No open tag has been fully observed yet.
    None,
    Analysis,
    Final,
}

/// Text-based reasoning parser for GPT-OSS models.
#[derive(Debug, Clone)]
pub struct GptOssParser {
    /// Bytes received but not yet attributed to a channel.
    buffer: String,
    channel: Channel,
    max_buffer_size: usize,
    model_type: String,
}

impl GptOssParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            channel: Channel::None,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            model_type: "gpt_oss".to_string(),
        }
    }

    /// Override the streaming buffer limit.
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    fn emit(out: &mut ParserResult, channel: Channel, text: &str) {
        match channel {
            Channel::Analysis => out.reasoning_text.push_str(text),
            // Out-of-protocol text (no channel resolved) is surfaced as
            // normal text rather than dropped.
            Channel::Final | Channel::None => out.normal_text.push_str(text),
        }
    }

    /// Body of the first `open ... <|end|>` segment, shortest match. An open
    /// tag with no close yields the rest of the string: an unterminated
    /// in-flight segment is kept, not discarded.
    fn extract_segment(text: &str, open: &str) -> Option<String> {
        let body_start = text.find(open)? + open.len();
        let body = &text[body_start..];
        let body = match body.find(SEGMENT_CLOSE) {
            Some(end) => &body[..end],
            None => body,
        };
        Some(body.to_string())
    }
}

impl Default for GptOssParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReasoningParser for GptOssParser {
    fn detect_and_parse_reasoning(&mut self, text: &str) -> Result<ExtractionResult, ParseError> {
        if text.len() > self.max_buffer_size {
            return Err(ParseError::BufferOverflow(text.len()));
        }

        let reasoning_text = Self::extract_segment(text, ANALYSIS_OPEN);
        let normal_text = Self::extract_segment(text, FINAL_OPEN);

        if reasoning_text.is_none() && normal_text.is_none() {
            // Untagged output. Same fallback as the streaming path: surface
            // it as normal text.
            if text.is_empty() {
                return Ok(ExtractionResult::default());
            }
            return Ok(ExtractionResult {
                normal_text: Some(text.to_string()),
                reasoning_text: None,
            });
        }

        Ok(ExtractionResult {
            normal_text,
            reasoning_text,
        })
    }

    fn parse_reasoning_streaming_incremental(
        &mut self,
        text: &str,
    ) -> Result<ParserResult, ParseError> {
        if self.buffer.len() + text.len() > self.max_buffer_size {
            return Err(ParseError::BufferOverflow(self.buffer.len() + text.len()));
        }
        self.buffer.push_str(text);

        let mut out = ParserResult::default();
        loop {
            match self.channel {
                Channel::None => {
                    // Channel resolution: earliest fully present open tag wins.
                    let open = OPEN_TAGS
                        .iter()
                        .filter_map(|tag| self.buffer.find(tag).map(|idx| (idx, *tag)))
                        .min_by_key(|&(idx, _)| idx);

                    match open {
                        Some((idx, tag)) => {
                            if idx > 0 {
                                tracing::warn!(
                                    bytes = idx,
                                    "text precedes a channel open tag; attributing to normal text"
                                );
                                out.normal_text.push_str(&self.buffer[..idx]);
                            }
                            self.channel = if tag == ANALYSIS_OPEN {
                                Channel::Analysis
                            } else {
                                Channel::Final
                            };
                            // The tag is control metadata, never surfaced.
                            self.buffer.drain(..idx + tag.len());
                        }
                        None => {
                            // Hold back only the suffix that could still grow
                            // into an open tag; the rest cannot be control
                            // metadata and is surfaced as normal text.
                            let held = longest_matching_prefix(&self.buffer, &OPEN_TAGS);
                            let safe = self.buffer.len() - held;
                            if safe > 0 {
                                out.normal_text.push_str(&self.buffer[..safe]);
                                self.buffer.drain(..safe);
                            }
                            break;
                        }
                    }
                }
                current => {
                    // Close detection runs before the next open tag is
                    // considered, so a close and a following open inside one
                    // chunk are processed in stream order.
                    match self.buffer.find(SEGMENT_CLOSE) {
                        Some(idx) => {
                            Self::emit(&mut out, current, &self.buffer[..idx]);
                            self.buffer.drain(..idx + SEGMENT_CLOSE.len());
                            self.channel = Channel::None;
                        }
                        None => {
                            // Safe partial emission: everything before the
                            // longest possible close-tag prefix is final.
                            let held = longest_matching_prefix(&self.buffer, &[SEGMENT_CLOSE]);
                            let safe = self.buffer.len() - held;
                            if safe > 0 {
                                Self::emit(&mut out, current, &self.buffer[..safe]);
                                self.buffer.drain(..safe);
                            }
                            break;
                        }
                    }
                }
            }
        }

        Ok(out)
    }

    fn flush(&mut self) -> ParserResult {
        let text = std::mem::take(&mut self.buffer);
        let channel = std::mem::replace(&mut self.channel, Channel::None);

        let mut out = ParserResult::default();
        if !text.is_empty() {
            // Segment never closed by end of stream: emit the in-flight body
            // as-is.
            Self::emit(&mut out, channel, &text);
        }
        out
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.channel = Channel::None;
    }

    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn is_in_reasoning(&self) -> bool {
        self.channel == Channel::Analysis
    }
}
