//! Harmony control-tag vocabulary.
//!
//! Tags are compared by exact substring match. The two open tags share the
//! prefix `<|start|>assistant<|channel|>` and then diverge on the channel
//! name; no tag appears inside another tag's interior. That property is what
//! lets the streaming parser hold back only a bounded suffix of its buffer.

/// Opens an analysis (reasoning) segment.
pub const ANALYSIS_OPEN: &str = "<|start|>assistant<|channel|>analysis<|message|>";

/// Opens a final-answer segment.
pub const FINAL_OPEN: &str = "<|start|>assistant<|channel|>final<|message|>";

/// Closes either segment kind.
pub const SEGMENT_CLOSE: &str = "<|end|>";

/// Both open tags, used while no channel has been resolved yet.
pub const OPEN_TAGS: [&str; 2] = [ANALYSIS_OPEN, FINAL_OPEN];

/// Length of the longest suffix of `tail` that is a strict prefix of one of
/// `tags`.
///
/// The returned span is the part of a buffer that might still grow into a
/// complete tag as more text arrives; everything before it is guaranteed not
/// to begin one of `tags`. Returns 0 when the tail cannot extend into any tag.
///
/// Comparison is byte-wise. The tags are ASCII, so a nonzero return value
/// always lands on a `char` boundary of `tail`.
pub fn longest_matching_prefix(tail: &str, tags: &[&str]) -> usize {
    let tail = tail.as_bytes();
    let max_len = tags.iter().map(|t| t.len() - 1).max().unwrap_or(0);

    for len in (1..=max_len.min(tail.len())).rev() {
        let suffix = &tail[tail.len() - len..];
        if tags.iter().any(|tag| tag.as_bytes().starts_with(suffix)) {
            return len;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tag_is_interior_substring_of_another() {
        // Shared prefixes are fine; interior occurrences would break the
        // hold-back bound.
        assert!(!ANALYSIS_OPEN[1..].contains(SEGMENT_CLOSE));
        assert!(!FINAL_OPEN[1..].contains(SEGMENT_CLOSE));
        assert!(!SEGMENT_CLOSE[1..].contains("<|"));
    }

    #[test]
    fn test_longest_matching_prefix_partial_tag() {
        assert_eq!(longest_matching_prefix("<|sta", &OPEN_TAGS), 5);
        assert_eq!(longest_matching_prefix("abc<|start|>assist", &OPEN_TAGS), 15);
        assert_eq!(longest_matching_prefix("<|en", &[SEGMENT_CLOSE]), 4);
    }

    #[test]
    fn test_longest_matching_prefix_none() {
        assert_eq!(longest_matching_prefix("hello world", &OPEN_TAGS), 0);
        assert_eq!(longest_matching_prefix("", &OPEN_TAGS), 0);
        assert_eq!(longest_matching_prefix("<|start|>x", &OPEN_TAGS), 0);
    }

    #[test]
    fn test_longest_matching_prefix_is_strict() {
        // A complete tag is not a *strict* prefix; the caller handles full
        // matches via substring search before asking about the tail.
        assert_eq!(
            longest_matching_prefix(SEGMENT_CLOSE, &[SEGMENT_CLOSE]),
            0
        );
    }

    #[test]
    fn test_longest_matching_prefix_inner_restart() {
        // "<|start|><|sta" could resume at the inner "<|sta", not the full
        // earlier run.
        assert_eq!(longest_matching_prefix("<|start|><|sta", &OPEN_TAGS), 5);
    }

    #[test]
    fn test_longest_matching_prefix_multibyte_tail() {
        // Non-ASCII text before a partial tag must not confuse byte-wise
        // matching.
        assert_eq!(longest_matching_prefix("héllo<|end", &[SEGMENT_CLOSE]), 5);
        assert_eq!(longest_matching_prefix("héllo", &[SEGMENT_CLOSE]), 0);
    }

    #[test]
    fn test_common_open_prefix_matches_both() {
        // Up to the channel name the two open tags are identical, so an
        // ambiguous tail still counts.
        let common = "<|start|>assistant<|channel|>";
        assert_eq!(longest_matching_prefix(common, &OPEN_TAGS), common.len());
        assert_eq!(
            longest_matching_prefix("<|start|>assistant<|channel|>fin", &OPEN_TAGS),
            32
        );
    }
}
