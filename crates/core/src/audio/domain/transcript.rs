/// A timed piece of recognized text, as emitted by the model.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Everything one transcription call produced.
///
/// Only `text` is part of the program output; segments and the reported
/// language are kept for logging.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranscriptionResult {
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: Option<String>,
}

impl TranscriptionResult {
    /// Build a result whose text is the concatenation of the segment texts.
    pub fn from_segments(segments: Vec<TranscriptSegment>, language: Option<String>) -> Self {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        Self {
            text: text.trim().to_string(),
            segments,
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, start_time: f64, end_time: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start_time,
            end_time,
        }
    }

    #[test]
    fn test_from_segments_joins_and_trims() {
        let result = TranscriptionResult::from_segments(
            vec![segment(" Hello there.", 0.0, 1.2), segment(" General Kenobi.", 1.2, 2.5)],
            Some("en".to_string()),
        );
        assert_eq!(result.text, "Hello there. General Kenobi.");
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_from_segments_empty() {
        let result = TranscriptionResult::from_segments(Vec::new(), None);
        assert!(result.text.is_empty());
        assert!(result.segments.is_empty());
    }

    #[test]
    fn test_from_segments_keeps_unicode() {
        let result = TranscriptionResult::from_segments(
            vec![segment(" Grüß Gott, 世界", 0.0, 1.0)],
            Some("de".to_string()),
        );
        assert_eq!(result.text, "Grüß Gott, 世界");
    }
}
