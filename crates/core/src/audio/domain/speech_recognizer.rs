use super::audio_segment::AudioSegment;
use super::language::Language;
use super::transcript::TranscriptionResult;

/// Domain interface for speech-to-text transcription.
///
/// Implementations hold an already loaded model and run inference on
/// 16 kHz mono audio.
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        audio: &AudioSegment,
        language: &Language,
    ) -> Result<TranscriptionResult, Box<dyn std::error::Error>>;
}
