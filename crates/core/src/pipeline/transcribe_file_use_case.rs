use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::language::Language;
use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::audio::domain::transcript::TranscriptionResult;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("no audio track found in {0}")]
    NoAudioTrack(PathBuf),
    #[error("audio track in {0} decoded to zero samples")]
    EmptyAudio(PathBuf),
}

/// Decodes one media file and runs it through the recognizer.
pub struct TranscribeFileUseCase {
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl TranscribeFileUseCase {
    pub fn new(reader: Box<dyn AudioReader>, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self { reader, recognizer }
    }

    pub fn execute(
        &self,
        path: &Path,
        language: &Language,
    ) -> Result<TranscriptionResult, Box<dyn std::error::Error>> {
        let started = Instant::now();
        let audio = self
            .reader
            .read_audio(path)?
            .ok_or_else(|| TranscribeError::NoAudioTrack(path.to_path_buf()))?;
        if audio.is_empty() {
            return Err(TranscribeError::EmptyAudio(path.to_path_buf()).into());
        }
        log::info!(
            "Decoded {:.1}s of audio from {} in {:.0}ms",
            audio.duration(),
            path.display(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        let started = Instant::now();
        let result = self.recognizer.transcribe(&audio, language)?;
        log::info!(
            "Transcribed {} segment(s) in {:.0}ms (language: {})",
            result.segments.len(),
            started.elapsed().as_secs_f64() * 1000.0,
            result.language.as_deref().unwrap_or(language.code())
        );
        for segment in &result.segments {
            log::debug!(
                "[{:>7.2}s -> {:>7.2}s]{}",
                segment.start_time,
                segment.end_time,
                segment.text
            );
        }

        Ok(result)
    }
}
