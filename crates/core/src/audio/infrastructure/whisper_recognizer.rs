use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::language::{Language, AUTO_DETECT};
use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::audio::domain::transcript::{TranscriptSegment, TranscriptionResult};
use crate::shared::constants::WHISPER_MAX_THREADS;

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// The model is loaded once in [`WhisperRecognizer::load`]; each call to
/// `transcribe` runs on a fresh decoding state.
pub struct WhisperRecognizer {
    model_name: String,
    ctx: WhisperContext,
}

impl WhisperRecognizer {
    pub fn load(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }

        log::info!("Loading Whisper model from {}", model_path.display());
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        Ok(Self {
            model_name: model_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ctx,
        })
    }
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("model", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio: &AudioSegment,
        language: &Language,
    ) -> Result<TranscriptionResult, Box<dyn std::error::Error>> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;
        log::debug!("Running {} on {:.1}s of audio", self.model_name, audio.duration());

        let lang = if language.is_auto() {
            AUTO_DETECT
        } else {
            language.code()
        };

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(lang));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(WHISPER_MAX_THREADS) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            // Lossy so a token boundary inside a multi-byte character
            // cannot drop the whole segment.
            let text = segment
                .to_str_lossy()
                .map_err(|e| format!("Failed to read segment {seg_idx}: {e}"))?
                .to_string();

            // Timestamps are in centiseconds (10ms units)
            segments.push(TranscriptSegment {
                text,
                start_time: segment.start_timestamp() as f64 / 100.0,
                end_time: segment.end_timestamp() as f64 / 100.0,
            });
        }

        let detected = detected_language(state.full_lang_id_from_state());

        Ok(TranscriptionResult::from_segments(segments, detected))
    }
}

/// Map whisper's language id to its code. Negative ids mean no language was set.
fn detected_language(lang_id: std::os::raw::c_int) -> Option<String> {
    whisper_rs::get_lang_str(lang_id).map(str::to_string)
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
