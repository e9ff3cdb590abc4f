use crate::audio::domain::audio_segment::AudioSegment;
use std::path::Path;

/// Domain interface for decoding speech audio from a media file.
pub trait AudioReader: Send {
    /// Decode the best audio track to 16 kHz mono PCM, the only input whisper accepts.
    /// Returns None if the file has no audio track.
    fn read_audio(&self, path: &Path) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>>;
}
