/// Whisper model tier loaded by the CLI. Other published tiers are
/// `tiny`, `small` and `medium`.
pub const WHISPER_MODEL_TIER: &str = "base";

pub const WHISPER_MODEL_NAME: &str = "ggml-base.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin";

/// Whisper models only accept 16 kHz mono input.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Upper bound on inference threads handed to whisper.cpp.
pub const WHISPER_MAX_THREADS: usize = 4;

/// Application directory name under the platform cache directory.
pub const APP_DIR_NAME: &str = "Transcribe";
