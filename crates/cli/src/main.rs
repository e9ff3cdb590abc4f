use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use transcribe_core::audio::domain::language::Language;
use transcribe_core::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use transcribe_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use transcribe_core::pipeline::transcribe_file_use_case::TranscribeFileUseCase;
use transcribe_core::pipeline::transcript_output::render_json_line;
use transcribe_core::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_TIER};
use transcribe_core::shared::model_resolver::{self, ProgressFn};

/// Transcribe an audio file and print `{"text": ...}` as one JSON line.
#[derive(Parser)]
#[command(name = "transcribe")]
struct Cli {
    /// Audio (or video) file to transcribe.
    audio: PathBuf,

    /// Language code passed to the model, e.g. en, de. Use "auto" to detect.
    language: Language,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let recognizer = load_recognizer()?;
    let use_case = TranscribeFileUseCase::new(Box::new(FfmpegAudioReader), Box::new(recognizer));
    let result = use_case.execute(&cli.audio, &cli.language)?;

    let line = render_json_line(&result)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(line.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn load_recognizer() -> Result<WhisperRecognizer, Box<dyn std::error::Error>> {
    log::info!("Resolving Whisper {WHISPER_MODEL_TIER} model: {WHISPER_MODEL_NAME}");
    let (progress, progress_shown) = download_progress();
    let resolved = model_resolver::model_cache_dir()
        .and_then(|dir| model_resolver::resolve_whisper_model(&dir, Some(progress)));
    if progress_shown.load(Ordering::Relaxed) {
        eprintln!();
    }
    WhisperRecognizer::load(&resolved?)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    check_input(&cli.audio)
}

fn check_input(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("Input is not a file: {}", path.display()).into());
    }
    Ok(())
}

/// Progress callback that rewrites one stderr line, plus a flag telling the
/// caller whether that line needs terminating.
fn download_progress() -> (ProgressFn, Arc<AtomicBool>) {
    let shown = Arc::new(AtomicBool::new(false));
    let flag = shown.clone();
    let cb: ProgressFn = Box::new(move |downloaded, total| {
        flag.store(true, Ordering::Relaxed);
        eprint!("\r{}", progress_line(downloaded, total));
    });
    (cb, shown)
}

fn progress_line(downloaded: u64, total: u64) -> String {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        format!("Downloading Whisper {WHISPER_MODEL_TIER} model... {pct}%")
    } else {
        format!("Downloading Whisper {WHISPER_MODEL_TIER} model... {downloaded} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_arguments() {
        let cli = Cli::try_parse_from(["transcribe", "speech.wav", "de"]).unwrap();
        assert_eq!(cli.audio, PathBuf::from("speech.wav"));
        assert_eq!(cli.language.code(), "de");
    }

    #[test]
    fn test_parse_requires_language() {
        assert!(Cli::try_parse_from(["transcribe", "speech.wav"]).is_err());
    }

    #[test]
    fn test_parse_requires_audio() {
        assert!(Cli::try_parse_from(["transcribe"]).is_err());
    }

    #[test]
    fn test_parse_rejects_blank_language() {
        assert!(Cli::try_parse_from(["transcribe", "speech.wav", " "]).is_err());
    }

    #[test]
    fn test_download_progress_flags_open_line() {
        let (cb, shown) = download_progress();
        assert!(!shown.load(Ordering::Relaxed));
        cb(512, 0);
        assert!(shown.load(Ordering::Relaxed));
    }

    #[test]
    fn test_progress_line_with_and_without_length() {
        assert!(progress_line(50, 200).ends_with("25%"));
        assert!(progress_line(4096, 0).ends_with("4096 bytes"));
    }

    #[test]
    fn test_check_input_missing_file() {
        let err = check_input(Path::new("/nonexistent/speech.wav")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_check_input_rejects_directory() {
        let err = check_input(&std::env::temp_dir()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }
}
