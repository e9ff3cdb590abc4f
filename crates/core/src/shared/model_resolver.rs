use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{APP_DIR_NAME, WHISPER_MODEL_NAME, WHISPER_MODEL_URL};

/// Bytes between two progress callbacks.
const PROGRESS_STEP: u64 = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to store model at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Path of the Whisper model inside `cache_dir`, downloading it on first use.
pub fn resolve_whisper_model(
    cache_dir: &Path,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    fetch_into(cache_dir, WHISPER_MODEL_NAME, WHISPER_MODEL_URL, progress)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Transcribe/models/`
/// - Linux: `$XDG_CACHE_HOME/Transcribe/models/` or `~/.cache/Transcribe/models/`
/// - Windows: `%LOCALAPPDATA%/Transcribe/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_DIR_NAME).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn fetch_into(
    cache_dir: &Path,
    name: &str,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let model_path = cache_dir.join(name);
    if model_path.is_file() {
        log::debug!("Using cached model {}", model_path.display());
        return Ok(model_path);
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {name} from {url}");

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelResolveError::Download {
            url: url.to_string(),
            source,
        })?;
    let total = response.content_length().unwrap_or(0);

    let (part, file) = PartFile::create(&model_path)?;
    let mut sink = ProgressWriter::new(BufWriter::new(file), total, progress);
    io::copy(&mut response, &mut sink).map_err(|e| part.io_error(e))?;
    sink.finish().map_err(|e| part.io_error(e))?;

    part.commit()?;
    Ok(model_path)
}

/// A `<model>.part` download target that is removed unless committed.
struct PartFile {
    temp_path: PathBuf,
    dest: PathBuf,
    committed: bool,
}

impl PartFile {
    fn create(dest: &Path) -> Result<(Self, fs::File), ModelResolveError> {
        let part = Self {
            temp_path: dest.with_extension("part"),
            dest: dest.to_path_buf(),
            committed: false,
        };
        let file = fs::File::create(&part.temp_path).map_err(|e| part.io_error(e))?;
        Ok((part, file))
    }

    fn io_error(&self, source: io::Error) -> ModelResolveError {
        ModelResolveError::Io {
            path: self.temp_path.clone(),
            source,
        }
    }

    fn commit(mut self) -> Result<(), ModelResolveError> {
        fs::rename(&self.temp_path, &self.dest).map_err(|source| ModelResolveError::Io {
            path: self.dest.clone(),
            source,
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Counts written bytes and reports them at most once per [`PROGRESS_STEP`].
struct ProgressWriter<W: Write> {
    inner: W,
    written: u64,
    reported: u64,
    total: u64,
    progress: Option<ProgressFn>,
}

impl<W: Write> ProgressWriter<W> {
    fn new(inner: W, total: u64, progress: Option<ProgressFn>) -> Self {
        Self {
            inner,
            written: 0,
            reported: 0,
            total,
            progress,
        }
    }

    fn report(&mut self) {
        if let Some(ref cb) = self.progress {
            cb(self.written, self.total);
        }
        self.reported = self.written;
    }

    /// Flush and emit the final count.
    fn finish(mut self) -> io::Result<()> {
        self.inner.flush()?;
        if self.written != self.reported {
            self.report();
        }
        Ok(())
    }
}

impl<W: Write> Write for ProgressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        if self.written - self.reported >= PROGRESS_STEP {
            self.report();
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
