use std::path::Path;

use ffmpeg_next::codec::decoder::Audio as AudioDecoder;
use ffmpeg_next::software::resampling::Context as Resampler;
use ffmpeg_next::util::frame::audio::Audio as AudioFrame;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_segment::AudioSegment;
use crate::shared::constants::WHISPER_SAMPLE_RATE;

/// Decodes the best audio stream of any ffmpeg-readable file into whisper input.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(&self, path: &Path) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let Some(stream) = ictx.streams().best(ffmpeg_next::media::Type::Audio) else {
            return Ok(None);
        };
        let stream_index = stream.index();
        let mut decoder =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?
                .decoder()
                .audio()?;

        log::debug!(
            "Decoding audio stream #{stream_index}: {} Hz, {} channel(s)",
            decoder.rate(),
            decoder.channels()
        );

        let mut pipe = MonoPipe::new(&decoder)?;
        for (stream, packet) in ictx.packets() {
            if stream.index() == stream_index {
                decoder.send_packet(&packet)?;
                pipe.drain(&mut decoder)?;
            }
        }
        decoder.send_eof()?;
        pipe.drain(&mut decoder)?;

        Ok(Some(AudioSegment::new(pipe.finish(), WHISPER_SAMPLE_RATE)))
    }
}

/// Downmixes and resamples decoded frames to planar f32 mono at 16 kHz.
struct MonoPipe {
    resampler: Resampler,
    decoded: AudioFrame,
    resampled: AudioFrame,
    samples: Vec<f32>,
}

impl MonoPipe {
    fn new(decoder: &AudioDecoder) -> Result<Self, ffmpeg_next::Error> {
        let resampler = Resampler::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            WHISPER_SAMPLE_RATE,
        )?;
        Ok(Self {
            resampler,
            decoded: AudioFrame::empty(),
            resampled: AudioFrame::empty(),
            samples: Vec::new(),
        })
    }

    fn drain(&mut self, decoder: &mut AudioDecoder) -> Result<(), ffmpeg_next::Error> {
        while decoder.receive_frame(&mut self.decoded).is_ok() {
            self.resampler.run(&self.decoded, &mut self.resampled)?;
            append_plane(&self.resampled, &mut self.samples);
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<f32> {
        // Samples still buffered inside the resampler.
        if let Ok(Some(delay)) = self.resampler.flush(&mut self.resampled) {
            if delay.output > 0 {
                append_plane(&self.resampled, &mut self.samples);
            }
        }
        self.samples
    }
}

fn append_plane(frame: &AudioFrame, out: &mut Vec<f32>) {
    let n = frame.samples();
    if n == 0 {
        return;
    }
    // SAFETY: the resampler outputs planar F32 mono, so plane 0 holds `n` f32 values.
    let floats = unsafe { std::slice::from_raw_parts(frame.data(0).as_ptr() as *const f32, n) };
    out.extend_from_slice(floats);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_audio_nonexistent_file() {
        let path = if cfg!(windows) {
            Path::new("Z:\\nonexistent\\speech.wav")
        } else {
            Path::new("/nonexistent/speech.wav")
        };
        assert!(FfmpegAudioReader.read_audio(path).is_err());
    }

    /// 16-bit PCM WAV with interleaved stereo frames of a 440 Hz tone.
    fn stereo_wav(sample_rate: u32, seconds: f64) -> Vec<u8> {
        let frames = (sample_rate as f64 * seconds) as u32;
        let data_len = frames * 2 * 2;
        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 4).to_le_bytes());
        wav.extend_from_slice(&4u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for i in 0..frames {
            let t = i as f64 / sample_rate as f64;
            let v = ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 8000.0) as i16;
            wav.extend_from_slice(&v.to_le_bytes());
            wav.extend_from_slice(&v.to_le_bytes());
        }
        wav
    }

    #[test]
    fn test_read_audio_resamples_stereo_to_whisper_mono() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tone.wav");
        std::fs::write(&path, stereo_wav(8000, 0.5)).unwrap();

        let audio = FfmpegAudioReader.read_audio(&path).unwrap().unwrap();
        assert_eq!(audio.sample_rate(), WHISPER_SAMPLE_RATE);
        assert!(
            (audio.duration() - 0.5).abs() < 0.05,
            "Expected ~0.5s, got {}s",
            audio.duration()
        );
        assert!(audio.samples().iter().any(|s| s.abs() > 0.05));
        assert!(audio.samples().iter().all(|s| s.abs() <= 1.0));
    }
}
