//! WAV encoding for the audio widget and the JSON API.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use hound::{SampleFormat, WavSpec, WavWriter};
use sfxgen_core::GeneratedAudio;
use std::io::Cursor;

/// Encode mono samples as 16-bit PCM WAV bytes. Samples are clamped to
/// `[-1.0, 1.0]` first.
pub fn write_wav_bytes(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut buffer, spec)?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(buffer.into_inner())
}

/// A rendered clip ready to be embedded in the page.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub duration_secs: f32,
    pub data_uri: String,
}

impl AudioClip {
    pub fn from_audio(audio: &GeneratedAudio) -> Result<Self, hound::Error> {
        let bytes = write_wav_bytes(&audio.samples, audio.sample_rate)?;
        Ok(Self {
            sample_rate: audio.sample_rate,
            duration_secs: audio.duration_secs(),
            data_uri: format!("data:audio/wav;base64,{}", BASE64_STANDARD.encode(&bytes)),
        })
    }
}
