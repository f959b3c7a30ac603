//! WAV output

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use hound::{SampleFormat, WavSpec, WavWriter};
use crate::error::CodecError;

pub const DEFAULT_BITS_PER_SAMPLE: u16 = 16;
pub const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// Shape of a finished WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub frames: u64,
}

impl WavInfo {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CodecError> {
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        Ok(Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            frames: reader.duration() as u64,
        })
    }
}

pub fn pcm16_spec(channels: u16, sample_rate: u32) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// 16-bit PCM sink that only creates the file once the first samples arrive,
/// since the channel layout is not always known before decoding starts.
pub struct WavOutput {
    path: PathBuf,
    writer: Option<WavWriter<BufWriter<File>>>,
    spec: Option<WavSpec>,
    samples: u64,
}

impl WavOutput {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            writer: None,
            spec: None,
            samples: 0,
        }
    }

    pub fn write_interleaved(&mut self, channels: u16, sample_rate: u32, samples: &[i16]) -> Result<(), CodecError> {
        if channels == 0 {
            return Err(CodecError::Corrupt("stream reports zero channels".to_string()));
        }

        let spec = pcm16_spec(channels, sample_rate);
        match self.spec {
            Some(current) if current != spec => {
                return Err(CodecError::Unsupported(format!(
                    "stream layout changed mid-file ({}ch@{}Hz -> {}ch@{}Hz)",
                    current.channels, current.sample_rate, channels, sample_rate
                )));
            }
            Some(_) => {}
            None => {
                self.writer = Some(WavWriter::create(&self.path, spec)?);
                self.spec = Some(spec);
            }
        }

        if let Some(writer) = self.writer.as_mut() {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
            self.samples += samples.len() as u64;
        }
        Ok(())
    }

    pub fn finalize(mut self) -> Result<WavInfo, CodecError> {
        let (writer, spec) = match (self.writer.take(), self.spec) {
            (Some(writer), Some(spec)) => (writer, spec),
            _ => return Err(CodecError::Empty),
        };

        if let Err(e) = writer.finalize() {
            self.remove_partial();
            return Err(e.into());
        }

        Ok(WavInfo {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            frames: self.samples / spec.channels as u64,
        })
    }

    /// Drop whatever has been written so far
    pub fn discard(mut self) {
        self.writer = None;
        self.remove_partial();
    }

    fn remove_partial(&self) {
        if self.spec.is_some() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("Could not remove partial output {}: {}", self.path.display(), e);
            }
        }
    }
}
