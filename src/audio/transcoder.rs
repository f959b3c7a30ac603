//! Decode anything symphonia understands and re-encode it as PCM WAV

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use crate::audio::wav::{WavInfo, WavOutput, FALLBACK_SAMPLE_RATE};
use crate::error::CodecError;

/// The external decode/encode capability the worker pool delegates to.
///
/// Implementations must be callable from several worker threads at once;
/// each call owns a disjoint source/target pair.
pub trait Transcoder: Send + Sync {
    fn transcode(&self, source: &Path, target: &Path) -> Result<WavInfo, CodecError>;
}

#[derive(Debug, Clone)]
pub struct SymphoniaTranscoder {
    fallback_sample_rate: u32,
}

impl Default for SymphoniaTranscoder {
    fn default() -> Self {
        Self { fallback_sample_rate: FALLBACK_SAMPLE_RATE }
    }
}

impl SymphoniaTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode_into(&self, source: &Path, output: &mut WavOutput) -> Result<(), CodecError> {
        let file = File::open(source)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = source.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())?;
        let mut format = probed.format;

        let track = format.tracks().iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(CodecError::NoTrack)?;
        let track_id = track.id;
        let declared_rate = track.codec_params.sample_rate;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        let mut sample_buf: Option<SampleBuffer<i16>> = None;
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    skipped_packets += 1;
                    log::debug!("{}: skipping undecodable packet: {}", source.display(), msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let buf = sample_buf.get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
            buf.copy_interleaved_ref(decoded);

            let rate = match spec.rate {
                0 => declared_rate.unwrap_or(self.fallback_sample_rate),
                rate => rate,
            };
            let channels = u16::try_from(spec.channels.count())
                .map_err(|_| CodecError::Unsupported("too many channels".to_string()))?;

            output.write_interleaved(channels, rate, buf.samples())?;
        }

        if skipped_packets > 0 {
            log::warn!("{}: {} packet(s) could not be decoded and were skipped", source.display(), skipped_packets);
        }

        Ok(())
    }
}

impl Transcoder for SymphoniaTranscoder {
    fn transcode(&self, source: &Path, target: &Path) -> Result<WavInfo, CodecError> {
        let mut output = WavOutput::new(target);

        match self.decode_into(source, &mut output) {
            Ok(()) => output.finalize(),
            Err(e) => {
                output.discard();
                Err(e)
            }
        }
    }
}
