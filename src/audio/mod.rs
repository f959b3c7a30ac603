//! Audio Conversion Module
//!
//! Wraps the external codec stack: symphonia decodes the source,
//! hound writes the 16-bit PCM WAV result.

pub mod wav;
pub mod transcoder;

pub use wav::{WavInfo, WavOutput};
pub use transcoder::{SymphoniaTranscoder, Transcoder};
