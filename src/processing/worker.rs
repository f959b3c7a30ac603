//! A single conversion: transcode, then optionally remove the source

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use crate::audio::{Transcoder, WavInfo};
use crate::error::{CodecError, WavSweepError};
use super::task::ConversionTask;

#[derive(Debug)]
pub enum Outcome {
    Converted { info: WavInfo, source_removed: bool },
    Failed(WavSweepError),
}

#[derive(Debug)]
pub struct TaskReport {
    pub task: ConversionTask,
    pub outcome: Outcome,
    /// Deletion failure after a successful conversion
    pub warning: Option<WavSweepError>,
    pub elapsed: Duration,
}

impl TaskReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Converted { .. })
    }
}

pub fn convert_task(task: ConversionTask, transcoder: &dyn Transcoder, delete_originals: bool) -> TaskReport {
    let start = Instant::now();
    log::info!("Converting {}", task.source.display());

    let result = match panic::catch_unwind(AssertUnwindSafe(|| transcoder.transcode(&task.source, &task.target))) {
        Ok(result) => result,
        Err(payload) => {
            // A panicking codec may leave a half-written target behind
            let _ = std::fs::remove_file(&task.target);
            Err(CodecError::Corrupt(format!("decoder panicked: {}", panic_message(&*payload))))
        }
    };

    let info = match result {
        Ok(info) => info,
        Err(e) => {
            let error = WavSweepError::conversion(&task.source, e);
            log::error!("{}", error);
            return TaskReport {
                task,
                outcome: Outcome::Failed(error),
                warning: None,
                elapsed: start.elapsed(),
            };
        }
    };

    log::debug!(
        "Wrote {} ({}ch, {} Hz, {:.2}s)",
        task.target.display(), info.channels, info.sample_rate, info.duration_secs()
    );

    let mut warning = None;
    let mut source_removed = false;
    if delete_originals {
        match std::fs::remove_file(&task.source) {
            Ok(()) => source_removed = true,
            Err(e) => {
                let error = WavSweepError::deletion(&task.source, e);
                log::warn!("{}", error);
                warning = Some(error);
            }
        }
    }

    TaskReport {
        task,
        outcome: Outcome::Converted { info, source_removed },
        warning,
        elapsed: start.elapsed(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes a marker file instead of real audio; fails for sources named `bad*`.
    pub(crate) struct FakeTranscoder;

    impl Transcoder for FakeTranscoder {
        fn transcode(&self, source: &Path, target: &Path) -> Result<WavInfo, CodecError> {
            let name = source.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name.starts_with("bad") {
                return Err(CodecError::Unsupported("fake codec refuses this file".to_string()));
            }
            fs::write(target, b"RIFF")?;
            Ok(WavInfo { channels: 1, sample_rate: 8000, frames: 8 })
        }
    }

    struct PanickingTranscoder;

    impl Transcoder for PanickingTranscoder {
        fn transcode(&self, _source: &Path, target: &Path) -> Result<WavInfo, CodecError> {
            fs::write(target, b"partial").unwrap();
            panic!("malformed header");
        }
    }

    #[test]
    fn test_converts_and_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.mp3");
        fs::write(&source, b"x").unwrap();

        let report = convert_task(ConversionTask::for_source(&source), &FakeTranscoder, false);
        assert!(report.succeeded());
        assert!(report.warning.is_none());
        assert!(source.exists());
        assert!(temp_dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_converts_and_deletes_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.mp3");
        fs::write(&source, b"x").unwrap();

        let report = convert_task(ConversionTask::for_source(&source), &FakeTranscoder, true);
        assert!(matches!(report.outcome, Outcome::Converted { source_removed: true, .. }));
        assert!(!source.exists());
        assert!(temp_dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_failure_never_deletes_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("bad.ogg");
        fs::write(&source, b"x").unwrap();

        let report = convert_task(ConversionTask::for_source(&source), &FakeTranscoder, true);
        match &report.outcome {
            Outcome::Failed(WavSweepError::Conversion { path, .. }) => assert_eq!(path, &source),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(source.exists());
        assert!(!temp_dir.path().join("bad.wav").exists());
    }

    #[test]
    fn test_deletion_failure_is_a_warning() {
        let temp_dir = TempDir::new().unwrap();
        // Converter succeeds but the source was never on disk, so removal fails
        let source = temp_dir.path().join("ghost.mp3");

        let report = convert_task(ConversionTask::for_source(&source), &FakeTranscoder, true);
        assert!(report.succeeded());
        assert!(matches!(report.outcome, Outcome::Converted { source_removed: false, .. }));
        assert!(matches!(report.warning, Some(WavSweepError::Deletion { .. })));
        assert!(temp_dir.path().join("ghost.wav").exists());
    }

    #[test]
    fn test_panic_becomes_conversion_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("a.mp3");
        fs::write(&source, b"x").unwrap();

        let report = convert_task(ConversionTask::for_source(&source), &PanickingTranscoder, true);
        assert!(!report.succeeded());
        assert!(report.outcome_message().contains("malformed header"));
        assert!(source.exists());
        assert!(!temp_dir.path().join("a.wav").exists());
    }

    impl TaskReport {
        fn outcome_message(&self) -> String {
            match &self.outcome {
                Outcome::Failed(e) => e.to_string(),
                Outcome::Converted { .. } => String::new(),
            }
        }
    }
}
