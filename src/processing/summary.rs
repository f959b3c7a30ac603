//! End-of-run accounting

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use super::task::ConversionTask;
use super::worker::{Outcome, TaskReport};

/// Exit status used by `--strict` when at least one file failed
pub const STRICT_FAILURE_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProblem {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TargetExists,
    DuplicateTarget { claimed_by: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetExists => write!(f, "target already exists"),
            Self::DuplicateTarget { claimed_by } => {
                write!(f, "same target as {}", claimed_by.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub task: ConversionTask,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub workers: usize,
    pub queued: usize,
    pub converted: usize,
    pub sources_removed: usize,
    pub already_wav: usize,
    pub ignored: usize,
    pub skipped: Vec<SkippedTask>,
    pub failures: Vec<FileProblem>,
    pub warnings: Vec<FileProblem>,
    pub unreadable: Vec<FileProblem>,
    /// Sum of per-task wall time across all workers
    pub busy_time: Duration,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(workers: usize) -> Self {
        Self { workers, ..Default::default() }
    }

    pub fn record(&mut self, report: TaskReport) {
        self.busy_time += report.elapsed;

        match report.outcome {
            Outcome::Converted { source_removed, .. } => {
                self.converted += 1;
                if source_removed {
                    self.sources_removed += 1;
                }
            }
            Outcome::Failed(error) => self.failures.push(FileProblem {
                path: report.task.source.clone(),
                reason: error.to_string(),
            }),
        }

        if let Some(warning) = report.warning {
            self.warnings.push(FileProblem {
                path: report.task.source,
                reason: warning.to_string(),
            });
        }
    }

    pub fn skip(&mut self, task: ConversionTask, reason: SkipReason) {
        self.skipped.push(SkippedTask { task, reason });
    }

    pub fn attempted(&self) -> usize {
        self.converted + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.has_failures() {
            STRICT_FAILURE_EXIT_CODE
        } else {
            0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Conversion Summary ===")?;
        writeln!(f, "Workers: {}", self.workers)?;
        writeln!(f, "Converted: {}/{}", self.converted, self.attempted())?;
        if self.sources_removed > 0 {
            writeln!(f, "Originals deleted: {}", self.sources_removed)?;
        }
        writeln!(f, "Already WAV: {}", self.already_wav)?;
        if self.ignored > 0 {
            writeln!(f, "Ignored by extension: {}", self.ignored)?;
        }

        if !self.skipped.is_empty() {
            writeln!(f, "Skipped: {}", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "  {}: {}", skipped.task.source.display(), skipped.reason)?;
            }
        }

        for (label, problems) in [
            ("Failed", &self.failures),
            ("Warnings", &self.warnings),
            ("Unreadable", &self.unreadable),
        ] {
            if problems.is_empty() {
                continue;
            }
            writeln!(f, "{}: {}", label, problems.len())?;
            for problem in problems {
                writeln!(f, "  {}: {}", problem.path.display(), problem.reason)?;
            }
        }

        write!(f, "Time: {:.2}s", self.elapsed.as_secs_f64())
    }
}
