//! Fixed-size worker pool fed from a bounded queue

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::audio::Transcoder;
use crate::config::PoolConfig;
use crate::error::{WavSweepError, Result};
use super::discovery::Discovered;
use super::summary::{FileProblem, RunSummary, SkipReason};
use super::task::ConversionTask;
use super::worker::{convert_task, TaskReport};

struct Worker {
    id: usize,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(
        id: usize,
        tasks: Receiver<ConversionTask>,
        reports: Sender<TaskReport>,
        transcoder: Arc<dyn Transcoder>,
        delete_originals: bool,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name(format!("wavsweep-worker-{}", id))
            .spawn(move || {
                // Ends once the producer hangs up and the queue is drained
                for task in tasks.iter() {
                    let report = convert_task(task, transcoder.as_ref(), delete_originals);
                    if reports.send(report).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| WavSweepError::processing(format!("Failed to spawn worker {}: {}", id, e)))?;

        Ok(Self { id, handle })
    }
}

pub struct Dispatcher {
    config: PoolConfig,
    transcoder: Arc<dyn Transcoder>,
}

impl Dispatcher {
    pub fn new(config: PoolConfig, transcoder: Arc<dyn Transcoder>) -> Self {
        Self { config, transcoder }
    }

    pub fn workers(&self) -> usize {
        self.config.max_workers.max(1)
    }

    /// Converts every candidate in `discovered`, blocking until all workers are idle.
    ///
    /// Per-file failures end up in the returned summary; only a broken pool is an `Err`.
    pub fn run<I>(&self, discovered: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Discovered>,
    {
        let start = Instant::now();
        let num_workers = self.workers();

        let (task_tx, task_rx) = bounded::<ConversionTask>(self.config.queue_capacity.max(1));
        let (report_tx, report_rx) = unbounded::<TaskReport>();

        let workers = (0..num_workers)
            .map(|id| Worker::spawn(
                id,
                task_rx.clone(),
                report_tx.clone(),
                Arc::clone(&self.transcoder),
                self.config.delete_originals,
            ))
            .collect::<Result<Vec<_>>>()?;
        drop(task_rx);
        drop(report_tx);

        log::debug!("Started {} workers", workers.len());

        let mut summary = RunSummary::new(num_workers);
        let mut claimed: HashMap<(PathBuf, String), PathBuf> = HashMap::new();

        for item in discovered {
            match item {
                Discovered::Candidate(task) => {
                    if let Some(reason) = self.check_target(&task, &mut claimed) {
                        log::debug!("Skipping {}: {}", task.source.display(), reason);
                        summary.skip(task, reason);
                        continue;
                    }
                    task_tx.send(task)
                        .map_err(|_| WavSweepError::processing("All workers exited before the queue was drained"))?;
                    summary.queued += 1;
                }
                Discovered::AlreadyWav(path) => {
                    log::debug!("Already WAV: {}", path.display());
                    summary.already_wav += 1;
                }
                Discovered::Ignored(path) => {
                    log::debug!("Ignoring {}", path.display());
                    summary.ignored += 1;
                }
                Discovered::Unreadable { path, reason } => {
                    log::warn!("Cannot read {}: {}", path.display(), reason);
                    summary.unreadable.push(FileProblem { path, reason });
                }
            }

            while let Ok(report) = report_rx.try_recv() {
                summary.record(report);
            }
        }
        drop(task_tx);

        for report in report_rx.iter() {
            summary.record(report);
        }

        for worker in workers {
            if worker.handle.join().is_err() {
                log::error!("Worker {} panicked", worker.id);
                summary.failures.push(FileProblem {
                    path: self.config.root_folder.clone(),
                    reason: format!("worker {} panicked; its current task was lost", worker.id),
                });
            }
        }

        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    fn check_target(&self, task: &ConversionTask, claimed: &mut HashMap<(PathBuf, String), PathBuf>) -> Option<SkipReason> {
        match claimed.entry(task.target_key()) {
            Entry::Occupied(entry) => {
                return Some(SkipReason::DuplicateTarget { claimed_by: entry.get().clone() });
            }
            Entry::Vacant(entry) => {
                entry.insert(task.source.clone());
            }
        }

        if !self.config.overwrite && task.target.exists() {
            return Some(SkipReason::TargetExists);
        }
        None
    }
}
