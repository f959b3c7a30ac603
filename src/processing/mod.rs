//! Conversion Pipeline
//!
//! Discovery feeds a bounded queue; a fixed pool of workers drains it.

pub mod task;
pub mod discovery;
pub mod worker;
pub mod summary;
pub mod dispatcher;

pub use task::{is_wav, ConversionTask};
pub use discovery::{Discovered, Discoverer};
pub use worker::{convert_task, Outcome, TaskReport};
pub use summary::{FileProblem, RunSummary, SkipReason, SkippedTask};
pub use dispatcher::Dispatcher;
