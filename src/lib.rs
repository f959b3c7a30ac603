//! wavsweep - Recursive audio-to-WAV conversion
//!
//! Walks a directory tree and converts every non-WAV file it finds into a
//! sibling `.wav`, spreading the work over a fixed pool of threads.

pub mod audio;
pub mod config;
pub mod error;
pub mod processing;

use std::sync::Arc;

pub use audio::{SymphoniaTranscoder, Transcoder};
pub use config::{Config, Args, PoolConfig};
pub use error::{WavSweepError, CodecError, Result};
pub use processing::{Discoverer, Dispatcher, RunSummary};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

pub fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Convert every candidate below `pool.root_folder`, returning once all workers finished.
pub fn convert_tree(pool: PoolConfig, extensions: &[String], transcoder: Arc<dyn Transcoder>) -> Result<RunSummary> {
    let discoverer = Discoverer::new(&pool.root_folder, extensions);
    let dispatcher = Dispatcher::new(pool, transcoder);
    dispatcher.run(discoverer.walk())
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
