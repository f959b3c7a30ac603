//! Configuration management for a conversion run

use crate::error::{WavSweepError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound on an explicitly requested worker count
pub const MAX_WORKERS: usize = 1024;

/// Extensions the classic converter looked for; handy as an allowlist in config files
pub const ORIGINAL_EXTENSIONS: &[&str] = &["aif", "aiff", "mp3", "flac", "ogg", "aac", "m4a", "wma"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Plain values must precede the tables when serialized to TOML
    pub verbose: bool,
    pub scan: ScanConfig,
    pub pool: PoolSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub folder: PathBuf,
    /// Empty means every non-WAV file is a candidate
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// 0 means "use the logical CPU count"
    pub num_threads: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub delete_originals: bool,
    pub overwrite: bool,
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            scan: ScanConfig::default(),
            pool: PoolSettings::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("."),
            extensions: Vec::new(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            num_threads: 0,
            queue_capacity: 64,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delete_originals: false,
            overwrite: false,
            strict: false,
        }
    }
}

/// Resolved, immutable settings handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub root_folder: PathBuf,
    pub max_workers: usize,
    pub delete_originals: bool,
    pub overwrite: bool,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "wavsweep", about = "Recursively convert audio files to WAV", version)]
pub struct Args {
    #[arg(short = 'f', long = "folder", help = "Root directory to scan recursively [default: .]")]
    pub folder: Option<PathBuf>,

    #[arg(short = 'n', long = "num-threads", help = "Max concurrent conversions, 0 = logical CPU count; larger values are used as given, not clamped to the CPU count [default: 0]")]
    pub num_threads: Option<usize>,

    #[arg(short = 'd', long = "delete", help = "Delete original files after successful conversion")]
    pub delete: bool,

    #[arg(short = 'e', long = "ext", value_delimiter = ',', help = "Only convert files with these extensions (comma separated), e.g. aif,aiff,mp3,flac,ogg,aac,m4a,wma; without it every non-WAV file is converted")]
    pub extensions: Vec<String>,

    #[arg(long = "overwrite", help = "Replace target WAV files that already exist")]
    pub overwrite: bool,

    #[arg(long = "strict", help = "Exit with status 2 if any file failed to convert")]
    pub strict: bool,

    #[arg(long = "queue-capacity", help = "Number of discovered files buffered ahead of the workers [default: 64]")]
    pub queue_capacity: Option<usize>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "save-config", help = "Write the effective config to this path and exit")]
    pub save_config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(folder) = args.folder {
            config.scan.folder = folder;
        }
        if !args.extensions.is_empty() {
            config.scan.extensions = args.extensions;
        }
        if let Some(num_threads) = args.num_threads {
            config.pool.num_threads = num_threads;
        }
        if let Some(capacity) = args.queue_capacity {
            config.pool.queue_capacity = capacity;
        }
        config.output.delete_originals |= args.delete;
        config.output.overwrite |= args.overwrite;
        config.output.strict |= args.strict;
        config.verbose |= args.verbose;

        config.scan.extensions = normalize_extensions(&config.scan.extensions);
        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WavSweepError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| WavSweepError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| WavSweepError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| WavSweepError::config(format!("Failed to write config file: {}", e)))
    }

    /// Validate the settings that do not touch the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.pool.num_threads > MAX_WORKERS {
            return Err(WavSweepError::config(format!(
                "Thread count cannot exceed {}", MAX_WORKERS
            )));
        }

        if self.pool.queue_capacity == 0 {
            return Err(WavSweepError::config("Queue capacity must be greater than 0"));
        }

        for ext in &self.scan.extensions {
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                return Err(WavSweepError::config("Extension list contains an empty entry"));
            }
            if ext.eq_ignore_ascii_case("wav") {
                return Err(WavSweepError::config("WAV files are never converted; remove 'wav' from the extension list"));
            }
        }

        Ok(())
    }

    /// Check the root folder and pin the worker count, once, for the whole run
    pub fn resolve(&self) -> Result<PoolConfig> {
        self.validate()?;

        let root = &self.scan.folder;
        let metadata = std::fs::metadata(root).map_err(|e| {
            WavSweepError::config(format!("Folder {} is not accessible: {}", root.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(WavSweepError::config(format!(
                "{} is not a directory", root.display()
            )));
        }

        Ok(PoolConfig {
            root_folder: root.clone(),
            max_workers: utils::resolve_worker_count(self.pool.num_threads, utils::cpu_count()),
            delete_originals: self.output.delete_originals,
            overwrite: self.output.overwrite,
            queue_capacity: self.pool.queue_capacity,
        })
    }

    /// Deleting originals with no extension allowlist also removes any non-audio
    /// container symphonia happens to decode, such as videos.
    pub fn deletes_without_allowlist(&self) -> bool {
        self.output.delete_originals && self.scan.extensions.is_empty()
    }

    pub fn original_extensions() -> Vec<String> {
        ORIGINAL_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }
}

/// Lowercase, strip leading dots and drop duplicates
fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        if !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }
    normalized
}

pub mod utils {
    pub fn cpu_count() -> usize {
        num_cpus::get()
    }

    pub fn resolve_worker_count(requested: usize, cpus: usize) -> usize {
        if requested == 0 {
            cpus.max(1)
        } else {
            requested
        }
    }
}
