//! wavsweep command line entry point

use clap::Parser;
use std::process;
use std::sync::Arc;
use wavsweep::{init_logging, Args, Config, Result, SymphoniaTranscoder};

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<i32> {
    let save_config = args.save_config.clone();
    let config = Config::from_args_and_config(args)?;
    init_logging(config.verbose);

    if let Some(path) = save_config {
        config.save_to_file(&path)?;
        println!("Config written to {}", path.display());
        return Ok(0);
    }

    if config.verbose {
        println!("{}", wavsweep::get_library_info());
        println!();
    }

    let pool = config.resolve()?;

    println!("Scanning {} with {} worker(s)", pool.root_folder.display(), pool.max_workers);
    if pool.delete_originals {
        println!("Originals will be deleted after successful conversion");
    }
    if config.deletes_without_allowlist() {
        log::warn!("--delete without --ext removes every non-WAV file that decodes, including video containers");
    }

    let summary = wavsweep::convert_tree(pool, &config.scan.extensions, Arc::new(SymphoniaTranscoder::new()))?;

    println!();
    println!("{}", summary);

    Ok(summary.exit_code(config.output.strict))
}
