use std::process;

use opsdesk::config::Config;
use opsdesk::storage::Storage;
use opsdesk::{cli, logging};

fn main() {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    logging::init(&config);

    let opened = match &config.database {
        Some(path) => Storage::open(path),
        None => {
            let root = Storage::default_root().unwrap_or_else(|| {
                eprintln!("Could not determine home directory.");
                process::exit(1);
            });
            Storage::new(root)
        }
    };
    let storage = match opened {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };
    tracing::debug!(path = %storage.path().display(), "storage opened");

    if let Err(e) = cli::run(&config, &storage) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
