use crate::application::Config;
use env_logger::{Builder, Target};
use std::fs::OpenOptions;

/// Sends log records to the log file so the terminal UI stays clean.
/// Falls back to stderr when the file cannot be opened.
pub fn init_logging(config: &Config) {
    let mut builder = Builder::new();
    builder.parse_filters(&config.log_filter);

    let file = std::fs::create_dir_all(&config.data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
    });

    match file {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!(
                "Warning: cannot open log file {}: {}",
                config.log_file.display(),
                e
            );
            builder.target(Target::Stderr);
        }
    }

    // A logger may already be installed (tests, embedding); keep it.
    let _ = builder.try_init();
}
