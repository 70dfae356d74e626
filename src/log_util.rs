use crate::config;
use chrono::Utc;
use std::{
    env,
    fs::OpenOptions,
    io::{self, Write},
    path::PathBuf,
};

const LOG_DIRECTORY: &str = "output";
const LOG_FILENAME: &str = "prepdeck-debug.log";

/// Append a timestamped line to the shared debug log when the config enables
/// it. Errors are reported to stderr only.
pub fn log_debug(message: &str) {
    if !config::write_debug_log() {
        return;
    }
    if let Err(err) = append_line(message) {
        eprintln!("[prepdeck::log_util] failed to write debug log: {}", err);
    }
}

fn append_line(message: &str) -> io::Result<()> {
    let path = resolve_log_path()?;
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "[{}] {}", Utc::now().to_rfc3339(), message)?;
    Ok(())
}

fn resolve_log_path() -> io::Result<PathBuf> {
    let mut dir = env::current_dir()?;
    dir.push(LOG_DIRECTORY);
    std::fs::create_dir_all(&dir)?;
    dir.push(LOG_FILENAME);
    Ok(dir)
}
