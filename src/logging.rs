use std::path::PathBuf;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TRACKMENU_LOG";

/// Log to `trackmenu.log` in the data dir; a hotkey-launched process has no terminal.
/// Falls back to stderr when the file cannot be opened.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    match open_log_file() {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn log_file_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "trackmenu", "trackmenu")
        .map(|dirs| dirs.data_local_dir().join("trackmenu.log"))
}

fn open_log_file() -> Option<std::fs::File> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()
}
