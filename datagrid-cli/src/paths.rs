//! Where `datagrid` keeps its preference database and logs.
//!
//! Resolved through `directories`, so XDG locations on Linux and the usual
//! per-user folders on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const LOG_NAME: &str = "latest.log";

/// Archived logs kept by [`rotate_logs`].
const KEEP_LOGS: usize = 10;

fn dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "datagrid", "datagrid")
}

/// Persistent data, e.g. `~/.local/share/datagrid` on Linux.
pub fn data_dir() -> Option<PathBuf> {
    dirs().map(|d| d.data_dir().to_path_buf())
}

/// Disposable data, e.g. `~/.cache/datagrid` on Linux.
pub fn cache_dir() -> Option<PathBuf> {
    dirs().map(|d| d.cache_dir().to_path_buf())
}

/// SQLite file holding remembered column visibility.
pub fn preferences_db() -> Option<PathBuf> {
    Some(data_dir()?.join("preferences.db"))
}

/// Log file of the current run.
pub fn log_file() -> Option<PathBuf> {
    Some(cache_dir()?.join(LOG_NAME))
}

/// Archives the previous run's log under a timestamp and prunes old archives.
///
/// Must run before the logger opens [`log_file`].
pub fn rotate_logs() {
    let Some(dir) = cache_dir() else { return };

    let previous = dir.join(LOG_NAME);
    if previous.is_file() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&previous, dir.join(format!("{stamp}.log")));
    }

    prune_archived_logs(&dir, KEEP_LOGS);
}

/// Deletes all but the `keep` most recently modified archived logs in `dir`.
pub(crate) fn prune_archived_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archived: Vec<(Option<std::time::SystemTime>, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "log")
                && path.file_name().is_some_and(|name| name != LOG_NAME)
        })
        .map(|path| (fs::metadata(&path).and_then(|m| m.modified()).ok(), path))
        .collect();

    // newest first
    archived.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in archived.into_iter().skip(keep) {
        let _ = fs::remove_file(path);
    }
}
