//! File-based logging for the sidecar. Stdout carries the IPC channel, so
//! diagnostics go to rolling files under the session workspace.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "labstationd";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<(PathBuf, LoggerHandle)> = OnceCell::new();

/// Initialize file logging under `<workspace>/logs`. Idempotent per
/// process; once initialized, later calls (for any workspace) are no-ops.
/// Never panics; the sidecar must stay usable without logs.
pub fn init(workspace: &Path) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log_dir = workspace.join("logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| format!("failed to create log directory {}: {e}", log_dir.display()))?;

    LOGGER
        .get_or_try_init(|| -> Result<(PathBuf, LoggerHandle), String> {
            let handle = Logger::try_with_env_or_str("info")
                .map_err(|e| format!("logger setup failed: {e}"))?
                .log_to_file(
                    FileSpec::default()
                        .directory(&log_dir)
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .start()
                .map_err(|e| format!("failed to start logger: {e}"))?;
            Ok((log_dir, handle))
        })
        .map(|_| ())
}
