//! Plain-text request/response log.
//!
//! Records go to one append-only file per calendar day,
//! `api_requests_YYYY-MM-DD.log`. When the file cannot be opened or written
//! the record is emitted through `tracing` instead; logging never fails the
//! caller.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};

const FILE_PREFIX: &str = "api_requests_";
const LOG_DIR_NAME: &str = "logs";

pub struct RequestLog {
    dir: Option<PathBuf>,
    /// The open file and the day it belongs to. Locked for one record at a time.
    file: Mutex<Option<(NaiveDate, File)>>,
}

impl RequestLog {
    /// Daily files under `dir`, created on first write.
    pub fn daily(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            file: Mutex::new(None),
        }
    }

    /// Daily files under `logs/` next to the running executable.
    pub fn beside_executable() -> Self {
        match std::env::current_exe() {
            Ok(exe) => {
                let base = exe.parent().map(Path::to_path_buf).unwrap_or_default();
                Self::daily(base.join(LOG_DIR_NAME))
            }
            Err(e) => {
                tracing::warn!("cannot locate executable ({e}); request log goes to tracing");
                Self::tracing_only()
            }
        }
    }

    pub fn tracing_only() -> Self {
        Self {
            dir: None,
            file: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Path of the file records for `date` are written to.
    pub fn path_for(&self, date: NaiveDate) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(file_name(date)))
    }

    /// Append one `<timestamp> <LABEL>:\n<text>\n` record.
    pub fn record(&self, label: &str, text: &str) {
        let now = Local::now();
        let entry = format!("{} {label}:\n{text}\n", now.format("%Y/%m/%d %H:%M:%S"));

        let Some(dir) = self.dir.as_deref() else {
            tracing::info!(target: "axon::request_log", "{entry}");
            return;
        };

        let mut slot = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let today = now.date_naive();

        if slot.as_ref().map(|(day, _)| *day) != Some(today) {
            match open_daily(dir, today) {
                Ok(file) => *slot = Some((today, file)),
                Err(e) => {
                    *slot = None;
                    tracing::warn!("request log unavailable in {}: {e}", dir.display());
                    tracing::info!(target: "axon::request_log", "{entry}");
                    return;
                }
            }
        }

        if let Some((_, file)) = slot.as_mut() {
            if let Err(e) = file.write_all(entry.as_bytes()).and_then(|_| file.flush()) {
                *slot = None;
                tracing::warn!("request log write failed: {e}");
                tracing::info!(target: "axon::request_log", "{entry}");
            }
        }
    }
}

impl std::fmt::Debug for RequestLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLog").field("dir", &self.dir).finish()
    }
}

fn file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}.log", date.format("%Y-%m-%d"))
}

fn open_daily(dir: &Path, date: NaiveDate) -> std::io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(file_name(date)))
}
