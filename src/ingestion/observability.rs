use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{DatasetError, LineError};

use super::reader::ReadStatus;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadSeverity {
    /// Informational event.
    Info,
    /// A rejected line (non-fatal).
    Warning,
    /// The read failed.
    Error,
    /// I/O or other infrastructure failure.
    Critical,
}

/// Context about a reader.
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// Label of the input (usually its path).
    pub source: String,
    /// Lines read so far by this reader, blank lines included.
    pub line: usize,
}

/// Stats reported at the end of each [`super::Reader::read`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// Rows pushed into the dataset by this call.
    pub rows: usize,
    /// Lines routed to the reject sink by this call.
    pub rejected: usize,
    pub status: ReadStatus,
}

/// Diagnostics hook passed into the reader.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReadObserver: Send + Sync {
    /// Called for every rejected line.
    fn on_reject(&self, _ctx: &ReadContext, _error: &LineError) {}

    /// Called when a read call completes.
    fn on_batch(&self, _ctx: &ReadContext, _stats: BatchStats) {}

    /// Called when a read call fails with a fatal error.
    fn on_failure(&self, _ctx: &ReadContext, _severity: ReadSeverity, _error: &DatasetError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Severity of a fatal error: I/O is critical, everything else is an error.
pub fn severity_for_error(e: &DatasetError) -> ReadSeverity {
    match e {
        DatasetError::Io(_) => ReadSeverity::Critical,
        _ => ReadSeverity::Error,
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ReadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReadObserver for CompositeObserver {
    fn on_reject(&self, ctx: &ReadContext, error: &LineError) {
        for o in &self.observers {
            o.on_reject(ctx, error);
        }
    }

    fn on_batch(&self, ctx: &ReadContext, stats: BatchStats) {
        for o in &self.observers {
            o.on_batch(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs reader events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReadObserver for StdErrObserver {
    fn on_reject(&self, ctx: &ReadContext, error: &LineError) {
        eprintln!("[read][reject] source={} line={} err={}", ctx.source, ctx.line, error);
    }

    fn on_batch(&self, ctx: &ReadContext, stats: BatchStats) {
        eprintln!(
            "[read][ok] source={} rows={} rejected={} status={:?}",
            ctx.source, stats.rows, stats.rejected, stats.status
        );
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        eprintln!("[read][{:?}] source={} line={} err={}", severity, ctx.source, ctx.line, error);
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        eprintln!(
            "[ALERT][read][{:?}] source={} line={} err={}",
            severity, ctx.source, ctx.line, error
        );
    }
}

/// Forwards reader events to the [`log`] facade under the `delimited_dataset::read` target.
#[derive(Debug, Default)]
pub struct LogObserver;

const LOG_TARGET: &str = "delimited_dataset::read";

impl ReadObserver for LogObserver {
    fn on_reject(&self, ctx: &ReadContext, error: &LineError) {
        log::debug!(target: LOG_TARGET, "rejected line {} of {}: {}", ctx.line, ctx.source, error);
    }

    fn on_batch(&self, ctx: &ReadContext, stats: BatchStats) {
        log::info!(
            target: LOG_TARGET,
            "read {} rows from {} ({} rejected, {:?})",
            stats.rows,
            ctx.source,
            stats.rejected,
            stats.status
        );
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        match severity {
            ReadSeverity::Info => log::info!(target: LOG_TARGET, "{}: {}", ctx.source, error),
            ReadSeverity::Warning => log::warn!(target: LOG_TARGET, "{}: {}", ctx.source, error),
            ReadSeverity::Error | ReadSeverity::Critical => {
                log::error!(target: LOG_TARGET, "{} ({:?}): {}", ctx.source, severity, error)
            }
        }
    }
}

/// Appends reader events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ReadObserver for FileObserver {
    fn on_reject(&self, ctx: &ReadContext, error: &LineError) {
        self.append_line(&format!(
            "{} reject source={} line={} field={} kind={}",
            unix_ts(),
            ctx.source,
            ctx.line,
            error.field,
            error.kind
        ));
    }

    fn on_batch(&self, ctx: &ReadContext, stats: BatchStats) {
        self.append_line(&format!(
            "{} ok source={} rows={} rejected={} status={:?}",
            unix_ts(),
            ctx.source,
            stats.rows,
            stats.rejected,
            stats.status
        ));
    }

    fn on_failure(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        self.append_line(&format!(
            "{} fail severity={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.source,
            error
        ));
    }

    fn on_alert(&self, ctx: &ReadContext, severity: ReadSeverity, error: &DatasetError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.source,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
