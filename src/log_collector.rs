//! Session logging for bootstrap runs.
//!
//! ```text
//! log::info!() / log::error!()
//!     |
//! [LogCollector] (log::Log backend)
//!     |                         |
//!     | crossbeam channel       | warn+ and "parsed" milestones
//!     v                         v
//! [DiskPersister thread]     stderr
//! logs/bootstrap_<ts>.log
//! ```
//!
//! Every record reaches the session file. The console only sees warnings,
//! errors, and milestones logged with `target: "parsed"`, so it stays readable
//! next to the banners and the tools' own output.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Target used for high-level milestones that are echoed to the console.
pub const PARSED_TARGET: &str = "parsed";

enum LogMessage {
    Line(LogLine),
    /// Flush marker; the sender is signalled once everything before it is on disk
    Flush(std::sync::mpsc::Sender<()>),
}

/// A log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub level: Level,
    /// True for milestones (`target: "parsed"`)
    pub parsed: bool,
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogLine {
            message: message.into(),
            level,
            parsed: false,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    pub fn parsed(message: impl Into<String>) -> Self {
        LogLine {
            parsed: true,
            ..LogLine::new(Level::Info, message)
        }
    }

    /// `[HH:MM:SS.mmm] [LEVEL] message`
    pub fn format(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }

    fn echoes_to_console(&self) -> bool {
        self.parsed || self.level <= Level::Warn
    }
}

/// Name of the log file for a session started now.
pub fn session_log_name() -> String {
    format!("bootstrap_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Logger that persists every record to a per-run session file.
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    session_path: PathBuf,
    max_level: LevelFilter,
}

impl LogCollector {
    /// Create the log directory and session file and start the disk thread.
    pub fn new(log_dir: &Path, max_level: LevelFilter) -> io::Result<Self> {
        std::fs::create_dir_all(log_dir)?;
        let session_path = log_dir.join(session_log_name());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&session_path)?;

        let (tx, rx) = unbounded::<LogMessage>();

        std::thread::Builder::new()
            .name("log-persister".to_string())
            .spawn(move || persist_loop(file, rx))?;

        Ok(LogCollector {
            tx,
            session_path,
            max_level,
        })
    }

    /// Register a clone of this collector as the global `log` backend.
    pub fn install(&self) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Send a log line (non-blocking).
    pub fn log_line(&self, line: LogLine) {
        if line.echoes_to_console() {
            eprintln!("{}", line.message);
        }
        let _ = self.tx.send(LogMessage::Line(line));
    }

    pub fn log_str(&self, level: Level, message: impl Into<String>) {
        self.log_line(LogLine::new(level, message));
    }

    pub fn log_parsed(&self, message: impl Into<String>) {
        self.log_line(LogLine::parsed(message));
    }

    /// Block until every line sent before this call is written to disk.
    ///
    /// Call before exiting so the final records (the failure reason in
    /// particular) are not lost.
    pub fn flush_and_wait(&self) -> Result<(), String> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        rx.recv()
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        if record.target() == PARSED_TARGET {
            self.log_parsed(message);
        } else {
            self.log_str(record.level(), message);
        }
    }

    fn flush(&self) {
        let _ = self.flush_and_wait();
    }
}

fn persist_loop(mut file: File, rx: crossbeam_channel::Receiver<LogMessage>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            LogMessage::Line(line) => {
                let _ = writeln!(file, "{}", line.format());
            }
            LogMessage::Flush(done) => {
                let _ = file.flush();
                let _ = file.sync_data();
                let _ = done.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_log_collector_creates_session_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let collector = LogCollector::new(&log_dir, LevelFilter::Info).unwrap();

        assert!(log_dir.is_dir());
        assert!(collector.session_path().is_file());
        assert!(collector
            .session_path()
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("bootstrap_") && n.ends_with(".log")));
    }

    #[test]
    fn test_flush_persists_lines_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path(), LevelFilter::Info).unwrap();

        collector.log_str(Level::Info, "[Submodules] git submodule update --init --recursive");
        collector.log_parsed("PHASE: dependency build");
        collector.log_str(Level::Error, "[Bootstrap] dependency build failed");
        collector.flush_and_wait().unwrap();

        let content = fs::read_to_string(collector.session_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("[INFO] [Submodules] git submodule update --init --recursive"));
        assert!(lines[1].ends_with("[INFO] PHASE: dependency build"));
        assert!(lines[2].ends_with("[ERROR] [Bootstrap] dependency build failed"));
    }

    #[test]
    fn test_enabled_respects_max_level() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path(), LevelFilter::Info).unwrap();

        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!collector.enabled(&debug));
        assert!(collector.enabled(&warn));
    }

    #[test]
    fn test_console_echo_selection() {
        assert!(LogLine::parsed("PHASE: smoke build").echoes_to_console());
        assert!(LogLine::new(Level::Error, "boom").echoes_to_console());
        assert!(!LogLine::new(Level::Info, "detail").echoes_to_console());
    }
}
