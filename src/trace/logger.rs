use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::extract::extractor::ScreenExtraction;
use crate::trace::trace::TraceEvent;

/// JSONL sink for per-screen extraction events.
///
/// A trace never fails an extraction: open and write errors are logged and
/// the sink goes quiet.
pub struct TraceLogger {
    sink: Option<Mutex<TraceSink>>,
}

struct TraceSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl TraceSink {
    fn append(&mut self, event: &TraceEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        // each line is visible as soon as its screen is done
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

impl TraceLogger {
    /// Append to `path`, creating the file if needed.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                debug!(path = %path.display(), "writing extraction trace");
                Self {
                    sink: Some(Mutex::new(TraceSink {
                        path: path.to_path_buf(),
                        writer: BufWriter::new(file),
                        written: 0,
                    })),
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open trace file, tracing off");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Number of events written since the trace was opened.
    pub fn events_written(&self) -> u64 {
        self.sink
            .as_ref()
            .and_then(|s| s.lock().ok().map(|s| s.written))
            .unwrap_or(0)
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else { return };
        let Ok(mut sink) = sink.lock() else {
            warn!("trace sink lock poisoned, dropping event");
            return;
        };

        if let Err(e) = sink.append(event) {
            warn!(path = %sink.path.display(), error = %e, "failed to write trace event");
        }
    }

    /// One event per extracted screen, numbered in emission order.
    ///
    /// `threshold` is recorded only when filtering ran.
    pub fn log_extractions(&self, extractions: &[ScreenExtraction], threshold: Option<f64>) {
        if !self.is_enabled() {
            return;
        }

        for (step, extraction) in extractions.iter().enumerate() {
            let event = TraceEvent::now(step as u64).with_screen(extraction);
            let event = match threshold {
                Some(t) => event.with_threshold(t),
                None => event,
            };
            self.log(&event);
        }
    }
}
