//! Per-run state threaded through the pipeline: cancellation, piece ids and
//! the progress/diagnostics sink.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use image::DynamicImage;

use crate::error::SolveError;

/// Cooperative cancellation flag. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once `cancel` has been called.
    pub fn check(&self) -> Result<(), SolveError> {
        if self.is_cancelled() {
            Err(SolveError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Pipeline stage, used to scope percent-complete reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Match,
    Assemble,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "Extract",
            Stage::Match => "Match",
            Stage::Assemble => "Assemble",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Receiver for progress, log messages and diagnostic images.
///
/// Every method has a no-op default so sinks only implement what they show.
pub trait ProgressSink: Send + Sync {
    fn message(&self, _level: Level, _text: &str) {}
    fn progress(&self, _stage: Stage, _percent: f32) {}
    fn image(&self, _name: &str, _image: &DynamicImage) {}
}

/// Forwards messages to the `log` facade; drops images and progress.
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn message(&self, level: Level, text: &str) {
        match level {
            Level::Info => log::info!("{text}"),
            Level::Warning => log::warn!("{text}"),
            Level::Error => log::error!("{text}"),
        }
    }

    fn progress(&self, stage: Stage, percent: f32) {
        log::debug!("{} {:.0}%", stage.label(), percent);
    }
}

/// Monotonic piece-id allocator, safe to share between threads.
#[derive(Debug, Default)]
pub struct IdAllocator(AtomicUsize);

impl IdAllocator {
    pub fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Everything a run needs besides its configuration.
pub struct RunContext {
    pub cancel: CancelToken,
    pub ids: IdAllocator,
    sink: Box<dyn ProgressSink>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl RunContext {
    pub fn new(sink: Box<dyn ProgressSink>) -> Self {
        Self {
            cancel: CancelToken::new(),
            ids: IdAllocator::default(),
            sink,
        }
    }

    /// Use an existing token so another thread can cancel this run.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn info(&self, text: &str) {
        self.sink.message(Level::Info, text);
    }

    pub fn warn(&self, text: &str) {
        self.sink.message(Level::Warning, text);
    }

    pub fn error(&self, text: &str) {
        self.sink.message(Level::Error, text);
    }

    pub fn progress(&self, stage: Stage, done: usize, total: usize) {
        let percent = if total == 0 {
            100.0
        } else {
            done as f32 * 100.0 / total as f32
        };
        self.sink.progress(stage, percent);
    }

    pub fn image(&self, name: &str, image: &DynamicImage) {
        self.sink.image(name, image);
    }
}
