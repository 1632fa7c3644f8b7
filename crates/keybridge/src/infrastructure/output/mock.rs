//! Recording mock output sink for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use keybridge_core::OutputKey;

use crate::application::remap_engine::{OutputSink, SinkError};

/// One recorded sink call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Press(OutputKey),
    Release(OutputKey),
    ReleaseAll,
}

/// An [`OutputSink`] that records every call instead of emitting events.
///
/// With `should_fail` set, every call returns [`SinkError::Device`] without
/// recording, which is how tests exercise the engine's commit-on-success
/// behaviour.
#[derive(Default)]
pub struct MockOutputSink {
    events: Mutex<Vec<SinkEvent>>,
    should_fail: AtomicBool,
}

impl MockOutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Discards all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    fn record(&self, event: SinkEvent) -> Result<(), SinkError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SinkError::Device("scripted failure (mock)".to_string()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl OutputSink for MockOutputSink {
    fn press(&self, key: OutputKey) -> Result<(), SinkError> {
        self.record(SinkEvent::Press(key))
    }

    fn release(&self, key: OutputKey) -> Result<(), SinkError> {
        self.record(SinkEvent::Release(key))
    }

    fn release_all(&self) -> Result<(), SinkError> {
        self.record(SinkEvent::ReleaseAll)
    }
}
