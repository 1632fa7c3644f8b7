//! Recording mock indicator for tests.

use std::sync::Mutex;

use keybridge_core::Rgb;

use crate::application::layout_manager::Indicator;

/// One recorded indicator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorCall {
    SetBrightness(f32),
    Fill(Rgb),
}

/// An [`Indicator`] that records every call for later inspection.
#[derive(Default)]
pub struct MockIndicator {
    calls: Mutex<Vec<IndicatorCall>>,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<IndicatorCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Discards all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Indicator for MockIndicator {
    fn set_brightness(&self, level: f32) {
        self.calls.lock().unwrap().push(IndicatorCall::SetBrightness(level));
    }

    fn fill(&self, color: Rgb) {
        self.calls.lock().unwrap().push(IndicatorCall::Fill(color));
    }
}
