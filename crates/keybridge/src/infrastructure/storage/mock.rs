//! In-memory mock layout store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use keybridge_core::Layout;

use crate::application::layout_manager::{LayoutStore, StoreError};

/// A [`LayoutStore`] backed by a plain map.
///
/// Layouts not inserted report [`StoreError::NotFound`]; with `should_fail`
/// set, every load reports an I/O error instead.
#[derive(Default)]
pub struct MockLayoutStore {
    layouts: Mutex<HashMap<String, Layout>>,
    should_fail: AtomicBool,
}

impl MockLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `layout` loadable under its own name.
    pub fn insert(&self, layout: Layout) {
        self.layouts.lock().unwrap().insert(layout.name.clone(), layout);
    }

    /// Makes every subsequent load fail (or succeed again).
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

impl LayoutStore for MockLayoutStore {
    fn load(&self, name: &str) -> Result<Layout, StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                name: name.to_string(),
                source: std::io::Error::other("scripted failure (mock)"),
            });
        }
        self.layouts
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
