//! Scriptable mock transport for tests.
//!
//! Tests script each device as a queue of read outcomes, and can plug new
//! devices in mid-test through the shared [`DeviceQueue`] handle to simulate
//! hot-plug.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::connection::{
    DeviceInfo, DeviceLink, DeviceSession, InputTransport, TransportError,
};

/// One scripted result for a single interrupt read.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    /// Deliver these raw bytes.
    Report(Vec<u8>),
    /// Pretend the keyboard was idle.
    Timeout,
    /// Fail the read as if the device vanished.
    Fail,
}

struct ScriptedDevice {
    info: DeviceInfo,
    reads: VecDeque<ReadOutcome>,
}

type SharedDevices = Arc<Mutex<Vec<ScriptedDevice>>>;

/// Shared handle onto the mock's device list, for plugging devices in
/// after the transport has been handed to a supervisor.
#[derive(Clone)]
pub struct DeviceQueue(SharedDevices);

impl DeviceQueue {
    /// Makes a new scripted device enumerable.
    pub fn plug(&self, info: DeviceInfo, reads: Vec<ReadOutcome>) {
        self.0.lock().unwrap().push(ScriptedDevice {
            info,
            reads: reads.into(),
        });
    }
}

/// An [`InputTransport`] over scripted in-memory devices.
#[derive(Default)]
pub struct MockTransport {
    devices: SharedDevices,
    should_fail: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a scripted device enumerable.
    pub fn add_device(&self, info: DeviceInfo, reads: Vec<ReadOutcome>) {
        self.devices.lock().unwrap().push(ScriptedDevice {
            info,
            reads: reads.into(),
        });
    }

    /// Returns a handle for plugging devices in later.
    pub fn device_handle(&self) -> DeviceQueue {
        DeviceQueue(self.devices.clone())
    }

    /// Makes enumeration fail (or succeed again).
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }
}

impl InputTransport for MockTransport {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, TransportError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(TransportError::Transport("enumeration failure (mock)".to_string()));
        }
        Ok(self.devices.lock().unwrap().iter().map(|d| d.info).collect())
    }

    fn claim(&self, info: &DeviceInfo) -> Result<DeviceSession, TransportError> {
        let mut devices = self.devices.lock().unwrap();
        let index = devices
            .iter()
            .position(|d| d.info == *info)
            .ok_or_else(|| TransportError::Transport("device not enumerable (mock)".to_string()))?;
        let device = devices.remove(index);
        Ok(DeviceSession::new(
            device.info,
            Box::new(MockLink {
                reads: Mutex::new(device.reads),
            }),
        ))
    }
}

struct MockLink {
    reads: Mutex<VecDeque<ReadOutcome>>,
}

impl DeviceLink for MockLink {
    fn read_interrupt(
        &self,
        _endpoint: u8,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, TransportError> {
        // An exhausted script behaves like an idle keyboard.
        let outcome = self.reads.lock().unwrap().pop_front();
        match outcome {
            None | Some(ReadOutcome::Timeout) => Err(TransportError::Timeout),
            Some(ReadOutcome::Fail) => {
                Err(TransportError::Transport("scripted read failure (mock)".to_string()))
            }
            Some(ReadOutcome::Report(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
        }
    }
}
