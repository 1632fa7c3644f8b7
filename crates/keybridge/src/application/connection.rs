//! Keyboard attachment lifecycle: discovery, claiming, polling, recovery.
//!
//! The [`ConnectionSupervisor`] hides hot-plug churn from the rest of the
//! daemon.  While unattached it keeps trying to discover and claim a
//! boot-protocol keyboard; while attached it polls reports with a short
//! timeout so an idle keyboard never blocks the loop.  Any read failure
//! other than a timeout drops the session and immediately re-enters
//! discovery, so unplugging and replugging the keyboard needs no operator
//! intervention.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use keybridge_core::{BootReport, REPORT_LEN};

// ── Transport abstraction ─────────────────────────────────────────────────────

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No report arrived within the poll timeout.  Not a fault: the
    /// keyboard is simply idle.
    #[error("read timed out")]
    Timeout,

    /// The device vanished or the bus refused the operation.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl TransportError {
    /// Returns `true` for the benign idle-keyboard case.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

/// Identity and addressing of one claimable keyboard interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus: u8,
    pub address: u8,
    /// The boot-keyboard interface number to claim.
    pub interface: u8,
    /// The interrupt IN endpoint address reports arrive on.
    pub endpoint: u8,
}

/// A claimed device the supervisor can read reports from.
pub trait DeviceLink: Send {
    /// Reads one interrupt transfer from `endpoint` into `buf`.
    ///
    /// # Errors
    ///
    /// [`TransportError::Timeout`] when no report arrived in `timeout`;
    /// [`TransportError::Transport`] for everything else.
    fn read_interrupt(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}

/// A claimed keyboard: its identity plus the open link to read from.
///
/// Bundling the two means the supervisor either has a fully usable
/// keyboard or none at all, never a half-attached state.
pub struct DeviceSession {
    pub info: DeviceInfo,
    link: Box<dyn DeviceLink>,
}

impl DeviceSession {
    pub fn new(info: DeviceInfo, link: Box<dyn DeviceLink>) -> Self {
        Self { info, link }
    }

    /// Reads one report from the session's interrupt endpoint.
    fn read(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError> {
        self.link.read_interrupt(self.info.endpoint, buf, timeout)
    }
}

/// Discovers and claims boot-protocol keyboards on some bus.
pub trait InputTransport: Send {
    /// Lists the currently connected boot-keyboard interfaces.
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, TransportError>;

    /// Claims `info` for exclusive report reading.
    fn claim(&self, info: &DeviceInfo) -> Result<DeviceSession, TransportError>;
}

// ── Supervisor ────────────────────────────────────────────────────────────────

/// Keeps one keyboard attached, surviving unplugs.
pub struct ConnectionSupervisor {
    transport: Box<dyn InputTransport>,
    session: Option<DeviceSession>,
    read_timeout: Duration,
}

impl ConnectionSupervisor {
    pub fn new(transport: Box<dyn InputTransport>, read_timeout: Duration) -> Self {
        Self {
            transport,
            session: None,
            read_timeout,
        }
    }

    /// Whether a keyboard is currently claimed.
    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// Polls for one report.
    ///
    /// Returns `None` when unattached (after one discovery attempt), when
    /// the poll timed out, or when the read failed and the session was
    /// dropped.  The caller distinguishes detach from idle via
    /// [`is_attached`](Self::is_attached).
    pub fn poll(&mut self) -> Option<BootReport> {
        if self.session.is_none() && !self.attach() {
            return None;
        }
        let session = self.session.as_ref()?;

        let mut buf = [0u8; REPORT_LEN];
        match session.read(&mut buf, self.read_timeout) {
            Ok(n) => BootReport::from_bytes(&buf[..n]),
            Err(e) if e.is_timeout() => None,
            Err(e) => {
                warn!(error = %e, "keyboard read failed, dropping session");
                self.session = None;
                // Re-enter discovery right away; a replug may already be
                // enumerable on the next poll.
                self.attach();
                None
            }
        }
    }

    /// Attempts to discover and claim the first available keyboard.
    fn attach(&mut self) -> bool {
        let devices = match self.transport.enumerate() {
            Ok(devices) => devices,
            Err(e) => {
                warn!(error = %e, "device enumeration failed");
                return false;
            }
        };
        let Some(info) = devices.first().copied() else {
            debug!("no boot-protocol keyboard present");
            return false;
        };
        match self.transport.claim(&info) {
            Ok(session) => {
                info!(
                    vendor_id = format_args!("{:04x}", info.vendor_id),
                    product_id = format_args!("{:04x}", info.product_id),
                    bus = info.bus,
                    address = info.address,
                    "keyboard attached"
                );
                self.session = Some(session);
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to claim keyboard");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::transport::mock::{MockTransport, ReadOutcome};

    const TIMEOUT: Duration = Duration::from_millis(10);

    fn info() -> DeviceInfo {
        DeviceInfo {
            vendor_id: 0x046d,
            product_id: 0xc31c,
            bus: 1,
            address: 4,
            interface: 0,
            endpoint: 0x81,
        }
    }

    fn raw_report(mask: u8, first_code: u8) -> Vec<u8> {
        vec![mask, 0, first_code, 0, 0, 0, 0, 0]
    }

    #[test]
    fn test_poll_without_devices_stays_unattached() {
        let mut supervisor = ConnectionSupervisor::new(Box::new(MockTransport::new()), TIMEOUT);

        assert!(supervisor.poll().is_none());
        assert!(!supervisor.is_attached());
    }

    #[test]
    fn test_poll_attaches_and_reads_first_report() {
        // Arrange
        let transport = MockTransport::new();
        transport.add_device(info(), vec![ReadOutcome::Report(raw_report(0x02, 0x04))]);

        // Act
        let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);
        let report = supervisor.poll();

        // Assert
        assert!(supervisor.is_attached());
        let report = report.expect("report should decode");
        assert_eq!(report.modifier_mask, 0x02);
        assert_eq!(report.scan_codes[0], 0x04);
    }

    #[test]
    fn test_timeout_keeps_session_attached() {
        let transport = MockTransport::new();
        transport.add_device(info(), vec![ReadOutcome::Timeout, ReadOutcome::Report(raw_report(0, 0x05))]);
        let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

        assert!(supervisor.poll().is_none(), "timeout yields no report");
        assert!(supervisor.is_attached(), "timeout must not drop the session");
        assert!(supervisor.poll().is_some(), "next report still readable");
    }

    #[test]
    fn test_read_failure_drops_session_and_rediscovers() {
        // Arrange: first claim dies after one failed read; a second claim
        // of the same device succeeds and delivers a report.
        let transport = MockTransport::new();
        transport.add_device(info(), vec![ReadOutcome::Fail]);
        transport.add_device(info(), vec![ReadOutcome::Report(raw_report(0, 0x06))]);

        let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

        // Act: the failing poll drops the session but re-attaches inline
        assert!(supervisor.poll().is_none());

        // Assert
        assert!(supervisor.is_attached(), "supervisor re-claimed immediately");
        assert!(supervisor.poll().is_some());
    }

    #[test]
    fn test_unattached_poll_retries_discovery_each_time() {
        let transport = MockTransport::new();
        let devices = transport.device_handle();
        let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

        assert!(supervisor.poll().is_none());
        assert!(!supervisor.is_attached());

        // The keyboard appears between polls.
        devices.plug(info(), vec![ReadOutcome::Report(raw_report(0, 0x04))]);

        assert!(supervisor.poll().is_some());
        assert!(supervisor.is_attached());
    }

    #[test]
    fn test_short_read_yields_no_report() {
        let transport = MockTransport::new();
        transport.add_device(info(), vec![ReadOutcome::Report(vec![0x00, 0x00, 0x04])]);
        let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

        assert!(supervisor.poll().is_none(), "truncated reports are dropped");
        assert!(supervisor.is_attached());
    }
}
