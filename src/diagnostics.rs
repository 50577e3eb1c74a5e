//! Diagnostic events raised by the driver at well-defined points of a session.

use crate::protocol::Descriptor;
use log::{debug, info, warn};

/// Something noteworthy happened while talking to the device.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// A command frame was written.
    CommandSent { cmd: u8, len: usize },
    /// An answer descriptor was received and decoded.
    DescriptorReceived(Descriptor),
    /// Answer bytes were read from the channel.
    PacketReceived { len: usize },
    /// Buffered input exceeded the configured backlog and was dropped.
    BufferOverflow {
        buffered_measurements: usize,
        max_buffered_measurements: usize,
    },
    /// The device reported a warning status; scanning continues.
    HealthWarning { error_code: u16 },
    /// The device reported an error status; a core reset is attempted.
    HealthError { error_code: u16 },
    /// The spin motor was switched on or off.
    MotorPower { on: bool },
}

/// Receiver of [`DiagnosticEvent`]s.
pub trait DiagnosticSink {
    fn on_event(&mut self, event: &DiagnosticEvent);
}

/// Default sink forwarding every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn on_event(&mut self, event: &DiagnosticEvent) {
        match *event {
            DiagnosticEvent::CommandSent { cmd, len } => {
                debug!("Command sent: {:02X} ({} bytes)", cmd, len)
            }
            DiagnosticEvent::DescriptorReceived(ref descriptor) => {
                debug!("Received descriptor: {:?}", descriptor)
            }
            DiagnosticEvent::PacketReceived { len } => debug!("Received scan response: {} bytes", len),
            DiagnosticEvent::BufferOverflow {
                buffered_measurements,
                max_buffered_measurements,
            } => warn!(
                "Too many measurements in the input buffer: {}/{}. Clearing buffer...",
                buffered_measurements, max_buffered_measurements
            ),
            DiagnosticEvent::HealthWarning { error_code } => {
                warn!("Warning sensor status detected! Error code: {}", error_code)
            }
            DiagnosticEvent::HealthError { error_code } => warn!(
                "Trying to reset sensor due to the error. Error code: {}",
                error_code
            ),
            DiagnosticEvent::MotorPower { on: true } => info!("Starting motor"),
            DiagnosticEvent::MotorPower { on: false } => info!("Stopping motor"),
        }
    }
}
