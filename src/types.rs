use crate::internals::*;
use std::fmt;
use std::time::Duration;

/// Device information reported by the RPLIDAR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Model ID of the RPLIDAR.
    pub model: u8,
    /// Firmware version as `(major, minor)`.
    pub firmware: (u8, u8),
    /// Hardware revision.
    pub hardware: u8,
    /// 16-byte unique serial number as uppercase hex (32 characters).
    pub serial_number: String,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "model {} firmware {}.{:02} hardware {} serial {}",
            self.model, self.firmware.0, self.firmware.1, self.hardware, self.serial_number
        )
    }
}

/// Health status reported by the RPLIDAR device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// The device reports it is operating correctly.
    Good,
    /// The device detected a potential risk but keeps working.
    Warning,
    /// The device is in protection stop.
    Error,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthStatus::Good => "Good",
            HealthStatus::Warning => "Warning",
            HealthStatus::Error => "Error",
        })
    }
}

/// Answer of the get-health command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    /// Reported status.
    pub status: HealthStatus,
    /// Code of the condition behind a warning or error. Zero when healthy.
    pub error_code: u16,
}

/// A single measurement of the legacy scan answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// `true` if this measurement starts a new 360-degree rotation.
    pub new_scan: bool,
    /// Reflected laser pulse strength (6 bits).
    pub quality: u8,
    /// Heading in degrees, `[0, 360)`.
    pub angle: f32,
    /// Distance from the rotation center in millimeters. Zero marks an invalid reading.
    pub distance: f32,
}

impl Measurement {
    /// Returns `true` if the measurement carries a usable distance.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.distance > 0.0
    }
}

/// Measurements of one rotation, in the order they were received.
pub type Scan = Vec<Measurement>;

/// Options for starting a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// If `true`, starts scanning even if the motor is not reported as spinning stably.
    pub force_scan: bool,
}

impl ScanOptions {
    /// Creates `ScanOptions` that enable forced scanning.
    pub fn force_scan() -> ScanOptions {
        ScanOptions { force_scan: true }
    }
}

/// Tuning knobs of a driver session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long to wait for the channel to buffer an answer.
    pub timeout: Duration,
    /// Backlog, in whole measurements, above which buffered input is dropped.
    /// Zero disables the overflow guard.
    pub max_buffered_measurements: usize,
    /// Scans with this many measurements or fewer are dropped as noise.
    pub min_scan_len: usize,
    /// Delay between a core reset and the next command.
    pub reset_settle: Duration,
    /// Delay between the stop command and draining the input.
    pub stop_settle: Duration,
}

impl SessionConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> SessionConfig {
        self.timeout = timeout;
        self
    }

    pub fn with_max_buffered_measurements(mut self, max: usize) -> SessionConfig {
        self.max_buffered_measurements = max;
        self
    }

    pub fn with_min_scan_len(mut self, min_scan_len: usize) -> SessionConfig {
        self.min_scan_len = min_scan_len;
        self
    }

    pub fn with_reset_settle(mut self, reset_settle: Duration) -> SessionConfig {
        self.reset_settle = reset_settle;
        self
    }

    pub fn with_stop_settle(mut self, stop_settle: Duration) -> SessionConfig {
        self.stop_settle = stop_settle;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            timeout: RPLIDAR_DEFAULT_TIMEOUT,
            max_buffered_measurements: RPLIDAR_DEFAULT_MAX_BUF_MEAS,
            min_scan_len: RPLIDAR_DEFAULT_MIN_SCAN_LEN,
            reset_settle: RPLIDAR_RESET_SETTLE,
            stop_settle: RPLIDAR_STOP_SETTLE,
        }
    }
}
