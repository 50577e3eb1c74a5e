//! # Rplidar GPIO Driver
//!
//! `rplidar_gpio` drives Slamtec RPLIDAR A1/A2 sensors over the legacy serial protocol,
//! with the spin motor switched through a separate enable pin. It provides device info,
//! health checks with automatic core reset, and continuous measurement and scan streams.
//!
//! The serial link and the motor pin are injected as [`ByteChannel`] and [`MotorControl`]
//! implementations, so the driver runs against any UART binding (see the `serialport`
//! feature) or a scripted fake.

extern crate byteorder;
extern crate log;

pub mod answers;
mod assembler;
pub mod base;
mod checksum;
pub mod cmds;
pub mod diagnostics;
mod internals;
mod iter;
pub mod parsers;
pub mod protocol;
#[cfg(test)]
mod testing;
pub mod types;

pub use crate::assembler::{AssemblerState, OverflowGuard, ScanAssembler};
pub use crate::base::{ByteChannel, Channel, Command, Error, MotorControl, NoMotorControl, Result};
pub use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, LogSink};
pub use crate::iter::{MeasurementIter, ScanIter};
pub use crate::protocol::{Descriptor, SendMode};
pub use crate::types::{
    DeviceInfo, HealthReport, HealthStatus, Measurement, Scan, ScanOptions, SessionConfig,
};

use crate::answers::*;
use crate::cmds::*;
use crate::parsers::{parse_device_info, parse_health};
use log::{error, trace};
use std::collections::VecDeque;
use std::fmt;
use std::thread;
use std::time::Duration;

/// Connection to and control interface for an RPLIDAR device.
///
/// Owns the byte channel and the motor pin for the lifetime of a session. A scanning
/// session is started with [`start_scan`](RplidarDevice::start_scan) (or one of the
/// `iter_*` methods, which call it) and must be ended with
/// [`stop`](RplidarDevice::stop).
pub struct RplidarDevice<C, M> {
    channel: Channel<C>,
    motor: M,
    config: SessionConfig,
    diagnostics: Box<dyn DiagnosticSink>,
    motor_running: bool,
}

impl<C: fmt::Debug, M: fmt::Debug> fmt::Debug for RplidarDevice<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RplidarDevice")
            .field("channel", &self.channel)
            .field("motor", &self.motor)
            .field("config", &self.config)
            .field("motor_running", &self.motor_running)
            .finish_non_exhaustive()
    }
}

impl<C, M> RplidarDevice<C, M>
where
    C: ByteChannel,
    M: MotorControl,
{
    /// Constructs a new `RplidarDevice` with the default session configuration.
    ///
    /// # Arguments
    ///
    /// * `stream` - The byte channel connected to the RPLIDAR's UART.
    /// * `motor` - The switch driving the MOTOCTL line.
    ///
    /// # Example
    /// ```ignore
    /// # use rplidar_gpio::{RplidarDevice, NoMotorControl};
    /// let port = serialport::new("/dev/ttyUSB0", 115200).open()?;
    /// let mut lidar = RplidarDevice::new(port, NoMotorControl);
    /// println!("{}", lidar.get_info()?);
    /// ```
    pub fn new(stream: C, motor: M) -> RplidarDevice<C, M> {
        RplidarDevice::with_config(stream, motor, SessionConfig::default())
    }

    /// Constructs a new `RplidarDevice` with a custom session configuration.
    pub fn with_config(stream: C, motor: M, config: SessionConfig) -> RplidarDevice<C, M> {
        trace!("Creating new RplidarDevice with {:?}", config);
        RplidarDevice {
            channel: Channel::new(stream),
            motor,
            config,
            diagnostics: Box::new(LogSink),
            motor_running: false,
        }
    }

    /// Replaces the sink receiving diagnostic events (a [`LogSink`] by default).
    pub fn set_diagnostics(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.diagnostics = sink;
    }

    /// Returns the session configuration in use.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns `true` if the motor was last switched on.
    pub fn is_motor_running(&self) -> bool {
        self.motor_running
    }

    /// Releases the byte channel and the motor switch.
    pub fn into_inner(self) -> (C, M) {
        (self.channel.into_inner(), self.motor)
    }

    /// Starts the spin motor.
    pub fn start_motor(&mut self) -> Result<()> {
        self.set_motor_power(true)
    }

    /// Stops the spin motor.
    pub fn stop_motor(&mut self) -> Result<()> {
        self.set_motor_power(false)
    }

    fn set_motor_power(&mut self, on: bool) -> Result<()> {
        self.diagnostics.on_event(&DiagnosticEvent::MotorPower { on });
        self.motor.set_power(on)?;
        self.motor_running = on;
        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> Result<()> {
        let len = self.channel.write(&Command::new(cmd))?;
        self.diagnostics
            .on_event(&DiagnosticEvent::CommandSent { cmd, len });
        Ok(())
    }

    fn read_descriptor(&mut self, timeout: Duration) -> Result<Descriptor> {
        let descriptor = self.channel.read_descriptor(timeout)?;
        self.diagnostics
            .on_event(&DiagnosticEvent::DescriptorReceived(descriptor));
        Ok(descriptor)
    }

    /// Sends a single-response command and returns the validated answer body.
    fn invoke(
        &mut self,
        cmd: u8,
        ans_type: u8,
        response_size: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        self.send_command(cmd)?;
        let descriptor = self.read_descriptor(timeout)?;
        descriptor
            .validate(response_size, SendMode::Single, ans_type)
            .map_err(|e| {
                error!("Unexpected answer to command {:02X}: {}", cmd, e);
                e
            })?;
        let body = self.channel.await_bytes(descriptor.response_size, timeout)?;
        self.diagnostics
            .on_event(&DiagnosticEvent::PacketReceived { len: body.len() });
        Ok(body)
    }

    /// Gets the device information (model, firmware, hardware, serial number).
    /// Uses the configured timeout.
    pub fn get_info(&mut self) -> Result<DeviceInfo> {
        self.get_info_with_timeout(self.config.timeout)
    }

    /// Gets the device information with a specified timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The maximum duration to wait for each part of the answer.
    pub fn get_info_with_timeout(&mut self, timeout: Duration) -> Result<DeviceInfo> {
        let body = self.invoke(
            RPLIDAR_CMD_GET_DEVICE_INFO,
            RPLIDAR_ANS_TYPE_DEVINFO,
            RPLIDAR_DEVINFO_LEN,
            timeout,
        )?;
        parse_device_info(&body)
    }

    /// Gets the health status of the device. Uses the configured timeout.
    ///
    /// A `Warning` status means a potential risk was detected but the sensor still works.
    /// An `Error` status means the sensor is in protection stop.
    pub fn get_health(&mut self) -> Result<HealthReport> {
        self.get_health_with_timeout(self.config.timeout)
    }

    /// Gets the health status of the device with a specified timeout.
    pub fn get_health_with_timeout(&mut self, timeout: Duration) -> Result<HealthReport> {
        let body = self.invoke(
            RPLIDAR_CMD_GET_DEVICE_HEALTH,
            RPLIDAR_ANS_TYPE_DEVHEALTH,
            RPLIDAR_DEVHEALTH_LEN,
            timeout,
        )?;
        let health = parse_health(&body)?;
        trace!("Health status: {} [{}]", health.status, health.error_code);
        Ok(health)
    }

    /// Discards all buffered input.
    pub fn clear_input(&mut self) -> Result<()> {
        self.channel.clear_input()?;
        Ok(())
    }

    /// Resets the sensor core, reverting it to the state it has after power-up.
    ///
    /// Waits for the configured settle time and discards whatever the core printed
    /// while booting.
    pub fn reset(&mut self) -> Result<()> {
        trace!("Resetting the sensor");
        self.send_command(RPLIDAR_CMD_RESET)?;
        thread::sleep(self.config.reset_settle);
        self.clear_input()
    }

    /// Stops scanning, disables the laser and moves the sensor to idle,
    /// then drains the input and switches the motor off.
    pub fn stop(&mut self) -> Result<()> {
        trace!("Stopping scanning");
        self.send_command(RPLIDAR_CMD_STOP)?;
        thread::sleep(self.config.stop_settle);
        self.clear_input()?;
        self.stop_motor()
    }

    /// Starts a scanning session with default options.
    ///
    /// Returns the size of one measurement record.
    pub fn start_scan(&mut self) -> Result<usize> {
        self.start_scan_with_options(&ScanOptions::default())
    }

    /// Starts a scanning session.
    ///
    /// Switches the motor on and checks the device health. On an error status the core
    /// is reset once and health is checked again; if the error persists the session fails
    /// with `Error::HardwareFailure`. A warning status is reported and ignored. Finally the
    /// scan command is sent and its descriptor validated.
    ///
    /// Returns the size of one measurement record.
    ///
    /// # Arguments
    ///
    /// * `options` - The `ScanOptions` to use for starting the scan.
    pub fn start_scan_with_options(&mut self, options: &ScanOptions) -> Result<usize> {
        trace!("Starting scan with options: {:?}", options);
        self.start_motor()?;

        let health = self.get_health()?;
        match health.status {
            HealthStatus::Good => {}
            HealthStatus::Warning => self.diagnostics.on_event(&DiagnosticEvent::HealthWarning {
                error_code: health.error_code,
            }),
            HealthStatus::Error => {
                self.diagnostics.on_event(&DiagnosticEvent::HealthError {
                    error_code: health.error_code,
                });
                self.reset()?;
                let health = self.get_health()?;
                match health.status {
                    HealthStatus::Error => {
                        error!("RPLidar hardware failure. Error code: {}", health.error_code);
                        return Err(Error::HardwareFailure {
                            error_code: health.error_code,
                        });
                    }
                    HealthStatus::Warning => {
                        self.diagnostics.on_event(&DiagnosticEvent::HealthWarning {
                            error_code: health.error_code,
                        })
                    }
                    HealthStatus::Good => {}
                }
            }
        }

        let cmd = if options.force_scan {
            RPLIDAR_CMD_FORCE_SCAN
        } else {
            RPLIDAR_CMD_SCAN
        };
        self.send_command(cmd)?;
        let descriptor = self.read_descriptor(self.config.timeout)?;
        descriptor.validate(
            RPLIDAR_MEASUREMENT_LEN,
            SendMode::Multiple,
            RPLIDAR_ANS_TYPE_MEASUREMENT,
        )?;
        trace!("Scan started, record size {}", descriptor.response_size);
        Ok(descriptor.response_size)
    }

    /// Starts a scanning session and iterates over single measurements.
    ///
    /// The consumer must keep up with the device: when more than
    /// `max_buffered_measurements` records pile up in the input buffer, they are dropped.
    pub fn iter_measurements(&mut self) -> Result<MeasurementIter<'_, C, M>> {
        self.iter_measurements_with_options(&ScanOptions::default())
    }

    /// Starts a scanning session with the given options and iterates over single
    /// measurements.
    ///
    /// # Arguments
    ///
    /// * `options` - The `ScanOptions` to use for starting the scan.
    pub fn iter_measurements_with_options(
        &mut self,
        options: &ScanOptions,
    ) -> Result<MeasurementIter<'_, C, M>> {
        let record_size = self.start_scan_with_options(options)?;
        Ok(MeasurementIter::new(self, record_size))
    }

    /// Starts a scanning session and iterates over complete scans.
    ///
    /// Each scan holds the measurements of one rotation; scans with `min_scan_len`
    /// measurements or fewer are skipped.
    pub fn iter_scans(&mut self) -> Result<ScanIter<'_, C, M>> {
        self.iter_scans_with_options(&ScanOptions::default())
    }

    /// Starts a scanning session with the given options and iterates over complete scans.
    ///
    /// # Arguments
    ///
    /// * `options` - The `ScanOptions` to use for starting the scan.
    pub fn iter_scans_with_options(&mut self, options: &ScanOptions) -> Result<ScanIter<'_, C, M>> {
        let min_scan_len = self.config.min_scan_len;
        let measurements = self.iter_measurements_with_options(options)?;
        Ok(ScanIter::new(measurements, min_scan_len))
    }

    /// Reads every whole record currently buffered (at least one) into `cache`,
    /// after giving the overflow guard a chance to drop a stale backlog.
    pub(crate) fn wait_scan_data(
        &mut self,
        guard: &OverflowGuard,
        record_size: usize,
        cache: &mut VecDeque<u8>,
    ) -> Result<()> {
        guard.check(&mut self.channel, self.diagnostics.as_mut())?;
        let records = (self.channel.bytes_available()? / record_size).max(1);
        let raw = self
            .channel
            .await_bytes(records * record_size, self.config.timeout)?;
        self.diagnostics
            .on_event(&DiagnosticEvent::PacketReceived { len: raw.len() });
        cache.extend(raw);
        Ok(())
    }
}
