//! Pull-driven measurement and scan sequences.

use crate::assembler::{OverflowGuard, ScanAssembler};
use crate::base::{ByteChannel, MotorControl, Result};
use crate::parsers::parse_measurement;
use crate::types::{Measurement, Scan};
use crate::RplidarDevice;
use std::collections::VecDeque;

/// Endless sequence of measurements from a device in scan mode.
///
/// Created by [`RplidarDevice::iter_measurements`]. Yields `Err` once when a read or
/// decode fails and ends afterwards; a new session has to be started to continue.
pub struct MeasurementIter<'a, C, M> {
    device: &'a mut RplidarDevice<C, M>,
    guard: OverflowGuard,
    record_size: usize,
    cached_records: VecDeque<u8>,
    finished: bool,
}

impl<'a, C, M> MeasurementIter<'a, C, M>
where
    C: ByteChannel,
    M: MotorControl,
{
    pub(crate) fn new(
        device: &'a mut RplidarDevice<C, M>,
        record_size: usize,
    ) -> MeasurementIter<'a, C, M> {
        let guard = OverflowGuard::new(device.config().max_buffered_measurements, record_size);
        MeasurementIter {
            device,
            guard,
            record_size,
            cached_records: VecDeque::new(),
            finished: false,
        }
    }

    fn next_measurement(&mut self) -> Result<Measurement> {
        if self.cached_records.len() < self.record_size {
            self.device
                .wait_scan_data(&self.guard, self.record_size, &mut self.cached_records)?;
        }
        let raw: Vec<u8> = self.cached_records.drain(..self.record_size).collect();
        parse_measurement(&raw)
    }
}

impl<'a, C, M> Iterator for MeasurementIter<'a, C, M>
where
    C: ByteChannel,
    M: MotorControl,
{
    type Item = Result<Measurement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let next = self.next_measurement();
        if next.is_err() {
            self.finished = true;
        }
        Some(next)
    }
}

/// Endless sequence of complete scans.
///
/// Created by [`RplidarDevice::iter_scans`]. Scans not longer than the configured
/// minimum are skipped.
pub struct ScanIter<'a, C, M> {
    measurements: MeasurementIter<'a, C, M>,
    assembler: ScanAssembler,
}

impl<'a, C, M> ScanIter<'a, C, M>
where
    C: ByteChannel,
    M: MotorControl,
{
    pub(crate) fn new(measurements: MeasurementIter<'a, C, M>, min_scan_len: usize) -> Self {
        ScanIter {
            measurements,
            assembler: ScanAssembler::new(min_scan_len),
        }
    }
}

impl<'a, C, M> Iterator for ScanIter<'a, C, M>
where
    C: ByteChannel,
    M: MotorControl,
{
    type Item = Result<Scan>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.measurements.next()? {
                Ok(measurement) => {
                    if let Some(scan) = self.assembler.feed(measurement) {
                        return Some(Ok(scan));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
