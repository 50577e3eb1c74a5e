//! Grouping of the measurement stream into scans, and input backpressure.

use crate::base::{ByteChannel, Channel, Result};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::types::{Measurement, Scan};
use log::trace;
use std::mem;

/// Where the assembler is within the rotation stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// No new-scan flag seen yet; incoming measurements belong to a partial rotation.
    AwaitingStart,
    /// Collecting the measurements of the current rotation.
    Accumulating,
}

/// Splits a measurement stream into scans at every new-scan flag.
///
/// A scan is emitted only if it holds strictly more than `min_scan_len` measurements;
/// shorter ones are dropped as noise.
#[derive(Debug, Clone)]
pub struct ScanAssembler {
    min_scan_len: usize,
    state: AssemblerState,
    current: Scan,
}

impl ScanAssembler {
    /// Creates an assembler waiting for the first new-scan flag.
    ///
    /// # Arguments
    ///
    /// * `min_scan_len` - Scans with this many measurements or fewer are dropped.
    pub fn new(min_scan_len: usize) -> ScanAssembler {
        ScanAssembler {
            min_scan_len,
            state: AssemblerState::AwaitingStart,
            current: Vec::new(),
        }
    }

    /// Returns the current state of the assembler.
    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Number of measurements in the scan being collected.
    pub fn pending_len(&self) -> usize {
        self.current.len()
    }

    /// Advances the state machine by one measurement.
    ///
    /// Returns the completed scan when `measurement` starts a new rotation and the
    /// previous one was long enough.
    pub fn feed(&mut self, measurement: Measurement) -> Option<Scan> {
        if !measurement.new_scan {
            match self.state {
                AssemblerState::AwaitingStart => {}
                AssemblerState::Accumulating => self.current.push(measurement),
            }
            return None;
        }

        let finished = mem::replace(&mut self.current, vec![measurement]);
        let emitted = match self.state {
            AssemblerState::AwaitingStart => None,
            AssemblerState::Accumulating if finished.len() > self.min_scan_len => Some(finished),
            AssemblerState::Accumulating => {
                trace!(
                    "Dropping short scan of {} measurements (minimum {})",
                    finished.len(),
                    self.min_scan_len
                );
                None
            }
        };
        self.state = AssemblerState::Accumulating;
        emitted
    }

    /// Forgets the scan in progress and waits for the next new-scan flag.
    pub fn reset(&mut self) {
        self.current.clear();
        self.state = AssemblerState::AwaitingStart;
    }
}

/// Drops buffered input when the consumer falls too far behind the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowGuard {
    max_buffered_measurements: usize,
    record_size: usize,
}

impl OverflowGuard {
    /// # Arguments
    ///
    /// * `max_buffered_measurements` - Backlog limit in whole records. Zero disables the guard.
    /// * `record_size` - Size of one record on the wire.
    pub fn new(max_buffered_measurements: usize, record_size: usize) -> OverflowGuard {
        OverflowGuard {
            max_buffered_measurements,
            record_size,
        }
    }

    /// Checks the channel backlog and drains it if it exceeds the limit.
    ///
    /// Only whole records are drained so the next read stays aligned on a record
    /// boundary. Returns `true` if input was dropped.
    pub fn check<T: ByteChannel>(
        &self,
        channel: &mut Channel<T>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<bool> {
        if self.max_buffered_measurements == 0 || self.record_size == 0 {
            return Ok(false);
        }

        let buffered = channel.bytes_available()?;
        let limit = self.max_buffered_measurements.saturating_mul(self.record_size);
        if buffered <= limit {
            return Ok(false);
        }

        let buffered_measurements = buffered / self.record_size;
        sink.on_event(&DiagnosticEvent::BufferOverflow {
            buffered_measurements,
            max_buffered_measurements: self.max_buffered_measurements,
        });
        channel.discard(buffered_measurements * self.record_size)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{measurement, FakeChannel, RecordingSink};

    fn feed_all(assembler: &mut ScanAssembler, flags: &[bool]) -> Vec<Scan> {
        flags
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| assembler.feed(measurement(flag, i as f32)))
            .collect()
    }

    #[test]
    fn emits_scan_at_second_flag() {
        let k = 8;
        let mut flags = vec![false; 12];
        flags[0] = true;
        flags[k] = true;

        let mut assembler = ScanAssembler::new(5);
        let mut emitted = Vec::new();
        for (i, &flag) in flags.iter().enumerate() {
            if let Some(scan) = assembler.feed(measurement(flag, i as f32)) {
                assert_eq!(i, k, "scan must be emitted when the second flag arrives");
                emitted.push(scan);
            }
        }

        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].len(), k);
        assert!(emitted[0][0].new_scan);
        assert_eq!(emitted[0][k - 1].angle, (k - 1) as f32);
        assert_eq!(assembler.pending_len(), 12 - k);
    }

    #[test]
    fn short_scans_are_dropped() {
        for k in 1..=5 {
            let mut flags = vec![false; k + 1];
            flags[0] = true;
            flags[k] = true;

            let mut assembler = ScanAssembler::new(5);
            assert!(feed_all(&mut assembler, &flags).is_empty(), "k = {}", k);
            assert_eq!(assembler.pending_len(), 1);
        }
    }

    #[test]
    fn scan_must_be_strictly_longer_than_minimum() {
        let mut assembler = ScanAssembler::new(3);
        assert!(feed_all(&mut assembler, &[true, false, false, true]).is_empty());
        let scans = feed_all(&mut assembler, &[false, false, false, true]);
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].len(), 4);
    }

    #[test]
    fn measurements_before_first_flag_are_skipped() {
        let mut assembler = ScanAssembler::new(0);
        assert_eq!(assembler.state(), AssemblerState::AwaitingStart);
        assert!(feed_all(&mut assembler, &[false, false, false]).is_empty());
        assert_eq!(assembler.pending_len(), 0);

        assert!(assembler.feed(measurement(true, 0.0)).is_none());
        assert_eq!(assembler.state(), AssemblerState::Accumulating);
        assembler.feed(measurement(false, 1.0));
        let scan = assembler.feed(measurement(true, 2.0)).unwrap();
        assert_eq!(scan.len(), 2);
    }

    #[test]
    fn reset_returns_to_awaiting_start() {
        let mut assembler = ScanAssembler::new(0);
        feed_all(&mut assembler, &[true, false]);
        assembler.reset();
        assert_eq!(assembler.state(), AssemblerState::AwaitingStart);
        assert!(assembler.feed(measurement(true, 0.0)).is_none());
    }

    #[test]
    fn guard_drains_full_backlog_once() {
        let fake = FakeChannel::new();
        fake.push_input(&vec![0u8; 12 * 5]);
        let mut channel = Channel::new(fake.clone());
        let (mut sink, events) = RecordingSink::new();

        let guard = OverflowGuard::new(10, 5);
        assert!(guard.check(&mut channel, &mut sink).unwrap());

        assert_eq!(fake.read_requests(), vec![60]);
        assert_eq!(fake.buffered(), 0);
        assert_eq!(
            events.borrow().as_slice(),
            &[DiagnosticEvent::BufferOverflow {
                buffered_measurements: 12,
                max_buffered_measurements: 10,
            }]
        );
    }

    #[test]
    fn guard_keeps_partial_record() {
        let fake = FakeChannel::new();
        fake.push_input(&vec![0u8; 3 * 5 + 2]);
        let mut channel = Channel::new(fake.clone());
        let (mut sink, _) = RecordingSink::new();

        assert!(OverflowGuard::new(2, 5).check(&mut channel, &mut sink).unwrap());
        assert_eq!(fake.read_requests(), vec![15]);
        assert_eq!(fake.buffered(), 2);
    }

    #[test]
    fn guard_ignores_backlog_within_limit() {
        let fake = FakeChannel::new();
        fake.push_input(&vec![0u8; 10 * 5]);
        let mut channel = Channel::new(fake.clone());
        let (mut sink, events) = RecordingSink::new();

        assert!(!OverflowGuard::new(10, 5).check(&mut channel, &mut sink).unwrap());
        assert!(!OverflowGuard::new(0, 5).check(&mut channel, &mut sink).unwrap());
        assert_eq!(fake.read_calls(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn guard_with_huge_limit_never_drains() {
        let fake = FakeChannel::new();
        fake.push_input(&[0u8; 10]);
        let mut channel = Channel::new(fake.clone());
        let (mut sink, events) = RecordingSink::new();

        let guard = OverflowGuard::new(usize::MAX, 5);
        assert!(!guard.check(&mut channel, &mut sink).unwrap());
        assert_eq!(fake.buffered(), 10);
        assert!(events.borrow().is_empty());
    }
}
