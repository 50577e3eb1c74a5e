//! Scripted stand-ins for the hardware, shared by the unit tests.

use crate::base::{ByteChannel, MotorControl};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::types::Measurement;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

#[derive(Debug, Default)]
struct FakeChannelState {
    input: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    written: Vec<Vec<u8>>,
    read_requests: Vec<usize>,
    clears: usize,
    truncate_reads_to: Option<usize>,
}

/// In-memory byte channel. Clones share the same state so a test can keep a handle
/// after moving the channel into a device.
#[derive(Debug, Clone, Default)]
pub struct FakeChannel {
    state: Rc<RefCell<FakeChannelState>>,
}

impl FakeChannel {
    pub fn new() -> FakeChannel {
        FakeChannel::default()
    }

    /// Makes bytes available for reading right away.
    pub fn push_input(&self, data: &[u8]) {
        self.state.borrow_mut().input.extend(data);
    }

    /// Queues the bytes the device answers with to the next written command.
    /// Every write consumes one queued reply; an empty reply means silence.
    pub fn reply_to_next_write(&self, data: Vec<u8>) {
        self.state.borrow_mut().replies.push_back(data);
    }

    pub fn truncate_reads_to(&self, limit: Option<usize>) {
        self.state.borrow_mut().truncate_reads_to = limit;
    }

    pub fn buffered(&self) -> usize {
        self.state.borrow().input.len()
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.borrow().written.clone()
    }

    /// Opcodes of all written frames, in order.
    pub fn written_opcodes(&self) -> Vec<u8> {
        self.state.borrow().written.iter().map(|frame| frame[1]).collect()
    }

    pub fn read_requests(&self) -> Vec<usize> {
        self.state.borrow().read_requests.clone()
    }

    pub fn read_calls(&self) -> usize {
        self.state.borrow().read_requests.len()
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }
}

impl ByteChannel for FakeChannel {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.written.push(data.to_vec());
        if let Some(reply) = state.replies.pop_front() {
            state.input.extend(reply);
        }
        Ok(())
    }

    fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        state.read_requests.push(n);
        let limit = state.truncate_reads_to.unwrap_or(n).min(n);
        let count = limit.min(state.input.len());
        Ok(state.input.drain(..count).collect())
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.state.borrow().input.len())
    }

    fn clear_input(&mut self) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        state.clears += 1;
        let dropped = state.input.len();
        state.input.clear();
        Ok(dropped)
    }
}

/// Motor pin that records every level it was driven to.
#[derive(Debug, Clone, Default)]
pub struct FakeMotor {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl FakeMotor {
    pub fn new() -> FakeMotor {
        FakeMotor::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }
}

impl MotorControl for FakeMotor {
    fn set_power(&mut self, on: bool) -> io::Result<()> {
        self.levels.borrow_mut().push(on);
        Ok(())
    }
}

/// Sink collecting every diagnostic event.
pub struct RecordingSink {
    events: Rc<RefCell<Vec<DiagnosticEvent>>>,
}

impl RecordingSink {
    pub fn new() -> (RecordingSink, Rc<RefCell<Vec<DiagnosticEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        (
            RecordingSink {
                events: events.clone(),
            },
            events,
        )
    }
}

impl DiagnosticSink for RecordingSink {
    fn on_event(&mut self, event: &DiagnosticEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

pub fn measurement(new_scan: bool, angle: f32) -> Measurement {
    Measurement {
        new_scan,
        quality: 15,
        angle,
        distance: 1000.0,
    }
}

/// Wire descriptor with the given size, mode bits and answer type.
pub fn descriptor(size: u32, multiple: bool, data_type: u8) -> Vec<u8> {
    let word = size | if multiple { 1 << 30 } else { 0 };
    let mut raw = vec![0xA5, 0x5A];
    raw.extend_from_slice(&word.to_le_bytes());
    raw.push(data_type);
    raw
}

/// Complete health answer: descriptor followed by the body.
pub fn health_answer(status: u8, error_code: u16) -> Vec<u8> {
    let mut raw = descriptor(3, false, 0x06);
    raw.push(status);
    raw.extend_from_slice(&error_code.to_be_bytes());
    raw
}

/// Encodes one measurement record with angle and distance given in raw wire units.
pub fn record(new_scan: bool, quality: u8, angle_q6: u16, distance_q2: u16) -> [u8; 5] {
    let flags = if new_scan { 0b01 } else { 0b10 };
    [
        (quality << 2) | flags,
        ((angle_q6 << 1) as u8) | 1,
        (angle_q6 >> 7) as u8,
        distance_q2 as u8,
        (distance_q2 >> 8) as u8,
    ]
}
