use crate::base::command::Command;
use crate::base::error::{Error, Result};
use crate::base::traits::ByteChannel;
use crate::protocol::{self, Descriptor, RPLIDAR_DESCRIPTOR_LEN};
use log::{error, trace};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between two polls of the channel's buffered byte count.
const CHANNEL_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Channel encodes commands and reads fixed-size answers from a byte stream.
///
/// Every read the driver performs goes through [`Channel::await_bytes`], which
/// waits until the stream has buffered the requested number of bytes.
///
/// # Examples
/// ```ignore
/// let mut channel = Channel::new(serial_port);
///
/// channel.write(&Command::new(0x52)).unwrap();
/// let descriptor = channel.read_descriptor(Duration::from_secs(1)).unwrap();
/// ```
#[derive(Debug)]
pub struct Channel<T> {
    stream: T,
}

impl<T> Channel<T>
where
    T: ByteChannel,
{
    /// Create a new `Channel` on top of a byte stream
    pub fn new(stream: T) -> Channel<T> {
        trace!("Creating new Channel");
        Channel { stream }
    }

    /// Consumes the channel and returns the underlying stream.
    pub fn into_inner(self) -> T {
        self.stream
    }

    /// Write command to channel
    ///
    /// Returns the number of bytes written.
    ///
    /// # Example
    /// ```ignore
    /// channel.write(&Command::new(0x25)).unwrap();
    /// ```
    pub fn write(&mut self, cmd: &Command) -> Result<usize> {
        let frame = protocol::encode(cmd)?;
        trace!("Writing frame {:02X?}", frame);
        self.stream.write_bytes(&frame).map_err(|e| {
            error!("IO error writing command {:02X}: {}", cmd.cmd, e);
            Error::from(e)
        })?;
        Ok(frame.len())
    }

    /// Number of bytes currently buffered by the stream.
    pub fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.stream.bytes_available()?)
    }

    /// Waits until at least `n` bytes are buffered, then reads exactly `n` bytes.
    ///
    /// The stream is polled every millisecond. If `n` bytes are not available before
    /// `timeout` elapses, `Error::OperationTimeout` is returned and nothing is read.
    /// A timeout too large to be represented as a deadline waits indefinitely.
    /// A read that returns fewer than `n` bytes is reported as a protocol error.
    ///
    /// # Arguments
    ///
    /// * `n` - The number of bytes to read.
    /// * `timeout` - The maximum duration to wait for the bytes to arrive.
    pub fn await_bytes(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        trace!("Waiting for {} bytes with timeout {:?}", n, timeout);
        let deadline = Instant::now().checked_add(timeout);

        loop {
            let available = self.stream.bytes_available()?;
            if available >= n {
                break;
            }
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                trace!("Timed out with {} of {} bytes buffered", available, n);
                return Err(Error::OperationTimeout);
            }
            thread::sleep(CHANNEL_POLL_INTERVAL);
        }

        let data = self.stream.read_bytes(n)?;
        trace!("Received data: {:02X?}", data);
        if data.len() != n {
            error!("Short read: requested {} bytes, got {}", n, data.len());
            return Err(Error::protocol(format!(
                "wrong body size: expected {}, got {}",
                n,
                data.len()
            )));
        }
        Ok(data)
    }

    /// Reads and decodes the 7-byte answer descriptor.
    pub fn read_descriptor(&mut self, timeout: Duration) -> Result<Descriptor> {
        let raw = self.await_bytes(RPLIDAR_DESCRIPTOR_LEN, timeout)?;
        protocol::decode_descriptor(&raw)
    }

    /// Reads `n` buffered bytes in a single call and throws them away.
    pub fn discard(&mut self, n: usize) -> Result<usize> {
        let dropped = self.stream.read_bytes(n)?;
        trace!("Discarded {} of {} requested bytes", dropped.len(), n);
        Ok(dropped.len())
    }

    /// Discards everything currently buffered by the stream.
    pub fn clear_input(&mut self) -> Result<usize> {
        let dropped = self.stream.clear_input()?;
        trace!("Cleared {} bytes of input", dropped);
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChannel;

    const SHORT: Duration = Duration::from_millis(20);

    #[test]
    fn await_bytes_reads_exactly_n() {
        let fake = FakeChannel::new();
        fake.push_input(&[1, 2, 3, 4, 5, 6]);
        let mut channel = Channel::new(fake.clone());

        assert_eq!(channel.await_bytes(4, SHORT).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(fake.buffered(), 2);
        assert_eq!(fake.read_calls(), 1);
    }

    #[test]
    fn await_bytes_times_out_without_reading() {
        let fake = FakeChannel::new();
        fake.push_input(&[1, 2]);
        let mut channel = Channel::new(fake.clone());

        let started = Instant::now();
        assert!(matches!(
            channel.await_bytes(3, SHORT),
            Err(Error::OperationTimeout)
        ));
        assert!(started.elapsed() >= SHORT);
        assert_eq!(fake.read_calls(), 0);
        assert_eq!(fake.buffered(), 2);
    }

    #[test]
    fn await_bytes_accepts_unbounded_timeout() {
        let fake = FakeChannel::new();
        fake.push_input(&[7, 8, 9]);
        let mut channel = Channel::new(fake.clone());

        assert_eq!(channel.await_bytes(3, Duration::MAX).unwrap(), vec![7, 8, 9]);
        assert_eq!(fake.buffered(), 0);
    }

    #[test]
    fn await_bytes_rejects_truncated_read() {
        let fake = FakeChannel::new();
        fake.push_input(&[1, 2, 3, 4, 5]);
        fake.truncate_reads_to(Some(2));
        let mut channel = Channel::new(fake);

        assert!(matches!(
            channel.await_bytes(5, SHORT),
            Err(Error::ProtocolError { .. })
        ));
    }

    #[test]
    fn write_encodes_frame() {
        let fake = FakeChannel::new();
        let mut channel = Channel::new(fake.clone());

        assert_eq!(channel.write(&Command::new(0x25)).unwrap(), 2);
        assert_eq!(fake.written(), vec![vec![0xA5, 0x25]]);
    }

    #[test]
    fn read_descriptor_decodes_header() {
        let fake = FakeChannel::new();
        fake.push_input(&[0xA5, 0x5A, 0x03, 0x00, 0x00, 0x00, 0x06]);
        let mut channel = Channel::new(fake);

        let descriptor = channel.read_descriptor(SHORT).unwrap();
        assert_eq!(descriptor.response_size, 3);
        assert_eq!(descriptor.data_type, 0x06);
    }
}
