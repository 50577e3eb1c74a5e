use std::io;

/// A byte-oriented link to the RPLIDAR, usually a UART.
///
/// Implementations only move bytes; framing, timeouts and validation are done by
/// [`Channel`](crate::base::Channel) on top of this trait.
pub trait ByteChannel {
    /// Writes all of `data` to the device.
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()>;

    /// Reads up to `n` bytes that are already buffered.
    ///
    /// May return fewer than `n` bytes if the link delivers less; the caller
    /// treats a short read as a protocol violation.
    fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>>;

    /// Returns the number of received bytes waiting to be read.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Discards every buffered input byte and returns how many were dropped.
    fn clear_input(&mut self) -> io::Result<usize>;
}

/// Power switch for the scanner's spin motor (the MOTOCTL line).
pub trait MotorControl {
    /// Drives the motor enable signal high (`true`) or low (`false`).
    fn set_power(&mut self, on: bool) -> io::Result<()>;
}

/// Motor control for sensors whose motor is hard-wired on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMotorControl;

impl MotorControl for NoMotorControl {
    fn set_power(&mut self, _on: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: ByteChannel + ?Sized> ByteChannel for Box<T> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_bytes(data)
    }

    fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        (**self).read_bytes(n)
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        (**self).bytes_available()
    }

    fn clear_input(&mut self) -> io::Result<usize> {
        (**self).clear_input()
    }
}

impl<T: MotorControl + ?Sized> MotorControl for Box<T> {
    fn set_power(&mut self, on: bool) -> io::Result<()> {
        (**self).set_power(on)
    }
}
