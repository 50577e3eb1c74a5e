//! `ByteChannel` support for ports opened with the `serialport` crate.

use crate::base::traits::ByteChannel;
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, Read, Write};

impl ByteChannel for dyn SerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data)?;
        self.flush()
    }

    fn read_bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0; n];
        let mut filled = 0;
        while filled < n {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(count) => filled += count,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.bytes_to_read()? as usize)
    }

    fn clear_input(&mut self) -> io::Result<usize> {
        let pending = self.bytes_to_read()? as usize;
        self.clear(ClearBuffer::Input)?;
        Ok(pending)
    }
}
