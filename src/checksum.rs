/// Running 8-bit XOR checksum appended to payload-bearing RPLIDAR commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    current: u8,
}

impl Checksum {
    /// Creates a new `Checksum` instance, initialized to 0.
    #[inline]
    pub fn new() -> Checksum {
        Checksum { current: 0 }
    }

    /// XORs every byte of `data` into the running value.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) {
        self.current = data.iter().fold(self.current, |acc, d| acc ^ d);
    }

    /// Returns the calculated checksum value.
    #[inline]
    pub fn checksum(&self) -> u8 {
        self.current
    }

    /// Checksum of a whole slice.
    #[inline]
    pub fn of(data: &[u8]) -> u8 {
        let mut checksum = Checksum::new();
        checksum.push_slice(data);
        checksum.checksum()
    }
}
