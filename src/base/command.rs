/// A command sent to the RPLIDAR device: an opcode with an optional payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The command opcode.
    pub cmd: u8,

    /// Payload bytes. Empty for the plain commands of the legacy protocol.
    pub data: Vec<u8>,
}

impl Command {
    /// Creates a new command with an opcode and no payload.
    ///
    /// # Arguments
    ///
    /// * `cmd` - The command opcode.
    pub fn new(cmd: u8) -> Command {
        Command::with_data(cmd, &[])
    }

    /// Creates a new command with an opcode and payload data.
    ///
    /// # Arguments
    ///
    /// * `cmd` - The command opcode.
    /// * `data` - A slice containing the payload data.
    #[inline]
    pub fn with_data(cmd: u8, data: &[u8]) -> Command {
        Command {
            cmd,
            data: data.to_vec(),
        }
    }

    /// Returns `true` if this command carries a payload (and therefore a length and checksum byte on the wire).
    #[inline]
    pub fn has_payload(&self) -> bool {
        !self.data.is_empty()
    }
}
