use std::io;
use thiserror::Error;

/// Represents errors that can occur during RPLIDAR operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The received or encoded bytes violate the protocol. Contains a description of the violation.
    #[error("protocol error: {description}")]
    ProtocolError { description: String },

    /// The channel did not buffer the requested number of bytes before the deadline.
    #[error("operation timeout")]
    OperationTimeout,

    /// The device still reports an error status after a core reset.
    /// The session cannot continue; the caller has to reinitialize the device.
    #[error("rplidar hardware failure, error code: {error_code}")]
    HardwareFailure { error_code: u16 },

    /// The health answer carried a status code outside the known set.
    #[error("invalid health status code: {0}")]
    InvalidHealthStatus(u8),

    /// The buffer provided is too small for message encoding.
    #[error("buffer is too small for message encoding")]
    BufferTooSmall,

    /// An I/O error occurred while talking to the byte channel or the motor pin.
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    pub(crate) fn protocol(description: impl Into<String>) -> Error {
        Error::ProtocolError {
            description: description.into(),
        }
    }
}

/// A specialized `Result` type for RPLIDAR operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::protocol("checksum mismatch").to_string(),
            "protocol error: checksum mismatch"
        );
        assert_eq!(
            Error::HardwareFailure { error_code: 0x8001 }.to_string(),
            "rplidar hardware failure, error code: 32769"
        );
        assert_eq!(Error::InvalidHealthStatus(7).to_string(), "invalid health status code: 7");
    }

    #[test]
    fn io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::IoError(_)));
    }
}
