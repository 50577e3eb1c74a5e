//! Decoders for the fixed-size answer bodies of the legacy protocol.

pub mod device_info_parser;
pub mod health_parser;
pub mod measurement_parser;

pub use self::device_info_parser::parse_device_info;
pub use self::health_parser::parse_health;
pub use self::measurement_parser::parse_measurement;

use crate::base::{Error, Result};

/// Rejects bodies whose length differs from the declared answer size.
fn check_len(data: &[u8], expected: usize, what: &str) -> Result<()> {
    if data.len() != expected {
        return Err(Error::protocol(format!(
            "invalid data size for {}: expected {}, got {}",
            what,
            expected,
            data.len()
        )));
    }
    Ok(())
}
