use super::check_len;
use crate::answers::*;
use crate::base::{Error, Result};
use crate::types::{HealthReport, HealthStatus};
use byteorder::{BigEndian, ByteOrder};

/// Decodes the 3-byte health body: status byte followed by a big-endian error code.
pub fn parse_health(data: &[u8]) -> Result<HealthReport> {
    check_len(data, RPLIDAR_DEVHEALTH_LEN, "device health")?;
    let status = match data[0] {
        RPLIDAR_HEALTH_STATUS_OK => HealthStatus::Good,
        RPLIDAR_HEALTH_STATUS_WARNING => HealthStatus::Warning,
        RPLIDAR_HEALTH_STATUS_ERROR => HealthStatus::Error,
        other => return Err(Error::InvalidHealthStatus(other)),
    };
    Ok(HealthReport {
        status,
        error_code: BigEndian::read_u16(&data[1..3]),
    })
}
