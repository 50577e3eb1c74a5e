use super::check_len;
use crate::answers::*;
use crate::base::{Error, Result};
use crate::types::Measurement;
use byteorder::{ByteOrder, LittleEndian};

/// Decodes one 5-byte measurement record.
///
/// Byte 0 carries the new-scan bit, its inverse and the quality; bytes 1-2 the check
/// bit and the angle in Q6 degrees; bytes 3-4 the distance in Q2 millimeters.
pub fn parse_measurement(data: &[u8]) -> Result<Measurement> {
    check_len(data, RPLIDAR_MEASUREMENT_LEN, "measurement")?;

    let sync_quality = data[0];
    let new_scan = sync_quality & RPLIDAR_RESP_MEASUREMENT_SYNCBIT != 0;
    let inversed_new_scan = sync_quality & RPLIDAR_RESP_MEASUREMENT_SYNCBIT_INV != 0;
    if new_scan == inversed_new_scan {
        return Err(Error::protocol("new scan flags mismatch"));
    }
    if data[1] & RPLIDAR_RESP_MEASUREMENT_CHECKBIT != RPLIDAR_RESP_MEASUREMENT_CHECKBIT {
        return Err(Error::protocol("check bit not equal to 1"));
    }

    let angle_q6 = LittleEndian::read_u16(&data[1..3]) >> RPLIDAR_RESP_MEASUREMENT_ANGLE_SHIFT;
    let distance_q2 = LittleEndian::read_u16(&data[3..5]);
    Ok(Measurement {
        new_scan,
        quality: sync_quality >> RPLIDAR_RESP_MEASUREMENT_QUALITY_SHIFT,
        angle: angle_q6 as f32 / 64.0,
        distance: distance_q2 as f32 / 4.0,
    })
}
