use super::check_len;
use crate::answers::*;
use crate::base::Result;
use crate::types::DeviceInfo;

/// Decodes the 20-byte device information body.
///
/// The serial number is rendered in wire order as uppercase hex.
pub fn parse_device_info(data: &[u8]) -> Result<DeviceInfo> {
    check_len(data, RPLIDAR_DEVINFO_LEN, "device info")?;
    Ok(DeviceInfo {
        model: data[0],
        firmware: (data[2], data[1]),
        hardware: data[3],
        serial_number: hex::encode_upper(&data[4..4 + RPLIDAR_SERIALNUM_LEN]),
    })
}
