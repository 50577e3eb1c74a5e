/// Response type identifier for device information.
pub const RPLIDAR_ANS_TYPE_DEVINFO: u8 = 0x4;

/// Body length of the device information answer.
/// Layout: model(1), firmware minor(1), firmware major(1), hardware(1), serial number(16).
pub const RPLIDAR_DEVINFO_LEN: usize = 20;

/// Length of the serial number inside the device information answer.
pub const RPLIDAR_SERIALNUM_LEN: usize = 16;

/// Response type identifier for device health status.
pub const RPLIDAR_ANS_TYPE_DEVHEALTH: u8 = 0x6;

/// Body length of the health answer: status(1), error code(2, big-endian).
pub const RPLIDAR_DEVHEALTH_LEN: usize = 3;

// health status

/// Health status code indicating the LIDAR is operating correctly.
pub const RPLIDAR_HEALTH_STATUS_OK: u8 = 0;

/// Health status code indicating a non-critical warning. The LIDAR might still function.
pub const RPLIDAR_HEALTH_STATUS_WARNING: u8 = 1;

/// Health status code indicating a critical error (protection stop).
pub const RPLIDAR_HEALTH_STATUS_ERROR: u8 = 2;

// Measurement answers

/// Response type identifier for legacy measurement data (single point per response).
pub const RPLIDAR_ANS_TYPE_MEASUREMENT: u8 = 0x81;

/// Size of one legacy measurement record.
pub const RPLIDAR_MEASUREMENT_LEN: usize = 5;

/// Mask for the new-scan (sync) bit in the first byte of a measurement record.
pub const RPLIDAR_RESP_MEASUREMENT_SYNCBIT: u8 = 1;
/// Mask for the inverted sync bit in the first byte of a measurement record.
pub const RPLIDAR_RESP_MEASUREMENT_SYNCBIT_INV: u8 = 1 << 1;
/// Bit shift for extracting the quality value from the first byte of a measurement record.
pub const RPLIDAR_RESP_MEASUREMENT_QUALITY_SHIFT: u8 = 2;
/// Mask for the check bit in the second byte of a measurement record. Always set on the wire.
pub const RPLIDAR_RESP_MEASUREMENT_CHECKBIT: u8 = 1;
/// Bit shift for extracting the angle value from the angle/check-bit word.
pub const RPLIDAR_RESP_MEASUREMENT_ANGLE_SHIFT: u16 = 1;
