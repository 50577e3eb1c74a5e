// Commands without payload and response

/// Command code to stop the measurement process of the LIDAR.
pub const RPLIDAR_CMD_STOP: u8 = 0x25;

/// Command code to reset the LIDAR core. The device behaves as if it had just been powered up.
pub const RPLIDAR_CMD_RESET: u8 = 0x40;

// Commands without payload but have response

/// Command code to start a scan. Answers with a continuous stream of measurement records.
pub const RPLIDAR_CMD_SCAN: u8 = 0x20;

/// Command code to start a forced scan.
/// A forced scan takes measurements even if the motor is not spinning at the correct speed.
pub const RPLIDAR_CMD_FORCE_SCAN: u8 = 0x21;

/// Command code to request device information (model, firmware, hardware, serial number).
pub const RPLIDAR_CMD_GET_DEVICE_INFO: u8 = 0x50;

/// Command code to request the device's health status.
pub const RPLIDAR_CMD_GET_DEVICE_HEALTH: u8 = 0x52;

// Commands with payload

/// Command code to set the motor PWM duty cycle on A2 accessory boards.
/// This driver only switches the motor through its enable pin.
pub const RPLIDAR_CMD_SET_MOTOR_PWM: u8 = 0xF0;
