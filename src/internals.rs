use std::time::Duration;

/// Default timeout duration for waiting for responses from the RPLIDAR.
pub const RPLIDAR_DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default number of buffered measurements tolerated before the input is drained.
pub const RPLIDAR_DEFAULT_MAX_BUF_MEAS: usize = 500;

/// Default minimum number of measurements a scan needs to be yielded.
pub const RPLIDAR_DEFAULT_MIN_SCAN_LEN: usize = 5;

/// Time the core needs to come back after a reset command.
pub const RPLIDAR_RESET_SETTLE: Duration = Duration::from_secs(1);

/// Pause after the stop command before the input is drained.
pub const RPLIDAR_STOP_SETTLE: Duration = Duration::from_millis(1);
