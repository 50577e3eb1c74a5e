mod channel;
mod command;
mod error;
#[cfg(feature = "serialport")]
mod serial;
mod traits;

pub use self::channel::*;
pub use self::command::Command;
pub use self::error::{Error, Result};
pub use self::traits::{ByteChannel, MotorControl, NoMotorControl};
