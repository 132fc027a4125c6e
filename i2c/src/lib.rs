//! Write-only driver for HD44780 character LCDs behind a PCF8574 I2C backpack.
//!
//! The [bus] module owns the Linux I2C character device, the [lcd] module encodes display
//! commands into the byte stream the backpack expects.

pub mod bus;
pub mod lcd;

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("failed to open the i2c bus {path}: {reason}")]
    DeviceOpen { path: String, reason: String },
    #[error("failed to acquire bus access and/or talk to slave {address:#04x}: {reason}")]
    SlaveBind { address: u16, reason: String },
    #[error("failed to write to the i2c bus: {0}")]
    BusWrite(String),
    #[error("unsupported display configuration: {0}")]
    Configuration(String),
    #[error("row {row} is out of range 1..={rows}")]
    InvalidRow { row: usize, rows: u8 },
    #[error("column {column} is out of range 1..={columns}")]
    InvalidColumn { column: usize, columns: u8 },
    #[error("invalid argument")]
    InvalidArgument,
}

pub type LcdResult<T> = Result<T, LcdError>;
