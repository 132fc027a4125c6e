//! HD44780 character LCD module.
//!
//! See [driver::HD44780Driver] for the instruction set, and [driver::I2cHD44780Driver] for the
//! implementation talking to the controller through a PCF8574 I2C backpack in 4-bit mode.
//! [RowAddressTable] and [LineBuffer] describe the display geometry and the text of a single row.

pub mod driver;
mod layout;

pub use layout::*;
