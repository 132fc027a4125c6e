//! Byte-level transport to the I2C backpack.
//!
//! The HD44780 behind a PCF8574 expander is driven one byte at a time, and the display needs time
//! to process every one of them. Implementations of [I2cBus] are expected to wait [SETTLE_TIME]
//! after each byte that reaches the hardware.

mod dev;
mod dump;
#[cfg(test)]
pub(crate) mod mock;

pub use dev::*;
pub use dump::*;

use crate::LcdResult;
use std::fmt::Debug;
use std::thread::sleep;
use std::time::Duration;

/// Time the display needs to latch a single bus transaction.
pub const SETTLE_TIME: Duration = Duration::from_micros(50_000);

pub trait I2cBus: Debug {
    /// Writes a single byte to the bound slave.
    ///
    /// # Errors
    /// - `LcdError::BusWrite` if the write fails or fewer bytes than requested are accepted.
    fn write_byte(&mut self, byte: u8) -> LcdResult<()>;

    /// Blocks for [SETTLE_TIME].
    fn settle(&mut self) {
        sleep(SETTLE_TIME);
    }

    /// Marks the start of a logical operation in the byte stream.
    /// Only meaningful for buses that record what they send.
    fn label(&mut self, _label: &str) -> LcdResult<()> {
        Ok(())
    }

    /// Pushes out anything still buffered. Call once the last byte is written, so that a late
    /// failure is reported instead of being lost on drop.
    fn finish(&mut self) -> LcdResult<()> {
        Ok(())
    }
}

impl<B: I2cBus + ?Sized> I2cBus for Box<B> {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        (**self).write_byte(byte)
    }

    fn settle(&mut self) {
        (**self).settle()
    }

    fn label(&mut self, label: &str) -> LcdResult<()> {
        (**self).label(label)
    }

    fn finish(&mut self) -> LcdResult<()> {
        (**self).finish()
    }
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        (**self).write_byte(byte)
    }

    fn settle(&mut self) {
        (**self).settle()
    }

    fn label(&mut self, label: &str) -> LcdResult<()> {
        (**self).label(label)
    }

    fn finish(&mut self) -> LcdResult<()> {
        (**self).finish()
    }
}
