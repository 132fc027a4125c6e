mod i2c;

use crate::{LcdError, LcdResult};
pub use i2c::*;
use std::fmt::Debug;

/// Instruction set of the HD44780 controller.
///
/// The interface is write-only: the busy flag is never polled, so implementations have to wait
/// long enough after every transfer for the controller to finish.
pub trait HD44780Driver: Debug {
    /// Resets the controller to its power-on state in 4-bit mode.
    fn init(&mut self) -> LcdResult<()>;

    /// Clears the display and sets the cursor to the home position.
    fn clear_display(&mut self) -> LcdResult<()> {
        self.send_command(0b00000001)
    }

    /// Sets the cursor to the home position.
    fn return_home(&mut self) -> LcdResult<()> {
        self.send_command(0b00000010)
    }

    /// Clears the display, then returns the cursor home.
    fn clear(&mut self) -> LcdResult<()> {
        self.clear_display()?;
        self.return_home()
    }

    /// Moves the cursor to a DDRAM address.
    ///
    /// # Errors
    /// - `LcdError::InvalidArgument` if `address` does not fit in 7 bits. Nothing is sent.
    fn set_ddram_address(&mut self, address: u8) -> LcdResult<()> {
        if address > 0b01111111 {
            return Err(LcdError::InvalidArgument);
        }
        self.send_command(0b10000000 | address)
    }

    // Low-level commands, used by everything above.

    /// Sends a byte to the instruction register (RS low).
    fn send_command(&mut self, command: u8) -> LcdResult<()>;

    /// Sends a byte to the data register (RS high).
    fn send_data(&mut self, data: u8) -> LcdResult<()>;
}
