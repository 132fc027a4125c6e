use crate::bus::I2cBus;
use crate::lcd::hd44780::driver::HD44780Driver;
use crate::lcd::hd44780::{LineBuffer, RowAddressTable};
use crate::{LcdError, LcdResult};
use log::{debug, trace};
use std::thread::sleep;
use std::time::Duration;

// PCF8574 output bits. P4..P7 carry the data nibble.
/// Register select, high for the data register.
pub const RS: u8 = 0b00000001;
/// Enable latch, the controller samples the nibble on its falling edge.
pub const EN: u8 = 0b00000100;
/// Backlight transistor.
pub const BACKLIGHT: u8 = 0b00001000;

/// Raw backpack bytes of the power-on handshake: three 8-bit function sets, the switch to 4-bit
/// mode, then function set, display on, clear and entry mode, each nibble framed by an enable pulse.
pub const INIT_SEQUENCE: [[u8; 6]; 10] = [
    [0x08, 0x0c, 0x08, 0x38, 0x3c, 0x38],
    [0x08, 0x0c, 0x08, 0x38, 0x3c, 0x38],
    [0x08, 0x0c, 0x08, 0x38, 0x3c, 0x38],
    [0x08, 0x0c, 0x08, 0x28, 0x2c, 0x28],
    [0x28, 0x2c, 0x28, 0x88, 0x8c, 0x88],
    [0x08, 0x0c, 0x08, 0xc8, 0xcc, 0xc8],
    [0x08, 0x0c, 0x08, 0x18, 0x1c, 0x18],
    [0x08, 0x0c, 0x08, 0x68, 0x6c, 0x68],
    [0x08, 0x0c, 0x08, 0x18, 0x1c, 0x18],
    [0x08, 0x0c, 0x08, 0x28, 0x2c, 0x28],
];

/// The controller register a byte is written to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Register {
    Instruction,
    Data,
}

impl Register {
    fn bits(self) -> u8 {
        match self {
            Register::Instruction => 0,
            Register::Data => RS,
        }
    }
}

/// Encodes one byte into the six backpack writes that clock it into the controller.
///
/// The high nibble goes first, then the low one, each placed on P4..P7 and written three times:
/// with enable low, enable high, and enable low again.
pub fn encode(byte: u8, register: Register, backlight: bool) -> [u8; 6] {
    let mode = register.bits();
    let light = if backlight { BACKLIGHT } else { 0 };
    let high = mode | (byte & 0xF0);
    let low = mode | ((byte << 4) & 0xF0);

    [
        high | light,
        high | EN | light,
        (high & !EN) | light,
        low | light,
        low | EN | light,
        (low & !EN) | light,
    ]
}

/// HD44780 driver for displays behind a PCF8574 I2C backpack.
///
/// Owns its bus for its whole lifetime; dropping the driver releases the bus.
#[derive(Debug)]
pub struct I2cHD44780Driver<B: I2cBus> {
    bus: B,
    layout: RowAddressTable,
    backlight: bool,
}

impl<B: I2cBus> I2cHD44780Driver<B> {
    /// Wraps an open bus. No bytes are sent until the first command.
    pub fn new(bus: B, layout: RowAddressTable) -> Self {
        debug!(
            "{:?} driving a {}x{} display.",
            bus,
            layout.rows(),
            layout.columns()
        );
        I2cHD44780Driver {
            bus,
            layout,
            backlight: true,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    fn send(&mut self, byte: u8, register: Register) -> LcdResult<()> {
        trace!("Sending byte: {:08b}, register: {:?}", byte, register);
        for value in encode(byte, register, self.backlight) {
            self.bus.write_byte(value)?;
        }
        Ok(())
    }

    /// Switches the backlight on or off. Every later transfer keeps it in that state.
    pub fn set_backlight(&mut self, on: bool) -> LcdResult<()> {
        self.bus.label("Backlight")?;
        self.backlight = on;
        self.bus.write_byte(if on { BACKLIGHT } else { 0 })
    }

    /// Writes `message` to the 1-based `row`, starting at its first cell.
    ///
    /// See [LineBuffer::new] for how the message is fitted to the row and what `clean` does.
    /// A failing transfer aborts the rest of the row, leaving it partially updated.
    ///
    /// # Errors
    /// - `LcdError::InvalidRow` if `row` is not on the display. Nothing is sent in that case.
    /// - `LcdError::BusWrite` if any transfer fails.
    pub fn write_line(&mut self, message: impl AsRef<[u8]>, row: usize, clean: bool) -> LcdResult<()> {
        let address = self.layout.address(row)?;
        let line = LineBuffer::new(message.as_ref(), self.layout.columns(), clean);

        self.bus.label("Position")?;
        self.set_ddram_address(address & 0x7F)?;
        self.bus.settle();

        self.bus.label("Data")?;
        for &byte in line.as_bytes() {
            self.send_data(byte)?;
        }
        Ok(())
    }

    /// Writes a single byte at the 1-based `row` and `column`.
    pub fn write_char_at(&mut self, byte: u8, row: usize, column: usize) -> LcdResult<()> {
        let base = self.layout.address(row)?;
        let columns = self.layout.columns();
        if column == 0 || column > usize::from(columns) {
            return Err(LcdError::InvalidColumn { column, columns });
        }
        // Only the 4-row layout on wide displays can run past the last DDRAM address.
        let address = u8::try_from(column - 1)
            .ok()
            .and_then(|offset| (base & 0x7F).checked_add(offset))
            .ok_or(LcdError::InvalidArgument)?;
        if address > 0x7F {
            return Err(LcdError::InvalidArgument);
        }

        self.bus.label("Position")?;
        self.set_ddram_address(address)?;
        self.bus.label("Data")?;
        self.send_data(byte)
    }

    /// Spreads `text` over all rows, `columns` bytes per row. Rows past the end of the text are
    /// written empty, so with `clean` set they end up blank.
    pub fn write_split(&mut self, text: impl AsRef<[u8]>, clean: bool) -> LcdResult<()> {
        let text = text.as_ref();
        let columns = usize::from(self.layout.columns());

        for row in 1..=usize::from(self.layout.rows()) {
            let start = ((row - 1) * columns).min(text.len());
            let end = (row * columns).min(text.len());
            self.write_line(&text[start..end], row, clean)?;
        }
        Ok(())
    }

    /// Shows `text` one screen at a time, keeping each page up for `wait`, then clears the display.
    pub fn write_pages(&mut self, text: impl AsRef<[u8]>, wait: Duration) -> LcdResult<()> {
        let page_size = usize::from(self.layout.rows()) * usize::from(self.layout.columns());

        for (index, page) in text.as_ref().chunks(page_size).enumerate() {
            debug!("Showing page {}.", index + 1);
            self.write_split(page, true)?;
            sleep(wait);
        }

        self.bus.label("Clear")?;
        self.clear()
    }
}

impl<B: I2cBus> HD44780Driver for I2cHD44780Driver<B> {
    /// Replays [INIT_SEQUENCE] byte by byte. A failed write aborts the sequence and leaves the
    /// controller in an undefined state.
    fn init(&mut self) -> LcdResult<()> {
        debug!("Initializing {:?}.", self.bus);
        self.bus.label("Init")?;
        for step in INIT_SEQUENCE {
            for byte in step {
                self.bus.write_byte(byte)?;
            }
        }
        Ok(())
    }

    fn send_command(&mut self, command: u8) -> LcdResult<()> {
        self.send(command, Register::Instruction)
    }

    fn send_data(&mut self, data: u8) -> LcdResult<()> {
        self.send(data, Register::Data)
    }
}
