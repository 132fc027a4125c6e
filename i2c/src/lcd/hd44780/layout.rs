use crate::{LcdError, LcdResult};

/// Widest row a [LineBuffer] can hold.
pub const MAX_COLUMNS: usize = 64;

/// "Set DDRAM address" commands for the start of the first and second controller line.
const LINE_1: u8 = 0x80;
const LINE_2: u8 = 0xC0;

/// Maps 1-based row numbers to the "set DDRAM address" command that moves the cursor to the start
/// of the row.
///
/// Four-row displays are two controller lines folded in half, so rows 3 and 4 continue rows 1 and 2
/// after `columns` cells.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RowAddressTable {
    addresses: [u8; 4],
    rows: u8,
    columns: u8,
}

impl RowAddressTable {
    /// # Errors
    /// - `LcdError::Configuration` for any row count other than 1, 2 or 4, for 0 or more than
    ///   [MAX_COLUMNS] columns, and for 4-row layouts whose addresses would not fit in a byte.
    pub fn new(rows: u8, columns: u8) -> LcdResult<Self> {
        if columns == 0 || usize::from(columns) > MAX_COLUMNS {
            return Err(LcdError::Configuration(format!(
                "{columns} columns, 1 to {MAX_COLUMNS} are supported"
            )));
        }

        let addresses = match rows {
            1 => [LINE_1, 0, 0, 0],
            2 => [LINE_1, LINE_2, 0, 0],
            4 => {
                let overflow = || {
                    LcdError::Configuration(format!("{columns} columns are too wide for 4 rows"))
                };
                [
                    LINE_1,
                    LINE_2,
                    LINE_1.checked_add(columns).ok_or_else(overflow)?,
                    LINE_2.checked_add(columns).ok_or_else(overflow)?,
                ]
            }
            _ => {
                return Err(LcdError::Configuration(format!(
                    "{rows} rows, only 1, 2 or 4 are supported"
                )));
            }
        };

        Ok(RowAddressTable {
            addresses,
            rows,
            columns,
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// The address commands of all rows, top to bottom.
    pub fn as_slice(&self) -> &[u8] {
        &self.addresses[..usize::from(self.rows)]
    }

    /// Gets the address command of the 1-based `row`.
    ///
    /// # Errors
    /// - `LcdError::InvalidRow` if `row` is not in `1..=rows`.
    pub fn address(&self, row: usize) -> LcdResult<u8> {
        if row == 0 || row > usize::from(self.rows) {
            return Err(LcdError::InvalidRow {
                row,
                rows: self.rows,
            });
        }
        Ok(self.addresses[row - 1])
    }
}

/// The bytes sent to the display for one row.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LineBuffer {
    bytes: [u8; MAX_COLUMNS],
    len: usize,
}

impl LineBuffer {
    /// Fits `message` into a row of `columns` cells.
    ///
    /// Messages at least `columns` long are cut to exactly `columns` bytes. Shorter ones are padded
    /// with spaces to the full width when `clean` is set, so that leftovers of a previous, longer
    /// text get blanked. Otherwise only the message itself is kept.
    pub fn new(message: &[u8], columns: u8, clean: bool) -> Self {
        let columns = usize::from(columns).min(MAX_COLUMNS);
        let mut bytes = [b' '; MAX_COLUMNS];

        let len = if message.len() >= columns {
            bytes[..columns].copy_from_slice(&message[..columns]);
            columns
        } else {
            bytes[..message.len()].copy_from_slice(message);
            if clean { columns } else { message.len() }
        };

        LineBuffer { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
