use crate::bus::I2cBus;
use crate::{LcdError, LcdResult};
use log::{debug, trace, warn};
use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A bus that writes the byte stream to a text file instead of the hardware.
///
/// Each byte is written as `0x%02x ` and each [label](I2cBus::label) on its own `#label` line, so
/// the dump can be compared against a logic analyzer capture. No delays are inserted.
pub struct DumpBus {
    out: BufWriter<File>,
    path: PathBuf,
}

impl DumpBus {
    /// Creates (or truncates) the dump file at `path`.
    pub fn create(path: impl AsRef<Path>) -> LcdResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|err| LcdError::DeviceOpen {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        debug!("Dumping bus traffic to {}.", path.display());
        Ok(DumpBus {
            out: BufWriter::new(file),
            path,
        })
    }
}

impl Debug for DumpBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DumpBus({})", self.path.display())
    }
}

impl I2cBus for DumpBus {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        trace!("Dumping byte: {:08b}", byte);
        write!(self.out, "0x{:02x} ", byte).map_err(|err| LcdError::BusWrite(err.to_string()))
    }

    fn settle(&mut self) {}

    fn label(&mut self, label: &str) -> LcdResult<()> {
        write!(self.out, "\n#{}\n", label).map_err(|err| LcdError::BusWrite(err.to_string()))
    }

    fn finish(&mut self) -> LcdResult<()> {
        self.out
            .flush()
            .map_err(|err| LcdError::BusWrite(err.to_string()))
    }
}

impl Drop for DumpBus {
    fn drop(&mut self) {
        // Only reached with data still buffered if finish() was skipped.
        if let Err(err) = self.finish() {
            warn!("Failed to flush {:?}: {}", self, err);
        }
    }
}
