use crate::bus::I2cBus;
use crate::{LcdError, LcdResult};
use log::{debug, trace};
use std::fmt::{Debug, Formatter};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::fd::AsRawFd;
use std::path::Path;

/// `ioctl` request selecting the slave address for subsequent reads and writes.
pub const I2C_SLAVE: libc::c_ulong = 0x0703;

/// Highest 7-bit slave address.
pub const MAX_SLAVE_ADDRESS: u16 = 0x7F;

/// An I2C bus opened through the Linux `i2c-dev` interface, e.g. `/dev/i2c-1`.
///
/// The device file stays open, and bound to one slave, until the bus is dropped.
pub struct I2cDevBus {
    file: File,
    path: String,
    address: u16,
}

impl I2cDevBus {
    /// Opens the I2C character device at `path` and binds it to the slave at `address`.
    ///
    /// # Errors
    /// - `LcdError::SlaveBind` if `address` is not a 7-bit address, or the kernel refuses it.
    /// - `LcdError::DeviceOpen` if the device can't be opened for reading and writing.
    pub fn open(path: impl AsRef<Path>, address: u16) -> LcdResult<Self> {
        let path = path.as_ref();
        let display_path = path.display().to_string();

        if address > MAX_SLAVE_ADDRESS {
            return Err(LcdError::SlaveBind {
                address,
                reason: "not a 7-bit address".to_string(),
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|err| LcdError::DeviceOpen {
                path: display_path.clone(),
                reason: err.to_string(),
            })?;

        // SAFETY: the descriptor belongs to `file`, which outlives the call, and I2C_SLAVE takes
        // the address by value.
        let ret = unsafe { libc::ioctl(file.as_raw_fd(), I2C_SLAVE as _, libc::c_ulong::from(address)) };
        if ret < 0 {
            return Err(LcdError::SlaveBind {
                address,
                reason: std::io::Error::last_os_error().to_string(),
            });
        }

        let bus = Self::from_file(file, display_path, address);
        debug!("{:?} opened.", bus);
        Ok(bus)
    }

    pub(crate) fn from_file(file: File, path: String, address: u16) -> Self {
        I2cDevBus { file, path, address }
    }
}

impl Debug for I2cDevBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "I2cDevBus({}@{:#04x})", self.path, self.address)
    }
}

impl I2cBus for I2cDevBus {
    fn write_byte(&mut self, byte: u8) -> LcdResult<()> {
        trace!("Writing byte: {:08b}", byte);

        match self.file.write(&[byte]) {
            Ok(1) => {}
            Ok(written) => {
                return Err(LcdError::BusWrite(format!(
                    "short write, {written} of 1 bytes accepted"
                )));
            }
            Err(err) => return Err(LcdError::BusWrite(err.to_string())),
        }

        self.settle();
        Ok(())
    }
}

impl Drop for I2cDevBus {
    fn drop(&mut self) {
        debug!("Closing {:?}.", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::SETTLE_TIME;
    use std::time::{Duration, Instant};

    #[test]
    fn missing_device_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i2c-404");

        let err = I2cDevBus::open(&path, 0x27).unwrap_err();

        assert!(matches!(err, LcdError::DeviceOpen { .. }), "{err:?}");
    }

    #[test]
    fn regular_file_rejects_slave_address() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = I2cDevBus::open(file.path(), 0x27).unwrap_err();

        assert!(matches!(err, LcdError::SlaveBind { address: 0x27, .. }), "{err:?}");
    }

    #[test]
    fn ten_bit_address_is_rejected_before_opening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i2c-404");

        let err = I2cDevBus::open(&path, 0x80).unwrap_err();

        assert!(matches!(err, LcdError::SlaveBind { address: 0x80, .. }), "{err:?}");
    }

    #[test]
    fn failed_write_reports_os_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let read_only = File::open(temp.path()).unwrap();
        let mut bus = I2cDevBus::from_file(read_only, "test".to_string(), 0x27);

        let err = bus.write_byte(0x08).unwrap_err();

        assert!(matches!(err, LcdError::BusWrite(_)), "{err:?}");
    }

    #[test]
    fn every_byte_is_followed_by_the_settle_delay() {
        assert_eq!(SETTLE_TIME, Duration::from_millis(50));

        let temp = tempfile::NamedTempFile::new().unwrap();
        let file = OpenOptions::new().write(true).open(temp.path()).unwrap();
        let mut bus = I2cDevBus::from_file(file, "test".to_string(), 0x27);

        let start = Instant::now();
        bus.write_byte(0x08).unwrap();
        assert!(start.elapsed() >= SETTLE_TIME);

        let start = Instant::now();
        bus.write_byte(0x0c).unwrap();
        bus.write_byte(0x08).unwrap();
        assert!(start.elapsed() >= SETTLE_TIME * 2);

        drop(bus);
        assert_eq!(std::fs::read(temp.path()).unwrap(), [0x08, 0x0c, 0x08]);
    }

    #[test]
    fn debug_shows_path_and_address() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let file = File::open(temp.path()).unwrap();
        let bus = I2cDevBus::from_file(file, "/dev/i2c-1".to_string(), 0x27);

        assert_eq!(format!("{bus:?}"), "I2cDevBus(/dev/i2c-1@0x27)");
    }
}
