use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;
use thiserror::Error;

/// Major device number of the Linux `i2c-dev` character devices.
pub const I2C_MAJOR: u32 = 89;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum DeviceCheckError {
    #[error("wrong device path {path}: {reason}")]
    Unreachable { path: String, reason: String },
    #[error("wrong device path {path}: not a character device")]
    NotCharDevice { path: String },
    #[error("wrong device path {path}: major number {major} is not an i2c bus")]
    NotI2c { path: String, major: u32 },
}

/// Checks that `path` is an `i2c-dev` character device before it's opened.
pub fn check_i2c_device(path: &Path) -> Result<(), DeviceCheckError> {
    let display_path = path.display().to_string();
    let metadata = std::fs::metadata(path).map_err(|err| DeviceCheckError::Unreachable {
        path: display_path.clone(),
        reason: err.to_string(),
    })?;

    if !metadata.file_type().is_char_device() {
        return Err(DeviceCheckError::NotCharDevice { path: display_path });
    }

    let major = libc::major(metadata.rdev());
    if major != I2C_MAJOR {
        return Err(DeviceCheckError::NotI2c {
            path: display_path,
            major,
        });
    }

    Ok(())
}
