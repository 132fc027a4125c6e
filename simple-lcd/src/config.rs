use log::warn;
use serde::{Deserialize, Serialize};
use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;

/// Display defaults read from a JSON file. Command line flags and `SIMPLE_LCD_*` environment
/// variables take precedence over these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub device: String,
    pub address: u16,
    pub rows: u8,
    pub columns: u8,
}

impl Config {
    /// Loads the file named by `SIMPLE_LCD_CONFIG`, or `simple_lcd.json` in the working directory.
    pub fn try_load() -> Option<Self> {
        let config_str = var_os("SIMPLE_LCD_CONFIG");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("simple_lcd.json"));
        Self::load_from(Path::new(config_str))
    }

    pub fn load_from(config_path: &Path) -> Option<Self> {
        if !config_path.exists() {
            return None;
        }
        let file = std::fs::File::open(config_path).ok()?;
        let reader = std::io::BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("Ignoring {}: {}", config_path.display(), err);
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: "/dev/i2c-1".to_string(),
            address: 0x27,
            rows: 4,
            columns: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rows": 2, "columns": 20 }}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(
            config,
            Config {
                rows: 2,
                columns: 20,
                ..Config::default()
            }
        );
    }

    #[test]
    fn full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "device": "/dev/i2c-0", "address": 63, "rows": 1, "columns": 16 }}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.device, "/dev/i2c-0");
        assert_eq!(config.address, 0x3f);
        assert_eq!(config.rows, 1);
    }

    #[test]
    fn broken_or_missing_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "rows = 2").unwrap();
        assert_eq!(Config::load_from(file.path()), None);

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("simple_lcd.json")), None);
    }
}
