use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const EXAMPLE: &str = "Example:
  sudo simple_lcd -R4 -c16 -r1 -t'hello world!'

writes 'hello world!' on the first row of a 4x16 display.";

/// Writes a line of text on an HD44780 LCD connected over I2C.
#[derive(Parser, Debug)]
#[command(name = "simple_lcd", version, after_help = EXAMPLE)]
pub struct Cli {
    /// Number of display rows: 1, 2 or 4 [default: 4]
    #[arg(short = 'R', long, env = "SIMPLE_LCD_ROWS")]
    pub rows: Option<u8>,

    /// Number of display columns, 16 to 80 [default: 16]
    #[arg(short = 'c', long, env = "SIMPLE_LCD_COLUMNS")]
    pub columns: Option<u8>,

    /// I2C bus device [default: /dev/i2c-1]
    #[arg(short = 'd', long, env = "SIMPLE_LCD_DEVICE")]
    pub device: Option<PathBuf>,

    /// Slave address, in hex [default: 27]
    #[arg(short = 'a', long, env = "SIMPLE_LCD_ADDRESS", value_parser = parse_address)]
    pub address: Option<u16>,

    /// Text to write
    #[arg(short = 't', long)]
    pub text: String,

    /// Row to write to, starting from 1
    #[arg(
        short = 'r',
        long,
        required_unless_present_any = ["split", "page"],
        conflicts_with_all = ["split", "page"]
    )]
    pub row: Option<usize>,

    /// Send the initialization sequence first
    #[arg(short = 'i', long)]
    pub init: bool,

    /// Leave the cells after the text untouched instead of blanking them
    #[arg(short = 'n', long)]
    pub no_clean: bool,

    /// Spread the text over all rows
    #[arg(short = 's', long, conflicts_with = "page")]
    pub split: bool,

    /// Show the text one screen at a time, then clear the display
    #[arg(short = 'p', long)]
    pub page: bool,

    /// Seconds each page stays on the display
    #[arg(short = 'w', long, default_value = "2", value_parser = parse_seconds)]
    pub wait: Duration,

    /// Clear the display before writing
    #[arg(short = 'C', long)]
    pub clear: bool,

    /// Switch the backlight on or off
    #[arg(short = 'b', long, value_parser = parse_switch)]
    pub backlight: Option<bool>,

    /// Write the bus traffic to this file instead of the display
    #[arg(short = 'D', long)]
    pub dump: Option<PathBuf>,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let address = u16::from_str_radix(digits, 16).map_err(|err| format!("{s:?}: {err}"))?;
    if address > simple_lcd_i2c::bus::MAX_SLAVE_ADDRESS {
        return Err(format!("{s:?} is not a 7-bit address"));
    }
    Ok(address)
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s.parse().map_err(|err| format!("{s:?}: {err}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|err| format!("{s:?}: {err}"))
}

fn parse_switch(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(format!("{s:?} is neither on nor off")),
    }
}

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum UsageError {
    #[error("rows can be 1, 2 or 4, not {0}")]
    Rows(u8),
    #[error("columns must be between 16 and 80, not {0}")]
    Columns(u8),
    #[error("row number must be between 1 and {rows}, not {row}")]
    Row { row: usize, rows: u8 },
    #[error("{0:#04x} is not a 7-bit address")]
    Address(u16),
}

/// What gets written once the display is set up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Line { row: usize },
    Split,
    Pages { wait: Duration },
}

/// Flags merged with the environment and the config file, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub device: PathBuf,
    pub address: u16,
    pub rows: u8,
    pub columns: u8,
    pub action: Action,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self, UsageError> {
        let rows = cli.rows.unwrap_or(config.rows);
        if !matches!(rows, 1 | 2 | 4) {
            return Err(UsageError::Rows(rows));
        }

        let columns = cli.columns.unwrap_or(config.columns);
        if !(16..=80).contains(&columns) {
            return Err(UsageError::Columns(columns));
        }

        let address = cli.address.unwrap_or(config.address);
        if address > simple_lcd_i2c::bus::MAX_SLAVE_ADDRESS {
            return Err(UsageError::Address(address));
        }

        let action = match cli.row {
            Some(row) if row == 0 || row > usize::from(rows) => {
                return Err(UsageError::Row { row, rows });
            }
            Some(row) => Action::Line { row },
            None if cli.page => Action::Pages { wait: cli.wait },
            None => Action::Split,
        };

        Ok(Settings {
            device: cli
                .device
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.device)),
            address,
            rows,
            columns,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("simple_lcd").chain(args.iter().copied()))
    }

    fn resolve(args: &[&str]) -> Result<Settings, UsageError> {
        Settings::resolve(&parse(args).unwrap(), &Config::default())
    }

    #[test]
    fn defaults() {
        let settings = resolve(&["-t", "hello", "-r", "1"]).unwrap();

        assert_eq!(
            settings,
            Settings {
                device: PathBuf::from("/dev/i2c-1"),
                address: 0x27,
                rows: 4,
                columns: 16,
                action: Action::Line { row: 1 },
            }
        );
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["-R2", "-c20", "-d/dev/i2c-0", "-a3f", "-thi", "-r2", "-i", "-n"]).unwrap();

        assert_eq!(cli.rows, Some(2));
        assert_eq!(cli.columns, Some(20));
        assert_eq!(cli.device, Some(PathBuf::from("/dev/i2c-0")));
        assert_eq!(cli.address, Some(0x3f));
        assert_eq!(cli.text, "hi");
        assert_eq!(cli.row, Some(2));
        assert!(cli.init);
        assert!(cli.no_clean);
    }

    #[test]
    fn address_accepts_hex_prefix() {
        assert_eq!(parse_address("0x27"), Ok(0x27));
        assert_eq!(parse_address("27"), Ok(0x27));
        assert_eq!(parse_address("0X3F"), Ok(0x3f));
        assert!(parse_address("80").is_err());
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn missing_text_or_row() {
        assert!(parse(&["-r", "1"]).is_err());
        assert!(parse(&["-t", "hello"]).is_err());
    }

    #[test]
    fn split_and_page_replace_row() {
        assert_eq!(resolve(&["-t", "hello", "-s"]).unwrap().action, Action::Split);
        assert_eq!(
            resolve(&["-t", "hello", "-p", "-w", "0.5"]).unwrap().action,
            Action::Pages {
                wait: Duration::from_millis(500)
            }
        );
        assert!(parse(&["-t", "hello", "-s", "-r", "1"]).is_err());
        assert!(parse(&["-t", "hello", "-s", "-p"]).is_err());
    }

    #[test]
    fn out_of_range_geometry() {
        assert_eq!(resolve(&["-t", "x", "-r", "1", "-R", "3"]), Err(UsageError::Rows(3)));
        assert_eq!(resolve(&["-t", "x", "-r", "1", "-c", "15"]), Err(UsageError::Columns(15)));
        assert_eq!(resolve(&["-t", "x", "-r", "1", "-c", "81"]), Err(UsageError::Columns(81)));
        assert!(resolve(&["-t", "x", "-r", "1", "-c", "80"]).is_ok());
    }

    #[test]
    fn row_must_be_on_the_display() {
        assert_eq!(
            resolve(&["-t", "x", "-r", "3", "-R", "2"]),
            Err(UsageError::Row { row: 3, rows: 2 })
        );
        assert_eq!(
            resolve(&["-t", "x", "-r", "0"]),
            Err(UsageError::Row { row: 0, rows: 4 })
        );
    }

    #[test]
    fn flags_override_config() {
        let config = Config {
            device: "/dev/i2c-0".to_string(),
            address: 0x3f,
            rows: 2,
            columns: 20,
        };

        let settings = Settings::resolve(&parse(&["-t", "x", "-r", "1", "-R", "4"]).unwrap(), &config).unwrap();

        assert_eq!(settings.device, PathBuf::from("/dev/i2c-0"));
        assert_eq!(settings.address, 0x3f);
        assert_eq!(settings.rows, 4);
        assert_eq!(settings.columns, 20);
    }

    #[test]
    fn backlight_switch() {
        assert_eq!(parse(&["-t", "x", "-r", "1", "-b", "OFF"]).unwrap().backlight, Some(false));
        assert_eq!(parse(&["-t", "x", "-r", "1", "-b", "on"]).unwrap().backlight, Some(true));
        assert!(parse(&["-t", "x", "-r", "1", "-b", "dim"]).is_err());
    }

    #[test]
    fn negative_wait_is_rejected() {
        assert!(parse(&["-t", "x", "-p", "-w", "-1"]).is_err());
    }
}
