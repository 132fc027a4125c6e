//! Drives the display for one invocation.

use crate::cli::{Action, Cli, Settings};
use log::{debug, info};
use simple_lcd_i2c::LcdResult;
use simple_lcd_i2c::bus::I2cBus;
use simple_lcd_i2c::lcd::hd44780::driver::{HD44780Driver, I2cHD44780Driver};

/// Runs the requested operations in order: init, backlight, clear, then the write itself.
/// The first failure stops everything after it.
pub fn run<B: I2cBus>(lcd: &mut I2cHD44780Driver<B>, cli: &Cli, settings: &Settings) -> LcdResult<()> {
    if cli.init {
        debug!("Sending init sequence...");
        lcd.init()?;
    }

    if let Some(on) = cli.backlight {
        debug!("Switching backlight {}.", if on { "on" } else { "off" });
        lcd.set_backlight(on)?;
    }

    if cli.clear {
        debug!("Clearing display...");
        lcd.clear()?;
    }

    let clean = !cli.no_clean;
    match settings.action {
        Action::Line { row } => {
            info!("Writing {:?} to row {}.", cli.text, row);
            lcd.write_line(&cli.text, row, clean)
        }
        Action::Split => {
            info!("Writing {:?} over {} rows.", cli.text, settings.rows);
            lcd.write_split(&cli.text, clean)
        }
        Action::Pages { wait } => {
            info!("Paging {:?}, {:?} per page.", cli.text, wait);
            lcd.write_pages(&cli.text, wait)
        }
    }
}
