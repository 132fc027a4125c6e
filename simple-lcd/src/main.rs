mod app;
mod cli;
mod config;
mod device;

use crate::cli::{Cli, Settings};
use crate::config::Config;
use crate::device::check_i2c_device;
use clap::{CommandFactory, Parser};
use dotenv::dotenv;
use log::{debug, info};
use simple_lcd_i2c::bus::{DumpBus, I2cBus, I2cDevBus};
use simple_lcd_i2c::lcd::hd44780::RowAddressTable;
use simple_lcd_i2c::lcd::hd44780::driver::I2cHD44780Driver;
use std::process::exit;

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    // Every usage problem, including -h, ends with status 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            exit(1);
        }
    };

    let config = if let Some(config) = Config::try_load() {
        debug!("Config loaded.");
        config
    } else {
        debug!("Config not found. Using defaults.");
        Config::default()
    };

    let settings = match Settings::resolve(&cli, &config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}\n\n{}", Cli::command().render_usage());
            exit(1);
        }
    };

    info!(
        "LCD {}x{} @ {}, address {:#04x}",
        settings.rows,
        settings.columns,
        settings.device.display(),
        settings.address
    );

    let layout = RowAddressTable::new(settings.rows, settings.columns)?;

    let bus: Box<dyn I2cBus> = match &cli.dump {
        Some(path) => Box::new(DumpBus::create(path)?),
        None => {
            check_i2c_device(&settings.device)?;
            Box::new(I2cDevBus::open(&settings.device, settings.address)?)
        }
    };

    let mut lcd = I2cHD44780Driver::new(bus, layout);
    app::run(&mut lcd, &cli, &settings)?;
    lcd.into_bus().finish()?;

    debug!("Done.");
    Ok(())
}
