//! Hardware adapter: builds the concrete sensor and display ports.
//!
//! Each builder returns a factory that the supervisor runs on the owning
//! task's thread.  This is the only module that names the Linux HAL
//! types; on other targets the bus-backed builders report
//! [`Error::Unsupported`] when the task starts.

use crate::app::ports::SensorPort;
#[cfg(target_os = "linux")]
use crate::app::ports::DisplayPort;
use crate::app::supervisor::{DisplayFactory, SensorFactory};
use crate::config::{SystemConfig, WeightSourceKind};
#[cfg(not(target_os = "linux"))]
use crate::error::Error;
use crate::sensors::reader::{SensorReader, SensorSource, SysfsSensor};

#[cfg(target_os = "linux")]
use crate::drivers::lcd::Lcd;
#[cfg(target_os = "linux")]
use crate::error::{BusError, GpioError};
#[cfg(target_os = "linux")]
use crate::sensors::hx711::Hx711;
#[cfg(target_os = "linux")]
use linux_embedded_hal::{Delay, I2cdev, SysfsPin};

fn reader(config: &SystemConfig) -> SensorReader {
    SensorReader::new(&config.gpio_root, &config.temperature_dir)
}

/// The probe's `temp1_input` under the configured hwmon directory.
pub fn temperature_factory(config: &SystemConfig) -> SensorFactory {
    let reader = reader(config);
    Box::new(move || -> crate::Result<Box<dyn SensorPort>> {
        Ok(Box::new(SysfsSensor::new(reader, SensorSource::BusTemperature)))
    })
}

/// Weight source chosen by `weight_source`.
///
/// `value_file` reads `gpio<first>/value`; `hx711` clocks the chip with
/// `gpios = [data, clock]`.
pub fn weight_factory(config: &SystemConfig, gpios: [u32; 2]) -> SensorFactory {
    match config.weight_source {
        WeightSourceKind::ValueFile => {
            let reader = reader(config);
            Box::new(move || -> crate::Result<Box<dyn SensorPort>> {
                Ok(Box::new(SysfsSensor::new(reader, SensorSource::Gpio(gpios[0]))))
            })
        }
        WeightSourceKind::Hx711 => Box::new(move || open_hx711(gpios[0], gpios[1])),
    }
}

/// LCD on the configured I²C bus.  Opening the bus fails the task.
pub fn display_factory(config: &SystemConfig) -> DisplayFactory {
    let bus_path = config.i2c_bus.clone();
    let address = config.display_address;
    Box::new(move || open_display(&bus_path, address))
}

// ── Linux ─────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
fn open_display(bus_path: &std::path::Path, address: u8) -> crate::Result<Box<dyn DisplayPort>> {
    let bus = I2cdev::new(bus_path).map_err(|e| BusError::OpenFailed {
        path: bus_path.display().to_string(),
        reason: e.to_string(),
    })?;
    log::info!("I2C bus {} open", bus_path.display());

    let mut lcd = Lcd::new(address, Delay);
    lcd.open(bus);
    Ok(Box::new(lcd))
}

/// The pins must already be exported (see `adapters::sysfs_gpio`); the
/// HAL addresses them under `/sys/class/gpio`.
#[cfg(target_os = "linux")]
fn open_hx711(data: u32, clock: u32) -> crate::Result<Box<dyn SensorPort>> {
    use embedded_hal::digital::PinState;

    let dout = SysfsPin::new(u64::from(data))
        .into_input_pin()
        .map_err(|e| GpioError::DirectionFailed {
            gpio: data,
            reason: format!("{e:?}"),
        })?;
    let sck = SysfsPin::new(u64::from(clock))
        .into_output_pin(PinState::Low)
        .map_err(|e| GpioError::DirectionFailed {
            gpio: clock,
            reason: format!("{e:?}"),
        })?;
    log::info!("HX711 on gpio{} (data) / gpio{} (clock)", data, clock);
    Ok(Box::new(Hx711::new(dout, sck, Delay)))
}

// ── Other targets ─────────────────────────────────────────────

#[cfg(not(target_os = "linux"))]
fn open_display(_bus_path: &std::path::Path, _address: u8) -> crate::Result<Box<dyn crate::app::ports::DisplayPort>> {
    Err(Error::Unsupported("I2C display"))
}

#[cfg(not(target_os = "linux"))]
fn open_hx711(_data: u32, _clock: u32) -> crate::Result<Box<dyn SensorPort>> {
    Err(Error::Unsupported("HX711 load cell"))
}
