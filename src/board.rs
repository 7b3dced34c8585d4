//! Board defaults for the BeagleBone-class target.
//!
//! Single source of truth for the paths and bus address the stock
//! hardware uses.  Every one of them can be overridden from the config file.

// ---------------------------------------------------------------------------
// sysfs sensor sources
// ---------------------------------------------------------------------------

/// sysfs GPIO class directory (`gpio<N>/value`, `export`).
pub const GPIO_ROOT: &str = "/sys/class/gpio";

/// DS18B20 1-Wire probe, exposed through hwmon (`temp1_input`, millidegrees).
pub const TEMPERATURE_DIR: &str = "/sys/bus/w1/devices/28-2b46d446b48a/hwmon/hwmon0";

// ---------------------------------------------------------------------------
// I²C character display (PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_BUS: &str = "/dev/i2c-2";
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// Used when `KEGSTATUS_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/kegstatus.json";
/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "KEGSTATUS_CONFIG";
