//! Adapters: concrete implementations of the port traits plus the
//! start-up collaborators.
//!
//! | Adapter       | Provides            | Connects to                     |
//! |---------------|---------------------|---------------------------------|
//! | `config_file` | ConfigPort          | JSON file (`KEGSTATUS_CONFIG`)  |
//! | `hardware`    | SensorPort factories| sysfs value files, HX711 pins   |
//! |               | DisplayPort factory | `/dev/i2c-*` + PCF8574 LCD      |
//! | `operator`    | OperatorInputs      | stdin / stdout                  |
//! | `sysfs_gpio`  | pin export/direction| `/sys/class/gpio`               |

pub mod config_file;
pub mod hardware;
pub mod operator;
pub mod sysfs_gpio;
