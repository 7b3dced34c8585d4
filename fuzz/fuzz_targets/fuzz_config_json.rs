//! Fuzz target: JSON config decoding + `SystemConfig::validate`
//!
//! Invariants checked:
//! - No panics under arbitrary input
//! - A config that validates keeps the rate-monotonic period order
//! - A config that validates still validates after a serialize/deserialize round trip
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use kegstatus::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<SystemConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    assert!(config.weight_period_ms < config.display_period_ms);
    assert!(config.display_period_ms < config.temperature_period_ms);
    assert!(config.display_address <= 0x7F);

    let json = serde_json::to_vec(&config).expect("serialize");
    let back: SystemConfig = serde_json::from_slice(&json).expect("deserialize");
    assert!(back.validate().is_ok());
    assert_eq!(back.weight_period_ms, config.weight_period_ms);
});
