//! Fuzz target: `parse_reading` (sysfs value-file content)
//!
//! Feeds arbitrary file content to the parser and checks:
//! - No panics under any byte sequence
//! - A `Valid` reading is never the `-1` sentinel
//! - A `Valid` reading always comes from a first line that is a bare number
//!
//! cargo fuzz run fuzz_value_file

#![no_main]

use kegstatus::sensors::reader::parse_reading;
use kegstatus::sensors::{SENTINEL, SensorReading};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    if let SensorReading::Valid(v) = parse_reading(content) {
        assert!(v != SENTINEL, "sentinel must fold into Invalid");

        let first = content.split('\n').next().unwrap_or("");
        let reparsed: f64 = first.trim_start().parse().expect("valid reading from unparseable line");
        assert!(reparsed == v || (reparsed.is_nan() && v.is_nan()));
    }
});
