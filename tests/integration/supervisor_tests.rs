//! End-to-end runs of the three periodic tasks on the host.
//!
//! Real sysfs-style files in a scratch directory feed the pollers; the
//! display side is either a channel-backed port or the real LCD driver on
//! the recording bus.  Periods are shortened and the real-time class is
//! best-effort so the tests run unprivileged.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use kegstatus::adapters::hardware;
use kegstatus::app::calibration::CalibrationConstants;
use kegstatus::app::ports::{ConfigError, DisplayPort};
use kegstatus::app::supervisor::{DisplayFactory, Supervisor};
use kegstatus::config::SystemConfig;
use kegstatus::drivers::lcd::Lcd;
use kegstatus::error::{BusError, Error};
use kegstatus::scheduler::TaskRole;

use crate::mock_bus::{BusEvent, Timeline};

const WEIGHT_GPIO: u32 = 60;

static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

struct Rig {
    config: SystemConfig,
    weight_file: PathBuf,
}

fn rig(weight: &str, temperature: &str) -> Rig {
    let root = std::env::temp_dir().join(format!(
        "kegstatus-e2e-{}-{}",
        std::process::id(),
        DIR_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    let gpio_dir = root.join(format!("gpio{WEIGHT_GPIO}"));
    let hwmon = root.join("hwmon0");
    fs::create_dir_all(&gpio_dir).unwrap();
    fs::create_dir_all(&hwmon).unwrap();
    fs::write(gpio_dir.join("value"), weight).unwrap();
    fs::write(hwmon.join("temp1_input"), temperature).unwrap();

    Rig {
        config: SystemConfig {
            gpio_root: root,
            temperature_dir: hwmon,
            weight_period_ms: 5,
            display_period_ms: 10,
            temperature_period_ms: 15,
            require_realtime: false,
            ..SystemConfig::default()
        },
        weight_file: gpio_dir.join("value"),
    }
}

struct ChannelDisplay(Sender<String>);

impl DisplayPort for ChannelDisplay {
    fn show(&mut self, line: &str) {
        let _ = self.0.send(line.to_owned());
    }
}

fn channel_display() -> (DisplayFactory, Receiver<String>) {
    let (tx, rx) = mpsc::channel();
    let factory: DisplayFactory = Box::new(move || -> kegstatus::Result<Box<dyn DisplayPort>> {
        Ok(Box::new(ChannelDisplay(tx)))
    });
    (factory, rx)
}

fn wait_for_line(rx: &Receiver<String>, want: &str) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut seen = Vec::new();
    while Instant::now() < deadline {
        if let Ok(line) = rx.recv_timeout(Duration::from_millis(100)) {
            let done = line == want;
            seen.push(line);
            if done {
                return seen;
            }
        }
    }
    panic!("never saw {want:?}; got {seen:?}");
}

fn supervisor(rig: &Rig, display: DisplayFactory) -> Supervisor {
    Supervisor::new(
        rig.config.clone(),
        CalibrationConstants::new(5.0, 50.0),
        hardware::weight_factory(&rig.config, [WEIGHT_GPIO, WEIGHT_GPIO + 1]),
        hardware::temperature_factory(&rig.config),
        display,
    )
}

#[test]
fn end_to_end_status_line() {
    let rig = rig("30.0\n", "21000\n");
    let (display, rx) = channel_display();
    let sup = supervisor(&rig, display);
    let store = sup.store();

    let _running = sup.start().unwrap();
    wait_for_line(&rx, "Temp:21C Wght:50%");

    assert_eq!(store.weight().value(), Some(30.0));
    assert_eq!(store.temperature().value(), Some(21.0));
}

#[test]
fn invalid_weight_shows_sentinel_then_recovers() {
    let rig = rig("garbage\n", "4000\n");
    let (display, rx) = channel_display();
    let _running = supervisor(&rig, display).start().unwrap();

    wait_for_line(&rx, "Temp:4C Wght:-1%");

    fs::write(&rig.weight_file, "55\n").unwrap();
    wait_for_line(&rx, "Temp:4C Wght:100%");
}

#[test]
fn priorities_follow_rate() {
    let rig = rig("30\n", "20000\n");
    let (display, _rx) = channel_display();
    let running = supervisor(&rig, display).start().unwrap();

    let specs = running.specs();
    let pri = |role: TaskRole| specs.iter().find(|s| s.name == role.name()).unwrap().priority;
    assert!(pri(TaskRole::Weight) > pri(TaskRole::Display));
    assert!(pri(TaskRole::Display) > pri(TaskRole::Temperature));
}

#[test]
fn display_open_failure_is_fatal() {
    let rig = rig("30\n", "20000\n");
    let failing: DisplayFactory = Box::new(|| -> kegstatus::Result<Box<dyn DisplayPort>> {
        Err(BusError::OpenFailed {
            path: "/dev/i2c-2".into(),
            reason: "No such file or directory".into(),
        }
        .into())
    });

    let err = supervisor(&rig, failing).start().err().expect("start must fail");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Bus(_))));
    assert!(format!("{err:#}").contains("/dev/i2c-2"));
}

#[test]
fn invalid_config_starts_nothing() {
    let mut rig = rig("30\n", "20000\n");
    rig.config.weight_period_ms = 50;
    rig.config.display_period_ms = 20;
    rig.config.temperature_period_ms = 10;
    rig.config.rt_base_priority = 98;

    let display_opened = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&display_opened);
    let display: DisplayFactory = Box::new(move || -> kegstatus::Result<Box<dyn DisplayPort>> {
        flag.store(true, Ordering::SeqCst);
        let (tx, _rx) = mpsc::channel();
        Ok(Box::new(ChannelDisplay(tx)))
    });

    let err = supervisor(&rig, display).start().err().expect("start must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Config(ConfigError::ValidationFailed(_)))
    ));
    assert!(!display_opened.load(Ordering::SeqCst), "no task may run setup");
}

#[test]
fn out_of_range_base_priority_is_rejected() {
    let mut rig = rig("30\n", "20000\n");
    rig.config.rt_base_priority = 98;
    let (display, _rx) = channel_display();

    let err = supervisor(&rig, display).start().err().expect("start must fail");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Config(_))));
}

#[test]
fn lcd_receives_status_frames() {
    let rig = rig("30\n", "21000\n");
    let timeline = Timeline::new();
    let lcd_timeline = timeline.clone();
    let display: DisplayFactory = Box::new(move || -> kegstatus::Result<Box<dyn DisplayPort>> {
        let mut lcd = Lcd::new(0x27, lcd_timeline.delay());
        lcd.open(lcd_timeline.bus());
        Ok(Box::new(lcd))
    });

    let _running = supervisor(&rig, display).start().unwrap();

    // 'T','e','m','p' as data nibbles, after a clear.
    let want: Vec<u8> = "Temp:21C Wght:50%"
        .bytes()
        .flat_map(|b| {
            let (hi, lo) = (b >> 4, b & 0x0F);
            [(hi << 4) | 0x0D, (hi << 4) | 0x09, (lo << 4) | 0x0D, (lo << 4) | 0x09]
        })
        .collect();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let bytes = timeline.bytes();
        if bytes.windows(want.len()).any(|w| w == want.as_slice()) {
            break;
        }
        assert!(Instant::now() < deadline, "status frame never reached the bus");
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(timeline
        .events()
        .iter()
        .all(|e| !matches!(e, BusEvent::Write { address, .. } if *address != 0x27)));
}
