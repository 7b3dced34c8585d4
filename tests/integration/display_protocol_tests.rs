//! Byte- and delay-level checks of the LCD driver against a recording bus.

use kegstatus::drivers::lcd::{DisplayState, Lcd};

use crate::mock_bus::{BusEvent, NackI2c, NoDelay, RecordingDelay, RecordingI2c, Timeline};

const LCD_ADDR: u8 = 0x27;
const SETTLE: BusEvent = BusEvent::Delay { ns: 1_000_000 };
const COMMAND_GAP: BusEvent = BusEvent::Delay { ns: 40_000 };

fn write(byte: u8) -> BusEvent {
    BusEvent::Write {
        address: LCD_ADDR,
        byte,
    }
}

fn opened() -> (Lcd<RecordingI2c, RecordingDelay>, Timeline) {
    let timeline = Timeline::new();
    let mut lcd = Lcd::new(LCD_ADDR, timeline.delay());
    lcd.open(timeline.bus());
    (lcd, timeline)
}

#[test]
fn init_waits_match_power_on_sequence() {
    let (lcd, timeline) = opened();
    assert_eq!(lcd.state(), DisplayState::Ready);

    let events = timeline.events();
    assert_eq!(events[0], BusEvent::Delay { ns: 15_000_000 });
    assert_eq!(&events[1..5], &[write(0x34), SETTLE, write(0x30), SETTLE]);
    assert_eq!(events[5], BusEvent::Delay { ns: 4_100_000 });
    assert_eq!(&events[6..10], &[write(0x34), SETTLE, write(0x30), SETTLE]);
    assert_eq!(events[10], BusEvent::Delay { ns: 100_000 });
    assert_eq!(&events[11..15], &[write(0x34), SETTLE, write(0x30), SETTLE]);
    assert_eq!(events[15], BusEvent::Delay { ns: 4_100_000 });
    assert_eq!(&events[16..20], &[write(0x24), SETTLE, write(0x20), SETTLE]);

    // Five commands, each 40 µs gap + four settled writes.
    let commands = &events[20..20 + 5 * 9];
    for chunk in commands.chunks(9) {
        assert_eq!(chunk[0], COMMAND_GAP);
        assert!(chunk[1..].iter().skip(1).step_by(2).all(|e| *e == SETTLE));
    }

    assert_eq!(events.last(), Some(&BusEvent::Delay { ns: 1_000_000_000 }));
    assert_eq!(events.len(), 20 + 5 * 9 + 1);
}

#[test]
fn status_line_is_one_clear_then_four_writes_per_char() {
    let (mut lcd, timeline) = opened();
    let start = timeline.len();
    let bytes_start = timeline.bytes().len();

    let text = "Temp:20C Wght:50%";
    lcd.write(text);
    assert_eq!(lcd.state(), DisplayState::Ready);

    let events = timeline.events()[start..].to_vec();
    let clear = [
        COMMAND_GAP,
        write(0x04),
        SETTLE,
        write(0x00),
        SETTLE,
        write(0x14),
        SETTLE,
        write(0x10),
        SETTLE,
    ];
    assert_eq!(&events[..clear.len()], &clear);

    let data = &events[clear.len()..];
    assert_eq!(data.len(), text.len() * 8, "4 writes + 4 settles per character");

    let mut expected = Vec::new();
    for byte in text.bytes() {
        let (hi, lo) = (byte >> 4, byte & 0x0F);
        for b in [(hi << 4) | 0x0D, (hi << 4) | 0x09, (lo << 4) | 0x0D, (lo << 4) | 0x09] {
            expected.push(write(b));
            expected.push(SETTLE);
        }
    }
    assert_eq!(data, expected.as_slice());

    let clears = timeline.bytes()[bytes_start..]
        .windows(4)
        .filter(|w| *w == [0x04, 0x00, 0x14, 0x10])
        .count();
    assert_eq!(clears, 1);
}

#[test]
fn every_frame_redraws_from_clear() {
    let (mut lcd, timeline) = opened();
    lcd.write("Temp:21C Wght:50%");
    let second = timeline.len();
    lcd.write("Temp:21C Wght:49%");

    let bytes: Vec<u8> = timeline.events()[second..]
        .iter()
        .filter_map(|e| match e {
            BusEvent::Write { byte, .. } => Some(*byte),
            BusEvent::Delay { .. } => None,
        })
        .collect();
    assert_eq!(&bytes[..4], &[0x04, 0x00, 0x14, 0x10]);
    assert_eq!(bytes.len(), 4 + 17 * 4);
}

#[test]
fn close_clears_and_releases_bus() {
    let (mut lcd, timeline) = opened();
    let bytes_start = timeline.bytes().len();
    assert!(lcd.close().is_some());
    assert_eq!(lcd.state(), DisplayState::Closed);
    assert_eq!(&timeline.bytes()[bytes_start..], &[0x04, 0x00, 0x14, 0x10]);

    let before = timeline.len();
    lcd.write("after close");
    assert_eq!(timeline.len(), before, "closed driver must not touch the bus");
}

#[test]
fn unacknowledged_writes_are_counted_not_retried() {
    let mut lcd = Lcd::new(LCD_ADDR, NoDelay);
    lcd.open(NackI2c { attempts: 0 });
    let init_writes = lcd.failed_writes();
    assert_eq!(init_writes, 28);

    lcd.write("ab");
    assert_eq!(lcd.state(), DisplayState::Ready);
    assert_eq!(lcd.failed_writes(), init_writes + 4 + 2 * 4);

    let bus = lcd.close().unwrap();
    assert_eq!(bus.attempts, lcd.failed_writes());
}
