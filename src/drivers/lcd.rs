//! HD44780-compatible 16x2 character LCD behind a PCF8574 I²C backpack.
//!
//! The backpack maps one I²C data byte straight onto the controller pins:
//!
//! ```text
//!   bit  7  6  5  4 | 3  2  1  0
//!        D7 D6 D5 D4| BL EN RW RS
//! ```
//!
//! so every byte the controller sees is moved as two 4-bit nibbles, and
//! every nibble is moved as two bus writes: one with EN high, one with EN
//! low.  The controller latches on the falling edge of EN.
//!
//! ## Timing
//!
//! Every single bus write is followed by a 1 ms settle.  Each command is
//! preceded by a 40 µs quiescence.  The power-on mode-select pulses need
//! the datasheet's 15 ms / 4.1 ms / 100 µs / 4.1 ms gaps.  These delays are
//! part of the protocol and live right beside the writes they guard.
//!
//! ## Failure semantics
//!
//! Writes are fire-and-forget: a failed write (no ACK, EIO) is logged at
//! debug level, counted, and the sequence carries on.  Opening the bus is
//! the caller's job and is fatal when it fails.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{I2c, SevenBitAddress};
use log::{debug, info};

use crate::app::ports::DisplayPort;

// ── PCF8574 control bits (low nibble of every bus byte) ───────

/// Backlight on.
pub const BACKLIGHT: u8 = 1 << 3;
/// Enable strobe; the controller latches on its falling edge.
pub const ENABLE: u8 = 1 << 2;
/// Read (1) / write (0).
pub const READ_WRITE: u8 = 1 << 1;
/// Register select: data (1) / command (0).
pub const REGISTER_SELECT: u8 = 1 << 0;

/// Build the low control nibble from individual line states.
pub const fn control_bits(backlight: bool, enable: bool, read_write: bool, register_select: bool) -> u8 {
    ((backlight as u8) << 3) | ((enable as u8) << 2) | ((read_write as u8) << 1) | (register_select as u8)
}

// ── HD44780 commands ──────────────────────────────────────────

/// 8-bit interface select (sent as a lone high nibble during init).
const MODE_8BIT: u8 = 0x30;
/// 4-bit interface select (sent as a lone high nibble during init).
const MODE_4BIT: u8 = 0x20;
/// Function set: 4-bit bus, 2 lines, 5x8 font.
const FUNCTION_SET_2LINE_5X8: u8 = 0x28;
/// Display control: display, cursor and blink all off.
const DISPLAY_OFF: u8 = 0x08;
/// Clear display and return cursor home.
const CLEAR_DISPLAY: u8 = 0x01;
/// Entry mode: increment, no shift (left to right).
const ENTRY_MODE_LEFT_TO_RIGHT: u8 = 0x06;
/// Display control: display on, cursor on, blink off.
const DISPLAY_ON: u8 = 0x0E;

// ── Timing (µs unless noted) ──────────────────────────────────

const POWER_ON_WAIT_MS: u32 = 15;
const MODE_SELECT_LONG_WAIT_US: u32 = 4_100;
const MODE_SELECT_SHORT_WAIT_US: u32 = 100;
const COMMAND_WAIT_US: u32 = 40;
const WRITE_SETTLE_MS: u32 = 1;
const INIT_SETTLE_MS: u32 = 1_000;

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// No bus held.
    Closed,
    /// Bus held, power-on sequence in progress.
    Initializing,
    /// Idle and able to accept a frame.
    Ready,
    /// Transmitting the character at this index of the current frame.
    Writing(usize),
}

pub struct Lcd<I2C, D> {
    bus: Option<I2C>,
    address: SevenBitAddress,
    delay: D,
    state: DisplayState,
    failed_writes: u32,
}

impl<I2C, D> Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(address: SevenBitAddress, delay: D) -> Self {
        Self {
            bus: None,
            address,
            delay,
            state: DisplayState::Closed,
            failed_writes: 0,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Bus writes that were not acknowledged since the driver was created.
    pub fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    /// Take ownership of an open bus session and run the controller's
    /// power-on initialisation.  Ends in [`DisplayState::Ready`].
    pub fn open(&mut self, bus: I2C) {
        self.bus = Some(bus);
        self.state = DisplayState::Initializing;

        // 8-bit → 4-bit switch: three 8-bit mode selects, then 4-bit.
        self.delay.delay_ms(POWER_ON_WAIT_MS);
        self.pulse_nibble(MODE_8BIT);
        self.delay.delay_us(MODE_SELECT_LONG_WAIT_US);
        self.pulse_nibble(MODE_8BIT);
        self.delay.delay_us(MODE_SELECT_SHORT_WAIT_US);
        self.pulse_nibble(MODE_8BIT);
        self.delay.delay_us(MODE_SELECT_LONG_WAIT_US);
        self.pulse_nibble(MODE_4BIT);

        self.command(FUNCTION_SET_2LINE_5X8);
        self.command(DISPLAY_OFF);
        self.command(CLEAR_DISPLAY);
        self.command(ENTRY_MODE_LEFT_TO_RIGHT);
        self.command(DISPLAY_ON);

        self.delay.delay_ms(INIT_SETTLE_MS);
        self.state = DisplayState::Ready;
        info!("LCD: initialised at 0x{:02x}", self.address);
    }

    /// Clear the display and home the cursor.
    pub fn clear(&mut self) {
        self.command(CLEAR_DISPLAY);
        if self.bus.is_some() {
            self.state = DisplayState::Ready;
        }
    }

    /// Redraw the whole frame with `text`.
    ///
    /// The controller has no partial-overwrite primitive, so the frame is
    /// cleared first and then every byte is sent in data mode.
    pub fn write(&mut self, text: &str) {
        if self.bus.is_none() {
            debug!("LCD: frame dropped, bus closed");
            return;
        }
        self.clear();
        for (index, byte) in text.bytes().enumerate() {
            self.state = DisplayState::Writing(index);
            self.send_data(byte);
        }
        self.state = DisplayState::Ready;
    }

    /// Clear the screen and give the bus back.
    pub fn close(&mut self) -> Option<I2C> {
        self.clear();
        self.state = DisplayState::Closed;
        self.bus.take()
    }

    /// Instruction register write: high nibble, then low nibble, command mode,
    /// backlight off.
    fn command(&mut self, cmd: u8) {
        self.delay.delay_us(COMMAND_WAIT_US);
        self.pulse_nibble(cmd & 0xF0);
        self.pulse_nibble(cmd << 4);
    }

    /// Data register write.  EN toggles on each half-transfer while RS and
    /// the backlight stay set.
    fn send_data(&mut self, byte: u8) {
        let mut enable = false;
        for nibble in [byte >> 4, byte & 0x0F] {
            enable = !enable;
            self.send_byte((nibble << 4) | control_bits(true, enable, false, true));
            enable = !enable;
            self.send_byte((nibble << 4) | control_bits(true, enable, false, true));
        }
    }

    /// `nibble` already sits in the upper four bits; strobe it with EN.
    fn pulse_nibble(&mut self, nibble: u8) {
        self.send_byte(nibble | ENABLE);
        self.send_byte(nibble);
    }

    fn send_byte(&mut self, byte: u8) {
        let Some(bus) = self.bus.as_mut() else {
            return;
        };
        if let Err(e) = bus.write(self.address, &[byte]) {
            self.failed_writes = self.failed_writes.wrapping_add(1);
            debug!("LCD: write 0x{:02x} failed: {:?}", byte, e);
        }
        self.delay.delay_ms(WRITE_SETTLE_MS);
    }
}

impl<I2C, D> DisplayPort for Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn show(&mut self, line: &str) {
        self.write(line);
    }
}
