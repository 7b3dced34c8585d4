//! HX711 24-bit load-cell ADC, bit-banged over two GPIOs.
//!
//! Protocol (channel A, gain 128):
//!
//! 1. Wait for DOUT to go low (conversion ready).
//! 2. Clock 24 bits out MSB-first: PD_SCK high, sample DOUT, PD_SCK low.
//! 3. One extra PD_SCK pulse selects channel A / gain 128 for the next
//!    conversion.
//! 4. The result is 24-bit two's complement.
//!
//! Holding PD_SCK high for more than 60 µs powers the chip down, so each
//! half-period is kept at 1 µs.  The ready wait is bounded: a chip that
//! never pulls DOUT low yields [`SensorReading::Invalid`] for that period
//! instead of stalling the weight task.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use super::SensorReading;
use crate::app::ports::SensorPort;

/// Data bits per conversion.
const DATA_BITS: u32 = 24;
/// Extra clock pulses after the data: 1 = channel A, gain 128.
const GAIN_PULSES: u32 = 1;
/// Half-period of PD_SCK in microseconds.
const CLOCK_HALF_PERIOD_US: u32 = 1;
/// Polls of DOUT (1 ms apart) before giving up on this conversion.
const READY_POLLS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hx711Error {
    /// DOUT never went low within the ready window.
    NotReady,
    /// A pin operation failed.
    Pin,
}

impl core::fmt::Display for Hx711Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotReady => write!(f, "HX711 not ready"),
            Self::Pin => write!(f, "HX711 pin access failed"),
        }
    }
}

pub struct Hx711<DOUT, SCK, D> {
    dout: DOUT,
    sck: SCK,
    delay: D,
}

impl<DOUT, SCK, D> Hx711<DOUT, SCK, D>
where
    DOUT: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    pub fn new(dout: DOUT, sck: SCK, delay: D) -> Self {
        Self { dout, sck, delay }
    }

    /// Read one signed conversion.
    pub fn read_raw(&mut self) -> Result<i32, Hx711Error> {
        self.wait_ready()?;

        let mut value: u32 = 0;
        for _ in 0..DATA_BITS {
            let bit = self.clock_pulse()?;
            value = (value << 1) | u32::from(bit);
        }
        for _ in 0..GAIN_PULSES {
            self.clock_pulse()?;
        }

        Ok(sign_extend_24(value))
    }

    fn wait_ready(&mut self) -> Result<(), Hx711Error> {
        for _ in 0..READY_POLLS {
            if self.dout.is_low().map_err(|_| Hx711Error::Pin)? {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        Err(Hx711Error::NotReady)
    }

    /// One PD_SCK pulse; returns DOUT sampled while the clock is high.
    fn clock_pulse(&mut self) -> Result<bool, Hx711Error> {
        self.sck.set_high().map_err(|_| Hx711Error::Pin)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        let bit = self.dout.is_high().map_err(|_| Hx711Error::Pin)?;
        self.sck.set_low().map_err(|_| Hx711Error::Pin)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        Ok(bit)
    }
}

fn sign_extend_24(value: u32) -> i32 {
    ((value << 8) as i32) >> 8
}

impl<DOUT, SCK, D> SensorPort for Hx711<DOUT, SCK, D>
where
    DOUT: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    fn read(&mut self) -> SensorReading {
        match self.read_raw() {
            Ok(raw) => SensorReading::from_raw(f64::from(raw)),
            Err(e) => {
                debug!("hx711: {}", e);
                SensorReading::Invalid
            }
        }
    }
}
