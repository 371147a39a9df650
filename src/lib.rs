//! # Introduction
//! This is a platform-agnostic Rust driver for the [`LTR-F216A Ambient Light Sensor`](https://optoelectronics.liteon.com/en-global/Led/LED-Component/Detail/999/0/0/16/150) using [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) traits.
//!
//! ## Supported devices
//! Tested with the following sensor(s):
//! - [LTR-F216A-01](https://optoelectronics.liteon.com/upload/download/DS86-2019-0016/LTR-F216A-01_Final_DS_V1.4.pdf)
//!
//! ## Usage
//! ### Setup
//!
//! Instantiate a new driver instance using a [blocking I²C HAL
//! implementation](https://docs.rs/embedded-hal/0.2.*/embedded_hal/blocking/i2c/index.html).
//! For example, using `linux-embedded-hal`:
//! ```no_run
//! use linux_embedded_hal::I2cdev;
//! use ltrf216a::Ltrf216a;
//!
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let mut sensor = Ltrf216a::init(dev);
//! ```
//!
//! ### Measurements
//!
//! Enable the sensor, optionally pick an integration time, then read raw
//! counts from one of the two light channels:
//! ```no_run
//! # use linux_embedded_hal::I2cdev;
//! # use ltrf216a::Ltrf216a;
//! use ltrf216a::Channel;
//! # let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! # let mut sensor = Ltrf216a::init(dev);
//! sensor.enable().unwrap();
//! sensor.set_integration_time(100_000).unwrap();
//!
//! while !sensor.status().unwrap().data_ready {}
//!
//! let sample = sensor.sample(Channel::Als).unwrap();
//! println!(
//!     "{} counts over {} us",
//!     sample.counts, sample.integration_time_us
//! );
//! ```
//! The driver reports raw counts plus the integration time they were
//! captured with; converting to lux is up to the application.
//!
//! ### Sharing a device between call paths
//!
//! [`Ltrf216a`] methods take `&mut self`, so a single owner needs no
//! locking. When a measurement path and a power-management path must talk
//! to the same device, wrap it in a [`Ltrf216aSession`], which serializes
//! every register sequence behind a `critical-section` guard.
//!
#![no_std]
use embedded_hal::blocking::i2c;

mod registers;
mod session;
mod types;
pub use crate::registers::*;
pub use crate::session::Ltrf216aSession;
pub use crate::types::*;

const LTRF216A_BASE_ADDRESS: u8 = 0x53;

/// Driver for a single LTR-F216A, owning its I²C bus handle.
///
/// The driver caches the integration time it last wrote to the device.
/// The cache starts out at the hardware power-on default
/// ([`DEFAULT_INTEGRATION_TIME_US`]); call [`Ltrf216a::set_integration_time`]
/// after power-up if the device may have been reconfigured before.
pub struct Ltrf216a<I2C> {
    i2c: I2C,
    integration_time_us: u32,
}

impl<I2C, E> Ltrf216a<I2C>
where
    I2C: i2c::WriteRead<Error = E> + i2c::Write<Error = E>,
{
    /// Initializes the LTR-F216A driver while consuming the i2c bus.
    /// Performs no bus traffic.
    pub fn init(i2c: I2C) -> Self {
        Ltrf216a {
            i2c,
            integration_time_us: DEFAULT_INTEGRATION_TIME_US,
        }
    }

    /// Get the part ID stored inside the LTR-F216A. This ID should be 0xB6.
    pub fn part_id(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::PART_ID)
    }

    /// Returns the decoded contents of the MAIN_STATUS register.
    pub fn status(&mut self) -> Result<Status, Error<E>> {
        let data = self.read_register(Register::MAIN_STATUS)?;
        Ok(data.into())
    }

    /// Turns the ALS on.
    ///
    /// Reads MAIN_CTRL, sets the enable bit and writes the result back,
    /// leaving every other bit as it was. If either transfer fails the
    /// device is left in an indeterminate power state and measurements
    /// must not be trusted until a later `enable` succeeds.
    pub fn enable(&mut self) -> Result<(), Error<E>> {
        let ctrl = self.read_register(Register::MAIN_CTRL)?;
        self.write_register(Register::MAIN_CTRL, ctrl | MAIN_CTRL_ALS_ENABLE)
    }

    /// Turns the ALS off by clearing MAIN_CTRL, without reading it first.
    ///
    /// Also safe to call as cleanup after a failed [`Ltrf216a::enable`].
    pub fn disable(&mut self) -> Result<(), Error<E>> {
        self.write_register(Register::MAIN_CTRL, 0x00)
    }

    /// Selects one of the five supported integration times, in
    /// microseconds (see [`INTEGRATION_TIMES`]).
    ///
    /// Any other value is rejected with [`Error::InvalidIntegrationTime`]
    /// without touching the bus. The cached value is only updated once the
    /// register write went through.
    pub fn set_integration_time(&mut self, micros: u32) -> Result<(), Error<E>> {
        let entry = INTEGRATION_TIMES
            .iter()
            .find(|entry| entry.micros == micros)
            .ok_or(Error::InvalidIntegrationTime)?;

        self.write_register(Register::ALS_MEAS_RATE, entry.encoding)?;
        self.integration_time_us = micros;
        Ok(())
    }

    /// The integration time last written to the device, in microseconds.
    pub fn integration_time(&self) -> u32 {
        self.integration_time_us
    }

    /// Selects the ALS gain. The hardware default is [`Gain::X3`].
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<E>> {
        self.write_register(Register::ALS_GAIN, gain as u8)
    }

    /// Reads one channel's 24-bit raw count.
    ///
    /// Issues three single-byte reads at consecutive addresses, low byte
    /// first, and stops at the first failed read. Data is only meaningful
    /// while the sensor is enabled; reading a disabled sensor returns
    /// whatever stale counts the registers hold.
    pub fn read_channel(&mut self, channel: Channel) -> Result<u32, Error<E>> {
        let base = channel.base_address();
        let val_0 = self.read_register(base)? as u32;
        let val_1 = self.read_register(base + 1)? as u32;
        let val_2 = self.read_register(base + 2)? as u32;
        Ok((val_2 << 16) + (val_1 << 8) + val_0)
    }

    /// Reads one channel and pairs the raw count with the integration
    /// time it was captured with.
    pub fn sample(&mut self, channel: Channel) -> Result<Sample, Error<E>> {
        let counts = self.read_channel(channel)?;
        Ok(Sample {
            counts,
            integration_time_us: self.integration_time_us,
        })
    }

    /// Destroy driver instance, return I²C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, register: u8, data: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(LTRF216A_BASE_ADDRESS, &[register, data])
            .map_err(Error::I2C)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Error<E>> {
        let mut data: [u8; 1] = [0];
        self.i2c
            .write_read(LTRF216A_BASE_ADDRESS, &[register], &mut data)
            .map_err(Error::I2C)
            .and(Ok(data[0]))
    }
}
