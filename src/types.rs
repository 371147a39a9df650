use crate::registers::*;

/// All possible errors in this crate
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// I²C bus error.
    I2C(E),
    /// The requested integration time is not one of the five durations the
    /// hardware supports. Exact match only, no rounding.
    InvalidIntegrationTime,
}

/// A logical light channel, bound to its 3-byte data register triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Channel {
    /// Unfiltered ("clear") channel, registers 0x0A..=0x0C.
    Clear,
    /// Green-filtered ambient light channel, registers 0x0D..=0x0F.
    Als,
}

impl Channel {
    /// Address of the channel's least-significant data byte. The two
    /// following addresses hold the mid and high bytes.
    pub fn base_address(self) -> u8 {
        match self {
            Channel::Clear => Register::CLEAR_DATA_0,
            Channel::Als => Register::ALS_DATA_0,
        }
    }
}

/// ALS gain settings of the ALS_GAIN register. The hardware default is
/// [`Gain::X3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Gain {
    X1 = 0x00,
    X3 = 0x01,
    X6 = 0x02,
    X9 = 0x03,
    X18 = 0x04,
}

/// One row of the integration-time table: the exposure window in
/// microseconds and the byte the hardware expects in ALS_MEAS_RATE for it.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct IntegrationTimeEntry {
    pub micros: u32,
    pub encoding: u8,
}

/// The five integration times the sensor supports, longest first.
///
/// The encoding is positional: index 0 maps to `0x03`, index 1 to `0x13`
/// and every later index to `(index << 4) | 0x02`. The bytes are part of
/// the ALS_MEAS_RATE bit-field contract and must not change.
pub const INTEGRATION_TIMES: [IntegrationTimeEntry; 5] = [
    IntegrationTimeEntry { micros: 400_000, encoding: 0x03 },
    IntegrationTimeEntry { micros: 200_000, encoding: 0x13 },
    IntegrationTimeEntry { micros: 100_000, encoding: 0x22 },
    IntegrationTimeEntry { micros: 50_000, encoding: 0x32 },
    IntegrationTimeEntry { micros: 25_000, encoding: 0x42 },
];

/// Integration time the sensor powers up with (ALS_MEAS_RATE = 0x22).
pub const DEFAULT_INTEGRATION_TIME_US: u32 = 100_000;

/// One raw measurement: the unconverted 24-bit count plus the integration
/// time it was captured with. Lux conversion is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Sample {
    pub counts: u32,
    pub integration_time_us: u32,
}

/// Decoded contents of the MAIN_STATUS register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Status {
    /// New ALS/clear data is waiting in the data registers.
    pub data_ready: bool,
    /// The ALS interrupt condition fired.
    pub interrupt_pending: bool,
    /// The device went through a power-on event since the last read;
    /// configuration registers are back at their defaults.
    pub power_on: bool,
}

impl From<u8> for Status {
    fn from(val: u8) -> Self {
        Status {
            data_ready: val & MAIN_STATUS_DATA != 0,
            interrupt_pending: val & MAIN_STATUS_INT != 0,
            power_on: val & MAIN_STATUS_POWER_ON != 0,
        }
    }
}
