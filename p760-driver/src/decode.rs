//! Value decoding
//!
//! Pure conversions between raw register bytes and typed sensor values.
//! Nothing in this module touches the bus.

use core::str;

use crate::registers::reg;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of the model string in bytes
pub const MODEL_LEN: usize = 4;

/// Length of the frame carrying the pressure value
pub const PRESSURE_FRAME_LEN: usize = 12;

/// Decode a big-endian (high byte first) 16-bit word
pub fn be16(bytes: [u8; 2]) -> u16 {
    ((bytes[0] as u16) << 8) | bytes[1] as u16
}

/// Output mode stored in the mode register
///
/// Unrecognized codes are kept as [`Mode::Unknown`] rather than rejected,
/// so a value read back from the device always converts to the same byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// New reading every second
    Continuous,
    /// New reading every 60 seconds (power-on default)
    Interval60s,
    /// Any other code, passed through unchanged
    Unknown(u8),
}

impl Mode {
    /// Decode a mode register byte
    pub fn from_register(value: u8) -> Self {
        match value {
            0x00 => Mode::Continuous,
            0x01 => Mode::Interval60s,
            other => Mode::Unknown(other),
        }
    }

    /// Encode as a mode register byte
    pub fn to_register(self) -> u8 {
        match self {
            Mode::Continuous => 0x00,
            Mode::Interval60s => 0x01,
            Mode::Unknown(raw) => raw,
        }
    }

    /// Whether this is one of the documented modes
    pub fn is_known(self) -> bool {
        !matches!(self, Mode::Unknown(_))
    }
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        Mode::from_register(value)
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        mode.to_register()
    }
}

/// Particulate matter concentrations in µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PmReading {
    /// PM1.0
    pub pm1: u16,
    /// PM2.5
    pub pm2_5: u16,
    /// PM10
    pub pm10: u16,
}

impl PmReading {
    /// Decode the 6-byte burst starting at the PM1 register
    pub fn from_burst(burst: &[u8; 6]) -> Self {
        let word = |offset: u8| {
            let i = (offset - reg::PM1_H) as usize;
            be16([burst[i], burst[i + 1]])
        };
        Self {
            pm1: word(reg::PM1_H),
            pm2_5: word(reg::PM25_H),
            pm10: word(reg::PM10_H),
        }
    }

    /// Raw burst as the device would send it
    pub fn to_burst(&self) -> [u8; 6] {
        let [a, b] = self.pm1.to_be_bytes();
        let [c, d] = self.pm2_5.to_be_bytes();
        let [e, f] = self.pm10.to_be_bytes();
        [a, b, c, d, e, f]
    }
}

/// Model identifier, NUL-terminated
///
/// The bytes are taken as-is; no character set validation is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModelName([u8; MODEL_LEN + 1]);

impl ModelName {
    /// Build from the four raw model bytes, appending the terminator
    pub fn from_bytes(raw: [u8; MODEL_LEN]) -> Self {
        let mut buf = [0u8; MODEL_LEN + 1];
        buf[..MODEL_LEN].copy_from_slice(&raw);
        Self(buf)
    }

    /// The four model characters, without terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..MODEL_LEN]
    }

    /// The full 5-byte buffer including the trailing NUL
    pub fn as_bytes_with_nul(&self) -> &[u8; MODEL_LEN + 1] {
        &self.0
    }

    /// The model as text, `None` if the bytes are not valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(self.as_bytes()).ok()
    }
}

/// Decode the pressure value from a 12-byte frame
///
/// Pressure is `frame[9] << 16 | frame[10] << 8 | frame[11]`. The layout
/// comes from the datasheet formula, but the register the frame starts at is
/// not documented, so results are provisional.
pub fn pressure_from_frame(frame: &[u8; PRESSURE_FRAME_LEN]) -> u32 {
    ((frame[9] as u32) << 16) | ((frame[10] as u32) << 8) | frame[11] as u32
}

/// Decode an on/off register byte; any nonzero value reads as set
pub fn flag_from_register(value: u8) -> bool {
    value != 0x00
}

/// Encode an on/off register byte (0x01 set, 0x00 clear)
pub fn flag_to_register(set: bool) -> u8 {
    if set {
        0x01
    } else {
        0x00
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_be16() {
        assert_eq!(be16([0x01, 0x2C]), 300);
        assert_eq!(be16([0x00, 0x00]), 0);
        assert_eq!(be16([0xFF, 0xFF]), u16::MAX);
    }

    #[test]
    fn test_pm_burst() {
        let reading = PmReading::from_burst(&[0x00, 0x0A, 0x00, 0x19, 0x00, 0x32]);
        assert_eq!(
            reading,
            PmReading {
                pm1: 10,
                pm2_5: 25,
                pm10: 50
            }
        );
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(Mode::from_register(0x00), Mode::Continuous);
        assert_eq!(Mode::from_register(0x01), Mode::Interval60s);
        assert_eq!(Mode::from_register(0x7F), Mode::Unknown(0x7F));
        assert_eq!(u8::from(Mode::Unknown(0x7F)), 0x7F);
        assert!(!Mode::Unknown(0x02).is_known());
        assert!(Mode::Interval60s.is_known());
    }

    #[test]
    fn test_model_name() {
        let model = ModelName::from_bytes(*b"P760");
        assert_eq!(model.as_bytes_with_nul(), b"P760\0");
        assert_eq!(model.as_bytes(), b"P760");
        assert_eq!(model.as_str(), Some("P760"));
    }

    #[test]
    fn test_model_name_not_validated() {
        let model = ModelName::from_bytes([0xFF, b'7', 0x00, b'0']);
        assert_eq!(model.as_bytes_with_nul(), &[0xFF, b'7', 0x00, b'0', 0x00]);
        assert_eq!(model.as_str(), None);
    }

    #[test]
    fn test_pressure_frame() {
        let mut frame = [0xEEu8; PRESSURE_FRAME_LEN];
        frame[9] = 0x01;
        frame[10] = 0x86;
        frame[11] = 0xA0;
        assert_eq!(pressure_from_frame(&frame), 100_000);
    }

    #[test]
    fn test_flags() {
        assert!(flag_from_register(0x01));
        assert!(!flag_from_register(0x00));
        assert!(flag_from_register(0x80));
        assert_eq!(flag_to_register(true), 0x01);
        assert_eq!(flag_to_register(false), 0x00);
    }

    proptest! {
        #[test]
        fn prop_be16_matches_core(value in any::<u16>()) {
            prop_assert_eq!(be16(value.to_be_bytes()), value);
        }

        #[test]
        fn prop_mode_passthrough(raw in any::<u8>()) {
            prop_assert_eq!(Mode::from_register(raw).to_register(), raw);
        }

        #[test]
        fn prop_pm_burst(pm1 in any::<u16>(), pm2_5 in any::<u16>(), pm10 in any::<u16>()) {
            let reading = PmReading { pm1, pm2_5, pm10 };
            prop_assert_eq!(PmReading::from_burst(&reading.to_burst()), reading);
        }

        #[test]
        fn prop_pressure_ignores_leading_bytes(frame in any::<[u8; 12]>(), pressure in 0u32..(1 << 24)) {
            let mut frame = frame;
            frame[9..].copy_from_slice(&pressure.to_be_bytes()[1..]);
            prop_assert_eq!(pressure_from_frame(&frame), pressure);
        }
    }
}
