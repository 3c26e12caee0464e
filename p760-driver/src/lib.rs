//! P760 environmental sensor driver
//!
//! Register protocol for the P760 particulate matter / air-quality module
//! on a two-wire (I2C) bus:
//!
//! - Address resolution: fixed address or auto-detect (0x12, then 0x24)
//! - Register reads with repeated start, register writes
//! - Decoding of PM1.0/2.5/10, air-quality index, mode, firmware version,
//!   model string and the provisional pressure frame
//!
//! The bus is consumed through [`p760_hal::TransactionBus`]; wrap an
//! `embedded-hal` bus with [`p760_hal::HalBus`] to use one directly.
//!
//! ```ignore
//! let bus = HalBus::new(i2c);
//! let mut sensor = P760::open(bus, None)?;
//! sensor.set_mode_continuous()?;
//! let pm = sensor.read_pm()?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod decode;
pub mod device;
pub mod error;
pub mod registers;

#[cfg(test)]
mod testing;

pub use config::{AddressSelection, DriverConfig, CANDIDATE_ADDRESSES};
pub use decode::{Mode, ModelName, PmReading};
pub use device::P760;
pub use error::Error;
pub use registers::{Register, RegisterDescriptor};
