//! P760 register protocol engine
//!
//! # Transactions
//!
//! Register read (N bytes):
//! - START, address+W, register offset
//! - repeated START, address+R, N bytes, STOP
//!
//! Register write:
//! - START, address+W, register offset, value, STOP
//!
//! Presence check: START, address+W, STOP with no payload. An acknowledged
//! address means a device is present.
//!
//! Every operation is a single attempt; nothing is retried. The bus must
//! not be shared with another transaction between the pointer write and the
//! read that follows it.

use p760_hal::{EndCondition, TransactionBus};

use crate::config::{AddressSelection, DriverConfig, CANDIDATE_ADDRESSES};
use crate::decode::{
    be16, flag_from_register, flag_to_register, pressure_from_frame, Mode, ModelName, PmReading,
    MODEL_LEN, PRESSURE_FRAME_LEN,
};
use crate::error::Error;
use crate::registers::Register;

/// Longest register burst a single read may request
///
/// Matches the receive buffer of common two-wire controllers.
pub const MAX_READ_LEN: usize = 32;

/// P760 sensor on a two-wire bus
///
/// Owns the bus and the resolved device address. Until
/// [`begin`](Self::begin) succeeds every register operation fails with
/// [`Error::NotConnected`] without touching the bus.
pub struct P760<B> {
    bus: B,
    address: Option<u8>,
}

impl<B: TransactionBus> P760<B> {
    /// Create a driver with an unresolved address
    pub fn new(bus: B) -> Self {
        Self { bus, address: None }
    }

    /// Create a driver and resolve its address
    ///
    /// `None` (or `Some(0)`) auto-detects. The bus is dropped on failure;
    /// use [`new`](Self::new) and [`begin`](Self::begin) to keep it.
    pub fn open(bus: B, address: Option<u8>) -> Result<Self, Error<B::Error>> {
        let mut device = Self::new(bus);
        device.resolve(address.into())?;
        Ok(device)
    }

    /// Create a driver and resolve its address from a configuration
    pub fn with_config(bus: B, config: &DriverConfig) -> Result<Self, Error<B::Error>> {
        let mut device = Self::new(bus);
        device.resolve(config.address)?;
        Ok(device)
    }

    /// Resolve the device address
    ///
    /// A nonzero `address` is checked once. Zero tries the candidate
    /// addresses in order and keeps the first that answers. Returns the
    /// resolved address.
    pub fn begin(&mut self, address: u8) -> Result<u8, Error<B::Error>> {
        self.resolve(AddressSelection::from_raw(address))
    }

    /// Resolve the device address using a configuration
    pub fn begin_with(&mut self, config: &DriverConfig) -> Result<u8, Error<B::Error>> {
        self.resolve(config.address)
    }

    fn resolve(&mut self, selection: AddressSelection) -> Result<u8, Error<B::Error>> {
        self.address = None;

        let found = match selection {
            AddressSelection::Fixed(address) => Some(address).filter(|&a| self.is_present(a)),
            AddressSelection::Auto => CANDIDATE_ADDRESSES.into_iter().find(|&a| self.is_present(a)),
        };

        match found {
            Some(address) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("P760 resolved at {=u8:#x}", address);
                self.address = Some(address);
                Ok(address)
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("P760 not found ({})", selection);
                Err(Error::NotFound)
            }
        }
    }

    /// Check whether anything acknowledges `address`
    pub fn is_present(&mut self, address: u8) -> bool {
        self.bus.begin_transaction(address);
        self.bus.end_transaction(EndCondition::Stop).is_ok()
    }

    /// Resolved address, `None` until `begin` succeeds
    pub fn current_address(&self) -> Option<u8> {
        self.address
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Read `buf.len()` consecutive bytes starting at `offset`
    ///
    /// The bytes are written in wire order. `buf` is only modified on
    /// success; on failure any bytes left in the receive buffer are drained.
    /// Lengths of zero or above [`MAX_READ_LEN`] are rejected.
    pub fn read_register(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        let address = self.address.ok_or(Error::NotConnected)?;
        let len = buf.len();
        if len == 0 || len > MAX_READ_LEN {
            return Err(Error::InvalidLength);
        }

        // Register pointer, bus held for the repeated start
        self.bus.begin_transaction(address);
        self.bus.write(&[offset])?;
        self.bus.end_transaction(EndCondition::RepeatedStart)?;

        let available = self.bus.request_read(address, len, EndCondition::Stop);
        if available != len {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "P760 short read at {=u8:#x}: {=usize}/{=usize}",
                offset,
                available,
                len
            );
            self.drain();
            return Err(Error::ShortRead {
                expected: len,
                available,
            });
        }

        let mut scratch = [0u8; MAX_READ_LEN];
        for (index, slot) in scratch[..len].iter_mut().enumerate() {
            match self.bus.read_byte() {
                Some(byte) => *slot = byte,
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("P760 stream exhausted at byte {=usize}", index);
                    self.drain();
                    return Err(Error::StreamExhausted { index });
                }
            }
        }
        buf.copy_from_slice(&scratch[..len]);
        Ok(())
    }

    /// Read `N` consecutive bytes starting at `offset` into an array
    pub fn read_array<const N: usize>(&mut self, offset: u8) -> Result<[u8; N], Error<B::Error>> {
        let mut buf = [0u8; N];
        self.read_register(offset, &mut buf)?;
        Ok(buf)
    }

    /// Discard whatever the transport still holds
    fn drain(&mut self) {
        while self.bus.read_byte().is_some() {}
    }

    /// Write one byte to the register at `offset`
    pub fn write_register_byte(&mut self, offset: u8, value: u8) -> Result<(), Error<B::Error>> {
        let address = self.address.ok_or(Error::NotConnected)?;

        self.bus.begin_transaction(address);
        self.bus.write(&[offset])?;
        self.bus.write(&[value])?;
        self.bus.end_transaction(EndCondition::Stop)?;
        Ok(())
    }

    fn read_reg<const N: usize>(
        &mut self,
        register: Register,
    ) -> Result<[u8; N], Error<B::Error>> {
        let descriptor = register.descriptor();
        debug_assert_eq!(descriptor.burst_len(), N);
        self.read_array(descriptor.offset)
    }

    fn write_reg(&mut self, register: Register, value: u8) -> Result<(), Error<B::Error>> {
        let descriptor = register.descriptor();
        debug_assert!(descriptor.is_writable());
        self.write_register_byte(descriptor.offset, value)
    }

    /// Read PM1.0, PM2.5 and PM10 in a single burst
    pub fn read_pm(&mut self) -> Result<PmReading, Error<B::Error>> {
        let burst = self.read_reg::<6>(Register::ParticulateMatter)?;
        Ok(PmReading::from_burst(&burst))
    }

    /// Read the output mode
    ///
    /// Unknown codes come back as [`Mode::Unknown`].
    pub fn mode(&mut self) -> Result<Mode, Error<B::Error>> {
        let [raw] = self.read_reg::<1>(Register::Mode)?;
        Ok(Mode::from_register(raw))
    }

    /// Write the output mode
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<B::Error>> {
        self.write_reg(Register::Mode, mode.to_register())
    }

    /// Switch to one reading per second
    pub fn set_mode_continuous(&mut self) -> Result<(), Error<B::Error>> {
        self.set_mode(Mode::Continuous)
    }

    /// Switch to one reading every 60 seconds
    pub fn set_mode_interval_60s(&mut self) -> Result<(), Error<B::Error>> {
        self.set_mode(Mode::Interval60s)
    }

    /// Read the air-quality (VOC) index
    pub fn read_air_quality_index(&mut self) -> Result<u16, Error<B::Error>> {
        self.read_reg::<2>(Register::AirQualityIndex).map(be16)
    }

    /// Switch the air-quality subsystem on or off
    pub fn set_air_quality_enabled(&mut self, on: bool) -> Result<(), Error<B::Error>> {
        self.write_reg(Register::AirQualityEnable, flag_to_register(on))
    }

    /// Whether the air-quality subsystem is on
    pub fn air_quality_enabled(&mut self) -> Result<bool, Error<B::Error>> {
        let [raw] = self.read_reg::<1>(Register::AirQualityEnable)?;
        Ok(flag_from_register(raw))
    }

    /// Stop (`true`) or resume (`false`) particulate-matter sampling
    pub fn set_pm_sampling_stopped(&mut self, stop: bool) -> Result<(), Error<B::Error>> {
        self.write_reg(Register::PmSamplingStop, flag_to_register(stop))
    }

    /// Whether particulate-matter sampling is stopped
    pub fn pm_sampling_stopped(&mut self) -> Result<bool, Error<B::Error>> {
        let [raw] = self.read_reg::<1>(Register::PmSamplingStop)?;
        Ok(flag_from_register(raw))
    }

    /// Read the firmware version byte
    pub fn firmware_version(&mut self) -> Result<u8, Error<B::Error>> {
        let [version] = self.read_reg::<1>(Register::FirmwareVersion)?;
        Ok(version)
    }

    /// Read the model identifier (`"P760"` on genuine parts)
    pub fn model(&mut self) -> Result<ModelName, Error<B::Error>> {
        let raw = self.read_reg::<MODEL_LEN>(Register::Model)?;
        Ok(ModelName::from_bytes(raw))
    }

    /// Read the air pressure from the 12-byte frame at offset 0x00
    ///
    /// **Provisional.** The datasheet gives the decoding of the frame but
    /// not the register it starts at. This reads from 0x00 and may not
    /// return a pressure on real hardware.
    pub fn read_pressure_provisional(&mut self) -> Result<u32, Error<B::Error>> {
        let frame = self.read_reg::<PRESSURE_FRAME_LEN>(Register::PressureFrame)?;
        Ok(pressure_from_frame(&frame))
    }
}
