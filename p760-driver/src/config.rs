//! Driver configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bus addresses the P760 may answer on, in the order they are tried
pub const CANDIDATE_ADDRESSES: [u8; 2] = [0x12, 0x24];

/// How the device address is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressSelection {
    /// Try [`CANDIDATE_ADDRESSES`] in order
    #[default]
    Auto,
    /// Try only this 7-bit address
    Fixed(u8),
}

impl AddressSelection {
    /// Interpret a raw address, 0 meaning auto-detect
    pub fn from_raw(address: u8) -> Self {
        match address {
            0 => AddressSelection::Auto,
            addr => AddressSelection::Fixed(addr),
        }
    }

    /// Raw form, 0 for auto-detect
    pub fn to_raw(self) -> u8 {
        match self {
            AddressSelection::Auto => 0,
            AddressSelection::Fixed(addr) => addr,
        }
    }
}

impl From<Option<u8>> for AddressSelection {
    fn from(address: Option<u8>) -> Self {
        address.map_or(AddressSelection::Auto, AddressSelection::from_raw)
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// Address selection used by `begin_with`
    pub address: AddressSelection,
}
