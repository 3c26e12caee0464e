//! P760 register map
//!
//! Each symbolic [`Register`] resolves to a static [`RegisterDescriptor`]
//! giving its offset, access width, value type and access rights.
//! Multi-byte values are stored high byte first.

/// Raw register offsets
pub mod reg {
    /// PM1.0 high byte (start of the 6-byte PM burst)
    pub const PM1_H: u8 = 0x00;
    /// PM2.5 high byte
    pub const PM25_H: u8 = 0x02;
    /// PM10 high byte
    pub const PM10_H: u8 = 0x04;
    /// Output mode
    pub const MODE: u8 = 0x06;
    /// Air-quality (VOC) index high byte
    pub const IAQ_H: u8 = 0x20;
    /// Air-quality subsystem on/off
    pub const IAQ_ENABLE: u8 = 0x2E;
    /// Firmware version
    pub const FW_VERSION: u8 = 0x70;
    /// First character of the model string
    pub const MODEL: u8 = 0x81;
    /// PM sampling stop/start
    pub const PM_STOP: u8 = 0xB6;
}

/// Semantic type of a register's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    /// Unsigned byte
    U8,
    /// Big-endian unsigned 16-bit word
    U16Be,
    /// Three consecutive big-endian words (PM1, PM2.5, PM10)
    PmBurst,
    /// Four ASCII characters
    Ascii4,
    /// 24-bit integer packed into the last three bytes of a 12-byte frame
    Packed24,
}

/// Register access rights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Reads only
    ReadOnly,
    /// Reads and single-byte writes
    ReadWrite,
}

/// Static description of one register (or register burst)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDescriptor {
    /// Offset of the first byte
    pub offset: u8,
    /// Number of bytes fetched in one burst
    pub width: u8,
    /// How the fetched bytes decode
    pub kind: ValueKind,
    /// Whether the register accepts writes
    pub access: Access,
}

impl RegisterDescriptor {
    const fn new(offset: u8, width: u8, kind: ValueKind, access: Access) -> Self {
        Self {
            offset,
            width,
            kind,
            access,
        }
    }

    /// Burst length in bytes
    pub fn burst_len(&self) -> usize {
        self.width as usize
    }

    /// Whether the register accepts writes
    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }
}

/// Symbolic register names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// PM1.0, PM2.5 and PM10 in one burst
    ParticulateMatter,
    /// Output mode (0x00 continuous, 0x01 every 60 s)
    Mode,
    /// Air-quality (VOC) index, big-endian word
    AirQualityIndex,
    /// Air-quality subsystem on (0x01) / off (0x00)
    AirQualityEnable,
    /// Firmware version byte
    FirmwareVersion,
    /// Four-character ASCII model string
    Model,
    /// PM sampling stopped (0x01) / running (0x00)
    PmSamplingStop,
    /// 12-byte frame carrying the pressure value.
    ///
    /// The frame start is not confirmed by the datasheet; offset 0x00 is
    /// the working assumption.
    PressureFrame,
}

/// Descriptor table, indexed by `Register as usize`
static REGISTER_MAP: [RegisterDescriptor; 8] = [
    RegisterDescriptor::new(reg::PM1_H, 6, ValueKind::PmBurst, Access::ReadOnly),
    RegisterDescriptor::new(reg::MODE, 1, ValueKind::U8, Access::ReadWrite),
    RegisterDescriptor::new(reg::IAQ_H, 2, ValueKind::U16Be, Access::ReadOnly),
    RegisterDescriptor::new(reg::IAQ_ENABLE, 1, ValueKind::U8, Access::ReadWrite),
    RegisterDescriptor::new(reg::FW_VERSION, 1, ValueKind::U8, Access::ReadOnly),
    RegisterDescriptor::new(reg::MODEL, 4, ValueKind::Ascii4, Access::ReadOnly),
    RegisterDescriptor::new(reg::PM_STOP, 1, ValueKind::U8, Access::ReadWrite),
    RegisterDescriptor::new(0x00, 12, ValueKind::Packed24, Access::ReadOnly),
];

impl Register {
    /// All registers, in table order
    pub const ALL: [Register; 8] = [
        Register::ParticulateMatter,
        Register::Mode,
        Register::AirQualityIndex,
        Register::AirQualityEnable,
        Register::FirmwareVersion,
        Register::Model,
        Register::PmSamplingStop,
        Register::PressureFrame,
    ];

    /// Look up this register's descriptor
    pub fn descriptor(self) -> &'static RegisterDescriptor {
        &REGISTER_MAP[self as usize]
    }

    /// Offset of the register's first byte
    pub fn offset(self) -> u8 {
        self.descriptor().offset
    }
}
