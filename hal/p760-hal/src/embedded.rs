//! `TransactionBus` on top of `embedded-hal` I2C
//!
//! Buffers the staged transaction the way a classic two-wire controller
//! does and maps it onto the blocking `embedded_hal::i2c::I2c` calls:
//!
//! - `end_transaction(Stop)` issues a single `write` (an empty write is a
//!   presence check)
//! - `end_transaction(RepeatedStart)` holds the queued bytes; the next
//!   `request_read` to the same address becomes one `write_read`, so the
//!   register pointer and the read can never be split by another transfer
//!
//! Since `write_read` always finishes with a STOP, a read request's own end
//! condition is not observable here. Errors from a held write surface as a
//! read request with zero bytes available.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use heapless::Vec;

use crate::i2c::{BusError, EndCondition, TransactionBus};

/// Transmit/receive buffer size in bytes
pub const BUFFER_SIZE: usize = 32;

/// Map an embedded-hal error kind onto a bus status
pub fn map_error_kind(kind: ErrorKind) -> BusError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => BusError::AddressNack,
        ErrorKind::NoAcknowledge(_) => BusError::DataNack,
        _ => BusError::Other,
    }
}

/// Transaction adapter around an `embedded-hal` I2C bus
pub struct HalBus<I2C> {
    i2c: I2C,
    /// Address of the open (or held) transaction
    tx_address: u8,
    tx: Vec<u8, BUFFER_SIZE>,
    /// Bytes in `tx` are waiting for a repeated-start read
    held: bool,
    rx: Vec<u8, BUFFER_SIZE>,
    rx_pos: usize,
}

impl<I2C: I2c> HalBus<I2C> {
    /// Wrap an I2C bus
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            tx_address: 0,
            tx: Vec::new(),
            held: false,
            rx: Vec::new(),
            rx_pos: 0,
        }
    }

    /// Give back the wrapped bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Number of received bytes not yet consumed
    pub fn available(&self) -> usize {
        self.rx.len() - self.rx_pos
    }

    fn reset_rx(&mut self) {
        self.rx.clear();
        self.rx_pos = 0;
    }
}

impl<I2C: I2c> TransactionBus for HalBus<I2C> {
    type Error = BusError;

    fn begin_transaction(&mut self, address: u8) {
        self.tx_address = address;
        self.tx.clear();
        self.held = false;
    }

    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.tx
            .extend_from_slice(data)
            .map_err(|_| BusError::DataTooLong)
    }

    fn end_transaction(&mut self, end: EndCondition) -> Result<(), BusError> {
        match end {
            EndCondition::RepeatedStart => {
                self.held = true;
                Ok(())
            }
            EndCondition::Stop => {
                self.held = false;
                let result = self
                    .i2c
                    .write(self.tx_address, &self.tx)
                    .map_err(|e| map_error_kind(e.kind()));
                self.tx.clear();
                result
            }
        }
    }

    fn request_read(&mut self, address: u8, len: usize, _end: EndCondition) -> usize {
        self.reset_rx();

        let len = len.min(BUFFER_SIZE);
        let mut buf = [0u8; BUFFER_SIZE];
        let buf = &mut buf[..len];

        let result = if self.held && address == self.tx_address {
            self.i2c.write_read(address, &self.tx, buf)
        } else {
            self.i2c.read(address, buf)
        };
        self.held = false;
        self.tx.clear();

        match result {
            Ok(()) => {
                if self.rx.extend_from_slice(buf).is_err() {
                    return 0;
                }
                len
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "i2c read from {=u8:#x} failed: {}",
                    address,
                    map_error_kind(_e.kind())
                );
                0
            }
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.rx.get(self.rx_pos).copied()?;
        self.rx_pos += 1;
        Some(byte)
    }
}
