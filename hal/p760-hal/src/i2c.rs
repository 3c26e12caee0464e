//! I2C transaction abstractions
//!
//! The P760 register protocol needs finer control than a plain
//! `write_read`: the register pointer is written with the bus held
//! (repeated start) and the following read is issued as its own request.
//! [`TransactionBus`] exposes exactly those steps.

/// How a transaction or read request ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndCondition {
    /// Generate a STOP and release the bus
    Stop,
    /// Keep the bus; the next request starts with a repeated START
    RepeatedStart,
}

/// Error status reported by a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Payload does not fit the transmit buffer
    DataTooLong,
    /// NACK received while sending the address
    AddressNack,
    /// NACK received while sending data
    DataNack,
    /// Bus, arbitration or other controller error
    Other,
    /// Transaction timed out
    Timeout,
}

/// Addressed byte-transaction bus master
///
/// Models a controller that buffers outgoing bytes between
/// [`begin_transaction`](Self::begin_transaction) and
/// [`end_transaction`](Self::end_transaction), and buffers incoming bytes
/// fetched by [`request_read`](Self::request_read) for consumption via
/// [`read_byte`](Self::read_byte).
///
/// Implementations must not retry; timeout policy lives here, not in the
/// driver.
pub trait TransactionBus {
    /// Error type for bus operations
    type Error;

    /// Start a write transaction to a device
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    fn begin_transaction(&mut self, address: u8);

    /// Queue bytes for the open transaction
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Transmit the queued bytes and end the transaction
    ///
    /// `Ok(())` is the zero-error status.
    fn end_transaction(&mut self, end: EndCondition) -> Result<(), Self::Error>;

    /// Request `len` bytes from a device
    ///
    /// Returns the number of bytes that became available.
    fn request_read(&mut self, address: u8, len: usize, end: EndCondition) -> usize;

    /// Take the next available byte, `None` when no data is left
    fn read_byte(&mut self) -> Option<u8>;
}

impl<T: TransactionBus + ?Sized> TransactionBus for &mut T {
    type Error = T::Error;

    fn begin_transaction(&mut self, address: u8) {
        T::begin_transaction(self, address)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn end_transaction(&mut self, end: EndCondition) -> Result<(), Self::Error> {
        T::end_transaction(self, end)
    }

    fn request_read(&mut self, address: u8, len: usize, end: EndCondition) -> usize {
        T::request_read(self, address, len, end)
    }

    fn read_byte(&mut self) -> Option<u8> {
        T::read_byte(self)
    }
}

