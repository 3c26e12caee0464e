//! Scripted transaction bus for tests
//!
//! Simulates one or more P760 devices sharing a register file, records
//! every call made on it and can inject short reads, a gap in the byte
//! stream and transport errors.

use heapless::{Deque, Vec};

use p760_hal::{BusError, EndCondition, TransactionBus};

/// Recorded calls kept per bus
const LOG_CAPACITY: usize = 128;

/// One recorded bus call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Begin(u8),
    Write(Vec<u8, 4>),
    End(EndCondition),
    Request {
        address: u8,
        len: usize,
        end: EndCondition,
    },
    ReadByte,
}

impl BusOp {
    /// A recorded write of `data`
    pub fn write(data: &[u8]) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(data).expect("write too long to record");
        BusOp::Write(bytes)
    }
}

pub struct MockBus {
    pub log: Vec<BusOp, LOG_CAPACITY>,
    pub registers: [u8; 256],
    /// Addresses that acknowledge
    devices: Vec<u8, 4>,
    tx_address: u8,
    tx: Vec<u8, 16>,
    pointer: u8,
    rx: Deque<u8, 32>,
    consumed: usize,
    /// Report this many fewer bytes than requested
    pub short_by: usize,
    /// Return no data once, after this many bytes were consumed from a request
    pub gap_after: Option<usize>,
    /// Fail the held pointer write
    pub pointer_error: Option<BusError>,
    /// Fail register writes
    pub write_error: Option<BusError>,
}

impl MockBus {
    pub fn new(devices: &[u8]) -> Self {
        let mut acknowledging = Vec::new();
        acknowledging
            .extend_from_slice(devices)
            .expect("too many simulated devices");
        Self {
            log: Vec::new(),
            registers: [0; 256],
            devices: acknowledging,
            tx_address: 0,
            tx: Vec::new(),
            pointer: 0,
            rx: Deque::new(),
            consumed: 0,
            short_by: 0,
            gap_after: None,
            pointer_error: None,
            write_error: None,
        }
    }

    pub fn with_registers(mut self, offset: u8, bytes: &[u8]) -> Self {
        for (i, &b) in bytes.iter().enumerate() {
            self.registers[offset.wrapping_add(i as u8) as usize] = b;
        }
        self
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Received bytes not yet consumed
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Number of read requests issued
    pub fn requests(&self) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, BusOp::Request { .. }))
            .count()
    }

    fn record(&mut self, op: BusOp) {
        self.log.push(op).expect("bus log full");
    }

    fn acknowledges(&self, address: u8) -> bool {
        self.devices.contains(&address)
    }
}

impl TransactionBus for MockBus {
    type Error = BusError;

    fn begin_transaction(&mut self, address: u8) {
        self.record(BusOp::Begin(address));
        self.tx_address = address;
        self.tx.clear();
    }

    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        self.record(BusOp::write(data));
        self.tx
            .extend_from_slice(data)
            .map_err(|_| BusError::DataTooLong)
    }

    fn end_transaction(&mut self, end: EndCondition) -> Result<(), BusError> {
        self.record(BusOp::End(end));
        if !self.acknowledges(self.tx_address) {
            return Err(BusError::AddressNack);
        }

        match end {
            EndCondition::RepeatedStart => {
                if let Some(err) = self.pointer_error {
                    return Err(err);
                }
                if let Some(&pointer) = self.tx.first() {
                    self.pointer = pointer;
                }
            }
            EndCondition::Stop => {
                if let Some((&pointer, values)) = self.tx.split_first() {
                    if !values.is_empty() {
                        if let Some(err) = self.write_error {
                            return Err(err);
                        }
                    }
                    for (i, &v) in values.iter().enumerate() {
                        self.registers[pointer.wrapping_add(i as u8) as usize] = v;
                    }
                    self.pointer = pointer;
                }
            }
        }
        Ok(())
    }

    fn request_read(&mut self, address: u8, len: usize, end: EndCondition) -> usize {
        self.record(BusOp::Request { address, len, end });
        self.rx.clear();
        self.consumed = 0;
        if !self.acknowledges(address) {
            return 0;
        }

        let available = len.saturating_sub(self.short_by);
        for i in 0..available {
            let offset = self.pointer.wrapping_add(i as u8);
            if self.rx.push_back(self.registers[offset as usize]).is_err() {
                return i;
            }
        }
        available
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.record(BusOp::ReadByte);
        if self.gap_after == Some(self.consumed) {
            self.gap_after = None;
            return None;
        }
        let byte = self.rx.pop_front()?;
        self.consumed += 1;
        Some(byte)
    }
}
