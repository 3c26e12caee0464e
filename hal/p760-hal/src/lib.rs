//! P760 Hardware Abstraction Layer
//!
//! This crate defines the two-wire transaction capability the P760 driver
//! consumes, plus an adapter that provides it on top of any
//! `embedded-hal` 1.0 I2C bus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  p760-driver (register protocol)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  p760-hal (this crate - TransactionBus) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │    HalBus     │       │ board-specific│
//! │ (embedded-hal)│       │   transports  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::TransactionBus`] - Addressed byte transactions with
//!   explicit stop / repeated-start control

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod embedded;
pub mod i2c;

// Re-export key types at crate root for convenience
pub use embedded::HalBus;
pub use i2c::{BusError, EndCondition, TransactionBus};
