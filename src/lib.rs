//! HDC1000 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Texas Instruments
//! HDC1000 temperature and humidity sensor, built on top of the [`embedded-hal`] traits.
//!
//! # Features
//! - Retry-wrapped bus transfers, drivable step by step through [`Transfer::poll`]
//!   or as blocking calls
//! - Register access, single and combined measurements, configuration,
//!   software reset and device identification
//! - Designed for `no_std` environments
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`I2c`] for bus access, through the [`I2cBus`] adapter
//! - [`DelayNs`] for conversion timing
//!
//! Peripherals that expose a start-then-poll interface instead can implement
//! [`MasterBus`] directly.
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs diagnostics through `defmt`
//! - `log`: Logs diagnostics through the `log` facade
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`I2c`]: embedded_hal::i2c::I2c
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod error;
pub mod hdc1000;
pub mod register;
pub mod transfer;

pub use error::HdcError;
pub use hdc1000::{Hdc1000, RawMeasurement, Reading};
pub use register::{
    AcquisitionMode, Configuration, HumidityResolution, Register, TemperatureResolution,
};
pub use transfer::{I2cBus, MasterBus, Transfer, TransferStatus};
