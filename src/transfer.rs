//! Retry-wrapped bus transactions with the HDC1000.
//!
//! The bus peripheral is modelled as an asynchronous engine that is started
//! with [`MasterBus::master_write`] / [`MasterBus::master_read`] and then
//! polled through [`MasterBus::status`]. [`Transfer`] drives one request to a
//! terminal status, reissuing it on retryable outcomes until
//! [`MAX_ATTEMPTS`] is reached.

use embedded_hal::i2c::{ErrorKind, I2c, NoAcknowledgeSource};

use crate::error::HdcError;
use crate::register::DEVICE_ADDRESS;

/// Maximum number of times a request is issued before giving up.
pub const MAX_ATTEMPTS: u8 = 5;

/// Status polls allowed per attempt while the bus keeps reporting `Pending`.
pub const PENDING_POLL_LIMIT: u32 = 10_000;

/// Status of a request handed to the bus peripheral.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    /// The request is still in flight.
    Pending,
    /// The request finished successfully.
    Complete,
    /// The request failed and must not be retried.
    Failed,
    /// The device did not acknowledge its address.
    AddressNack,
    /// The device did not acknowledge a data byte.
    DataNack,
    /// Another master won arbitration.
    ArbitrationLost,
}

impl TransferStatus {
    /// Whether the request has reached a state that ends the retry loop.
    pub fn is_terminal(self) -> bool {
        matches!(self, TransferStatus::Complete | TransferStatus::Failed)
    }
}

/// Bus peripheral providing asynchronous-with-polling master transfers.
pub trait MasterBus {
    /// Starts writing `bytes` to the device at `address`.
    fn master_write(&mut self, address: u8, bytes: &[u8]);

    /// Starts reading `len` bytes from the device at `address`.
    fn master_read(&mut self, address: u8, len: usize);

    /// Reports the status of the request in flight.
    ///
    /// Once a read reports [`TransferStatus::Complete`] the received bytes
    /// have been copied into `rx`.
    fn status(&mut self, rx: &mut [u8]) -> TransferStatus;
}

impl<T: MasterBus + ?Sized> MasterBus for &mut T {
    fn master_write(&mut self, address: u8, bytes: &[u8]) {
        (**self).master_write(address, bytes)
    }

    fn master_read(&mut self, address: u8, len: usize) {
        (**self).master_read(address, len)
    }

    fn status(&mut self, rx: &mut [u8]) -> TransferStatus {
        (**self).status(rx)
    }
}

enum Payload<'a> {
    Write(&'a [u8]),
    Read(&'a mut [u8]),
}

#[derive(Clone, Copy)]
enum State {
    Idle,
    Issued { polls: u32 },
    Finished(Result<(), HdcError>),
}

/// A single request driven to completion by repeated calls to [`Transfer::poll`].
pub struct Transfer<'a> {
    address: u8,
    payload: Payload<'a>,
    attempts: u8,
    state: State,
}

impl<'a> Transfer<'a> {
    /// Prepares a write of `bytes` to `address`.
    pub fn write(address: u8, bytes: &'a [u8]) -> Self {
        Self::new(address, Payload::Write(bytes))
    }

    /// Prepares a read filling `buffer` from `address`.
    pub fn read(address: u8, buffer: &'a mut [u8]) -> Self {
        Self::new(address, Payload::Read(buffer))
    }

    fn new(address: u8, payload: Payload<'a>) -> Self {
        Transfer {
            address,
            payload,
            attempts: 0,
            state: State::Idle,
        }
    }

    /// Number of attempts that have concluded so far.
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Advances the request by one step.
    ///
    /// Returns `WouldBlock` while the request is in flight or about to be
    /// reissued. Once finished, every further call returns the same outcome
    /// without touching the bus.
    ///
    /// # Errors
    ///
    /// * `HdcError::BusError` if the bus reports the request as failed
    /// * `HdcError::BusTimeout` if [`MAX_ATTEMPTS`] attempts end without a terminal status
    pub fn poll<B: MasterBus + ?Sized>(&mut self, bus: &mut B) -> nb::Result<(), HdcError> {
        let polls = match self.state {
            State::Finished(result) => return result.map_err(nb::Error::Other),
            State::Idle => {
                self.issue(bus);
                0
            }
            State::Issued { polls } => polls,
        };

        let status = match &mut self.payload {
            Payload::Write(_) => bus.status(&mut []),
            Payload::Read(buffer) => bus.status(buffer),
        };

        match status {
            TransferStatus::Pending if polls + 1 < PENDING_POLL_LIMIT => {
                self.state = State::Issued { polls: polls + 1 };
                Err(nb::Error::WouldBlock)
            }
            status if status.is_terminal() => {
                let result = if status == TransferStatus::Complete {
                    Ok(())
                } else {
                    Err(HdcError::BusError)
                };
                self.conclude(result)
            }
            status => {
                if self.attempts + 1 >= MAX_ATTEMPTS {
                    warn!("giving up after {} attempts, last status {:?}", MAX_ATTEMPTS, status);
                    self.conclude(Err(HdcError::BusTimeout))
                } else {
                    warn!("attempt {} ended with {:?}, retrying", self.attempts + 1, status);
                    self.attempts += 1;
                    self.state = State::Idle;
                    Err(nb::Error::WouldBlock)
                }
            }
        }
    }

    fn issue<B: MasterBus + ?Sized>(&mut self, bus: &mut B) {
        match &self.payload {
            Payload::Write(bytes) => {
                trace!("write {} bytes to {}", bytes.len(), self.address);
                bus.master_write(self.address, bytes)
            }
            Payload::Read(buffer) => {
                trace!("read {} bytes from {}", buffer.len(), self.address);
                bus.master_read(self.address, buffer.len())
            }
        }
        self.state = State::Issued { polls: 0 };
    }

    fn conclude(&mut self, result: Result<(), HdcError>) -> nb::Result<(), HdcError> {
        self.attempts += 1;
        self.state = State::Finished(result);
        result.map_err(nb::Error::Other)
    }
}

/// Writes `bytes` to the HDC1000, blocking until the transfer finishes.
pub fn write<B: MasterBus + ?Sized>(bus: &mut B, bytes: &[u8]) -> Result<(), HdcError> {
    let mut transfer = Transfer::write(DEVICE_ADDRESS, bytes);
    nb::block!(transfer.poll(&mut *bus))
}

/// Fills `buffer` from the HDC1000, blocking until the transfer finishes.
///
/// On error the contents of `buffer` are unspecified.
pub fn read<B: MasterBus + ?Sized>(bus: &mut B, buffer: &mut [u8]) -> Result<(), HdcError> {
    let mut transfer = Transfer::read(DEVICE_ADDRESS, buffer);
    nb::block!(transfer.poll(&mut *bus))
}

#[derive(Clone, Copy)]
enum InFlight {
    Idle,
    Read { address: u8, len: usize },
    Settled(TransferStatus),
}

/// [`MasterBus`] adapter over a blocking `embedded-hal` I2C implementation.
///
/// Writes run in [`MasterBus::master_write`]; reads run on the first status
/// poll so the received bytes land directly in the caller's buffer.
pub struct I2cBus<I2C> {
    i2c: I2C,
    in_flight: InFlight,
}

impl<I2C: I2c> I2cBus<I2C> {
    /// Wraps a blocking I2C bus.
    pub fn new(i2c: I2C) -> Self {
        I2cBus {
            i2c,
            in_flight: InFlight::Idle,
        }
    }

    /// Releases the wrapped I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> MasterBus for I2cBus<I2C> {
    fn master_write(&mut self, address: u8, bytes: &[u8]) {
        let status = status_of(self.i2c.write(address, bytes));
        self.in_flight = InFlight::Settled(status);
    }

    fn master_read(&mut self, address: u8, len: usize) {
        self.in_flight = InFlight::Read { address, len };
    }

    fn status(&mut self, rx: &mut [u8]) -> TransferStatus {
        match self.in_flight {
            InFlight::Idle => TransferStatus::Failed,
            InFlight::Settled(status) => status,
            InFlight::Read { address, len } => {
                let status = match rx.get_mut(..len) {
                    Some(buffer) => status_of(self.i2c.read(address, buffer)),
                    None => TransferStatus::Failed,
                };
                self.in_flight = InFlight::Settled(status);
                status
            }
        }
    }
}

/// Maps the outcome of a blocking I2C call onto a transfer status.
fn status_of<E: embedded_hal::i2c::Error>(result: Result<(), E>) -> TransferStatus {
    match result {
        Ok(()) => TransferStatus::Complete,
        Err(e) => match e.kind() {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => TransferStatus::DataNack,
            ErrorKind::NoAcknowledge(_) => TransferStatus::AddressNack,
            ErrorKind::ArbitrationLoss => TransferStatus::ArbitrationLost,
            _ => TransferStatus::Failed,
        },
    }
}
