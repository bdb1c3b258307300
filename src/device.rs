//! E07-400MM register bus interface
//!
//! This module implements the register access policy of the clone on top of
//! an [`embedded_hal::spi::SpiDevice`]. Each public method performs exactly
//! one SPI transaction, with chip select held for its whole duration.
//!
//! The interface is built around the `Device<SPI, O>` struct which provides:
//! - Single-byte reads and writes of configuration registers
//! - Burst reads of status registers and the RX FIFO
//! - Burst writes of consecutive configuration registers
//! - Command strobes
//!
//! Status and FIFO addresses can only be named through [`BurstAddress`], and
//! single-byte accessors only accept [`ConfigAddress`], so the access mode the
//! clone requires is enforced when the call site is written.
//!
//! # Example
//! ```no_run
//! use e07_400mm::{Device, Rssi, Srx};
//!
//! # fn run<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), e07_400mm::Error> {
//! let mut device = Device::new(spi);
//! device.execute_command(Srx)?;
//! let rssi: Rssi = device.read_status()?;
//! # Ok(())
//! # }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::{Operation, SpiDevice};
use log::trace;
use regiface::{ByteArray, Command, ReadableRegister, WritableRegister};

use crate::address::{BurstAddress, ConfigAddress};
use crate::registers::{BurstOnly, SingleAccess};
use crate::{Error, NoParameters};

/// Hook notified of every bus transaction
///
/// Replaces a process-wide transfer counter: the caller owns the observer
/// and decides what to record.
pub trait BusObserver {
    /// Called after a successful transaction with its header byte and the
    /// number of payload bytes moved.
    fn on_transfer(&mut self, header: u8, len: usize);
}

impl BusObserver for () {
    fn on_transfer(&mut self, _header: u8, _len: usize) {}
}

impl<T: BusObserver + ?Sized> BusObserver for &mut T {
    fn on_transfer(&mut self, header: u8, len: usize) {
        (**self).on_transfer(header, len)
    }
}

/// Observer counting bus transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferCounter {
    /// Number of completed transactions
    pub transfers: u32,
    /// Number of payload bytes moved
    pub bytes: usize,
}

impl BusObserver for TransferCounter {
    fn on_transfer(&mut self, _header: u8, len: usize) {
        self.transfers = self.transfers.wrapping_add(1);
        self.bytes = self.bytes.wrapping_add(len);
    }
}

/// Register bus of an E07-400MM
pub struct Device<SPI, O = ()> {
    spi: SPI,
    observer: O,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI device.
    pub fn new(spi: SPI) -> Self {
        Self { spi, observer: () }
    }
}

impl<SPI, O> Device<SPI, O> {
    /// Creates a Device that reports every transaction to `observer`.
    pub fn with_observer(spi: SPI, observer: O) -> Self {
        Self { spi, observer }
    }

    /// Returns the bus observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Releases the underlying SPI device and the observer.
    pub fn release(self) -> (SPI, O) {
        (self.spi, self.observer)
    }
}

impl<SPI, O> Device<SPI, O>
where
    SPI: SpiDevice,
    O: BusObserver,
{
    fn transact(&mut self, header: u8, operations: &mut [Operation<'_, u8>]) -> Result<(), Error> {
        self.spi.transaction(operations).map_err(|_| Error::Bus)?;

        let len = operations
            .iter()
            .map(|op| match op {
                Operation::Read(buf) => buf.len(),
                Operation::Write(buf) => buf.len(),
                _ => 0,
            })
            .sum::<usize>()
            .saturating_sub(1);
        trace!("spi header=0x{:02X} len={}", header, len);
        self.observer.on_transfer(header, len);

        Ok(())
    }

    /// Reads one configuration register with a single-byte access.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_single(&mut self, address: ConfigAddress) -> Result<u8, Error> {
        let header = address.read_header();
        let mut value = [0u8];

        self.transact(
            header,
            &mut [Operation::Write(&[header]), Operation::Read(&mut value)],
        )?;

        Ok(value[0])
    }

    /// Writes one configuration register with a single-byte access.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_single(&mut self, address: ConfigAddress, value: u8) -> Result<(), Error> {
        let header = address.write_header();

        self.transact(header, &mut [Operation::Write(&[header, value])])
    }

    /// Reads `bytes.len()` bytes starting at `address` in burst mode.
    ///
    /// For [`BurstAddress::FIFO`] every byte is the next byte of the RX FIFO.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_burst(&mut self, address: BurstAddress, bytes: &mut [u8]) -> Result<(), Error> {
        let header = address.read_header();

        self.transact(
            header,
            &mut [Operation::Write(&[header]), Operation::Read(bytes)],
        )
    }

    /// Writes consecutive configuration registers starting at `address`.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_burst(&mut self, address: ConfigAddress, bytes: &[u8]) -> Result<(), Error> {
        let header = address.burst_write_header();

        self.transact(
            header,
            &mut [Operation::Write(&[header]), Operation::Write(bytes)],
        )
    }

    /// Reads bytes from the RX FIFO in burst mode.
    pub fn read_fifo(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        self.read_burst(BurstAddress::FIFO, bytes)
    }

    /// Reads a configuration register value.
    ///
    /// # Type Parameters
    /// * `R` - Configuration register type declared at an address in 0x00-0x2E
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::InvalidAddress` - `R` is declared outside the configuration range
    /// * `Error::Deserialization` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + SingleAccess,
    {
        let address = ConfigAddress::new(R::id()).ok_or(Error::InvalidAddress(R::id()))?;
        let mut raw_value = R::Array::new();

        {
            let raw: &mut [u8] = raw_value.as_mut();
            if raw.len() == 1 {
                raw[0] = self.read_single(address)?;
            } else {
                self.read_burst(address.into(), raw)?;
            }
        }

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a configuration register value.
    ///
    /// Single-byte registers are written in one atomic access; wider values
    /// are written as one burst.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::InvalidAddress` - `R` is declared outside the configuration range
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible> + SingleAccess,
    {
        let address = ConfigAddress::new(R::id()).ok_or(Error::InvalidAddress(R::id()))?;
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});

        let bytes: &[u8] = raw_value.as_ref();
        match bytes {
            [byte] => self.write_single(address, *byte),
            bytes => self.write_burst(address, bytes),
        }
    }

    /// Reads a status register value in burst mode.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::InvalidAddress` - `R` is not declared at a status address
    /// * `Error::Deserialization` - Failed to parse register value
    pub fn read_status<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8> + BurstOnly,
    {
        let address = BurstAddress::status(R::id()).ok_or(Error::InvalidAddress(R::id()))?;
        let mut raw_value = R::Array::new();

        self.read_burst(address, raw_value.as_mut())?;

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Executes a command strobe.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn execute_command<C>(&mut self, _command: C) -> Result<(), Error>
    where
        C: Command<IdType = u8, CommandParameters = NoParameters>,
    {
        let header = C::id();

        self.transact(header, &mut [Operation::Write(&[header])])
    }
}
