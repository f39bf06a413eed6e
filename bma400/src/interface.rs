//! Byte-level register access and the bus adapters that provide it.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::{Operation, SpiDevice};
use log::warn;

use crate::registers::{Reg_Stringify_From_u8, SPI_ADDR_MASK, SPI_READ_BIT};

/// Register transport used by the driver.
pub trait Bma400Interface {
    type Error;

    fn write_register(&mut self, addr: u8, reg: u8, data: u8) -> Result<(), Self::Error>;
    fn read_register(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error>;
    /// Reads `buf.len()` consecutive registers starting at `reg`.
    fn read_registers(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Bounded retry applied by the bus adapters to every transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 500,
            backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
        }
    }

    fn run<T, E, D, F>(&self, delay: &mut D, what: &str, reg: u8, mut op: F) -> Result<T, E>
    where
        D: DelayNs,
        E: core::fmt::Debug,
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => {
                    warn!(
                        "{} {}({:#04x}) gave up after {} attempts: {:?}",
                        what,
                        Reg_Stringify_From_u8(reg).unwrap_or("?"),
                        reg,
                        attempt,
                        e
                    );
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "{} {}({:#04x}) attempt {}/{} failed: {:?}",
                        what,
                        Reg_Stringify_From_u8(reg).unwrap_or("?"),
                        reg,
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                    if self.backoff_ms > 0 {
                        delay.delay_ms(self.backoff_ms);
                    }
                }
            }
        }
    }
}

/// I2C transport with retry.
pub struct I2cInterface<I2C, D> {
    i2c: I2C,
    delay: D,
    retry: RetryPolicy,
}

impl<I2C, D> I2cInterface<I2C, D> {
    pub fn new(i2c: I2C, delay: D, retry: RetryPolicy) -> Self {
        Self { i2c, delay, retry }
    }

    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn destroy(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> Bma400Interface for I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn write_register(&mut self, addr: u8, reg: u8, data: u8) -> Result<(), Self::Error> {
        let i2c = &mut self.i2c;
        self.retry
            .run(&mut self.delay, "write", reg, || i2c.write(addr, &[reg, data]))
    }

    fn read_register(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let i2c = &mut self.i2c;
        self.retry.run(&mut self.delay, "read", reg, || {
            let mut buf = [0u8];
            i2c.write_read(addr, &[reg], &mut buf)?;
            Ok(buf[0])
        })
    }

    fn read_registers(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let i2c = &mut self.i2c;
        self.retry
            .run(&mut self.delay, "read", reg, || i2c.write_read(addr, &[reg], &mut *buf))
    }
}

/// 4-wire SPI transport with retry. The device address is ignored.
///
/// Reads return one dummy byte before the register contents.
pub struct SpiInterface<SPI, D> {
    spi: SPI,
    delay: D,
    retry: RetryPolicy,
}

impl<SPI, D> SpiInterface<SPI, D> {
    pub fn new(spi: SPI, delay: D, retry: RetryPolicy) -> Self {
        Self { spi, delay, retry }
    }

    pub fn spi(&mut self) -> &mut SPI {
        &mut self.spi
    }

    pub fn destroy(self) -> (SPI, D) {
        (self.spi, self.delay)
    }
}

impl<SPI, D> SpiInterface<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// The BMA400 powers up in I2C mode; any SPI read switches it over.
    pub fn enable_spi_mode(&mut self) -> Result<(), SPI::Error> {
        let mut dummy = [0u8];
        self.read_registers(0, crate::registers::Reg::ChipId as u8, &mut dummy)
    }
}

impl<SPI, D> Bma400Interface for SpiInterface<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    type Error = SPI::Error;

    fn write_register(&mut self, _addr: u8, reg: u8, data: u8) -> Result<(), Self::Error> {
        let spi = &mut self.spi;
        self.retry
            .run(&mut self.delay, "write", reg, || spi.write(&[reg & SPI_ADDR_MASK, data]))
    }

    fn read_register(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8];
        self.read_registers(addr, reg, &mut buf)?;
        Ok(buf[0])
    }

    fn read_registers(&mut self, _addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let spi = &mut self.spi;
        self.retry.run(&mut self.delay, "read", reg, || {
            let mut header = [reg | SPI_READ_BIT, 0x00];
            spi.transaction(&mut [
                Operation::TransferInPlace(&mut header),
                Operation::Read(&mut *buf),
            ])
        })
    }
}
