//! Driver for the Bosch BMA400 ultra-low-power accelerometer.
//!
//! The BMA400 is a 12-bit, three-axis accelerometer with selectable ±2/4/8/16 g
//! range, two interrupt pins and hardware wakeup / no-motion generators.
//!
//! The driver talks to the chip through [`Bma400Interface`], which is
//! implemented for `embedded-hal` I2C buses ([`I2cInterface`]) and SPI devices
//! ([`SpiInterface`]). Every operation blocks on the bus and on the supplied
//! [`DelayNs`] provider.
//!
//! ```ignore
//! let iface = I2cInterface::new(i2c, bus_delay, RetryPolicy::default());
//! let mut accel = Bma400::default(iface, delay, InterruptPins { int1: 5, int2: 4 });
//! accel.verify_chip_id()?;
//! accel.configure(ConfigurationProfile::default())?;
//! let g = accel.read_accel_g()?;
//! ```
#![no_std]

pub mod registers;
pub mod configs;
pub mod types;
pub mod codec;
pub mod interface;
pub mod calibration;
pub mod shared;

#[cfg(test)]
mod mock;

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use registers::*;
pub use crate::types::*;
pub use codec::{decode_accel_sample, decode_temperature, resolution_for, resolution_for_code, temperature_celsius};
pub use configs::{config_sequence, SequencedWrite, CONFIG_NO_MOTION_DISABLE, CONFIG_NO_MOTION_ENABLE, CONFIG_RESET};
pub use interface::{Bma400Interface, I2cInterface, RetryPolicy, SpiInterface};
pub use calibration::{fold_gravity, CalibrationSettings, OffsetEstimator, CALIBRATION_SAMPLES};
pub use self_test::{SELF_TEST_MIN_X_MG, SELF_TEST_MIN_Y_MG, SELF_TEST_MIN_Z_MG};
pub use shared::SharedBma400;
pub use registers::{AccelFilter, AccelScale, Oversampling, OutputDataRate, PowerMode, Reg};

/// SDO pulled low.
pub const DEFAULT_ADDRESS: u8 = 0x14;
/// SDO pulled high.
pub const ALTERNATE_ADDRESS: u8 = 0x15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Bus failure after the transport exhausted its retries.
    Transport(E),
    /// Range code outside the four supported ranges.
    InvalidScale(u8),
    /// A write of the configuration sequence failed; nothing after it was sent.
    SequenceAborted { step: u8, reg: Reg, source: E },
    /// CHIPID did not read back as 0x90.
    InvalidDevice(u8),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "bus transfer failed: {:?}", e),
            Error::InvalidScale(code) => write!(f, "invalid range code {:#04x}", code),
            Error::SequenceAborted { step, reg, source } => write!(
                f,
                "configuration aborted at step {} ({}): {:?}",
                step,
                reg.name(),
                source
            ),
            Error::InvalidDevice(id) => write!(f, "unexpected chip id {:#04x}", id),
        }
    }
}

pub struct Bma400<IFACE, D> {
    iface: IFACE,
    delay: D,
    address: u8,
    pins: InterruptPins,
    resolution: f32,
    state: DeviceState,
}

impl<IFACE, D> Bma400<IFACE, D> {
    pub fn interface(&mut self) -> &mut IFACE {
        &mut self.iface
    }

    pub fn pins(&self) -> InterruptPins {
        self.pins
    }

    /// g per LSB of the active range.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

impl<IFACE, D, E> Bma400<IFACE, D>
where
    IFACE: Bma400Interface<Error = E>,
    D: DelayNs,
    E: fmt::Debug,
{
    pub fn new(iface: IFACE, delay: D, address: u8, pins: InterruptPins) -> Self {
        Self {
            iface,
            delay,
            address,
            pins,
            resolution: resolution_for(AccelScale::G4),
            state: DeviceState::Reset,
        }
    }

    pub fn default(iface: IFACE, delay: D, pins: InterruptPins) -> Self {
        Self::new(iface, delay, DEFAULT_ADDRESS, pins)
    }

    pub fn destroy(self) -> (IFACE, D) {
        (self.iface, self.delay)
    }

    pub fn read_reg(&mut self, reg: u8) -> Result<u8, Error<E>> {
        self.iface
            .read_register(self.address, reg)
            .map_err(Error::Transport)
    }

    pub fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), Error<E>> {
        self.iface
            .write_register(self.address, reg, val)
            .map_err(Error::Transport)
    }

    pub fn read_bytes(&mut self, start_reg: u8, buffer: &mut [u8]) -> Result<(), Error<E>> {
        self.iface
            .read_registers(self.address, start_reg, buffer)
            .map_err(Error::Transport)
    }

    /// Accepts any register type that implements the `Register` trait
    pub fn apply_config<R>(&mut self, config: &[RegConfig<R>]) -> Result<(), Error<E>>
    where
        R: Register + NamedRegister + Copy,
    {
        for entry in config {
            let addr = entry.reg.addr();
            match entry.op {
                RegOp::Write => {
                    debug!("write_reg {:<16}({:#04X}) = {:#04x}", entry.reg.name(), addr, entry.value);
                    self.write_reg(addr, entry.value)?
                }
                RegOp::Read => {
                    let data = self.read_reg(addr)?;
                    debug!("read_reg {:<16}({:#04X}) = {:#04x}", entry.reg.name(), addr, data);
                }
            }
            if entry.settle_ms > 0 {
                self.delay.delay_ms(entry.settle_ms);
            }
        }
        Ok(())
    }

    pub fn chip_id(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(Reg::ChipId.addr())
    }

    pub fn verify_chip_id(&mut self) -> Result<(), Error<E>> {
        match self.chip_id()? {
            CHIP_ID => Ok(()),
            other => Err(Error::InvalidDevice(other)),
        }
    }

    /// INT_STAT0 interrupt status bits.
    pub fn status(&mut self) -> Result<u8, Error<E>> {
        self.read_reg(Reg::IntStat0.addr())
    }

    /// Soft reset; every register returns to its power-on default.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.apply_config(CONFIG_RESET)?;
        self.state = DeviceState::Uninitialized;
        Ok(())
    }

    /// Writes the full register sequence for `profile`.
    ///
    /// The first failed write aborts the sequence and is reported with its
    /// step number. The device is then considered uninitialized.
    pub fn configure(&mut self, profile: ConfigurationProfile) -> Result<(), Error<E>> {
        for write in config_sequence(&profile).iter() {
            let entry = write.entry;
            debug!(
                "step {:>2} write_reg {:<16}({:#04X}) = {:#04x}",
                write.step,
                entry.reg.name(),
                entry.reg.addr(),
                entry.value
            );
            if let Err(source) = self.iface.write_register(self.address, entry.reg.addr(), entry.value) {
                warn!("configuration aborted at step {} ({}): {:?}", write.step, entry.reg.name(), source);
                self.state = DeviceState::Uninitialized;
                return Err(Error::SequenceAborted {
                    step: write.step,
                    reg: entry.reg,
                    source,
                });
            }
            if entry.settle_ms > 0 {
                self.delay.delay_ms(entry.settle_ms);
            }
        }
        self.resolution = resolution_for(profile.scale);
        self.state = DeviceState::Configured(profile);
        Ok(())
    }

    pub fn enable_no_motion_interrupt(&mut self) -> Result<(), Error<E>> {
        self.apply_config(CONFIG_NO_MOTION_ENABLE)
    }

    pub fn disable_no_motion_interrupt(&mut self) -> Result<(), Error<E>> {
        self.apply_config(CONFIG_NO_MOTION_DISABLE)
    }

    /// Stores and returns the resolution for a raw range code. An unknown
    /// code leaves the stored resolution untouched.
    pub fn set_resolution_code(&mut self, code: u8) -> Result<f32, Error<E>> {
        self.resolution = resolution_for_code(code)?;
        Ok(self.resolution)
    }

    pub fn read_accel_raw(&mut self) -> Result<RawSample, Error<E>> {
        let mut raw = [0u8; 6];
        self.read_bytes(Reg::AccXLsb.addr(), &mut raw)?;
        Ok(decode_accel_sample(&raw))
    }

    /// Acceleration in g at the active resolution.
    pub fn read_accel_g(&mut self) -> Result<ThreeAxes, Error<E>> {
        let raw = self.read_accel_raw()?;
        Ok(ThreeAxes::from_raw(raw, self.resolution))
    }

    /// Signed temperature offset from 23 °C in 0.5 K steps.
    pub fn read_temperature_raw(&mut self) -> Result<i8, Error<E>> {
        let raw = self.read_reg(Reg::TempData.addr())?;
        Ok(decode_temperature(raw))
    }

    pub fn read_temperature(&mut self) -> Result<f32, Error<E>> {
        let raw = self.read_reg(Reg::TempData.addr())?;
        Ok(temperature_celsius(raw))
    }
}
