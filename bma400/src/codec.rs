//! Conversions between raw register bytes and physical values.

use core::convert::TryFrom;

use crate::registers::{AccelScale, ACC_DATA_MASK_MSB};
use crate::types::RawSample;
use crate::Error;

/// Counts per half range of the 12-bit two's-complement output.
pub const COUNTS_PER_HALF_RANGE: f32 = 2048.0;

/// Temperature at a raw reading of zero.
pub const TEMPERATURE_REFERENCE_C: f32 = 23.0;
pub const TEMPERATURE_C_PER_LSB: f32 = 0.5;

fn decode_axis(lsb: u8, msb: u8) -> i16 {
    let value = (((msb & ACC_DATA_MASK_MSB) as i16) << 8) | lsb as i16;
    if value > 2047 {
        value - 4096
    } else {
        value
    }
}

/// Decodes the six data bytes starting at ACC_X_LSB (X, Y, Z, LSB first).
pub fn decode_accel_sample(raw: &[u8; 6]) -> RawSample {
    RawSample {
        x: decode_axis(raw[0], raw[1]),
        y: decode_axis(raw[2], raw[3]),
        z: decode_axis(raw[4], raw[5]),
    }
}

/// Signed offset from 23 °C, 0.5 K per LSB.
pub fn decode_temperature(raw: u8) -> i8 {
    (((raw as i16) << 8) >> 8) as i8
}

pub fn temperature_celsius(raw: u8) -> f32 {
    decode_temperature(raw) as f32 * TEMPERATURE_C_PER_LSB + TEMPERATURE_REFERENCE_C
}

/// g per LSB for a full-scale range.
pub fn resolution_for(scale: AccelScale) -> f32 {
    scale.range_g() / COUNTS_PER_HALF_RANGE
}

/// Same as [`resolution_for`] for a raw ACC_CONFIG1 range code.
pub fn resolution_for_code<E>(code: u8) -> Result<f32, Error<E>> {
    let scale = AccelScale::try_from(code).map_err(Error::InvalidScale)?;
    Ok(resolution_for(scale))
}
