//! Bias estimation by averaging samples taken at rest.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::codec::resolution_for;
use crate::interface::Bma400Interface;
use crate::types::{ConfigurationProfile, GravityAxis, OffsetVector, RawSample};
use crate::{Bma400, Error};

pub const CALIBRATION_SAMPLES: usize = 128;

const _: () = assert!(CALIBRATION_SAMPLES > 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSettings {
    /// Pause before sampling so the device can be put down flat.
    pub hold_still_ms: u32,
    /// Wait after every read. Must exceed the output data period so that
    /// consecutive reads see fresh samples.
    pub sample_interval_ms: u32,
    /// Axis aligned with gravity while the device rests.
    pub gravity_axis: GravityAxis,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            hold_still_ms: 5000,
            sample_interval_ms: 100,
            gravity_axis: GravityAxis::Z,
        }
    }
}

/// Folds a reading of roughly ±1 g back into [-0.5, 0.5] g.
pub fn fold_gravity(value: f32) -> f32 {
    if value > 0.5 {
        value - 1.0
    } else if value < -0.5 {
        value + 1.0
    } else {
        value
    }
}

/// Running per-axis sum of raw samples.
#[derive(Debug, Clone, Default)]
pub struct OffsetEstimator {
    sum: [i32; 3],
    count: usize,
}

impl OffsetEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, sample: &RawSample) {
        if self.is_complete() {
            return;
        }
        self.sum[0] += i32::from(sample.x);
        self.sum[1] += i32::from(sample.y);
        self.sum[2] += i32::from(sample.z);
        self.count += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.count >= CALIBRATION_SAMPLES
    }

    pub fn sample_count(&self) -> usize {
        self.count
    }

    /// Mean of the fed samples in g, with the gravity axis folded. `None`
    /// until at least one sample was fed.
    pub fn finish(&self, resolution: f32, gravity_axis: GravityAxis) -> Option<OffsetVector> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f32;
        let mut offset = OffsetVector {
            x: self.sum[0] as f32 / n * resolution,
            y: self.sum[1] as f32 / n * resolution,
            z: self.sum[2] as f32 / n * resolution,
        };
        match gravity_axis {
            GravityAxis::X => offset.x = fold_gravity(offset.x),
            GravityAxis::Y => offset.y = fold_gravity(offset.y),
            GravityAxis::Z => offset.z = fold_gravity(offset.z),
        }
        Some(offset)
    }
}

impl<IFACE, D, E> Bma400<IFACE, D>
where
    IFACE: Bma400Interface<Error = E>,
    D: DelayNs,
    E: fmt::Debug,
{
    /// Applies `profile`, averages [`CALIBRATION_SAMPLES`] readings and
    /// returns the bias of every axis in g.
    ///
    /// The device has to lie still with `settings.gravity_axis` pointing
    /// along gravity for the whole run. Use a normal power mode in `profile`
    /// so the readings are representative. The no-motion interrupt is held
    /// off while sampling and re-enabled afterwards, also after a failed read.
    pub fn estimate_offsets(
        &mut self,
        profile: ConfigurationProfile,
        settings: &CalibrationSettings,
    ) -> Result<OffsetVector, Error<E>> {
        info!("hold flat and motionless for bias calibration");
        self.delay.delay_ms(settings.hold_still_ms);

        self.configure(profile)?;
        // a still device trips GEN1 inactivity and auto-switches to low power
        self.disable_no_motion_interrupt()?;
        let sampled = self.sample_at_rest(settings);
        let restored = self.enable_no_motion_interrupt();
        let estimator = sampled?;
        restored?;

        // CALIBRATION_SAMPLES > 0, so the estimator is never empty here
        let offset = estimator
            .finish(resolution_for(profile.scale), settings.gravity_axis)
            .unwrap_or_default();
        info!("x-axis offset = {} mg", offset.x * 1000.0);
        info!("y-axis offset = {} mg", offset.y * 1000.0);
        info!("z-axis offset = {} mg", offset.z * 1000.0);
        Ok(offset)
    }

    fn sample_at_rest(&mut self, settings: &CalibrationSettings) -> Result<OffsetEstimator, Error<E>> {
        let mut estimator = OffsetEstimator::new();
        while !estimator.is_complete() {
            let sample = self.read_accel_raw()?;
            estimator.feed(&sample);
            self.delay.delay_ms(settings.sample_interval_ms);
        }
        Ok(estimator)
    }
}
