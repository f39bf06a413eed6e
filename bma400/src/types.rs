use crate::registers::{AccelFilter, AccelScale, Oversampling, OutputDataRate, PowerMode};

/// One accelerometer reading in LSB counts, each axis in [-2048, 2047].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreeAxes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ThreeAxes {
    pub fn is_within_delta(&self, other: &ThreeAxes, delta: f32) -> bool {
        (self.x - other.x).abs() <= delta &&
            (self.y - other.y).abs() <= delta &&
            (self.z - other.z).abs() <= delta
    }

    pub fn from_raw(raw: RawSample, resolution: f32) -> Self {
        Self {
            x: raw.x as f32 * resolution,
            y: raw.y as f32 * resolution,
            z: raw.z as f32 * resolution,
        }
    }
}

/// Per-axis bias in g.
pub type OffsetVector = ThreeAxes;

/// Axis expected to carry 1 g while the device rests during calibration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GravityAxis {
    X,
    Y,
    #[default]
    Z,
}

/// Everything that determines the register-write sequence of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationProfile {
    pub scale: AccelScale,
    pub odr: OutputDataRate,
    pub power_mode: PowerMode,
    pub oversampling: Oversampling,
    pub filter: AccelFilter,
}

impl Default for ConfigurationProfile {
    fn default() -> Self {
        Self {
            scale: AccelScale::G2,
            odr: OutputDataRate::Hz100,
            power_mode: PowerMode::Normal,
            oversampling: Oversampling::Osr3,
            filter: AccelFilter::Filt1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Power-on state; nothing written yet.
    Reset,
    /// Soft reset issued, registers back at their defaults.
    Uninitialized,
    Configured(ConfigurationProfile),
    SelfTestActive,
}

/// Identifiers of the two interrupt lines. Opaque to the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterruptPins {
    pub int1: u8,
    pub int2: u8,
}

/// Positive minus negative excitation, in g.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelfTestResult {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

impl SelfTestResult {
    pub fn as_mg(&self) -> ThreeAxes {
        ThreeAxes {
            x: self.dx * 1000.0,
            y: self.dy * 1000.0,
            z: self.dz * 1000.0,
        }
    }
}
