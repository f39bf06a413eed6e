#![allow(unused_imports)]
use core::convert::TryFrom;
use bitflags::bitflags;

use paste::paste;

macro_rules! registers {
    (
        $enum_name:ident, $slice_name:ident {
            $($name:ident = $val:expr),* $(,)?
        }
    ) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum $enum_name {
            $($name = $val),*
        }

        pub const $slice_name: &[$enum_name] = &[
            $($enum_name::$name),*
        ];

        impl $enum_name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($enum_name::$name => stringify!($name),)*
                }
            }
        }

        impl Register for $enum_name {
            fn addr(self) -> u8 {
                self as u8
            }
        }

        impl NamedRegister for $enum_name {
            fn name(&self) -> &'static str {
                self.name()
            }
        }

        impl From<$enum_name> for u8 {
            fn from(r: $enum_name) -> u8 {
                r as u8
            }
        }

        paste! {
            #[allow(non_snake_case)]
            pub fn [<$enum_name _Stringify_From_u8>](value: u8) -> Option<&'static str> {
                $slice_name.iter().find(|r| r.addr() == value).map(|r| r.name())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegOp {
    Read,
    Write,
}

pub trait NamedRegister: Register {
    fn name(&self) -> &'static str;
}

pub trait Register: Copy {
    fn addr(self) -> u8;
}

/// One entry of a register table. `settle_ms` is a blocking wait issued
/// after the access completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegConfig<R: Register> {
    pub op: RegOp,
    pub reg: R,
    pub value: u8,
    pub settle_ms: u32,
}

impl<R: Register> RegConfig<R> {
    pub const fn write(reg: R, value: u8) -> Self {
        Self { op: RegOp::Write, reg, value, settle_ms: 0 }
    }

    pub const fn write_then_wait(reg: R, value: u8, settle_ms: u32) -> Self {
        Self { op: RegOp::Write, reg, value, settle_ms }
    }
}

registers! {
    Reg, BMA400_REGS {
        ChipId          = 0x00,
        ErrReg          = 0x02,
        Status          = 0x03,
        AccXLsb         = 0x04,
        AccXMsb         = 0x05,
        AccYLsb         = 0x06,
        AccYMsb         = 0x07,
        AccZLsb         = 0x08,
        AccZMsb         = 0x09,
        SensorTime0     = 0x0A,
        SensorTime1     = 0x0B,
        SensorTime2     = 0x0C,
        Event           = 0x0D,
        IntStat0        = 0x0E,
        IntStat1        = 0x0F,
        IntStat2        = 0x10,
        TempData        = 0x11,
        AccConfig0      = 0x19,
        AccConfig1      = 0x1A,
        AccConfig2      = 0x1B,
        IntConfig0      = 0x1F,
        IntConfig1      = 0x20,
        Int1Map         = 0x21,
        Int2Map         = 0x22,
        Int12Map        = 0x23,
        Int12IoCtrl     = 0x24,
        AutoLowPow0     = 0x2A,
        AutoLowPow1     = 0x2B,
        AutoWakeup0     = 0x2C,
        AutoWakeup1     = 0x2D,
        WkupIntConfig0  = 0x2F,
        WkupIntConfig1  = 0x30,
        WkupIntConfig2  = 0x31,
        WkupIntConfig3  = 0x32,
        WkupIntConfig4  = 0x33,
        Gen1IntConfig0  = 0x3F,
        Gen1IntConfig1  = 0x40,
        Gen1IntConfig2  = 0x41,
        Gen1IntConfig3  = 0x42,
        Gen1IntConfig31 = 0x43,
        IfConf          = 0x7C,
        SelfTest        = 0x7D,
        Cmd             = 0x7E,
    }
}

pub const CHIP_ID: u8 = 0x90;
pub const CMD_SOFT_RESET: u8 = 0xB6;

// SPI framing
pub const SPI_READ_BIT: u8 = 0x80;
pub const SPI_ADDR_MASK: u8 = 0x7F;

// -- ACC_CONFIG0 --
pub const ACC_CONFIG0_FILT1_BW_LOC: u8 = 7;
pub const ACC_CONFIG0_OSR_LP_LOC: u8 = 5;
pub const ACC_CONFIG0_POWER_MODE_LOC: u8 = 0;

// -- ACC_CONFIG1 --
pub const ACC_CONFIG1_RANGE_LOC: u8 = 6;
pub const ACC_CONFIG1_OSR_LOC: u8 = 4;
pub const ACC_CONFIG1_ODR_LOC: u8 = 0;

// -- ACC_CONFIG2 --
pub const ACC_CONFIG2_DATA_SRC_LOC: u8 = 2;

pub const ACC_DATA_MASK_MSB: u8 = 0x0F;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelScale {
    G2  = 0x00,
    G4  = 0x01,
    G8  = 0x02,
    G16 = 0x03,
}

impl AccelScale {
    /// Full-scale range in g.
    pub const fn range_g(self) -> f32 {
        match self {
            AccelScale::G2 => 2.0,
            AccelScale::G4 => 4.0,
            AccelScale::G8 => 8.0,
            AccelScale::G16 => 16.0,
        }
    }
}

impl TryFrom<u8> for AccelScale {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(AccelScale::G2),
            0x01 => Ok(AccelScale::G4),
            0x02 => Ok(AccelScale::G8),
            0x03 => Ok(AccelScale::G16),
            other => Err(other),
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputDataRate {
    Hz12_5 = 0x05,
    Hz25   = 0x06,
    Hz50   = 0x07,
    Hz100  = 0x08,
    Hz200  = 0x09,
    Hz400  = 0x0A,
    Hz800  = 0x0B,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerMode {
    Sleep    = 0x00,
    LowPower = 0x01,
    Normal   = 0x02,
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Oversampling {
    Osr0 = 0x00,
    Osr1 = 0x01,
    Osr2 = 0x02,
    Osr3 = 0x03,
}

/// Data source for the output registers (ACC_CONFIG2.data_src_reg).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelFilter {
    Filt1   = 0x00,
    Filt2   = 0x01,
    FiltLp  = 0x02,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct IntConfig0Flags: u8 {
        const DRDY_INT_EN   = 1 << 7;
        const FWM_INT_EN    = 1 << 6;
        const FFULL_INT_EN  = 1 << 5;
        const GEN2_INT_EN   = 1 << 3;
        const GEN1_INT_EN   = 1 << 2;
        const ORIENTCH_INT_EN = 1 << 1;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct IntMapFlags: u8 {
        const DRDY      = 1 << 7;
        const FWM       = 1 << 6;
        const FFULL     = 1 << 5;
        const IENG_OVRRN = 1 << 4;
        const GEN2      = 1 << 3;
        const GEN1      = 1 << 2;
        const ORIENTCH  = 1 << 1;
        const WKUP      = 1 << 0;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Int12IoCtrlFlags: u8 {
        const INT2_OD   = 1 << 6;
        const INT2_LVL  = 1 << 5;
        const INT1_OD   = 1 << 2;
        const INT1_LVL  = 1 << 1;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct AutoLowPow1Flags: u8 {
        const AUTO_LP_TIMEOUT_1 = 1 << 3;
        const AUTO_LP_TIMEOUT_0 = 1 << 2;
        const GEN1_INT          = 1 << 1;
        const DRDY_LOWPOW_TRIG  = 1 << 0;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct AutoWakeup1Flags: u8 {
        const WKUP_TIMEOUT  = 1 << 2;
        const WKUP_INT      = 1 << 1;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SelfTestFlags: u8 {
        const ACC_SELF_TEST_SIGN = 1 << 3;
        const ACC_SELF_TEST_EN_Z = 1 << 2;
        const ACC_SELF_TEST_EN_Y = 1 << 1;
        const ACC_SELF_TEST_EN_X = 1 << 0;
    }
}

// -- WKUP_INT_CONFIG0 --
pub const WKUP_AXES_EN_LOC: u8 = 5;
pub const WKUP_NUM_SAMPLES_LOC: u8 = 2;
pub const WKUP_REFU_LOC: u8 = 0;
pub const WKUP_AXES_XYZ: u8 = 0b111;
/// n + 1 samples must satisfy the wakeup condition.
pub const WKUP_NUM_SAMPLES_4: u8 = 0b011;
/// Reference updated on every entry into low-power mode.
pub const WKUP_REFU_ONE_TIME: u8 = 0b01;

/// Wakeup threshold at the 2 g range, 6.25 mg per count (50 mg).
pub const WKUP_THRESHOLD_2G_COUNTS: u8 = 8;

// -- GEN1INT_CONFIG0 --
pub const GEN1_ACT_AXES_LOC: u8 = 5;
pub const GEN1_DATA_SRC_LOC: u8 = 4;
pub const GEN1_REFU_LOC: u8 = 2;
pub const GEN1_HYST_LOC: u8 = 0;
pub const GEN1_ACT_AXES_XYZ: u8 = 0b111;
/// Generator fed from acc_filt2 (fixed 100 Hz).
pub const GEN1_DATA_SRC_FILT2: u8 = 0b1;
pub const GEN1_REFU_EVERY_TIME: u8 = 0b10;
/// 48 mg hysteresis.
pub const GEN1_HYST_48MG: u8 = 0b10;

// -- GEN1INT_CONFIG1 --
/// Inactivity criterion, AND of the enabled axes.
pub const GEN1_CRITERION_INACTIVITY_AND: u8 = 0x01;
/// 24 mg at 8 mg per count.
pub const GEN1_THRESHOLD_24MG: u8 = 0x03;
/// Condition evaluated over 64 samples.
pub const GEN1_DURATION_64_SAMPLES: u8 = 0x40;
