use crate::registers::*;
use crate::types::ConfigurationProfile;

/// ACC_CONFIG0 needs 1.5 ms after a power-mode change before the next write.
pub const POWER_MODE_SETTLE_MS: u32 = 2;

/// Number of writes issued by [`config_sequence`].
pub const CONFIG_SEQUENCE_LEN: usize = 15;

pub const CONFIG_RESET: &[RegConfig<Reg>] = &[
    RegConfig::write(Reg::Cmd, CMD_SOFT_RESET),
];

pub const CONFIG_NO_MOTION_ENABLE: &[RegConfig<Reg>] = &[
    RegConfig::write(Reg::IntConfig0, IntConfig0Flags::GEN1_INT_EN.bits()),
];

pub const CONFIG_NO_MOTION_DISABLE: &[RegConfig<Reg>] = &[
    RegConfig::write(Reg::IntConfig0, IntConfig0Flags::empty().bits()),
];

/// Fixed ±4 g, OSR3, 100 Hz setup used while exciting the self-test.
pub const CONFIG_SELF_TEST_SETUP: &[RegConfig<Reg>] = &[
    RegConfig::write_then_wait(
        Reg::AccConfig0,
        1 << ACC_CONFIG0_FILT1_BW_LOC
            | (Oversampling::Osr3 as u8) << ACC_CONFIG0_OSR_LP_LOC
            | (PowerMode::Normal as u8) << ACC_CONFIG0_POWER_MODE_LOC,
        POWER_MODE_SETTLE_MS,
    ),
    RegConfig::write(
        Reg::AccConfig1,
        (AccelScale::G4 as u8) << ACC_CONFIG1_RANGE_LOC
            | (Oversampling::Osr3 as u8) << ACC_CONFIG1_OSR_LOC
            | (OutputDataRate::Hz100 as u8) << ACC_CONFIG1_ODR_LOC,
    ),
    RegConfig::write(Reg::AccConfig2, (AccelFilter::Filt1 as u8) << ACC_CONFIG2_DATA_SRC_LOC),
];

pub const CONFIG_SELF_TEST_POSITIVE: &[RegConfig<Reg>] = &[
    RegConfig::write(
        Reg::SelfTest,
        SelfTestFlags::ACC_SELF_TEST_EN_X.bits()
            | SelfTestFlags::ACC_SELF_TEST_EN_Y.bits()
            | SelfTestFlags::ACC_SELF_TEST_EN_Z.bits(),
    ),
];

pub const CONFIG_SELF_TEST_NEGATIVE: &[RegConfig<Reg>] = &[
    RegConfig::write(
        Reg::SelfTest,
        SelfTestFlags::ACC_SELF_TEST_SIGN.bits()
            | SelfTestFlags::ACC_SELF_TEST_EN_X.bits()
            | SelfTestFlags::ACC_SELF_TEST_EN_Y.bits()
            | SelfTestFlags::ACC_SELF_TEST_EN_Z.bits(),
    ),
];

pub const CONFIG_SELF_TEST_DISABLE: &[RegConfig<Reg>] = &[
    RegConfig::write(Reg::SelfTest, SelfTestFlags::empty().bits()),
];

/// A write of the configuration sequence tagged with its documented step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencedWrite {
    pub step: u8,
    pub entry: RegConfig<Reg>,
}

const fn at(step: u8, entry: RegConfig<Reg>) -> SequencedWrite {
    SequencedWrite { step, entry }
}

/// Wakeup threshold in counts for the active range. The comparator works on
/// 6.25 mg per count at 2 g and the step doubles with every range.
pub const fn wakeup_threshold_counts(scale: AccelScale) -> u8 {
    WKUP_THRESHOLD_2G_COUNTS >> (scale as u8)
}

pub const fn acc_config0(profile: &ConfigurationProfile) -> u8 {
    1 << ACC_CONFIG0_FILT1_BW_LOC
        | (profile.oversampling as u8) << ACC_CONFIG0_OSR_LP_LOC
        | (profile.power_mode as u8) << ACC_CONFIG0_POWER_MODE_LOC
}

pub const fn acc_config1(profile: &ConfigurationProfile) -> u8 {
    (profile.scale as u8) << ACC_CONFIG1_RANGE_LOC
        | (profile.oversampling as u8) << ACC_CONFIG1_OSR_LOC
        | (profile.odr as u8) << ACC_CONFIG1_ODR_LOC
}

pub const fn acc_config2(profile: &ConfigurationProfile) -> u8 {
    (profile.filter as u8) << ACC_CONFIG2_DATA_SRC_LOC
}

/// Full ordered write list that puts the sensor into `profile`.
///
/// Wakeup interrupt goes to INT1, the GEN1 no-motion generator to INT2, and
/// GEN1 also drives the automatic switch to low power.
pub const fn config_sequence(profile: &ConfigurationProfile) -> [SequencedWrite; CONFIG_SEQUENCE_LEN] {
    [
        at(1, RegConfig::write_then_wait(Reg::AccConfig0, acc_config0(profile), POWER_MODE_SETTLE_MS)),
        at(2, RegConfig::write(Reg::AccConfig1, acc_config1(profile))),
        at(3, RegConfig::write(Reg::AccConfig2, acc_config2(profile))),
        at(4, RegConfig::write(Reg::AutoLowPow1, AutoLowPow1Flags::GEN1_INT.bits())),
        at(5, RegConfig::write(Reg::AutoWakeup1, AutoWakeup1Flags::WKUP_INT.bits())),
        at(6, RegConfig::write(
            Reg::WkupIntConfig0,
            WKUP_AXES_XYZ << WKUP_AXES_EN_LOC
                | WKUP_NUM_SAMPLES_4 << WKUP_NUM_SAMPLES_LOC
                | WKUP_REFU_ONE_TIME << WKUP_REFU_LOC,
        )),
        at(6, RegConfig::write(Reg::WkupIntConfig1, wakeup_threshold_counts(profile.scale))),
        at(7, RegConfig::write(Reg::Int1Map, IntMapFlags::WKUP.bits())),
        at(7, RegConfig::write(Reg::Int2Map, IntMapFlags::GEN1.bits())),
        at(8, RegConfig::write(
            Reg::Int12IoCtrl,
            Int12IoCtrlFlags::INT2_LVL.bits() | Int12IoCtrlFlags::INT1_LVL.bits(),
        )),
        at(9, RegConfig::write(
            Reg::Gen1IntConfig0,
            GEN1_ACT_AXES_XYZ << GEN1_ACT_AXES_LOC
                | GEN1_DATA_SRC_FILT2 << GEN1_DATA_SRC_LOC
                | GEN1_REFU_EVERY_TIME << GEN1_REFU_LOC
                | GEN1_HYST_48MG << GEN1_HYST_LOC,
        )),
        at(9, RegConfig::write(Reg::Gen1IntConfig1, GEN1_CRITERION_INACTIVITY_AND)),
        at(9, RegConfig::write(Reg::Gen1IntConfig2, GEN1_THRESHOLD_24MG)),
        at(9, RegConfig::write(Reg::Gen1IntConfig31, GEN1_DURATION_64_SAMPLES)),
        at(10, RegConfig::write(Reg::IntConfig0, IntConfig0Flags::GEN1_INT_EN.bits())),
    ]
}
