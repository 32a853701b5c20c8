//! Closed vocabularies used by the schema and the API.
//!
//! Every vocabulary is an ordered set of named integer codes. The codes are
//! stable and start at 1; the names are what the database enum types and the
//! JSON representation carry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: i32 },

    #[error("unknown {kind} name: '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

/// Shared lookup behaviour for all vocabularies.
pub trait Vocabulary: Sized + Copy + PartialEq + 'static {
    /// Name of the vocabulary, also used as the Postgres enum type name.
    const KIND: &'static str;

    /// Members in declaration order.
    const ALL: &'static [Self];

    fn code(self) -> i32;

    fn name(self) -> &'static str;

    fn from_code(code: i32) -> Result<Self, VocabularyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.code() == code)
            .ok_or(VocabularyError::UnknownCode {
                kind: Self::KIND,
                code,
            })
    }

    fn from_name(name: &str) -> Result<Self, VocabularyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.name() == name)
            .ok_or_else(|| VocabularyError::UnknownName {
                kind: Self::KIND,
                name: name.to_string(),
            })
    }

    /// Resolves either a numeric code or a member name.
    fn parse(input: &str) -> Result<Self, VocabularyError> {
        let input = input.trim();
        match input.parse::<i32>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Self::from_name(input),
        }
    }
}

macro_rules! vocabulary_text {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = VocabularyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Vocabulary>::parse(s)
            }
        }
    };
    ($ty:ty, display) => {
        vocabulary_text!($ty);

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Pointed,
    Survey,
}

impl Vocabulary for MissionType {
    const KIND: &'static str = "mission_type";
    const ALL: &'static [Self] = &[Self::Pointed, Self::Survey];

    fn code(self) -> i32 {
        match self {
            Self::Pointed => 1,
            Self::Survey => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Pointed => "pointed",
            Self::Survey => "survey",
        }
    }
}

vocabulary_text!(MissionType, display);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "observatory_type")]
#[serde(rename_all = "snake_case")]
pub enum ObservatoryType {
    #[sea_orm(string_value = "space_based")]
    SpaceBased,
    #[sea_orm(string_value = "ground_based")]
    GroundBased,
}

impl Vocabulary for ObservatoryType {
    const KIND: &'static str = "observatory_type";
    const ALL: &'static [Self] = &[Self::SpaceBased, Self::GroundBased];

    fn code(self) -> i32 {
        match self {
            Self::SpaceBased => 1,
            Self::GroundBased => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::SpaceBased => "space_based",
            Self::GroundBased => "ground_based",
        }
    }
}

vocabulary_text!(ObservatoryType, display);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "schedule_status")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl Vocabulary for ScheduleStatus {
    const KIND: &'static str = "schedule_status";
    const ALL: &'static [Self] = &[Self::Planned, Self::Completed, Self::Canceled];

    fn code(self) -> i32 {
        match self {
            Self::Planned => 1,
            Self::Completed => 2,
            Self::Canceled => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

vocabulary_text!(ScheduleStatus, display);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "schedule_type")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    #[sea_orm(string_value = "low_fidelity")]
    LowFidelity,
    #[sea_orm(string_value = "high_fidelity")]
    HighFidelity,
    #[sea_orm(string_value = "as_executed")]
    AsExecuted,
}

impl Vocabulary for ScheduleType {
    const KIND: &'static str = "schedule_type";
    const ALL: &'static [Self] = &[Self::LowFidelity, Self::HighFidelity, Self::AsExecuted];

    fn code(self) -> i32 {
        match self {
            Self::LowFidelity => 1,
            Self::HighFidelity => 2,
            Self::AsExecuted => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::LowFidelity => "low_fidelity",
            Self::HighFidelity => "high_fidelity",
            Self::AsExecuted => "as_executed",
        }
    }
}

vocabulary_text!(ScheduleType, display);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "observation_status")]
#[serde(rename_all = "snake_case")]
pub enum ObservationStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl Vocabulary for ObservationStatus {
    const KIND: &'static str = "observation_status";
    const ALL: &'static [Self] = &[Self::Planned, Self::Completed, Self::Canceled];

    fn code(self) -> i32 {
        match self {
            Self::Planned => 1,
            Self::Completed => 2,
            Self::Canceled => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

vocabulary_text!(ObservationStatus, display);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "observation_type")]
#[serde(rename_all = "snake_case")]
pub enum ObservationType {
    #[sea_orm(string_value = "photometric")]
    Photometric,
    #[sea_orm(string_value = "spectroscopic")]
    Spectroscopic,
}

impl Vocabulary for ObservationType {
    const KIND: &'static str = "observation_type";
    const ALL: &'static [Self] = &[Self::Photometric, Self::Spectroscopic];

    fn code(self) -> i32 {
        match self {
            Self::Photometric => 1,
            Self::Spectroscopic => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Photometric => "photometric",
            Self::Spectroscopic => "spectroscopic",
        }
    }
}

vocabulary_text!(ObservationType, display);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "depth_unit")]
#[serde(rename_all = "snake_case")]
pub enum DepthUnit {
    #[sea_orm(string_value = "ab_mag")]
    AbMag,
    #[sea_orm(string_value = "vega_mag")]
    VegaMag,
    #[sea_orm(string_value = "flux_erg")]
    FluxErg,
    #[sea_orm(string_value = "flux_jy")]
    FluxJy,
}

impl Vocabulary for DepthUnit {
    const KIND: &'static str = "depth_unit";
    const ALL: &'static [Self] = &[Self::AbMag, Self::VegaMag, Self::FluxErg, Self::FluxJy];

    fn code(self) -> i32 {
        match self {
            Self::AbMag => 1,
            Self::VegaMag => 2,
            Self::FluxErg => 3,
            Self::FluxJy => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::AbMag => "ab_mag",
            Self::VegaMag => "vega_mag",
            Self::FluxErg => "flux_erg",
            Self::FluxJy => "flux_jy",
        }
    }
}

impl DepthUnit {
    /// Human-readable label: identifier parts upper-cased and space separated.
    #[must_use]
    pub fn label(self) -> String {
        self.name()
            .split('_')
            .map(str::to_uppercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

vocabulary_text!(DepthUnit);

impl fmt::Display for DepthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[serde(rename_all = "snake_case")]
pub enum UserRoleType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "observatory_editor")]
    ObservatoryEditor,
    #[sea_orm(string_value = "schedule_editor")]
    ScheduleEditor,
    #[sea_orm(string_value = "observation_editor")]
    ObservationEditor,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl Vocabulary for UserRoleType {
    const KIND: &'static str = "user_role_type";
    const ALL: &'static [Self] = &[
        Self::Admin,
        Self::ObservatoryEditor,
        Self::ScheduleEditor,
        Self::ObservationEditor,
        Self::Viewer,
    ];

    fn code(self) -> i32 {
        match self {
            Self::Admin => 1,
            Self::ObservatoryEditor => 2,
            Self::ScheduleEditor => 3,
            Self::ObservationEditor => 4,
            Self::Viewer => 5,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ObservatoryEditor => "observatory_editor",
            Self::ScheduleEditor => "schedule_editor",
            Self::ObservationEditor => "observation_editor",
            Self::Viewer => "viewer",
        }
    }
}

vocabulary_text!(UserRoleType, display);

/// A family of physical units that share a base unit.
pub trait UnitFamily: Vocabulary {
    /// Multiplier taking a value in `self` to the family's base unit.
    fn scale(self) -> f64;

    fn to_base(self, value: f64) -> f64 {
        self.scale() * value
    }

    fn convert(self, value: f64, to: Self) -> f64 {
        self.to_base(value) / to.scale()
    }
}

/// Wavelength units, base unit angstrom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavelengthUnit {
    Nanometer,
    Angstrom,
    Micron,
}

impl Vocabulary for WavelengthUnit {
    const KIND: &'static str = "wavelength_unit";
    const ALL: &'static [Self] = &[Self::Nanometer, Self::Angstrom, Self::Micron];

    fn code(self) -> i32 {
        match self {
            Self::Nanometer => 1,
            Self::Angstrom => 2,
            Self::Micron => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Nanometer => "nanometer",
            Self::Angstrom => "angstrom",
            Self::Micron => "micron",
        }
    }
}

impl UnitFamily for WavelengthUnit {
    fn scale(self) -> f64 {
        match self {
            Self::Nanometer => 10.0,
            Self::Angstrom => 1.0,
            Self::Micron => 10_000.0,
        }
    }
}

vocabulary_text!(WavelengthUnit, display);

/// Energy units, base unit electronvolt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[serde(rename = "eV")]
    Ev,
    #[serde(rename = "keV")]
    Kev,
    #[serde(rename = "MeV")]
    Mev,
    #[serde(rename = "GeV")]
    Gev,
    #[serde(rename = "TeV")]
    Tev,
}

impl Vocabulary for EnergyUnit {
    const KIND: &'static str = "energy_unit";
    const ALL: &'static [Self] = &[Self::Ev, Self::Kev, Self::Mev, Self::Gev, Self::Tev];

    fn code(self) -> i32 {
        match self {
            Self::Ev => 1,
            Self::Kev => 2,
            Self::Mev => 3,
            Self::Gev => 4,
            Self::Tev => 5,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Ev => "eV",
            Self::Kev => "keV",
            Self::Mev => "MeV",
            Self::Gev => "GeV",
            Self::Tev => "TeV",
        }
    }
}

impl UnitFamily for EnergyUnit {
    fn scale(self) -> f64 {
        match self {
            Self::Ev => 1.0,
            Self::Kev => 1e3,
            Self::Mev => 1e6,
            Self::Gev => 1e9,
            Self::Tev => 1e12,
        }
    }
}

vocabulary_text!(EnergyUnit, display);

/// Frequency units, base unit hertz.
///
/// Codes follow the historical declaration order, which lists GHz before MHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyUnit {
    #[serde(rename = "Hz")]
    Hz,
    #[serde(rename = "kHz")]
    Khz,
    #[serde(rename = "GHz")]
    Ghz,
    #[serde(rename = "MHz")]
    Mhz,
    #[serde(rename = "THz")]
    Thz,
}

impl Vocabulary for FrequencyUnit {
    const KIND: &'static str = "frequency_unit";
    const ALL: &'static [Self] = &[Self::Hz, Self::Khz, Self::Ghz, Self::Mhz, Self::Thz];

    fn code(self) -> i32 {
        match self {
            Self::Hz => 1,
            Self::Khz => 2,
            Self::Ghz => 3,
            Self::Mhz => 4,
            Self::Thz => 5,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Hz => "Hz",
            Self::Khz => "kHz",
            Self::Ghz => "GHz",
            Self::Mhz => "MHz",
            Self::Thz => "THz",
        }
    }
}

impl UnitFamily for FrequencyUnit {
    fn scale(self) -> f64 {
        match self {
            Self::Hz => 1.0,
            Self::Khz => 1e3,
            Self::Mhz => 1e6,
            Self::Ghz => 1e9,
            Self::Thz => 1e12,
        }
    }
}

vocabulary_text!(FrequencyUnit, display);
