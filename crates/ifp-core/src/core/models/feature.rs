use crate::core::utils::hashing;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical role tag attached to an atom group.
///
/// The derived ordering follows declaration order and is the canonical order
/// in which a group stores its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Atom,
    Acceptor,
    Donor,
    WeakAcceptor,
    WeakDonor,
    Aromatic,
    Hydrophobic,
    Hydrophobe,
    PositivelyIonizable,
    NegativelyIonizable,
    Amide,
    ChalcogenDonor,
    HalogenDonor,
    HalogenAcceptor,
    Metal,
}

impl Feature {
    pub const ALL: [Feature; 15] = [
        Feature::Atom,
        Feature::Acceptor,
        Feature::Donor,
        Feature::WeakAcceptor,
        Feature::WeakDonor,
        Feature::Aromatic,
        Feature::Hydrophobic,
        Feature::Hydrophobe,
        Feature::PositivelyIonizable,
        Feature::NegativelyIonizable,
        Feature::Amide,
        Feature::ChalcogenDonor,
        Feature::HalogenDonor,
        Feature::HalogenAcceptor,
        Feature::Metal,
    ];

    /// Stable textual name, used for parsing, display and hashing.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Atom => "Atom",
            Feature::Acceptor => "Acceptor",
            Feature::Donor => "Donor",
            Feature::WeakAcceptor => "WeakAcceptor",
            Feature::WeakDonor => "WeakDonor",
            Feature::Aromatic => "Aromatic",
            Feature::Hydrophobic => "Hydrophobic",
            Feature::Hydrophobe => "Hydrophobe",
            Feature::PositivelyIonizable => "PositivelyIonizable",
            Feature::NegativelyIonizable => "NegativelyIonizable",
            Feature::Amide => "Amide",
            Feature::ChalcogenDonor => "ChalcogenDonor",
            Feature::HalogenDonor => "HalogenDonor",
            Feature::HalogenAcceptor => "HalogenAcceptor",
            Feature::Metal => "Metal",
        }
    }

    /// Hash code independent of declaration order.
    pub fn code(&self) -> u64 {
        hashing::stable_code(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown feature name: '{0}'")]
pub struct ParseFeatureError(pub String);

impl FromStr for Feature {
    type Err = ParseFeatureError;

    /// Case-insensitive; separators are ignored and the common short
    /// spellings (`PosIonizable`, `NegIonizable`) are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "atom" => Ok(Feature::Atom),
            "acceptor" => Ok(Feature::Acceptor),
            "donor" => Ok(Feature::Donor),
            "weakacceptor" => Ok(Feature::WeakAcceptor),
            "weakdonor" => Ok(Feature::WeakDonor),
            "aromatic" => Ok(Feature::Aromatic),
            "hydrophobic" => Ok(Feature::Hydrophobic),
            "hydrophobe" => Ok(Feature::Hydrophobe),
            "positivelyionizable" | "posionizable" => Ok(Feature::PositivelyIonizable),
            "negativelyionizable" | "negionizable" => Ok(Feature::NegativelyIonizable),
            "amide" => Ok(Feature::Amide),
            "chalcogendonor" => Ok(Feature::ChalcogenDonor),
            "halogendonor" => Ok(Feature::HalogenDonor),
            "halogenacceptor" => Ok(Feature::HalogenAcceptor),
            "metal" => Ok(Feature::Metal),
            _ => Err(ParseFeatureError(s.to_string())),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
