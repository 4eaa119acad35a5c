use super::ids::{AtomId, GroupId};
use crate::core::utils::hashing;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parameter name under which island merging records the contact distance.
pub const HYDROPHOBIC_DISTANCE_PARAM: &str = "dist_hydrop_inter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionType {
    Covalent,
    HydrogenBond,
    WeakHydrogenBond,
    Ionic,
    Repulsive,
    CationPi,
    PiStacking,
    AmideAromaticStacking,
    Hydrophobic,
    HalogenBond,
    ChalcogenBond,
    VanDerWaals,
    Proximal,
}

impl InteractionType {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionType::Covalent => "Covalent",
            InteractionType::HydrogenBond => "HydrogenBond",
            InteractionType::WeakHydrogenBond => "WeakHydrogenBond",
            InteractionType::Ionic => "Ionic",
            InteractionType::Repulsive => "Repulsive",
            InteractionType::CationPi => "CationPi",
            InteractionType::PiStacking => "PiStacking",
            InteractionType::AmideAromaticStacking => "AmideAromaticStacking",
            InteractionType::Hydrophobic => "Hydrophobic",
            InteractionType::HalogenBond => "HalogenBond",
            InteractionType::ChalcogenBond => "ChalcogenBond",
            InteractionType::VanDerWaals => "VanDerWaals",
            InteractionType::Proximal => "Proximal",
        }
    }

    pub fn code(&self) -> u64 {
        hashing::stable_code(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown interaction type: '{0}'")]
pub struct ParseInteractionTypeError(pub String);

impl FromStr for InteractionType {
    type Err = ParseInteractionTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "covalent" => Ok(InteractionType::Covalent),
            "hydrogenbond" | "hbond" => Ok(InteractionType::HydrogenBond),
            "weakhydrogenbond" | "weakhbond" => Ok(InteractionType::WeakHydrogenBond),
            "ionic" | "saltbridge" => Ok(InteractionType::Ionic),
            "repulsive" => Ok(InteractionType::Repulsive),
            "cationpi" => Ok(InteractionType::CationPi),
            "pistacking" => Ok(InteractionType::PiStacking),
            "amidearomaticstacking" | "amidepistacking" => {
                Ok(InteractionType::AmideAromaticStacking)
            }
            "hydrophobic" => Ok(InteractionType::Hydrophobic),
            "halogenbond" => Ok(InteractionType::HalogenBond),
            "chalcogenbond" => Ok(InteractionType::ChalcogenBond),
            "vanderwaals" | "vdw" => Ok(InteractionType::VanDerWaals),
            "proximal" => Ok(InteractionType::Proximal),
            _ => Err(ParseInteractionTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed edge between two atom groups.
///
/// `src_interacting_atoms` and `trgt_interacting_atoms` hold the subsets of
/// each group's atoms that take part in the contact; empty means the whole
/// group.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub kind: InteractionType,
    pub src: GroupId,
    pub trgt: GroupId,
    pub src_interacting_atoms: BTreeSet<AtomId>,
    pub trgt_interacting_atoms: BTreeSet<AtomId>,
    pub params: BTreeMap<String, f64>,
}

impl Interaction {
    pub fn new(kind: InteractionType, src: GroupId, trgt: GroupId) -> Self {
        Self {
            kind,
            src,
            trgt,
            src_interacting_atoms: BTreeSet::new(),
            trgt_interacting_atoms: BTreeSet::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_interacting_atoms(
        mut self,
        src_atoms: impl IntoIterator<Item = AtomId>,
        trgt_atoms: impl IntoIterator<Item = AtomId>,
    ) -> Self {
        self.src_interacting_atoms = src_atoms.into_iter().collect();
        self.trgt_interacting_atoms = trgt_atoms.into_iter().collect();
        self
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    pub fn involves(&self, group: GroupId) -> bool {
        self.src == group || self.trgt == group
    }

    /// The endpoint opposite to `group`, if `group` is an endpoint.
    pub fn partner_of(&self, group: GroupId) -> Option<GroupId> {
        if self.src == group {
            Some(self.trgt)
        } else if self.trgt == group {
            Some(self.src)
        } else {
            None
        }
    }

    /// Identity used to deduplicate interactions: the type plus the unordered
    /// pair of endpoints.
    pub(crate) fn dedup_key(&self) -> (InteractionType, GroupId, GroupId) {
        if self.src <= self.trgt {
            (self.kind, self.src, self.trgt)
        } else {
            (self.kind, self.trgt, self.src)
        }
    }

    /// Folds a duplicate of this interaction into it. A duplicate running the
    /// other way contributes its atoms to the opposite sides.
    pub(crate) fn absorb(&mut self, other: Interaction) {
        let (src_atoms, trgt_atoms) = if other.src == self.src {
            (other.src_interacting_atoms, other.trgt_interacting_atoms)
        } else {
            (other.trgt_interacting_atoms, other.src_interacting_atoms)
        };
        self.src_interacting_atoms.extend(src_atoms);
        self.trgt_interacting_atoms.extend(trgt_atoms);
        self.params.extend(other.params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn gid(n: u64) -> GroupId {
        GroupId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn interaction_type_parses_aliases() {
        assert_eq!("Hydrogen bond".parse::<InteractionType>(), Ok(InteractionType::HydrogenBond));
        assert_eq!("vdw".parse::<InteractionType>(), Ok(InteractionType::VanDerWaals));
        assert_eq!("Salt-Bridge".parse::<InteractionType>(), Ok(InteractionType::Ionic));
        assert!("telepathy".parse::<InteractionType>().is_err());
    }

    #[test]
    fn partner_of_returns_opposite_endpoint() {
        let inter = Interaction::new(InteractionType::Ionic, gid(1), gid(2));
        assert_eq!(inter.partner_of(gid(1)), Some(gid(2)));
        assert_eq!(inter.partner_of(gid(2)), Some(gid(1)));
        assert_eq!(inter.partner_of(gid(3)), None);
        assert!(inter.involves(gid(2)));
    }

    #[test]
    fn dedup_key_ignores_endpoint_direction() {
        let forward = Interaction::new(InteractionType::CationPi, gid(1), gid(2));
        let backward = Interaction::new(InteractionType::CationPi, gid(2), gid(1));
        assert_eq!(forward.dedup_key(), backward.dedup_key());
        let other = Interaction::new(InteractionType::PiStacking, gid(1), gid(2));
        assert_ne!(forward.dedup_key(), other.dedup_key());
    }

    #[test]
    fn builder_methods_record_atoms_and_params() {
        let atom = AtomId::from(KeyData::from_ffi(9));
        let inter = Interaction::new(InteractionType::Hydrophobic, gid(1), gid(2))
            .with_interacting_atoms([atom], Vec::new())
            .with_param(HYDROPHOBIC_DISTANCE_PARAM, 3.9);
        assert!(inter.src_interacting_atoms.contains(&atom));
        assert!(inter.trgt_interacting_atoms.is_empty());
        assert_eq!(inter.param(HYDROPHOBIC_DISTANCE_PARAM), Some(3.9));
        assert_eq!(inter.param("missing"), None);
    }
}
