use super::ids::{AtomId, ChainId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Classification of a compound, used both for group classification and as
/// the optional compound class qualifier of level-0 shell identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompoundKind {
    Residue,
    Nucleotide,
    Hetatm,
    Water,
}

#[derive(Debug, Error)]
#[error("Invalid compound kind string: '{0}'")]
pub struct ParseCompoundKindError(pub String);

impl FromStr for CompoundKind {
    type Err = ParseCompoundKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residue" | "aminoacid" | "amino_acid" => Ok(CompoundKind::Residue),
            "nucleotide" => Ok(CompoundKind::Nucleotide),
            "hetatm" | "ligand" => Ok(CompoundKind::Hetatm),
            "water" => Ok(CompoundKind::Water),
            _ => Err(ParseCompoundKindError(s.to_string())),
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CompoundKind::Residue => "Residue",
                CompoundKind::Nucleotide => "Nucleotide",
                CompoundKind::Hetatm => "Hetatm",
                CompoundKind::Water => "Water",
            }
        )
    }
}

impl CompoundKind {
    /// Polymer building blocks take part in inter-compound linkage.
    pub fn is_polymer_unit(&self) -> bool {
        matches!(self, CompoundKind::Residue | CompoundKind::Nucleotide)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    pub name: String,                       // Compound name (e.g., "ALA", "HOH", "LIG")
    pub number: isize,                      // Sequence number from the source structure
    pub kind: CompoundKind,                 // Residue, nucleotide, hetero group or water
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) target: bool,                // Whether groups should be perceived for it
    pub(crate) atoms: Vec<AtomId>,          // Atoms in insertion order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Compound {
    pub(crate) fn new(number: isize, name: &str, kind: CompoundKind, chain_id: ChainId) -> Self {
        Self {
            name: name.trim().to_uppercase(),
            number,
            kind,
            chain_id,
            target: false,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        // The first atom of a given name wins, matching the primary altloc.
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    pub fn is_target(&self) -> bool {
        self.target
    }

    pub fn is_water(&self) -> bool {
        self.kind == CompoundKind::Water
    }

    pub fn is_residue(&self) -> bool {
        self.kind == CompoundKind::Residue
    }

    pub fn is_hetatm(&self) -> bool {
        self.kind == CompoundKind::Hetatm
    }

    pub fn is_nucleotide(&self) -> bool {
        self.kind == CompoundKind::Nucleotide
    }
}
