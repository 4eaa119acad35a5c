use super::ids::CompoundId;
use crate::core::utils::elements;
use nalgebra::Point3;

/// An atom as supplied by the structure provider.
///
/// Atoms are stored in the [`Structure`](super::structure::Structure) arena and
/// referenced everywhere else through their [`AtomId`](super::ids::AtomId).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source structure; unique within one structure.
    pub serial: u32,
    /// The atom name (e.g., "CA", "N", "O").
    pub name: String,
    /// Element symbol, stored upper-case (e.g., "C", "CL").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Alternate location indicator, if any.
    pub altloc: Option<char>,
    /// The ID of the compound this atom belongs to.
    pub compound_id: CompoundId,
}

impl Atom {
    pub fn new(
        serial: u32,
        name: &str,
        element: &str,
        compound_id: CompoundId,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.trim().to_string(),
            element: elements::normalize_symbol(element),
            position,
            altloc: None,
            compound_id,
        }
    }

    pub fn with_altloc(mut self, altloc: char) -> Self {
        self.altloc = Some(altloc);
        self
    }

    pub fn is_hydrogen(&self) -> bool {
        elements::is_hydrogen_symbol(&self.element)
    }

    pub fn atomic_number(&self) -> Option<u8> {
        elements::atomic_number(&self.element)
    }

    /// Only the first alternate location ('A') or atoms without one are kept
    /// when features are assigned.
    pub fn is_primary_location(&self) -> bool {
        matches!(self.altloc, None | Some('A') | Some(' '))
    }
}
