use crate::core::models::compound::CompoundKind;
use crate::core::models::ids::{AtomId, CompoundId, GroupId};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::BTreeSet;

/// Registry-side view of a structure atom.
///
/// Besides the identity and coordinates copied from the structure, it keeps
/// the classification of its parent compound and the set of registered
/// groups that contain it. The covalent adjacency lives once in the registry
/// and is shared by every group referencing the atom.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedAtom {
    pub id: AtomId,
    pub serial: u32,
    pub name: String,
    pub element: String,
    pub position: Point3<f64>,
    pub compound_id: CompoundId,
    pub compound_kind: CompoundKind,
    pub is_target: bool,
    pub(crate) groups: BTreeSet<GroupId>,
}

impl ExtendedAtom {
    /// Snapshot of a structure atom. Returns `None` if the atom or its
    /// compound is unknown.
    pub fn from_structure(structure: &Structure, atom_id: AtomId) -> Option<Self> {
        let atom = structure.atom(atom_id)?;
        let compound = structure.compound(atom.compound_id)?;
        Some(Self {
            id: atom_id,
            serial: atom.serial,
            name: atom.name.clone(),
            element: atom.element.clone(),
            position: atom.position,
            compound_id: atom.compound_id,
            compound_kind: compound.kind,
            is_target: compound.is_target(),
            groups: BTreeSet::new(),
        })
    }

    /// Groups that currently contain this atom.
    pub fn groups(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }

    pub(crate) fn add_group(&mut self, group: GroupId) {
        self.groups.insert(group);
    }

    pub(crate) fn remove_group(&mut self, group: GroupId) {
        self.groups.remove(&group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use slotmap::KeyData;

    #[test]
    fn from_structure_copies_atom_and_compound_properties() {
        let mut structure = Structure::new();
        let chain = structure.add_chain('L');
        let lig = structure
            .add_compound(chain, 900, "LIG", CompoundKind::Hetatm)
            .unwrap();
        structure.set_target(lig, true).unwrap();
        let atom_id = structure
            .add_atom(Atom::new(42, "C1", "C", lig, Point3::new(1.0, 2.0, 3.0)))
            .unwrap();

        let extended = ExtendedAtom::from_structure(&structure, atom_id).unwrap();
        assert_eq!(extended.serial, 42);
        assert_eq!(extended.name, "C1");
        assert_eq!(extended.compound_kind, CompoundKind::Hetatm);
        assert!(extended.is_target);
        assert!(extended.groups().is_empty());
    }

    #[test]
    fn group_back_references_are_a_set() {
        let mut structure = Structure::new();
        let chain = structure.add_chain('A');
        let res = structure
            .add_compound(chain, 1, "GLY", CompoundKind::Residue)
            .unwrap();
        let atom_id = structure
            .add_atom(Atom::new(1, "CA", "C", res, Point3::origin()))
            .unwrap();
        let mut extended = ExtendedAtom::from_structure(&structure, atom_id).unwrap();
        let group = GroupId::from(KeyData::from_ffi(5));

        extended.add_group(group);
        extended.add_group(group);
        assert_eq!(extended.groups().len(), 1);
        extended.remove_group(group);
        assert!(extended.groups().is_empty());
    }
}
