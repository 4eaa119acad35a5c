use super::atom::Atom;
use super::chain::Chain;
use super::compound::{Compound, CompoundKind};
use super::ids::{AtomId, ChainId, CompoundId};
use kiddo::{KdTree, SquaredEuclidean};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

/// A complete 3-D assembly: chains of compounds made of atoms, plus the
/// covalent bonds between them.
///
/// Compounds keep the order in which they were added, which is also the
/// order in which they are perceived and reported.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for compounds.
    compounds: SlotMap<CompoundId, Compound>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Compounds in structure order.
    compound_order: Vec<CompoundId>,
    /// List of all bonds, each stored once.
    bonds: Vec<(AtomId, AtomId)>,
    /// Lookup map for finding compounds by chain ID and sequence number.
    compound_id_map: HashMap<(ChainId, isize), CompoundId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Lookup map from source serial numbers to atom IDs.
    serial_map: HashMap<u32, AtomId>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn compound(&self, id: CompoundId) -> Option<&Compound> {
        self.compounds.get(id)
    }

    /// Iterates compounds in structure order.
    pub fn compounds_iter(&self) -> impl Iterator<Item = (CompoundId, &Compound)> {
        self.compound_order
            .iter()
            .filter_map(|&id| self.compounds.get(id).map(|c| (id, c)))
    }

    pub fn compound_count(&self) -> usize {
        self.compound_order.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    pub fn bonds(&self) -> &[(AtomId, AtomId)] {
        &self.bonds
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    pub fn find_compound(&self, chain_id: ChainId, number: isize) -> Option<CompoundId> {
        self.compound_id_map.get(&(chain_id, number)).copied()
    }

    pub fn atom_by_serial(&self, serial: u32) -> Option<AtomId> {
        self.serial_map.get(&serial).copied()
    }

    /// Adds a new chain or returns the existing one with the same identifier.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        *self
            .chain_id_map
            .entry(id)
            .or_insert_with(|| self.chains.insert(Chain::new(id)))
    }

    /// Adds a compound to a chain or returns the existing one.
    ///
    /// This method is idempotent on `(chain_id, number)`. Returns `None` if
    /// the chain doesn't exist.
    pub fn add_compound(
        &mut self,
        chain_id: ChainId,
        number: isize,
        name: &str,
        kind: CompoundKind,
    ) -> Option<CompoundId> {
        let chain = self.chains.get_mut(chain_id)?;
        if let Some(&existing) = self.compound_id_map.get(&(chain_id, number)) {
            return Some(existing);
        }

        let compound_id = self
            .compounds
            .insert(Compound::new(number, name, kind, chain_id));
        self.compound_id_map.insert((chain_id, number), compound_id);
        self.compound_order.push(compound_id);
        chain.compounds.push(compound_id);
        Some(compound_id)
    }

    /// Adds an atom to the compound named by `atom.compound_id`.
    ///
    /// Returns `None` if the compound doesn't exist or the serial number is
    /// already taken.
    pub fn add_atom(&mut self, atom: Atom) -> Option<AtomId> {
        if !self.compounds.contains_key(atom.compound_id)
            || self.serial_map.contains_key(&atom.serial)
        {
            return None;
        }

        let compound_id = atom.compound_id;
        let name = atom.name.clone();
        let serial = atom.serial;

        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        self.serial_map.insert(serial, atom_id);
        self.compounds.get_mut(compound_id)?.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Idempotent; adding an existing bond succeeds without creating
    /// duplicates. Self-bonds and unknown atoms yield `None`.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if self.bond_adjacency[atom1_id].contains(&atom2_id) {
            return Some(());
        }

        self.bonds.push((atom1_id, atom2_id));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    pub fn bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Marks a compound as a perception target. Returns `None` for an unknown id.
    pub fn set_target(&mut self, compound_id: CompoundId, target: bool) -> Option<()> {
        self.compounds.get_mut(compound_id)?.target = target;
        Some(())
    }

    pub fn target_compounds(&self) -> impl Iterator<Item = CompoundId> + '_ {
        self.compounds_iter()
            .filter(|(_, c)| c.is_target())
            .map(|(id, _)| id)
    }

    fn neighbor_in_chain(&self, compound_id: CompoundId, offset: isize) -> Option<CompoundId> {
        let compound = self.compounds.get(compound_id)?;
        let chain = self.chains.get(compound.chain_id)?;
        let position = chain.position_of(compound_id)? as isize + offset;
        if position < 0 {
            return None;
        }
        chain.compounds.get(position as usize).copied()
    }

    /// The compound preceding `compound_id` in its chain, if any.
    pub fn previous_in_chain(&self, compound_id: CompoundId) -> Option<CompoundId> {
        self.neighbor_in_chain(compound_id, -1)
    }

    /// The compound following `compound_id` in its chain, if any.
    pub fn next_in_chain(&self, compound_id: CompoundId) -> Option<CompoundId> {
        self.neighbor_in_chain(compound_id, 1)
    }

    /// Zero-based position of the compound within its chain.
    pub fn chain_index(&self, compound_id: CompoundId) -> Option<usize> {
        let compound = self.compounds.get(compound_id)?;
        self.chains.get(compound.chain_id)?.position_of(compound_id)
    }

    /// Returns every compound with at least one atom within `radius` Angstroms
    /// of any atom of `compound_id`, the compound itself included, in
    /// structure order.
    pub fn proximal_compounds(&self, compound_id: CompoundId, radius: f64) -> Vec<CompoundId> {
        let Some(compound) = self.compounds.get(compound_id) else {
            return Vec::new();
        };

        let positions: Vec<[f64; 3]> = compound
            .atoms()
            .iter()
            .filter_map(|&id| self.atoms.get(id))
            .map(|atom| [atom.position.x, atom.position.y, atom.position.z])
            .collect();

        if positions.is_empty() {
            return vec![compound_id];
        }

        let kdtree: KdTree<f64, 3> = (&positions).into();
        let radius_sq = radius * radius;

        self.compounds_iter()
            .filter(|&(other_id, other)| {
                other_id == compound_id
                    || other.atoms().iter().any(|&atom_id| {
                        self.atoms.get(atom_id).is_some_and(|atom| {
                            let query = [atom.position.x, atom.position.y, atom.position.z];
                            kdtree.nearest_one::<SquaredEuclidean>(&query).distance <= radius_sq
                        })
                    })
            })
            .map(|(id, _)| id)
            .collect()
    }
}
