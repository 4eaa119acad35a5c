use super::extended::ExtendedAtom;
use super::group::AtomGroup;
use crate::core::models::feature::Feature;
use crate::core::models::ids::{AtomId, GroupId, InteractionId};
use crate::core::models::interaction::{Interaction, InteractionType};
use crate::core::models::structure::Structure;
use slotmap::{SecondaryMap, SlotMap};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Atom {0:?} is not registered")]
    UnknownAtom(AtomId),
    #[error("Atom group {0:?} is not registered")]
    UnknownGroup(GroupId),
    #[error("Interaction {0:?} is not registered")]
    UnknownInteraction(InteractionId),
    #[error("An atom group needs at least one atom")]
    EmptyGroup,
}

/// A group that has been described but not yet registered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupDraft {
    pub atoms: Vec<AtomId>,
    pub features: BTreeSet<Feature>,
}

impl GroupDraft {
    pub fn new(
        atoms: impl IntoIterator<Item = AtomId>,
        features: impl IntoIterator<Item = Feature>,
    ) -> Self {
        Self {
            atoms: atoms.into_iter().collect(),
            features: features.into_iter().collect(),
        }
    }
}

fn group_key(atoms: &[AtomId]) -> Vec<AtomId> {
    let mut key = atoms.to_vec();
    key.sort_unstable();
    key.dedup();
    key
}

/// Canonical, deduplicated collection of the atom groups of one analysis unit.
///
/// The registry owns the extended atoms, the covalent adjacency shared by
/// all groups, the groups themselves and the interactions between them.
/// At most one group exists per atom set, and every recursive group is
/// listed in the back-reference set of each of its atoms.
#[derive(Debug, Clone, Default)]
pub struct AtomGroupRegistry {
    atoms: SecondaryMap<AtomId, ExtendedAtom>,
    serial_map: HashMap<u32, AtomId>,
    adjacency: SecondaryMap<AtomId, BTreeMap<AtomId, u32>>,
    groups: SlotMap<GroupId, AtomGroup>,
    order: Vec<GroupId>,
    index: HashMap<Vec<AtomId>, GroupId>,
    interactions: SlotMap<InteractionId, Interaction>,
    interaction_index: HashMap<(InteractionType, GroupId, GroupId), InteractionId>,
    holders: SecondaryMap<InteractionId, BTreeSet<GroupId>>,
}

impl AtomGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Atoms and covalent graph ---

    /// Registers a structure atom. Registering the same atom twice is a no-op.
    pub fn register_atom(
        &mut self,
        structure: &Structure,
        atom_id: AtomId,
    ) -> Result<(), RegistryError> {
        if self.atoms.contains_key(atom_id) {
            return Ok(());
        }
        let extended = ExtendedAtom::from_structure(structure, atom_id)
            .ok_or(RegistryError::UnknownAtom(atom_id))?;
        self.serial_map.insert(extended.serial, atom_id);
        self.atoms.insert(atom_id, extended);
        self.adjacency.insert(atom_id, BTreeMap::new());
        Ok(())
    }

    pub fn contains_atom(&self, atom_id: AtomId) -> bool {
        self.atoms.contains_key(atom_id)
    }

    pub fn atom(&self, atom_id: AtomId) -> Option<&ExtendedAtom> {
        self.atoms.get(atom_id)
    }

    pub fn atom_by_serial(&self, serial: u32) -> Option<AtomId> {
        self.serial_map.get(&serial).copied()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Records a weighted covalent edge between two registered atoms.
    pub fn add_bond(&mut self, a: AtomId, b: AtomId, weight: u32) -> Result<(), RegistryError> {
        for id in [a, b] {
            if !self.atoms.contains_key(id) {
                return Err(RegistryError::UnknownAtom(id));
            }
        }
        if a == b {
            return Ok(());
        }
        self.adjacency[a].insert(b, weight);
        self.adjacency[b].insert(a, weight);
        Ok(())
    }

    pub fn bonded_neighbors(&self, atom_id: AtomId) -> Option<&BTreeMap<AtomId, u32>> {
        self.adjacency.get(atom_id)
    }

    // --- Groups ---

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn group(&self, id: GroupId) -> Option<&AtomGroup> {
        self.groups.get(id)
    }

    /// Iterates groups in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &AtomGroup)> {
        self.order
            .iter()
            .filter_map(|&id| self.groups.get(id).map(|g| (id, g)))
    }

    /// Exact lookup by atom set; the order of `atoms` is irrelevant.
    pub fn find(&self, atoms: &[AtomId]) -> Option<GroupId> {
        self.index.get(&group_key(atoms)).copied()
    }

    fn insert_group(&mut self, group: AtomGroup) -> GroupId {
        let key = group.atoms().to_vec();
        let recursive = group.is_recursive();
        let id = self.groups.insert(group);
        if recursive {
            for atom_id in key.iter() {
                if let Some(atom) = self.atoms.get_mut(*atom_id) {
                    atom.add_group(id);
                }
            }
        }
        self.index.insert(key, id);
        self.order.push(id);
        id
    }

    fn build_group(
        &self,
        atoms: &[AtomId],
        features: impl IntoIterator<Item = Feature>,
        recursive: bool,
        parent: Option<GroupId>,
    ) -> Result<AtomGroup, RegistryError> {
        let mut members = Vec::with_capacity(atoms.len());
        for &atom_id in atoms {
            members.push(
                self.atoms
                    .get(atom_id)
                    .ok_or(RegistryError::UnknownAtom(atom_id))?,
            );
        }
        AtomGroup::from_members(members, features, recursive, parent)
            .ok_or(RegistryError::EmptyGroup)
    }

    /// Inserts every draft whose atom set is not registered yet.
    ///
    /// Returns one id per draft, the pre-existing id for duplicates, whose
    /// features are left untouched.
    pub fn add(
        &mut self,
        drafts: impl IntoIterator<Item = GroupDraft>,
    ) -> Result<Vec<GroupId>, RegistryError> {
        let mut ids = Vec::new();
        for draft in drafts {
            if let Some(existing) = self.find(&draft.atoms) {
                ids.push(existing);
                continue;
            }
            let group = self.build_group(&draft.atoms, draft.features, true, None)?;
            ids.push(self.insert_group(group));
        }
        Ok(ids)
    }

    /// Returns the group for `atoms`, creating it if needed, after merging in
    /// `features` and `interactions`.
    pub fn upsert(
        &mut self,
        atoms: &[AtomId],
        features: impl IntoIterator<Item = Feature>,
        interactions: impl IntoIterator<Item = InteractionId>,
    ) -> Result<GroupId, RegistryError> {
        let interactions: Vec<InteractionId> = interactions.into_iter().collect();
        if let Some(&missing) = interactions
            .iter()
            .find(|&&i| !self.interactions.contains_key(i))
        {
            return Err(RegistryError::UnknownInteraction(missing));
        }

        let id = match self.find(atoms) {
            Some(id) => id,
            None => {
                let group = self.build_group(atoms, std::iter::empty(), true, None)?;
                self.insert_group(group)
            }
        };

        for &interaction_id in &interactions {
            if let Some(holders) = self.holders.get_mut(interaction_id) {
                holders.insert(id);
            }
        }
        let group = &mut self.groups[id];
        group.features.extend(features);
        group.interactions.extend(interactions);
        Ok(id)
    }

    /// Removes groups together with the interactions that involve them.
    ///
    /// Atom back-references are cleared before a group leaves the index.
    pub fn remove(&mut self, ids: &[GroupId]) -> Result<(), RegistryError> {
        if let Some(&missing) = ids.iter().find(|&&id| !self.groups.contains_key(id)) {
            return Err(RegistryError::UnknownGroup(missing));
        }

        let doomed: HashSet<GroupId> = ids.iter().copied().collect();
        for &id in &doomed {
            let group = &self.groups[id];
            if group.is_recursive() {
                for &atom_id in group.atoms() {
                    if let Some(atom) = self.atoms.get_mut(atom_id) {
                        atom.remove_group(id);
                    }
                }
            }

            let attached: Vec<InteractionId> = group.interactions().iter().copied().collect();
            self.detach_interactions(&attached);

            let key = self.groups[id].atoms().to_vec();
            if self.index.get(&key) == Some(&id) {
                self.index.remove(&key);
            }
            self.groups.remove(id);
        }
        self.order.retain(|id| !doomed.contains(id));
        Ok(())
    }

    /// Yields the groups whose features include every entry of `features`.
    pub fn filter_by_features<'a>(
        &'a self,
        features: &'a [Feature],
    ) -> impl Iterator<Item = (GroupId, &'a AtomGroup)> + 'a {
        self.iter()
            .filter(move |(_, g)| features.iter().all(|f| g.has_feature(*f)))
    }

    pub fn add_features(
        &mut self,
        id: GroupId,
        features: impl IntoIterator<Item = Feature>,
    ) -> Result<(), RegistryError> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or(RegistryError::UnknownGroup(id))?;
        group.features.extend(features);
        Ok(())
    }

    pub fn remove_features(&mut self, id: GroupId, features: &[Feature]) -> Result<(), RegistryError> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or(RegistryError::UnknownGroup(id))?;
        group.features.retain(|f| !features.contains(f));
        Ok(())
    }

    pub fn set_features(
        &mut self,
        id: GroupId,
        features: impl IntoIterator<Item = Feature>,
    ) -> Result<(), RegistryError> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or(RegistryError::UnknownGroup(id))?;
        group.features = features.into_iter().collect();
        Ok(())
    }

    /// Builds a non-recursive group derived from `parent`.
    ///
    /// The result is not registered and never appears in any atom's
    /// back-references.
    pub fn pseudo_group(
        &self,
        parent: GroupId,
        atoms: &[AtomId],
        features: impl IntoIterator<Item = Feature>,
    ) -> Result<AtomGroup, RegistryError> {
        if !self.groups.contains_key(parent) {
            return Err(RegistryError::UnknownGroup(parent));
        }
        self.build_group(atoms, features, false, Some(parent))
    }

    /// Feature name to number of groups carrying it.
    pub fn summary(&self) -> BTreeMap<Feature, usize> {
        let mut summary = BTreeMap::new();
        for (_, group) in self.iter() {
            for &feature in group.features() {
                *summary.entry(feature).or_insert(0) += 1;
            }
        }
        summary
    }

    /// Length of the shortest covalent path between any atom of `src` and
    /// any atom of `trgt`, or `None` if they are not connected.
    pub fn shortest_path_size(&self, src: GroupId, trgt: GroupId) -> Result<Option<u32>, RegistryError> {
        let src_group = self.groups.get(src).ok_or(RegistryError::UnknownGroup(src))?;
        let trgt_group = self
            .groups
            .get(trgt)
            .ok_or(RegistryError::UnknownGroup(trgt))?;

        let targets: HashSet<AtomId> = trgt_group.atoms().iter().copied().collect();
        let mut dist: HashMap<AtomId, u32> = HashMap::new();
        let mut heap = BinaryHeap::new();
        for &atom_id in src_group.atoms() {
            dist.insert(atom_id, 0);
            heap.push(Reverse((0u32, atom_id)));
        }

        while let Some(Reverse((d, atom_id))) = heap.pop() {
            if targets.contains(&atom_id) {
                return Ok(Some(d));
            }
            if dist.get(&atom_id).is_some_and(|&best| d > best) {
                continue;
            }
            let Some(neighbors) = self.adjacency.get(atom_id) else {
                continue;
            };
            for (&nb, &weight) in neighbors {
                let candidate = d.saturating_add(weight);
                if dist.get(&nb).is_none_or(|&best| candidate < best) {
                    dist.insert(nb, candidate);
                    heap.push(Reverse((candidate, nb)));
                }
            }
        }
        Ok(None)
    }

    // --- Interactions ---

    pub fn interaction(&self, id: InteractionId) -> Option<&Interaction> {
        self.interactions.get(id)
    }

    pub fn interactions_iter(&self) -> impl Iterator<Item = (InteractionId, &Interaction)> {
        self.interactions.iter()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    /// Adds interactions and attaches each to both endpoint groups.
    ///
    /// An interaction with the same type between the same two groups is
    /// registered once. Later duplicates resolve to the existing id and merge
    /// their interacting atoms and params into it.
    pub fn add_interactions(
        &mut self,
        interactions: impl IntoIterator<Item = Interaction>,
    ) -> Result<Vec<InteractionId>, RegistryError> {
        let mut ids = Vec::new();
        for interaction in interactions {
            for endpoint in [interaction.src, interaction.trgt] {
                if !self.groups.contains_key(endpoint) {
                    return Err(RegistryError::UnknownGroup(endpoint));
                }
            }

            let key = interaction.dedup_key();
            if let Some(&existing) = self.interaction_index.get(&key) {
                self.interactions[existing].absorb(interaction);
                ids.push(existing);
                continue;
            }

            let (src, trgt) = (interaction.src, interaction.trgt);
            let id = self.interactions.insert(interaction);
            self.interaction_index.insert(key, id);
            self.holders.insert(id, BTreeSet::from([src, trgt]));
            self.groups[src].interactions.insert(id);
            self.groups[trgt].interactions.insert(id);
            ids.push(id);
        }
        Ok(ids)
    }

    fn detach_interactions(&mut self, ids: &[InteractionId]) {
        for &id in ids {
            let Some(interaction) = self.interactions.remove(id) else {
                continue;
            };
            self.interaction_index.remove(&interaction.dedup_key());
            // Holders are the two endpoints plus any group that got the id through `upsert`.
            for holder in self.holders.remove(id).unwrap_or_default() {
                if let Some(group) = self.groups.get_mut(holder) {
                    group.interactions.remove(&id);
                }
            }
        }
    }

    /// Deletes interactions and drops them from every group referencing them.
    pub fn remove_interactions(&mut self, ids: &[InteractionId]) -> Result<(), RegistryError> {
        if let Some(&missing) = ids.iter().find(|&&id| !self.interactions.contains_key(id)) {
            return Err(RegistryError::UnknownInteraction(missing));
        }
        self.detach_interactions(ids);
        Ok(())
    }

    pub fn filter_interactions_by_type(
        &self,
        kind: InteractionType,
    ) -> impl Iterator<Item = (InteractionId, &Interaction)> {
        self.interactions.iter().filter(move |(_, i)| i.kind == kind)
    }

    /// Interactions having `a` and `b` as their two endpoints, in either direction.
    pub fn interactions_between(&self, a: GroupId, b: GroupId) -> Vec<InteractionId> {
        let Some(group) = self.groups.get(a) else {
            return Vec::new();
        };
        group
            .interactions()
            .iter()
            .copied()
            .filter(|&id| {
                self.interactions
                    .get(id)
                    .is_some_and(|i| i.partner_of(a) == Some(b))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::compound::CompoundKind;
    use nalgebra::Point3;

    struct Fixture {
        registry: AtomGroupRegistry,
        atoms: Vec<AtomId>,
    }

    /// Four carbons in a row, bonded 0-1-2 with 3 isolated.
    fn fixture() -> Fixture {
        let mut structure = Structure::new();
        let chain = structure.add_chain('L');
        let lig = structure
            .add_compound(chain, 1, "LIG", CompoundKind::Hetatm)
            .unwrap();
        let atoms: Vec<AtomId> = (0..4)
            .map(|i| {
                structure
                    .add_atom(Atom::new(
                        i + 1,
                        &format!("C{}", i + 1),
                        "C",
                        lig,
                        Point3::new(i as f64 * 1.5, 0.0, 0.0),
                    ))
                    .unwrap()
            })
            .collect();

        let mut registry = AtomGroupRegistry::new();
        for &atom_id in &atoms {
            registry.register_atom(&structure, atom_id).unwrap();
        }
        registry.add_bond(atoms[0], atoms[1], 1).unwrap();
        registry.add_bond(atoms[1], atoms[2], 1).unwrap();
        Fixture { registry, atoms }
    }

    fn assert_back_references_consistent(registry: &AtomGroupRegistry) {
        for (id, group) in registry.iter() {
            for &atom_id in group.atoms() {
                assert!(registry.atom(atom_id).unwrap().groups().contains(&id));
            }
        }
        for atom_id in registry.atoms.keys() {
            for &group_id in registry.atom(atom_id).unwrap().groups() {
                let group = registry.group(group_id).expect("back-reference to removed group");
                assert!(group.has_atom(atom_id));
            }
        }
    }

    #[test]
    fn add_is_idempotent_for_duplicate_atom_sets() {
        let Fixture { mut registry, atoms } = fixture();
        let ids = registry
            .add([
                GroupDraft::new([atoms[0], atoms[1]], [Feature::Atom]),
                GroupDraft::new([atoms[1], atoms[0]], [Feature::Donor]),
            ])
            .unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(registry.len(), 1);
        let group = registry.group(ids[0]).unwrap();
        assert_eq!(group.features().iter().copied().collect::<Vec<_>>(), vec![Feature::Atom]);
    }

    #[test]
    fn upsert_unions_features_into_existing_group() {
        let Fixture { mut registry, atoms } = fixture();
        let first = registry
            .upsert(&[atoms[2]], [Feature::Atom], std::iter::empty())
            .unwrap();
        let second = registry
            .upsert(&[atoms[2]], [Feature::Hydrophobic], std::iter::empty())
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        let features = registry.group(first).unwrap().features();
        assert!(features.contains(&Feature::Atom));
        assert!(features.contains(&Feature::Hydrophobic));
    }

    #[test]
    fn no_two_groups_share_an_atom_set() {
        let Fixture { mut registry, atoms } = fixture();
        for draft in [
            GroupDraft::new([atoms[0]], [Feature::Atom]),
            GroupDraft::new([atoms[0], atoms[1]], [Feature::Amide]),
            GroupDraft::new([atoms[0]], [Feature::Acceptor]),
        ] {
            registry
                .upsert(&draft.atoms, draft.features, std::iter::empty())
                .unwrap();
        }
        let keys: HashSet<Vec<AtomId>> = registry.iter().map(|(_, g)| g.atoms().to_vec()).collect();
        assert_eq!(keys.len(), registry.len());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_and_unknown_atom_sets_are_rejected() {
        let Fixture { mut registry, .. } = fixture();
        assert_eq!(
            registry.upsert(&[], [Feature::Atom], std::iter::empty()),
            Err(RegistryError::EmptyGroup)
        );
        let stranger = AtomId::default();
        assert_eq!(
            registry.add([GroupDraft::new([stranger], [])]),
            Err(RegistryError::UnknownAtom(stranger))
        );
    }

    #[test]
    fn remove_clears_back_references_and_interactions() {
        let Fixture { mut registry, atoms } = fixture();
        let ids = registry
            .add([
                GroupDraft::new([atoms[0]], [Feature::Atom]),
                GroupDraft::new([atoms[1]], [Feature::Atom]),
                GroupDraft::new([atoms[0], atoms[1]], [Feature::Amide]),
            ])
            .unwrap();
        let inter = registry
            .add_interactions([Interaction::new(InteractionType::Covalent, ids[0], ids[1])])
            .unwrap()[0];
        assert_back_references_consistent(&registry);

        registry.remove(&[ids[0]]).unwrap();
        assert_back_references_consistent(&registry);
        assert!(registry.find(&[atoms[0]]).is_none());
        assert!(registry.interaction(inter).is_none());
        assert!(registry.group(ids[1]).unwrap().interactions().is_empty());
        assert_eq!(registry.atom(atoms[0]).unwrap().groups().len(), 1);
        assert_eq!(registry.remove(&[ids[0]]), Err(RegistryError::UnknownGroup(ids[0])));
    }

    #[test]
    fn filter_by_features_requires_superset() {
        let Fixture { mut registry, atoms } = fixture();
        registry
            .add([
                GroupDraft::new([atoms[0]], [Feature::Atom, Feature::Hydrophobic]),
                GroupDraft::new([atoms[1]], [Feature::Atom]),
                GroupDraft::new([atoms[2]], [Feature::Hydrophobic]),
            ])
            .unwrap();
        let both: Vec<_> = registry
            .filter_by_features(&[Feature::Hydrophobic, Feature::Atom])
            .map(|(_, g)| g.atoms().to_vec())
            .collect();
        assert_eq!(both, vec![vec![atoms[0]]]);
        assert_eq!(registry.filter_by_features(&[Feature::Hydrophobic]).count(), 2);
        assert_eq!(registry.filter_by_features(&[]).count(), 3);
    }

    #[test]
    fn feature_edits_allow_empty_feature_sets() {
        let Fixture { mut registry, atoms } = fixture();
        let id = registry
            .upsert(&[atoms[0]], [Feature::Hydrophobic], std::iter::empty())
            .unwrap();
        registry.remove_features(id, &[Feature::Hydrophobic]).unwrap();
        assert!(registry.group(id).unwrap().features().is_empty());
        registry.set_features(id, [Feature::Donor, Feature::Atom]).unwrap();
        assert_eq!(registry.group(id).unwrap().feature_names(), vec!["Atom", "Donor"]);
        assert_eq!(registry.find(&[atoms[0]]), Some(id));
    }

    #[test]
    fn pseudo_groups_are_never_back_referenced() {
        let Fixture { mut registry, atoms } = fixture();
        let parent = registry
            .upsert(&[atoms[0], atoms[1], atoms[2]], [Feature::Aromatic], std::iter::empty())
            .unwrap();
        let pseudo = registry
            .pseudo_group(parent, &[atoms[0], atoms[1]], [Feature::Atom])
            .unwrap();
        assert!(!pseudo.is_recursive());
        assert_eq!(pseudo.parent(), Some(parent));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.atom(atoms[0]).unwrap().groups().len(), 1);
    }

    #[test]
    fn add_interactions_deduplicates_and_attaches_to_endpoints() {
        let Fixture { mut registry, atoms } = fixture();
        let ids = registry
            .add([
                GroupDraft::new([atoms[0]], [Feature::Donor]),
                GroupDraft::new([atoms[3]], [Feature::Acceptor]),
            ])
            .unwrap();
        let added = registry
            .add_interactions([
                Interaction::new(InteractionType::HydrogenBond, ids[0], ids[1]),
                Interaction::new(InteractionType::HydrogenBond, ids[1], ids[0]),
            ])
            .unwrap();
        assert_eq!(added[0], added[1]);
        assert_eq!(registry.interaction_count(), 1);
        assert_eq!(registry.interactions_between(ids[0], ids[1]), vec![added[0]]);
        assert_eq!(registry.interactions_between(ids[1], ids[0]), vec![added[0]]);
        assert_eq!(
            registry
                .filter_interactions_by_type(InteractionType::HydrogenBond)
                .count(),
            1
        );
        assert_eq!(
            registry
                .filter_interactions_by_type(InteractionType::Ionic)
                .count(),
            0
        );

        registry.remove_interactions(&[added[0]]).unwrap();
        assert!(registry.group(ids[0]).unwrap().interactions().is_empty());
        assert!(registry.group(ids[1]).unwrap().interactions().is_empty());
    }

    #[test]
    fn duplicate_interactions_merge_atoms_and_params() {
        let Fixture { mut registry, atoms } = fixture();
        let ids = registry
            .add([
                GroupDraft::new([atoms[0], atoms[1]], [Feature::Donor]),
                GroupDraft::new([atoms[3]], [Feature::Acceptor]),
            ])
            .unwrap();
        let added = registry
            .add_interactions([
                Interaction::new(InteractionType::HydrogenBond, ids[0], ids[1])
                    .with_interacting_atoms([atoms[0]], [atoms[3]])
                    .with_param("dist", 2.8),
                Interaction::new(InteractionType::HydrogenBond, ids[1], ids[0])
                    .with_interacting_atoms([atoms[3]], [atoms[1]])
                    .with_param("angle", 150.0),
            ])
            .unwrap();
        assert_eq!(added[0], added[1]);

        let merged = registry.interaction(added[0]).unwrap();
        assert_eq!(merged.src, ids[0]);
        assert_eq!(
            merged.src_interacting_atoms,
            BTreeSet::from([atoms[0], atoms[1]])
        );
        assert_eq!(merged.trgt_interacting_atoms, BTreeSet::from([atoms[3]]));
        assert_eq!(merged.param("dist"), Some(2.8));
        assert_eq!(merged.param("angle"), Some(150.0));
    }

    #[test]
    fn self_interactions_attach_once_to_their_group() {
        let Fixture { mut registry, atoms } = fixture();
        let ids = registry
            .add([GroupDraft::new([atoms[0], atoms[1]], [Feature::Hydrophobe])])
            .unwrap();
        let added = registry
            .add_interactions([Interaction::new(InteractionType::Hydrophobic, ids[0], ids[0])])
            .unwrap();
        assert_eq!(registry.group(ids[0]).unwrap().interactions().len(), 1);
        assert_eq!(registry.interactions_between(ids[0], ids[0]), added);

        registry.remove_interactions(&added).unwrap();
        assert!(registry.group(ids[0]).unwrap().interactions().is_empty());
    }

    #[test]
    fn summary_counts_groups_per_feature() {
        let Fixture { mut registry, atoms } = fixture();
        registry
            .add([
                GroupDraft::new([atoms[0]], [Feature::Atom, Feature::Hydrophobic]),
                GroupDraft::new([atoms[1]], [Feature::Atom]),
            ])
            .unwrap();
        let summary = registry.summary();
        assert_eq!(summary.get(&Feature::Atom), Some(&2));
        assert_eq!(summary.get(&Feature::Hydrophobic), Some(&1));
        assert_eq!(summary.get(&Feature::Donor), None);
    }

    #[test]
    fn shortest_path_size_follows_covalent_graph() {
        let Fixture { mut registry, atoms } = fixture();
        let ids = registry
            .add([
                GroupDraft::new([atoms[0]], [Feature::Atom]),
                GroupDraft::new([atoms[2]], [Feature::Atom]),
                GroupDraft::new([atoms[3]], [Feature::Atom]),
                GroupDraft::new([atoms[1], atoms[2]], [Feature::Atom]),
            ])
            .unwrap();
        assert_eq!(registry.shortest_path_size(ids[0], ids[1]), Ok(Some(2)));
        assert_eq!(registry.shortest_path_size(ids[0], ids[3]), Ok(Some(1)));
        assert_eq!(registry.shortest_path_size(ids[0], ids[0]), Ok(Some(0)));
        assert_eq!(registry.shortest_path_size(ids[0], ids[2]), Ok(None));
    }

    #[test]
    fn atoms_are_resolvable_by_serial() {
        let Fixture { registry, atoms } = fixture();
        assert_eq!(registry.atom_by_serial(3), Some(atoms[2]));
        assert_eq!(registry.atom_by_serial(99), None);
        assert_eq!(registry.atom_count(), 4);
        assert_eq!(registry.bonded_neighbors(atoms[1]).unwrap().len(), 2);
    }
}
