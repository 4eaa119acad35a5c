use super::events::{Event, EventReporter};
use crate::core::groups::registry::{AtomGroupRegistry, RegistryError};
use crate::core::models::feature::Feature;
use crate::core::models::ids::{AtomId, GroupId, InteractionId};
use crate::core::models::interaction::{HYDROPHOBIC_DISTANCE_PARAM, Interaction, InteractionType};
use crate::core::utils::geometry;
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub islands: usize,
    pub interactions_removed: usize,
    pub interactions_created: usize,
}

struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

#[derive(Default)]
struct IslandPair {
    first_atoms: BTreeSet<AtomId>,
    second_atoms: BTreeSet<AtomId>,
}

/// Merges covalently connected single-atom hydrophobic groups into
/// `Hydrophobe` islands and lifts their atom-level hydrophobic contacts to
/// island level.
///
/// Running it a second time is a no-op.
#[instrument(skip_all, name = "hydrophobic_islands")]
pub fn merge_hydrophobic_atoms(
    registry: &mut AtomGroupRegistry,
    reporter: &EventReporter,
) -> Result<MergeSummary, RegistryError> {
    let hydrophobic: Vec<(GroupId, AtomId)> = registry
        .filter_by_features(&[Feature::Hydrophobic])
        .filter(|(_, g)| g.size() == 1)
        .map(|(id, g)| (id, g.atoms()[0]))
        .collect();
    if hydrophobic.is_empty() {
        debug!("No hydrophobic atom groups to merge.");
        return Ok(MergeSummary::default());
    }

    let position_of: HashMap<AtomId, usize> = hydrophobic
        .iter()
        .enumerate()
        .map(|(i, &(_, atom))| (atom, i))
        .collect();
    let mut sets = DisjointSet::new(hydrophobic.len());
    for (i, &(_, atom)) in hydrophobic.iter().enumerate() {
        let Some(neighbors) = registry.bonded_neighbors(atom) else {
            continue;
        };
        for neighbor in neighbors.keys() {
            if let Some(&j) = position_of.get(neighbor) {
                sets.union(i, j);
            }
        }
    }

    // Islands come out in the order of their first atom.
    let mut island_of_root: HashMap<usize, usize> = HashMap::new();
    let mut islands: Vec<Vec<AtomId>> = Vec::new();
    let mut island_of_atom: HashMap<AtomId, usize> = HashMap::new();
    for (i, &(_, atom)) in hydrophobic.iter().enumerate() {
        let root = sets.find(i);
        let island = *island_of_root.entry(root).or_insert_with(|| {
            islands.push(Vec::new());
            islands.len() - 1
        });
        islands[island].push(atom);
        island_of_atom.insert(atom, island);
    }

    let atom_of_group: HashMap<GroupId, AtomId> = hydrophobic.iter().copied().collect();
    let mut pairs: BTreeMap<(usize, usize), IslandPair> = BTreeMap::new();
    let mut originals: Vec<InteractionId> = Vec::new();
    for (id, interaction) in registry.filter_interactions_by_type(InteractionType::Hydrophobic) {
        let (Some(src_atom), Some(trgt_atom)) = (
            atom_of_group.get(&interaction.src),
            atom_of_group.get(&interaction.trgt),
        ) else {
            continue;
        };
        let (Some(&src_island), Some(&trgt_island)) =
            (island_of_atom.get(src_atom), island_of_atom.get(trgt_atom))
        else {
            continue;
        };
        originals.push(id);
        let (key, first, second) = if src_island <= trgt_island {
            ((src_island, trgt_island), *src_atom, *trgt_atom)
        } else {
            ((trgt_island, src_island), *trgt_atom, *src_atom)
        };
        let pair = pairs.entry(key).or_default();
        if key.0 == key.1 {
            // Both sides of a contact inside one island are the same atom set.
            pair.first_atoms.extend([first, second]);
            pair.second_atoms.extend([first, second]);
        } else {
            pair.first_atoms.insert(first);
            pair.second_atoms.insert(second);
        }
    }

    let mut island_groups = Vec::with_capacity(islands.len());
    for atoms in &islands {
        island_groups.push(registry.upsert(atoms, [Feature::Hydrophobe], std::iter::empty())?);
    }

    let mut created = Vec::with_capacity(pairs.len());
    for ((a, b), pair) in pairs {
        let (Some(first_center), Some(second_center)) = (
            contributing_centroid(registry, &pair.first_atoms),
            contributing_centroid(registry, &pair.second_atoms),
        ) else {
            continue;
        };
        let distance = geometry::euclidean_distance(&first_center, &second_center);
        created.push(
            Interaction::new(InteractionType::Hydrophobic, island_groups[a], island_groups[b])
                .with_interacting_atoms(pair.first_atoms, pair.second_atoms)
                .with_param(HYDROPHOBIC_DISTANCE_PARAM, distance),
        );
    }

    // Originals go first: a single-atom island shares its key with the
    // atom group it came from.
    registry.remove_interactions(&originals)?;
    let interactions_created = registry.add_interactions(created)?.len();

    for &(group, _) in &hydrophobic {
        registry.remove_features(group, &[Feature::Hydrophobic])?;
    }

    let summary = MergeSummary {
        islands: islands.len(),
        interactions_removed: originals.len(),
        interactions_created,
    };
    info!(
        islands = summary.islands,
        removed = summary.interactions_removed,
        created = summary.interactions_created,
        "Hydrophobic islands merged."
    );
    reporter.report(Event::IslandsMerged {
        islands: summary.islands,
        interactions: summary.interactions_created,
    });
    Ok(summary)
}

fn contributing_centroid(registry: &AtomGroupRegistry, atoms: &BTreeSet<AtomId>) -> Option<Point3<f64>> {
    let coords: Vec<Point3<f64>> = atoms
        .iter()
        .filter_map(|&id| registry.atom(id).map(|a| a.position))
        .collect();
    geometry::centroid(&coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::groups::registry::GroupDraft;
    use crate::core::models::atom::Atom;
    use crate::core::models::compound::CompoundKind;
    use crate::core::models::structure::Structure;

    struct Fixture {
        registry: AtomGroupRegistry,
        /// C1, C2, C3 (bonded chain) then X.
        atoms: Vec<AtomId>,
        groups: Vec<GroupId>,
    }

    fn fixture() -> Fixture {
        let mut structure = Structure::new();
        let chain = structure.add_chain('A');
        let lig = structure
            .add_compound(chain, 1, "LIG", CompoundKind::Hetatm)
            .unwrap();
        let res = structure
            .add_compound(chain, 2, "LEU", CompoundKind::Residue)
            .unwrap();
        let sites = [
            ("C1", lig, Point3::new(0.0, 0.0, 0.0)),
            ("C2", lig, Point3::new(1.5, 0.0, 0.0)),
            ("C3", lig, Point3::new(3.0, 0.0, 0.0)),
            ("CD1", res, Point3::new(1.5, 4.0, 0.0)),
        ];
        let atoms: Vec<AtomId> = sites
            .iter()
            .enumerate()
            .map(|(i, (name, compound, position))| {
                structure
                    .add_atom(Atom::new(i as u32 + 1, name, "C", *compound, *position))
                    .unwrap()
            })
            .collect();

        let mut registry = AtomGroupRegistry::new();
        for &atom in &atoms {
            registry.register_atom(&structure, atom).unwrap();
        }
        registry.add_bond(atoms[0], atoms[1], 1).unwrap();
        registry.add_bond(atoms[1], atoms[2], 1).unwrap();
        let groups = registry
            .add(
                atoms
                    .iter()
                    .map(|&a| GroupDraft::new([a], [Feature::Atom, Feature::Hydrophobic])),
            )
            .unwrap();
        registry
            .add_interactions([
                Interaction::new(InteractionType::Hydrophobic, groups[0], groups[3]),
                Interaction::new(InteractionType::Hydrophobic, groups[3], groups[2]),
                Interaction::new(InteractionType::Hydrophobic, groups[0], groups[1]),
            ])
            .unwrap();
        Fixture {
            registry,
            atoms,
            groups,
        }
    }

    #[test]
    fn chain_of_carbons_merges_into_one_island_with_lifted_interaction() {
        let Fixture {
            mut registry,
            atoms,
            groups,
        } = fixture();
        let summary = merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();

        assert_eq!(
            summary,
            MergeSummary {
                islands: 2,
                interactions_removed: 3,
                interactions_created: 2,
            }
        );

        let island = registry.find(&atoms[..3]).unwrap();
        assert_eq!(registry.group(island).unwrap().feature_names(), vec!["Hydrophobe"]);
        assert_eq!(registry.interaction_count(), 2);

        let lifted_ids = registry.interactions_between(island, groups[3]);
        assert_eq!(lifted_ids.len(), 1);
        let lifted = registry.interaction(lifted_ids[0]).unwrap();
        assert_eq!(lifted.kind, InteractionType::Hydrophobic);
        assert_eq!(lifted.src, island);
        assert_eq!(lifted.trgt, groups[3]);
        assert_eq!(
            lifted.src_interacting_atoms,
            BTreeSet::from([atoms[0], atoms[2]])
        );
        assert_eq!(lifted.trgt_interacting_atoms, BTreeSet::from([atoms[3]]));
        // Centroid of C1 and C3 is (1.5, 0, 0), four Angstroms from X.
        let distance = lifted.param(HYDROPHOBIC_DISTANCE_PARAM).unwrap();
        assert!((distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn contact_inside_an_island_becomes_a_self_interaction() {
        let Fixture {
            mut registry,
            atoms,
            groups,
        } = fixture();
        registry
            .add_interactions([Interaction::new(InteractionType::Hydrophobic, groups[0], groups[2])])
            .unwrap();
        merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();

        let island = registry.find(&atoms[..3]).unwrap();
        let own = registry.interactions_between(island, island);
        assert_eq!(own.len(), 1);
        let contact = registry.interaction(own[0]).unwrap();
        assert_eq!(contact.kind, InteractionType::Hydrophobic);
        assert_eq!((contact.src, contact.trgt), (island, island));
        // C1-C2 and C1-C3 both fold into the island's own contact.
        let contributing = BTreeSet::from([atoms[0], atoms[1], atoms[2]]);
        assert_eq!(contact.src_interacting_atoms, contributing);
        assert_eq!(contact.trgt_interacting_atoms, contributing);
        assert_eq!(contact.param(HYDROPHOBIC_DISTANCE_PARAM), Some(0.0));
    }

    #[test]
    fn atom_groups_lose_the_hydrophobic_feature() {
        let Fixture {
            mut registry,
            groups,
            ..
        } = fixture();
        merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();

        for &group in &groups[..3] {
            assert_eq!(registry.group(group).unwrap().feature_names(), vec!["Atom"]);
        }
        let x = registry.group(groups[3]).unwrap();
        assert!(!x.has_feature(Feature::Hydrophobic));
        assert!(x.has_feature(Feature::Hydrophobe));
        assert_eq!(registry.filter_by_features(&[Feature::Hydrophobic]).count(), 0);
    }

    type GroupState = (Vec<AtomId>, BTreeSet<Feature>);
    type InteractionState = (
        InteractionType,
        GroupId,
        GroupId,
        BTreeSet<AtomId>,
        BTreeSet<AtomId>,
        BTreeMap<String, f64>,
    );

    fn snapshot(
        registry: &AtomGroupRegistry,
    ) -> (
        BTreeMap<GroupId, GroupState>,
        BTreeMap<InteractionId, InteractionState>,
    ) {
        let groups = registry
            .iter()
            .map(|(id, g)| (id, (g.atoms().to_vec(), g.features().clone())))
            .collect();
        let interactions = registry
            .interactions_iter()
            .map(|(id, i)| {
                (
                    id,
                    (
                        i.kind,
                        i.src,
                        i.trgt,
                        i.src_interacting_atoms.clone(),
                        i.trgt_interacting_atoms.clone(),
                        i.params.clone(),
                    ),
                )
            })
            .collect();
        (groups, interactions)
    }

    #[test]
    fn merging_twice_changes_nothing() {
        let Fixture { mut registry, .. } = fixture();
        merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();
        let after_first = snapshot(&registry);

        let summary = merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();
        assert_eq!(summary, MergeSummary::default());
        assert_eq!(snapshot(&registry), after_first);
    }

    #[test]
    fn group_left_without_features_stays_registered() {
        let Fixture {
            mut registry,
            atoms,
            groups,
        } = fixture();
        registry.set_features(groups[0], [Feature::Hydrophobic]).unwrap();

        merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();

        assert_eq!(registry.find(&atoms[..1]), Some(groups[0]));
        assert!(registry.group(groups[0]).unwrap().features().is_empty());
        assert!(registry.find(&atoms[..3]).is_some());
    }

    #[test]
    fn unrelated_interactions_are_left_alone() {
        let Fixture {
            mut registry,
            atoms,
            groups,
        } = fixture();
        let donor = registry
            .upsert(&atoms[1..3], [Feature::Donor], std::iter::empty())
            .unwrap();
        registry
            .add_interactions([Interaction::new(InteractionType::HydrogenBond, donor, groups[3])])
            .unwrap();
        merge_hydrophobic_atoms(&mut registry, &EventReporter::new()).unwrap();
        assert_eq!(
            registry
                .filter_interactions_by_type(InteractionType::HydrogenBond)
                .count(),
            1
        );
    }

    #[test]
    fn disjoint_set_joins_by_size() {
        let mut sets = DisjointSet::new(5);
        sets.union(0, 1);
        sets.union(2, 3);
        sets.union(1, 3);
        assert_eq!(sets.find(0), sets.find(2));
        assert_ne!(sets.find(0), sets.find(4));
        let root = sets.find(3);
        assert_eq!(sets.size[root], 4);
    }
}
