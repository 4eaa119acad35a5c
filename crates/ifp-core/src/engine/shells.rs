use super::config::{ConfigError, ShellConfig};
use super::fingerprint::{
    CountFingerprint, Fingerprint, FingerprintError, FingerprintOutput, UNFOLDED_LENGTH,
};
use crate::core::groups::neighborhood::AtomGroupNeighborhood;
use crate::core::groups::registry::AtomGroupRegistry;
use crate::core::models::ids::{GroupId, InteractionId};
use crate::core::utils::hashing::{self, hash_words};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};

const COMPOUND_CLASS_MARKER: u64 = 0x9e37_79b9_7f4a_7c15;
const NEIGHBOR_TAG: u64 = 1;
const INTERACTION_TAG: u64 = 2;

/// The canonical neighborhood of one group at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    pub group: GroupId,
    pub level: usize,
    pub identifier: u64,
}

impl Shell {
    /// Position of the shell in the unfolded 32-bit index space.
    pub fn index(&self) -> u32 {
        hashing::fold_to_u32(self.identifier)
    }
}

/// All shells of an analysis unit, ordered by group registration then level.
#[derive(Debug, Clone, Default)]
pub struct ShellManager {
    num_levels: usize,
    shells: Vec<Shell>,
}

impl ShellManager {
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    pub fn num_unique(&self) -> usize {
        self.shells
            .iter()
            .map(|s| s.identifier)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn shells_at_level(&self, level: usize) -> impl Iterator<Item = &Shell> {
        self.shells.iter().filter(move |s| s.level == level)
    }

    pub fn shells_of_group(&self, group: GroupId) -> impl Iterator<Item = &Shell> {
        self.shells.iter().filter(move |s| s.group == group)
    }

    pub fn find_by_identifier(&self, identifier: u64) -> Vec<&Shell> {
        self.shells
            .iter()
            .filter(|s| s.identifier == identifier)
            .collect()
    }

    /// Encodes the shells as a fingerprint.
    ///
    /// Every identifier is hashed into 32-bit space and, when `fold_to_size`
    /// is set, reduced modulo that size. `unique_shells` yields a binary
    /// fingerprint and `count_fp` keeps multiplicities; asking for both is a
    /// configuration error.
    pub fn to_fingerprint(
        &self,
        fold_to_size: Option<u32>,
        unique_shells: bool,
        count_fp: bool,
    ) -> Result<FingerprintOutput, ConfigError> {
        if unique_shells && count_fp {
            return Err(ConfigError::ConflictingFingerprintModes);
        }
        let length = match fold_to_size {
            Some(0) => {
                return Err(ConfigError::InvalidParameter {
                    name: "fold_to_size",
                    reason: "a fingerprint needs at least one bit".to_string(),
                });
            }
            Some(size) => u64::from(size),
            None => UNFOLDED_LENGTH,
        };
        let position = |shell: &Shell| (u64::from(shell.index()) % length) as u32;
        let internal = |e: FingerprintError| ConfigError::InvalidParameter {
            name: "fold_to_size",
            reason: e.to_string(),
        };

        if count_fp {
            let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
            for shell in &self.shells {
                *counts.entry(position(shell)).or_insert(0) += 1;
            }
            Ok(FingerprintOutput::Count(
                CountFingerprint::new(length, counts).map_err(internal)?,
            ))
        } else {
            Ok(FingerprintOutput::Binary(
                Fingerprint::new(length, self.shells.iter().map(position)).map_err(internal)?,
            ))
        }
    }
}

/// Expands every group of a registry into shells of growing radius.
#[derive(Debug, Clone)]
pub struct ShellGenerator {
    config: ShellConfig,
}

impl ShellGenerator {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Identifier of a group on its own: its features and, optionally, the
    /// classes of the compounds it spans.
    fn seed_identifier(&self, registry: &AtomGroupRegistry, group: GroupId) -> u64 {
        let Some(group) = registry.group(group) else {
            return hash_words(&[]);
        };
        let mut words: Vec<u64> = group
            .features()
            .iter()
            .map(|f| f.code())
            .sorted_unstable()
            .collect();
        if self.config.diff_comp_classes {
            words.push(COMPOUND_CLASS_MARKER);
            words.extend(
                group
                    .compound_kinds()
                    .iter()
                    .map(|k| hashing::stable_code(&k.to_string()))
                    .sorted_unstable(),
            );
        }
        hash_words(&words)
    }

    #[instrument(skip_all, fields(groups = registry.len(), levels = self.config.num_levels))]
    pub fn create_shells(&self, registry: &AtomGroupRegistry) -> ShellManager {
        let neighborhood = AtomGroupNeighborhood::from_registry(registry);
        let seeds: HashMap<GroupId, u64> = registry
            .iter()
            .map(|(id, _)| (id, self.seed_identifier(registry, id)))
            .collect();
        let step = self.config.radius_step;

        let mut shells = Vec::with_capacity(registry.len() * self.config.num_levels);
        for (center_id, center) in registry.iter() {
            let mut identifier = seeds[&center_id];
            shells.push(Shell {
                group: center_id,
                level: 0,
                identifier,
            });

            for level in 1..self.config.num_levels {
                let outer = level as f64 * step;
                let inner = (level - 1) as f64 * step;
                let within: HashMap<GroupId, f64> = neighborhood
                    .search(&center.centroid(), outer)
                    .into_iter()
                    .collect();
                let in_ring = |distance: f64| level == 1 || distance > inner;

                let mut entries: Vec<[u64; 4]> = Vec::new();
                let mut interactions: BTreeSet<InteractionId> = BTreeSet::new();
                for (&neighbor, &distance) in &within {
                    if in_ring(distance) {
                        entries.push([NEIGHBOR_TAG, seeds[&neighbor], 0, 0]);
                    }
                    if let Some(group) = registry.group(neighbor) {
                        interactions.extend(group.interactions().iter().copied());
                    }
                }
                for interaction_id in interactions {
                    let Some(interaction) = registry.interaction(interaction_id) else {
                        continue;
                    };
                    let (Some(&d_src), Some(&d_trgt)) =
                        (within.get(&interaction.src), within.get(&interaction.trgt))
                    else {
                        continue;
                    };
                    if !(in_ring(d_src) || in_ring(d_trgt)) {
                        continue;
                    }
                    let (a, b) = (seeds[&interaction.src], seeds[&interaction.trgt]);
                    entries.push([INTERACTION_TAG, interaction.kind.code(), a.min(b), a.max(b)]);
                }
                entries.sort_unstable();

                let mut words = Vec::with_capacity(2 + entries.len() * 4);
                words.push(level as u64);
                words.push(identifier);
                words.extend(entries.iter().flatten());
                identifier = hash_words(&words);
                shells.push(Shell {
                    group: center_id,
                    level,
                    identifier,
                });
            }
        }

        debug!(shells = shells.len(), "Shells created.");
        ShellManager {
            num_levels: self.config.num_levels,
            shells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::groups::registry::GroupDraft;
    use crate::core::models::atom::Atom;
    use crate::core::models::compound::CompoundKind;
    use crate::core::models::feature::Feature;
    use crate::core::models::ids::AtomId;
    use crate::core::models::interaction::{Interaction, InteractionType};
    use crate::core::models::structure::Structure;
    use nalgebra::Point3;

    const SITES: [(&str, [f64; 3], Feature); 4] = [
        ("O1", [0.0, 0.0, 0.0], Feature::Acceptor),
        ("N1", [2.9, 0.0, 0.0], Feature::Donor),
        ("C1", [0.0, 4.0, 0.0], Feature::Hydrophobic),
        ("C2", [9.0, 0.0, 0.0], Feature::Hydrophobic),
    ];

    /// Registers the four sites in `order` and links O1/N1 with a hydrogen bond.
    fn registry_in_order(order: &[usize]) -> AtomGroupRegistry {
        let mut structure = Structure::new();
        let chain = structure.add_chain('A');
        let lig = structure
            .add_compound(chain, 1, "LIG", CompoundKind::Hetatm)
            .unwrap();
        let res = structure
            .add_compound(chain, 2, "SER", CompoundKind::Residue)
            .unwrap();
        let atoms: Vec<AtomId> = SITES
            .iter()
            .enumerate()
            .map(|(i, (name, [x, y, z], _))| {
                let compound = if i % 2 == 0 { lig } else { res };
                structure
                    .add_atom(Atom::new(i as u32 + 1, name, "C", compound, Point3::new(*x, *y, *z)))
                    .unwrap()
            })
            .collect();

        let mut registry = AtomGroupRegistry::new();
        let mut ids = HashMap::new();
        for &i in order {
            registry.register_atom(&structure, atoms[i]).unwrap();
            let id = registry
                .add([GroupDraft::new([atoms[i]], [Feature::Atom, SITES[i].2])])
                .unwrap()[0];
            ids.insert(i, id);
        }
        registry
            .add_interactions([Interaction::new(InteractionType::HydrogenBond, ids[&1], ids[&0])])
            .unwrap();
        registry
    }

    fn generator(levels: usize) -> ShellGenerator {
        ShellGenerator::new(ShellConfig {
            num_levels: levels,
            radius_step: 3.0,
            diff_comp_classes: true,
        })
    }

    #[test]
    fn every_group_seeds_one_shell_per_level() {
        let registry = registry_in_order(&[0, 1, 2, 3]);
        let manager = generator(3).create_shells(&registry);
        assert_eq!(manager.len(), 12);
        assert_eq!(manager.shells_at_level(0).count(), 4);
        assert_eq!(manager.shells_at_level(2).count(), 4);
        let (first, _) = registry.iter().next().unwrap();
        assert_eq!(manager.shells_of_group(first).count(), 3);
    }

    #[test]
    fn fingerprint_is_independent_of_insertion_order() {
        let forward = generator(3).create_shells(&registry_in_order(&[0, 1, 2, 3]));
        let backward = generator(3).create_shells(&registry_in_order(&[3, 2, 1, 0]));
        for (unique, count) in [(true, false), (false, true)] {
            assert_eq!(
                forward.to_fingerprint(Some(1024), unique, count).unwrap(),
                backward.to_fingerprint(Some(1024), unique, count).unwrap()
            );
        }
        assert_eq!(
            forward.to_fingerprint(None, true, false).unwrap(),
            backward.to_fingerprint(None, true, false).unwrap()
        );
    }

    #[test]
    fn identical_neighborhoods_share_identifiers() {
        let registry = registry_in_order(&[0, 1, 2, 3]);
        let manager = generator(1).create_shells(&registry);
        // C1 and C2 carry the same features but sit in different compound classes.
        assert_eq!(manager.num_unique(), 4);

        let flat = ShellGenerator::new(ShellConfig {
            num_levels: 1,
            radius_step: 3.0,
            diff_comp_classes: false,
        })
        .create_shells(&registry);
        assert_eq!(flat.num_unique(), 3);
        let hydrophobe_id = flat
            .shells()
            .iter()
            .find(|s| registry.group(s.group).unwrap().has_feature(Feature::Hydrophobic))
            .unwrap()
            .identifier;
        assert_eq!(flat.find_by_identifier(hydrophobe_id).len(), 2);
    }

    #[test]
    fn interactions_change_the_first_level() {
        let registry = registry_in_order(&[0, 1, 2, 3]);
        let with_hbond = generator(2).create_shells(&registry);

        let mut without = registry.clone();
        let ids: Vec<InteractionId> = without.interactions_iter().map(|(id, _)| id).collect();
        without.remove_interactions(&ids).unwrap();
        let plain = generator(2).create_shells(&without);

        let level0 = |m: &ShellManager| m.shells_at_level(0).map(|s| s.identifier).collect::<Vec<_>>();
        let level1 = |m: &ShellManager| m.shells_at_level(1).map(|s| s.identifier).collect::<Vec<_>>();
        assert_eq!(level0(&with_hbond), level0(&plain));
        assert_ne!(level1(&with_hbond), level1(&plain));
    }

    #[test]
    fn folded_indices_stay_below_fold_size() {
        let manager = generator(3).create_shells(&registry_in_order(&[0, 1, 2, 3]));
        for size in [1u32, 7, 64, 4096] {
            let fp = manager.to_fingerprint(Some(size), true, false).unwrap();
            assert_eq!(fp.length(), u64::from(size));
            assert!(fp.entries().iter().all(|&(i, _)| i < size));
        }
    }

    #[test]
    fn count_fingerprint_agrees_with_unique_fingerprint() {
        let manager = generator(3).create_shells(&registry_in_order(&[0, 1, 2, 3]));
        let unique = manager.to_fingerprint(Some(256), true, false).unwrap();
        let FingerprintOutput::Count(counts) = manager.to_fingerprint(Some(256), false, true).unwrap()
        else {
            panic!("expected a count fingerprint");
        };
        assert_eq!(&counts.on_bits(), unique.to_binary().on_bits());
        let total: u32 = counts.counts().values().sum();
        assert_eq!(total as usize, manager.len());
    }

    #[test]
    fn conflicting_or_empty_configurations_are_rejected() {
        let manager = generator(2).create_shells(&registry_in_order(&[0, 1, 2, 3]));
        assert_eq!(
            manager.to_fingerprint(Some(1024), true, true),
            Err(ConfigError::ConflictingFingerprintModes)
        );
        assert!(manager.to_fingerprint(Some(0), true, false).is_err());
    }

    #[test]
    fn empty_registry_gives_empty_fingerprint() {
        let manager = generator(2).create_shells(&AtomGroupRegistry::new());
        assert!(manager.is_empty());
        let fp = manager.to_fingerprint(Some(64), true, false).unwrap();
        assert!(fp.entries().is_empty());
    }

    #[test]
    fn unfolded_fingerprint_uses_shell_indices() {
        let manager = generator(1).create_shells(&registry_in_order(&[0, 1, 2, 3]));
        let expected: BTreeSet<u32> = manager.shells().iter().map(|s| s.index()).collect();
        let fp = manager.to_fingerprint(None, true, false).unwrap();
        assert_eq!(fp.length(), UNFOLDED_LENGTH);
        assert_eq!(fp.to_binary().on_bits(), &expected);
    }
}
