//! Seams to the external collaborators of group perception.
//!
//! The core neither derives bonds from geometry nor runs chemistry toolkits
//! or interaction rules. Those concerns are reached through the traits in
//! this module; the built-in implementations read what the [`Structure`]
//! already records.

use crate::core::groups::neighborhood::AtomGroupNeighborhood;
use crate::core::groups::registry::AtomGroupRegistry;
use crate::core::models::feature::Feature;
use crate::core::models::ids::{AtomId, CompoundId};
use crate::core::models::interaction::{Interaction, InteractionType};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to build a chemical representation: {0}")]
    Representation(String),
    #[error("Feature extraction failed: {0}")]
    Extraction(String),
    #[error("Atom {serial} has an unknown element '{element}'")]
    UnknownElement { serial: u32, element: String },
}

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Interaction detection failed: {0}")]
    Failed(String),
    #[error("Interaction references unknown atom serial {0}")]
    UnknownAtomSerial(u32),
    #[error("No atom group matches the atom serials {0:?}")]
    UnresolvedGroup(Vec<u32>),
}

/// Supplies the covalently bonded atom pairs that involve a compound.
pub trait CovalentContactProvider {
    fn covalent_contacts(
        &self,
        structure: &Structure,
        compound: CompoundId,
        radius: f64,
    ) -> Result<Vec<(AtomId, AtomId)>, ProviderError>;
}

/// Reports the bonds recorded on the structure itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureBonds;

impl CovalentContactProvider for StructureBonds {
    fn covalent_contacts(
        &self,
        structure: &Structure,
        compound: CompoundId,
        _radius: f64,
    ) -> Result<Vec<(AtomId, AtomId)>, ProviderError> {
        let Some(compound) = structure.compound(compound) else {
            return Ok(Vec::new());
        };
        let members: HashSet<AtomId> = compound.atoms().iter().copied().collect();
        Ok(structure
            .bonds()
            .iter()
            .copied()
            .filter(|(a, b)| members.contains(a) || members.contains(b))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepresentationAtom {
    pub index: usize,
    pub atomic_number: u8,
    pub position: Point3<f64>,
}

impl RepresentationAtom {
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }
}

/// Toolkit-neutral molecule: indexed atoms plus bonds between indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChemicalRepresentation {
    pub atoms: Vec<RepresentationAtom>,
    pub bonds: Vec<(usize, usize)>,
}

impl ChemicalRepresentation {
    pub fn heavy_atoms(&self) -> impl Iterator<Item = &RepresentationAtom> {
        self.atoms.iter().filter(|a| !a.is_hydrogen())
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.heavy_atoms().count()
    }

    pub fn atom(&self, index: usize) -> Option<&RepresentationAtom> {
        self.atoms.iter().find(|a| a.index == index)
    }
}

/// Builds a chemical representation from a selection of compounds.
pub trait RepresentationBuilder {
    fn build(
        &self,
        structure: &Structure,
        compounds: &[CompoundId],
        keep_hydrogens: bool,
    ) -> Result<ChemicalRepresentation, ProviderError>;
}

/// Indexes the primary-location atoms of the selected compounds in compound
/// order and copies the structure bonds among them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureRepresentationBuilder;

impl RepresentationBuilder for StructureRepresentationBuilder {
    fn build(
        &self,
        structure: &Structure,
        compounds: &[CompoundId],
        keep_hydrogens: bool,
    ) -> Result<ChemicalRepresentation, ProviderError> {
        let selected = selected_atoms(structure, compounds, keep_hydrogens);
        let mut representation = ChemicalRepresentation::default();
        let mut index_of = BTreeMap::new();

        for (index, &atom_id) in selected.iter().enumerate() {
            let Some(atom) = structure.atom(atom_id) else {
                continue;
            };
            let atomic_number = atom.atomic_number().ok_or_else(|| ProviderError::UnknownElement {
                serial: atom.serial,
                element: atom.element.clone(),
            })?;
            index_of.insert(atom_id, index);
            representation.atoms.push(RepresentationAtom {
                index,
                atomic_number,
                position: atom.position,
            });
        }

        for (a, b) in structure.bonds() {
            if let (Some(&i), Some(&j)) = (index_of.get(a), index_of.get(b)) {
                representation.bonds.push((i.min(j), i.max(j)));
            }
        }
        representation.bonds.sort_unstable();
        Ok(representation)
    }
}

/// Atoms of `compounds` that take part in perception, in compound order.
pub fn selected_atoms(
    structure: &Structure,
    compounds: &[CompoundId],
    keep_hydrogens: bool,
) -> Vec<AtomId> {
    compounds
        .iter()
        .filter_map(|&id| structure.compound(id))
        .flat_map(|c| c.atoms().iter().copied())
        .filter(|&atom_id| {
            structure.atom(atom_id).is_some_and(|atom| {
                atom.is_primary_location() && (keep_hydrogens || !atom.is_hydrogen())
            })
        })
        .collect()
}

/// Atom indices of a representation with the features of the group they form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    pub atom_indices: Vec<usize>,
    pub features: BTreeSet<Feature>,
}

/// Assigns pharmacophoric features to groups of representation atoms.
///
/// `atom_map` maps the index of every heavy representation atom to the
/// serial number of the structure atom it stands for.
pub trait FeatureExtractor {
    fn features_by_groups(
        &self,
        representation: &ChemicalRepresentation,
        atom_map: &BTreeMap<usize, u32>,
    ) -> Result<Vec<FeatureGroup>, ProviderError>;
}

/// Minimal extractor: one `Atom` group per heavy atom, `Metal` added for
/// metal elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomFeatureExtractor;

const METALS: &[u8] = &[3, 11, 12, 13, 19, 20, 25, 26, 27, 28, 29, 30, 48, 78, 80];

impl FeatureExtractor for AtomFeatureExtractor {
    fn features_by_groups(
        &self,
        representation: &ChemicalRepresentation,
        atom_map: &BTreeMap<usize, u32>,
    ) -> Result<Vec<FeatureGroup>, ProviderError> {
        Ok(representation
            .heavy_atoms()
            .filter(|a| atom_map.contains_key(&a.index))
            .map(|a| {
                let mut features = BTreeSet::from([Feature::Atom]);
                if METALS.contains(&a.atomic_number) {
                    features.insert(Feature::Metal);
                }
                FeatureGroup {
                    atom_indices: vec![a.index],
                    features,
                }
            })
            .collect())
    }
}

/// Detects interactions between the groups of a registry.
pub trait InteractionDetector {
    fn detect(&self, registry: &AtomGroupRegistry) -> Result<Vec<Interaction>, DetectionError>;
}

/// Reports a `Proximal` contact between every pair of groups from different
/// compounds whose centroids lie within `cutoff`, for pairs involving a
/// target compound.
#[derive(Debug, Clone, Copy)]
pub struct ProximityDetector {
    pub cutoff: f64,
}

impl Default for ProximityDetector {
    fn default() -> Self {
        Self { cutoff: 6.0 }
    }
}

impl InteractionDetector for ProximityDetector {
    fn detect(&self, registry: &AtomGroupRegistry) -> Result<Vec<Interaction>, DetectionError> {
        let neighborhood = AtomGroupNeighborhood::from_registry(registry);
        let mut found = Vec::new();
        for (src_id, src) in registry.iter() {
            for (trgt_id, _) in neighborhood.search(&src.centroid(), self.cutoff) {
                if trgt_id <= src_id {
                    continue;
                }
                let Some(trgt) = registry.group(trgt_id) else {
                    continue;
                };
                if !(src.has_target() || trgt.has_target()) {
                    continue;
                }
                if !src.compounds().is_disjoint(trgt.compounds()) {
                    continue;
                }
                let distance = (src.centroid() - trgt.centroid()).norm();
                found.push(
                    Interaction::new(InteractionType::Proximal, src_id, trgt_id)
                        .with_param("dist", distance),
                );
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::groups::registry::GroupDraft;
    use crate::core::models::atom::Atom;
    use crate::core::models::compound::CompoundKind;

    fn small_structure() -> (Structure, CompoundId, CompoundId) {
        let mut structure = Structure::new();
        let chain = structure.add_chain('A');
        let eth = structure
            .add_compound(chain, 1, "EOH", CompoundKind::Hetatm)
            .unwrap();
        let zinc = structure
            .add_compound(chain, 2, "ZN", CompoundKind::Hetatm)
            .unwrap();
        let c1 = structure
            .add_atom(Atom::new(1, "C1", "C", eth, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        let c2 = structure
            .add_atom(Atom::new(2, "C2", "C", eth, Point3::new(1.5, 0.0, 0.0)))
            .unwrap();
        let o = structure
            .add_atom(Atom::new(3, "O", "O", eth, Point3::new(2.0, 1.2, 0.0)))
            .unwrap();
        let h = structure
            .add_atom(Atom::new(4, "HO", "H", eth, Point3::new(2.8, 1.4, 0.0)))
            .unwrap();
        structure
            .add_atom(Atom::new(5, "ZN", "Zn", zinc, Point3::new(4.0, 2.0, 0.0)))
            .unwrap();
        structure.add_bond(c1, c2).unwrap();
        structure.add_bond(c2, o).unwrap();
        structure.add_bond(o, h).unwrap();
        (structure, eth, zinc)
    }

    #[test]
    fn structure_bonds_reports_bonds_touching_the_compound() {
        let (structure, eth, zinc) = small_structure();
        assert_eq!(StructureBonds.covalent_contacts(&structure, eth, 2.2).unwrap().len(), 3);
        assert!(StructureBonds.covalent_contacts(&structure, zinc, 2.2).unwrap().is_empty());
    }

    #[test]
    fn representation_builder_honours_hydrogen_flag() {
        let (structure, eth, _) = small_structure();
        let with_h = StructureRepresentationBuilder
            .build(&structure, &[eth], true)
            .unwrap();
        assert_eq!(with_h.atoms.len(), 4);
        assert_eq!(with_h.bonds, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(with_h.heavy_atom_count(), 3);

        let heavy_only = StructureRepresentationBuilder
            .build(&structure, &[eth], false)
            .unwrap();
        assert_eq!(heavy_only.atoms.len(), 3);
        assert_eq!(heavy_only.bonds, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn atom_feature_extractor_flags_metals() {
        let (structure, eth, zinc) = small_structure();
        let representation = StructureRepresentationBuilder
            .build(&structure, &[eth, zinc], false)
            .unwrap();
        let atom_map: BTreeMap<usize, u32> = representation
            .atoms
            .iter()
            .map(|a| (a.index, a.index as u32 + 1))
            .collect();
        let groups = AtomFeatureExtractor
            .features_by_groups(&representation, &atom_map)
            .unwrap();
        assert_eq!(groups.len(), 4);
        assert!(groups[3].features.contains(&Feature::Metal));
        assert!(!groups[0].features.contains(&Feature::Metal));
    }

    #[test]
    fn proximity_detector_pairs_groups_of_different_compounds() {
        let (mut structure, _, zinc) = small_structure();
        structure.set_target(zinc, true).unwrap();
        let mut registry = AtomGroupRegistry::new();
        let ids: Vec<AtomId> = structure.atoms_iter().map(|(id, _)| id).collect();
        for &id in &ids {
            registry.register_atom(&structure, id).unwrap();
        }
        let o = structure.atom_by_serial(3).unwrap();
        let c1 = structure.atom_by_serial(1).unwrap();
        let zn = structure.atom_by_serial(5).unwrap();
        registry
            .add([
                GroupDraft::new([o], [Feature::Acceptor]),
                GroupDraft::new([c1], [Feature::Atom]),
                GroupDraft::new([zn], [Feature::Metal]),
            ])
            .unwrap();

        let found = ProximityDetector { cutoff: 3.0 }.detect(&registry).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, InteractionType::Proximal);
    }
}
