use super::extended::ExtendedAtom;
use crate::core::models::compound::CompoundKind;
use crate::core::models::feature::Feature;
use crate::core::models::ids::{AtomId, CompoundId, GroupId, InteractionId};
use crate::core::utils::geometry;
use nalgebra::{Point3, Vector3};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// A set of atoms treated as one pharmacophoric unit.
///
/// Membership is fixed at construction; features and interactions change as
/// the analysis proceeds. Equality and hashing consider the member atoms and
/// the current features, so a group is never observed with a stale hash.
#[derive(Debug, Clone)]
pub struct AtomGroup {
    atoms: Vec<AtomId>,
    coords: Vec<Point3<f64>>,
    centroid: Point3<f64>,
    normal: OnceLock<Option<Vector3<f64>>>,
    compounds: BTreeSet<CompoundId>,
    kinds: BTreeSet<CompoundKind>,
    has_target: bool,
    pub(crate) features: BTreeSet<Feature>,
    pub(crate) interactions: BTreeSet<InteractionId>,
    recursive: bool,
    parent: Option<GroupId>,
}

impl AtomGroup {
    /// Builds a group from its member atoms. Returns `None` for an empty
    /// member list.
    ///
    /// Members are sorted by atom id and deduplicated; coordinates follow the
    /// same order.
    pub(crate) fn from_members(
        mut members: Vec<&ExtendedAtom>,
        features: impl IntoIterator<Item = Feature>,
        recursive: bool,
        parent: Option<GroupId>,
    ) -> Option<Self> {
        members.sort_by_key(|a| a.id);
        members.dedup_by_key(|a| a.id);
        if members.is_empty() {
            return None;
        }

        let coords: Vec<Point3<f64>> = members.iter().map(|a| a.position).collect();
        let centroid = geometry::centroid(&coords)?;

        Some(Self {
            atoms: members.iter().map(|a| a.id).collect(),
            centroid,
            coords,
            normal: OnceLock::new(),
            compounds: members.iter().map(|a| a.compound_id).collect(),
            kinds: members.iter().map(|a| a.compound_kind).collect(),
            has_target: members.iter().any(|a| a.is_target),
            features: features.into_iter().collect(),
            interactions: BTreeSet::new(),
            recursive,
            parent,
        })
    }

    /// Member atoms, sorted. This is the registry key of the group.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn coords(&self) -> &[Point3<f64>] {
        &self.coords
    }

    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }

    /// Normal of the least-squares plane through the members, computed on
    /// first access. `None` for groups with fewer than three atoms.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        *self
            .normal
            .get_or_init(|| geometry::plane_normal(&self.coords))
    }

    pub fn features(&self) -> &BTreeSet<Feature> {
        &self.features
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features.iter().map(Feature::name).collect()
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn interactions(&self) -> &BTreeSet<InteractionId> {
        &self.interactions
    }

    pub fn compounds(&self) -> &BTreeSet<CompoundId> {
        &self.compounds
    }

    /// Distinct compound classes of the members, in canonical order.
    pub fn compound_kinds(&self) -> &BTreeSet<CompoundKind> {
        &self.kinds
    }

    pub fn has_atom(&self, atom: AtomId) -> bool {
        self.atoms.binary_search(&atom).is_ok()
    }

    pub fn contains_group(&self, other: &AtomGroup) -> bool {
        other.atoms.iter().all(|&a| self.has_atom(a))
    }

    /// Recursive groups are referenced from their atoms; pseudo groups are not.
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// The group a pseudo group was derived from.
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    fn all_of(&self, kind: CompoundKind) -> bool {
        self.kinds.len() == 1 && self.kinds.contains(&kind)
    }

    pub fn is_water(&self) -> bool {
        self.all_of(CompoundKind::Water)
    }

    pub fn is_hetatm(&self) -> bool {
        self.all_of(CompoundKind::Hetatm)
    }

    pub fn is_residue(&self) -> bool {
        self.all_of(CompoundKind::Residue)
    }

    pub fn is_nucleotide(&self) -> bool {
        self.all_of(CompoundKind::Nucleotide)
    }

    /// Members come from compounds of different classes.
    pub fn is_mixed(&self) -> bool {
        self.kinds.len() > 1
    }

    pub fn has_water(&self) -> bool {
        self.kinds.contains(&CompoundKind::Water)
    }

    pub fn has_hetatm(&self) -> bool {
        self.kinds.contains(&CompoundKind::Hetatm)
    }

    pub fn has_residue(&self) -> bool {
        self.kinds.contains(&CompoundKind::Residue)
    }

    pub fn has_nucleotide(&self) -> bool {
        self.kinds.contains(&CompoundKind::Nucleotide)
    }

    /// At least one member belongs to a target compound.
    pub fn has_target(&self) -> bool {
        self.has_target
    }
}

impl PartialEq for AtomGroup {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms && self.features == other.features
    }
}

impl Eq for AtomGroup {}

impl Hash for AtomGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atoms.hash(state);
        self.features.hash(state);
    }
}

impl PartialOrd for AtomGroup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AtomGroup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.atoms
            .cmp(&other.atoms)
            .then_with(|| self.features.cmp(&other.features))
    }
}
