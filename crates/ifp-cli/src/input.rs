//! Analysis units: one TOML file per assembly to fingerprint.
//!
//! A unit carries the structure itself together with the output of the two
//! external collaborators the library does not implement: precomputed feature
//! groups (`[[features]]`) and detected interactions (`[[interactions]]`).
//! Both refer to atoms by serial number.

use crate::error::{CliError, Result};
use ifpkit::core::groups::registry::AtomGroupRegistry;
use ifpkit::core::models::atom::Atom;
use ifpkit::core::models::compound::CompoundKind;
use ifpkit::core::models::feature::Feature;
use ifpkit::core::models::ids::AtomId;
use ifpkit::core::models::interaction::{Interaction, InteractionType};
use ifpkit::core::models::structure::Structure;
use ifpkit::core::providers::{
    AtomFeatureExtractor, ChemicalRepresentation, DetectionError, FeatureExtractor, FeatureGroup,
    InteractionDetector, ProviderError,
};
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawChain {
    id: char,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawAtom {
    serial: u32,
    name: String,
    element: String,
    x: f64,
    y: f64,
    z: f64,
    altloc: Option<char>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawCompound {
    name: String,
    kind: String,
    chain: char,
    number: isize,
    #[serde(default)]
    target: bool,
    atoms: Vec<RawAtom>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawBond {
    atoms: [u32; 2],
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawFeatureGroup {
    compound: String,
    atoms: Vec<u32>,
    features: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawInteraction {
    #[serde(rename = "type")]
    kind: String,
    src: Vec<u32>,
    trgt: Vec<u32>,
    #[serde(default)]
    params: BTreeMap<String, f64>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawUnit {
    name: Option<String>,
    #[serde(default)]
    chains: Vec<RawChain>,
    compounds: Vec<RawCompound>,
    #[serde(default)]
    bonds: Vec<RawBond>,
    #[serde(default)]
    features: Vec<RawFeatureGroup>,
    #[serde(default)]
    interactions: Vec<RawInteraction>,
}

/// A feature group as delivered by an external extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub serials: Vec<u32>,
    pub features: BTreeSet<Feature>,
}

/// Serves `[[features]]` records as a [`FeatureExtractor`].
///
/// A record is reported when all of its atoms are part of the representation.
/// Representations that no record touches fall back to one `Atom` group per
/// heavy atom.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedFeatures {
    records: Vec<FeatureRecord>,
}

impl PrecomputedFeatures {
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        Self { records }
    }
}

impl FeatureExtractor for PrecomputedFeatures {
    fn features_by_groups(
        &self,
        representation: &ChemicalRepresentation,
        atom_map: &BTreeMap<usize, u32>,
    ) -> std::result::Result<Vec<FeatureGroup>, ProviderError> {
        let index_of: HashMap<u32, usize> = atom_map.iter().map(|(&i, &s)| (s, i)).collect();
        let mut touched = false;
        let mut groups = Vec::new();
        for record in &self.records {
            let indices: Vec<usize> = record
                .serials
                .iter()
                .filter_map(|serial| index_of.get(serial).copied())
                .collect();
            if indices.is_empty() {
                continue;
            }
            touched = true;
            if indices.len() < record.serials.len() {
                trace!(
                    "Feature group {:?} lies partly outside the representation; skipped.",
                    record.serials
                );
                continue;
            }
            groups.push(FeatureGroup {
                atom_indices: indices,
                features: record.features.clone(),
            });
        }
        if !touched {
            debug!("No precomputed features for this representation; using atom groups.");
            return AtomFeatureExtractor.features_by_groups(representation, atom_map);
        }
        Ok(groups)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub kind: InteractionType,
    pub src: Vec<u32>,
    pub trgt: Vec<u32>,
    pub params: BTreeMap<String, f64>,
}

/// Serves `[[interactions]]` records as an [`InteractionDetector`] by
/// resolving their atom serials to the groups of the registry.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedInteractions {
    records: Vec<InteractionRecord>,
}

impl PrecomputedInteractions {
    pub fn new(records: Vec<InteractionRecord>) -> Self {
        Self { records }
    }
}

fn resolve_atoms(
    registry: &AtomGroupRegistry,
    serials: &[u32],
) -> std::result::Result<Vec<AtomId>, DetectionError> {
    serials
        .iter()
        .map(|&serial| {
            registry
                .atom_by_serial(serial)
                .ok_or(DetectionError::UnknownAtomSerial(serial))
        })
        .collect()
}

impl InteractionDetector for PrecomputedInteractions {
    fn detect(
        &self,
        registry: &AtomGroupRegistry,
    ) -> std::result::Result<Vec<Interaction>, DetectionError> {
        let mut found = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let src_atoms = resolve_atoms(registry, &record.src)?;
            let trgt_atoms = resolve_atoms(registry, &record.trgt)?;
            let src = registry
                .find(&src_atoms)
                .ok_or_else(|| DetectionError::UnresolvedGroup(record.src.clone()))?;
            let trgt = registry
                .find(&trgt_atoms)
                .ok_or_else(|| DetectionError::UnresolvedGroup(record.trgt.clone()))?;
            let mut interaction = Interaction::new(record.kind, src, trgt);
            interaction.params = record.params.clone();
            found.push(interaction);
        }
        Ok(found)
    }
}

/// One assembly with its precomputed collaborator output.
#[derive(Debug)]
pub struct AnalysisUnit {
    pub name: String,
    pub path: PathBuf,
    pub structure: Structure,
    pub features: PrecomputedFeatures,
    pub interactions: PrecomputedInteractions,
}

impl AnalysisUnit {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading analysis unit from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, path)
    }

    /// Parses a unit; `path` names the source in errors and supplies the
    /// default unit name.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        let raw: RawUnit = toml::from_str(content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let invalid = |reason: String| CliError::InvalidUnit {
            path: path.to_path_buf(),
            reason,
        };

        let name = raw.name.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "unit".to_string())
        });

        let structure = build_structure(&raw).map_err(invalid)?;
        let features = feature_records(&raw, &structure).map_err(invalid)?;
        let interactions = interaction_records(&raw).map_err(invalid)?;

        debug!(
            unit = %name,
            atoms = structure.atom_count(),
            compounds = structure.compound_count(),
            features = features.len(),
            interactions = interactions.len(),
            "Analysis unit loaded."
        );

        Ok(Self {
            name,
            path: path.to_path_buf(),
            structure,
            features: PrecomputedFeatures::new(features),
            interactions: PrecomputedInteractions::new(interactions),
        })
    }
}

fn build_structure(raw: &RawUnit) -> std::result::Result<Structure, String> {
    let mut structure = Structure::new();
    for chain in &raw.chains {
        structure.add_chain(chain.id);
    }

    for compound in &raw.compounds {
        let kind: CompoundKind = compound.kind.parse().map_err(|e| format!("{e}"))?;
        let chain_id = structure.add_chain(compound.chain);
        if structure.find_compound(chain_id, compound.number).is_some() {
            return Err(format!(
                "compound {}{} is declared twice in chain {}",
                compound.name, compound.number, compound.chain
            ));
        }
        let compound_id = structure
            .add_compound(chain_id, compound.number, &compound.name, kind)
            .ok_or_else(|| format!("chain {} could not be created", compound.chain))?;
        if compound.target {
            structure.set_target(compound_id, true);
        }

        for atom in &compound.atoms {
            let mut model = Atom::new(
                atom.serial,
                &atom.name,
                &atom.element,
                compound_id,
                Point3::new(atom.x, atom.y, atom.z),
            );
            if let Some(altloc) = atom.altloc {
                model = model.with_altloc(altloc);
            }
            structure
                .add_atom(model)
                .ok_or_else(|| format!("atom serial {} is used more than once", atom.serial))?;
        }
    }

    for bond in &raw.bonds {
        let [a, b] = bond.atoms;
        let (Some(atom_a), Some(atom_b)) = (structure.atom_by_serial(a), structure.atom_by_serial(b))
        else {
            return Err(format!("bond {a}-{b} references an unknown atom serial"));
        };
        structure
            .add_bond(atom_a, atom_b)
            .ok_or_else(|| format!("bond {a}-{b} joins an atom to itself"))?;
    }

    Ok(structure)
}

fn feature_records(
    raw: &RawUnit,
    structure: &Structure,
) -> std::result::Result<Vec<FeatureRecord>, String> {
    let mut records = Vec::with_capacity(raw.features.len());
    for group in &raw.features {
        if group.atoms.is_empty() {
            return Err(format!("a feature group of {} has no atoms", group.compound));
        }
        for &serial in &group.atoms {
            let compound_name = structure
                .atom_by_serial(serial)
                .and_then(|id| structure.atom(id))
                .and_then(|atom| structure.compound(atom.compound_id))
                .map(|c| c.name.as_str())
                .ok_or_else(|| format!("feature group references unknown atom serial {serial}"))?;
            if compound_name != group.compound {
                return Err(format!(
                    "atom {serial} belongs to {compound_name}, not {}",
                    group.compound
                ));
            }
        }
        let features = group
            .features
            .iter()
            .map(|name| name.parse::<Feature>().map_err(|e| e.to_string()))
            .collect::<std::result::Result<BTreeSet<_>, _>>()?;
        records.push(FeatureRecord {
            serials: group.atoms.clone(),
            features,
        });
    }
    Ok(records)
}

fn interaction_records(raw: &RawUnit) -> std::result::Result<Vec<InteractionRecord>, String> {
    raw.interactions
        .iter()
        .map(|record| {
            if record.src.is_empty() || record.trgt.is_empty() {
                return Err(format!("a {} interaction has an empty side", record.kind));
            }
            Ok(InteractionRecord {
                kind: record.kind.parse().map_err(|e| format!("{e}"))?,
                src: record.src.clone(),
                trgt: record.trgt.clone(),
                params: record.params.clone(),
            })
        })
        .collect()
}
