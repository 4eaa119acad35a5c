use super::config::PerceptionConfig;
use super::events::{Event, EventReporter};
use crate::core::groups::registry::{AtomGroupRegistry, GroupDraft, RegistryError};
use crate::core::models::feature::Feature;
use crate::core::models::ids::{AtomId, CompoundId};
use crate::core::models::structure::Structure;
use crate::core::properties::GroupTemplate;
use crate::core::providers::{
    ChemicalRepresentation, CovalentContactProvider, FeatureExtractor, ProviderError,
    RepresentationBuilder, selected_atoms,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const TERMINAL_OXYGEN: &str = "OXT";
const DISULFIDE_FEATURES: [Feature; 4] = [
    Feature::Atom,
    Feature::Acceptor,
    Feature::ChalcogenDonor,
    Feature::Hydrophobic,
];

#[derive(Debug, Error)]
pub enum PerceptionError {
    #[error("Compound {0:?} does not belong to the structure")]
    UnknownCompound(CompoundId),
    #[error(
        "Representation of '{compound}' has {found} heavy atoms but the selection has {expected}"
    )]
    MoleculeSize {
        compound: String,
        expected: usize,
        found: usize,
    },
    #[error("No property template of '{compound}' could be resolved against its atoms")]
    MissingAtoms { compound: String },
    #[error("Feature group references representation atom {0}, which maps to no heavy atom")]
    UnmappedAtomIndex(usize),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug)]
pub struct CompoundFailure {
    pub compound: CompoundId,
    pub label: String,
    pub error: PerceptionError,
}

#[derive(Debug, Default)]
pub struct PerceptionOutcome {
    pub registry: AtomGroupRegistry,
    /// Compounds whose groups were committed, in processing order.
    pub perceived: Vec<CompoundId>,
    pub failures: Vec<CompoundFailure>,
}

/// Groups and covalent edges of one compound, held back until the whole
/// compound has been processed.
#[derive(Debug, Default)]
struct Staged {
    atoms: BTreeSet<AtomId>,
    bonds: Vec<(AtomId, AtomId)>,
    drafts: Vec<GroupDraft>,
}

impl Staged {
    fn bond(&mut self, a: AtomId, b: AtomId) {
        self.atoms.insert(a);
        self.atoms.insert(b);
        self.bonds.push((a, b));
    }

    fn draft(&mut self, draft: GroupDraft) {
        self.atoms.extend(draft.atoms.iter().copied());
        self.drafts.push(draft);
    }
}

/// `A/ALA12` style label used in logs, events and failures.
pub fn compound_label(structure: &Structure, compound_id: CompoundId) -> String {
    let Some(compound) = structure.compound(compound_id) else {
        return format!("{compound_id:?}");
    };
    let chain = structure
        .chain(compound.chain_id)
        .map(|c| c.id)
        .unwrap_or('?');
    format!("{chain}/{}{}", compound.name, compound.number)
}

/// Builds the atom groups of a set of compounds.
///
/// Compounds listed in the default property table are resolved by atom name;
/// every other compound goes through a chemical representation and the
/// feature extractor.
pub struct AtomGroupPerceiver<'a> {
    config: &'a PerceptionConfig,
    contacts: &'a dyn CovalentContactProvider,
    builder: &'a dyn RepresentationBuilder,
    extractor: &'a dyn FeatureExtractor,
}

impl<'a> AtomGroupPerceiver<'a> {
    pub fn new(
        config: &'a PerceptionConfig,
        contacts: &'a dyn CovalentContactProvider,
        builder: &'a dyn RepresentationBuilder,
        extractor: &'a dyn FeatureExtractor,
    ) -> Self {
        Self {
            config,
            contacts,
            builder,
            extractor,
        }
    }

    /// Perceives `compounds` into a fresh registry.
    ///
    /// Per-compound failures are recorded in the outcome and never leave
    /// partial groups behind. Only registry errors abort the run.
    #[instrument(skip_all, fields(compounds = compounds.len()))]
    pub fn perceive(
        &self,
        structure: &Structure,
        compounds: &[CompoundId],
        representations: Option<&HashMap<CompoundId, ChemicalRepresentation>>,
        reporter: &EventReporter,
    ) -> Result<PerceptionOutcome, RegistryError> {
        let mut outcome = PerceptionOutcome::default();

        for &compound_id in compounds {
            let label = compound_label(structure, compound_id);
            let supplied = representations.and_then(|r| r.get(&compound_id));
            match self.stage_compound(structure, compound_id, &label, supplied, reporter) {
                Ok(staged) => {
                    let groups = staged.drafts.len();
                    commit(&mut outcome.registry, structure, staged)?;
                    debug!(compound = %label, groups, "Compound perceived.");
                    reporter.report(Event::CompoundPerceived {
                        compound: label,
                        groups,
                    });
                    outcome.perceived.push(compound_id);
                }
                Err(error) => {
                    warn!(compound = %label, "Perception failed: {}", error);
                    reporter.report(Event::CompoundFailed {
                        compound: label.clone(),
                        reason: error.to_string(),
                    });
                    outcome.failures.push(CompoundFailure {
                        compound: compound_id,
                        label,
                        error,
                    });
                }
            }
        }

        info!(
            perceived = outcome.perceived.len(),
            failed = outcome.failures.len(),
            groups = outcome.registry.len(),
            "Group perception finished."
        );
        Ok(outcome)
    }

    fn stage_compound(
        &self,
        structure: &Structure,
        compound_id: CompoundId,
        label: &str,
        supplied: Option<&ChemicalRepresentation>,
        reporter: &EventReporter,
    ) -> Result<Staged, PerceptionError> {
        let compound = structure
            .compound(compound_id)
            .ok_or(PerceptionError::UnknownCompound(compound_id))?;
        match self.config.default_properties.get(&compound.name) {
            Some(templates) if supplied.is_none() => {
                self.stage_from_templates(structure, compound_id, label, templates, reporter)
            }
            _ => self.stage_from_representation(structure, compound_id, label, supplied),
        }
    }

    fn accepts(&self, structure: &Structure, atom_id: AtomId) -> bool {
        structure.atom(atom_id).is_some_and(|atom| {
            atom.is_primary_location() && (self.config.keep_hydrogens || !atom.is_hydrogen())
        })
    }

    /// First accepted atom per name.
    fn atoms_by_name(&self, structure: &Structure, compound_id: CompoundId) -> HashMap<String, AtomId> {
        let mut map = HashMap::new();
        let Some(compound) = structure.compound(compound_id) else {
            return map;
        };
        for &atom_id in compound.atoms() {
            if !self.accepts(structure, atom_id) {
                continue;
            }
            if let Some(atom) = structure.atom(atom_id) {
                map.entry(atom.name.clone()).or_insert(atom_id);
            }
        }
        map
    }

    fn stage_from_templates(
        &self,
        structure: &Structure,
        compound_id: CompoundId,
        label: &str,
        templates: &[GroupTemplate],
        reporter: &EventReporter,
    ) -> Result<Staged, PerceptionError> {
        let mut staged = Staged::default();
        let atom_map = self.atoms_by_name(structure, compound_id);

        let contacts: Vec<(AtomId, AtomId)> = self
            .contacts
            .covalent_contacts(structure, compound_id, self.config.search_radius)?
            .into_iter()
            .filter(|&(a, b)| self.accepts(structure, a) && self.accepts(structure, b))
            .collect();
        for &(a, b) in &contacts {
            staged.bond(a, b);
        }
        let bonded = |a: AtomId, b: AtomId| contacts.contains(&(a, b)) || contacts.contains(&(b, a));

        let successor = structure.next_in_chain(compound_id);
        let disulfide = self.disulfide_sulfur(structure, compound_id, &atom_map, &contacts);

        let mut resolved = 0usize;
        for template in templates {
            let mut members = Vec::with_capacity(template.atom_names.len());
            let mut missing = Vec::new();
            for name in &template.atom_names {
                match atom_map.get(name) {
                    Some(&id) => members.push(id),
                    None => missing.push(name.clone()),
                }
            }

            if !missing.is_empty() {
                let oxt_only = missing.len() == 1 && missing[0] == TERMINAL_OXYGEN;
                if !oxt_only || successor.is_none() {
                    warn!(
                        compound = %label,
                        group = %template.label(),
                        "Skipping group with missing atoms: {}",
                        missing.join(",")
                    );
                    reporter.report(Event::TemplateSkipped {
                        compound: label.to_string(),
                        atoms: template.label(),
                        missing,
                    });
                }
                continue;
            }

            let features: BTreeSet<Feature> = match disulfide {
                Some(sg) if members == [sg] => DISULFIDE_FEATURES.into_iter().collect(),
                _ => template.features.clone(),
            };
            staged.draft(GroupDraft::new(members, features));
            resolved += 1;
        }

        if !templates.is_empty() && resolved == 0 {
            return Err(PerceptionError::MissingAtoms {
                compound: label.to_string(),
            });
        }

        let is_residue = structure
            .compound(compound_id)
            .is_some_and(|c| c.is_residue());
        if !is_residue {
            return Ok(staged);
        }

        if let Some(&n) = atom_map.get("N") {
            if self.config.n_terminal_heuristic && structure.chain_index(compound_id) == Some(0) {
                staged.draft(GroupDraft::new([n], [Feature::PositivelyIonizable]));
            }
        }

        // Backbone amides N(i)-C(i-1)=O(i-1) and N(i+1)-C(i)=O(i).
        let neighbors = [
            (structure.previous_in_chain(compound_id), Some(compound_id)),
            (Some(compound_id), successor),
        ];
        for (upstream, downstream) in neighbors {
            let (Some(upstream), Some(downstream)) = (upstream, downstream) else {
                continue;
            };
            if !structure.compound(upstream).is_some_and(|c| c.is_residue())
                || !structure.compound(downstream).is_some_and(|c| c.is_residue())
            {
                continue;
            }
            let up = self.atoms_by_name(structure, upstream);
            let down = self.atoms_by_name(structure, downstream);
            let (Some(&n), Some(&c), Some(&o)) = (down.get("N"), up.get("C"), up.get("O")) else {
                continue;
            };
            if bonded(n, c) {
                staged.draft(GroupDraft::new([n, c, o], [Feature::Amide]));
            }
        }

        Ok(staged)
    }

    /// The `SG` of a cysteine covalently bound to another cysteine.
    fn disulfide_sulfur(
        &self,
        structure: &Structure,
        compound_id: CompoundId,
        atom_map: &HashMap<String, AtomId>,
        contacts: &[(AtomId, AtomId)],
    ) -> Option<AtomId> {
        let compound = structure.compound(compound_id)?;
        if compound.name != "CYS" {
            return None;
        }
        let sg = *atom_map.get("SG")?;
        contacts
            .iter()
            .filter_map(|&(a, b)| match (a == sg, b == sg) {
                (true, false) => Some(b),
                (false, true) => Some(a),
                _ => None,
            })
            .filter_map(|partner| structure.atom(partner))
            .any(|partner| {
                partner.compound_id != compound_id
                    && structure
                        .compound(partner.compound_id)
                        .is_some_and(|c| c.name == "CYS")
            })
            .then_some(sg)
    }

    fn stage_from_representation(
        &self,
        structure: &Structure,
        compound_id: CompoundId,
        label: &str,
        supplied: Option<&ChemicalRepresentation>,
    ) -> Result<Staged, PerceptionError> {
        let selection = match supplied {
            Some(_) => vec![compound_id],
            None if self.config.expand_selection => {
                structure.proximal_compounds(compound_id, self.config.search_radius)
            }
            None => vec![compound_id],
        };

        let built;
        let representation = match supplied {
            Some(representation) => representation,
            None => {
                built = self
                    .builder
                    .build(structure, &selection, self.config.keep_hydrogens)?;
                &built
            }
        };

        let heavy_selection: Vec<AtomId> =
            selected_atoms(structure, &selection, self.config.keep_hydrogens)
                .into_iter()
                .filter(|&id| structure.atom(id).is_some_and(|a| !a.is_hydrogen()))
                .collect();
        let found = representation.heavy_atom_count();
        if found != heavy_selection.len() {
            return Err(PerceptionError::MoleculeSize {
                compound: label.to_string(),
                expected: heavy_selection.len(),
                found,
            });
        }

        let index_to_atom: BTreeMap<usize, AtomId> = representation
            .heavy_atoms()
            .map(|a| a.index)
            .zip(heavy_selection.iter().copied())
            .collect();
        let atom_map: BTreeMap<usize, u32> = index_to_atom
            .iter()
            .filter_map(|(&index, &id)| structure.atom(id).map(|a| (index, a.serial)))
            .collect();

        let mut staged = Staged::default();
        for &(i, j) in &representation.bonds {
            if let (Some(&a), Some(&b)) = (index_to_atom.get(&i), index_to_atom.get(&j)) {
                staged.bond(a, b);
            }
        }

        for group in self.extractor.features_by_groups(representation, &atom_map)? {
            if group.atom_indices.is_empty() {
                continue;
            }
            let members = group
                .atom_indices
                .iter()
                .map(|index| {
                    index_to_atom
                        .get(index)
                        .copied()
                        .ok_or(PerceptionError::UnmappedAtomIndex(*index))
                })
                .collect::<Result<Vec<AtomId>, _>>()?;
            let touches_compound = members
                .iter()
                .any(|&id| structure.atom(id).is_some_and(|a| a.compound_id == compound_id));
            if touches_compound {
                staged.draft(GroupDraft::new(members, group.features));
            }
        }
        Ok(staged)
    }
}

fn commit(
    registry: &mut AtomGroupRegistry,
    structure: &Structure,
    staged: Staged,
) -> Result<(), RegistryError> {
    for &atom_id in &staged.atoms {
        registry.register_atom(structure, atom_id)?;
    }
    for (a, b) in staged.bonds {
        registry.add_bond(a, b, 1)?;
    }
    for draft in staged.drafts {
        registry.upsert(&draft.atoms, draft.features, std::iter::empty())?;
    }
    Ok(())
}
