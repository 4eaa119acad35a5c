use crate::core::groups::registry::AtomGroupRegistry;
use crate::core::models::ids::CompoundId;
use crate::core::models::structure::Structure;
use crate::core::providers::{
    AtomFeatureExtractor, ChemicalRepresentation, CovalentContactProvider, FeatureExtractor,
    InteractionDetector, ProximityDetector, RepresentationBuilder, StructureBonds,
    StructureRepresentationBuilder,
};
use crate::engine::config::IfpConfig;
use crate::engine::error::EngineError;
use crate::engine::events::{Event, EventReporter};
use crate::engine::fingerprint::FingerprintOutput;
use crate::engine::islands::{MergeSummary, merge_hydrophobic_atoms};
use crate::engine::perceiver::{AtomGroupPerceiver, CompoundFailure};
use crate::engine::shells::{ShellGenerator, ShellManager};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

const DEFAULT_DETECTOR: ProximityDetector = ProximityDetector { cutoff: 6.0 };

/// The external collaborators of one run.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub contacts: &'a dyn CovalentContactProvider,
    pub builder: &'a dyn RepresentationBuilder,
    pub extractor: &'a dyn FeatureExtractor,
    pub detector: &'a dyn InteractionDetector,
}

impl Default for Collaborators<'static> {
    fn default() -> Self {
        Self {
            contacts: &StructureBonds,
            builder: &StructureRepresentationBuilder,
            extractor: &AtomFeatureExtractor,
            detector: &DEFAULT_DETECTOR,
        }
    }
}

/// Perceived groups with their interactions, ready for encoding.
#[derive(Debug)]
pub struct PreparedGroups {
    pub registry: AtomGroupRegistry,
    pub perceived: Vec<CompoundId>,
    pub failures: Vec<CompoundFailure>,
    pub interactions_detected: usize,
    pub merge: Option<MergeSummary>,
}

#[derive(Debug)]
pub struct IfpResult {
    pub groups: PreparedGroups,
    pub shells: ShellManager,
    pub fingerprint: FingerprintOutput,
}

/// Perceives the target compounds of `structure`, attaches the detected
/// interactions and optionally merges hydrophobic islands.
#[instrument(skip_all, name = "group_preparation")]
pub fn prepare_groups(
    structure: &Structure,
    config: &IfpConfig,
    collaborators: &Collaborators,
    representations: Option<&HashMap<CompoundId, ChemicalRepresentation>>,
    reporter: &EventReporter,
) -> Result<PreparedGroups, EngineError> {
    let targets: Vec<CompoundId> = structure.target_compounds().collect();
    if targets.is_empty() {
        return Err(EngineError::NoTarget);
    }

    // === Phase 1: Group perception ===
    reporter.report(Event::PhaseStart { name: "Perception" });
    let perceiver = AtomGroupPerceiver::new(
        &config.perception,
        collaborators.contacts,
        collaborators.builder,
        collaborators.extractor,
    );
    let outcome = perceiver.perceive(structure, &targets, representations, reporter)?;
    if !outcome.failures.is_empty() {
        warn!(
            "{} of {} target compounds could not be perceived.",
            outcome.failures.len(),
            targets.len()
        );
    }
    let mut registry = outcome.registry;
    reporter.report(Event::PhaseFinish);

    // === Phase 2: Interaction detection ===
    reporter.report(Event::PhaseStart { name: "Detection" });
    let detected = collaborators.detector.detect(&registry)?;
    let interactions_detected = registry.add_interactions(detected)?.len();
    info!(interactions = interactions_detected, "Interactions attached to groups.");
    reporter.report(Event::PhaseFinish);

    // === Phase 3: Hydrophobic islands ===
    let merge = if config.merge_hydrophobic {
        reporter.report(Event::PhaseStart { name: "Hydrophobic Islands" });
        let summary = merge_hydrophobic_atoms(&mut registry, reporter)?;
        reporter.report(Event::PhaseFinish);
        Some(summary)
    } else {
        None
    };

    Ok(PreparedGroups {
        registry,
        perceived: outcome.perceived,
        failures: outcome.failures,
        interactions_detected,
        merge,
    })
}

/// Runs the complete pipeline on one analysis unit.
#[instrument(skip_all, name = "ifp_workflow")]
pub fn run(
    structure: &Structure,
    config: &IfpConfig,
    collaborators: &Collaborators,
    representations: Option<&HashMap<CompoundId, ChemicalRepresentation>>,
    reporter: &EventReporter,
) -> Result<IfpResult, EngineError> {
    config.fingerprint.validate()?;

    let groups = prepare_groups(structure, config, collaborators, representations, reporter)?;

    // === Phase 4: Encoding ===
    reporter.report(Event::PhaseStart { name: "Encoding" });
    let shells = ShellGenerator::new(config.shells.clone()).create_shells(&groups.registry);
    reporter.report(Event::ShellsCreated {
        total: shells.len(),
        unique: shells.num_unique(),
    });
    let fingerprint = shells.to_fingerprint(
        config.fingerprint.fold_to_size,
        config.fingerprint.unique_shells,
        config.fingerprint.count_fp,
    )?;
    reporter.report(Event::PhaseFinish);

    info!(
        groups = groups.registry.len(),
        shells = shells.len(),
        bits = fingerprint.entries().len(),
        "Interaction fingerprint computed."
    );
    Ok(IfpResult {
        groups,
        shells,
        fingerprint,
    })
}
