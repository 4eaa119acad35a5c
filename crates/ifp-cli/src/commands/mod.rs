pub mod fingerprint;
pub mod groups;

use crate::error::CliError;
use crate::input::AnalysisUnit;
use ifpkit::core::providers::{StructureBonds, StructureRepresentationBuilder};
use ifpkit::engine::error::EngineError;
use ifpkit::workflows::ifp::Collaborators;

/// Collaborators reading bonds from the unit and its precomputed records.
pub fn collaborators(unit: &AnalysisUnit) -> Collaborators<'_> {
    Collaborators {
        contacts: &StructureBonds,
        builder: &StructureRepresentationBuilder,
        extractor: &unit.features,
        detector: &unit.interactions,
    }
}

/// A unit without targets is a problem of the input file, not of the engine.
pub fn engine_error(unit: &AnalysisUnit, error: EngineError) -> CliError {
    match error {
        EngineError::NoTarget => CliError::InvalidUnit {
            path: unit.path.clone(),
            reason: "no compound is marked as target".to_string(),
        },
        other => CliError::Core(other),
    }
}


/// An alanine next to a two-carbon ligand, both targets.
#[cfg(test)]
pub(crate) const TEST_UNIT: &str = r#"
[[compounds]]
name = "ALA"
kind = "residue"
chain = "A"
number = 1
target = true
atoms = [
    { serial = 1, name = "N", element = "N", x = 0.0, y = 0.0, z = 0.0 },
    { serial = 2, name = "CA", element = "C", x = 1.46, y = 0.0, z = 0.0 },
    { serial = 3, name = "C", element = "C", x = 2.0, y = 1.42, z = 0.0 },
    { serial = 4, name = "O", element = "O", x = 1.3, y = 2.4, z = 0.0 },
    { serial = 5, name = "CB", element = "C", x = 1.96, y = -0.8, z = -1.2 },
    { serial = 6, name = "OXT", element = "O", x = 3.2, y = 1.5, z = 0.0 },
]

[[compounds]]
name = "LIG"
kind = "hetatm"
chain = "L"
number = 1
target = true
atoms = [
    { serial = 10, name = "C1", element = "C", x = 2.5, y = -2.5, z = -4.0 },
    { serial = 11, name = "C2", element = "C", x = 3.9, y = -2.5, z = -4.0 },
]

[[bonds]]
atoms = [1, 2]

[[bonds]]
atoms = [2, 3]

[[bonds]]
atoms = [3, 4]

[[bonds]]
atoms = [2, 5]

[[bonds]]
atoms = [3, 6]

[[bonds]]
atoms = [10, 11]

[[features]]
compound = "LIG"
atoms = [10]
features = ["Hydrophobic"]

[[features]]
compound = "LIG"
atoms = [11]
features = ["Hydrophobic"]

[[interactions]]
type = "Hydrophobic"
src = [5]
trgt = [10]
params = { dist = 3.3 }
"#;
