use crate::cli::GroupsArgs;
use crate::commands::{collaborators, engine_error};
use crate::config::{CliOverrides, PartialIfpConfig};
use crate::error::Result;
use crate::events::logging_callback;
use crate::input::AnalysisUnit;
use crate::output;
use ifpkit::engine::events::EventReporter;
use ifpkit::workflows;
use tracing::info;

pub fn run(args: GroupsArgs) -> Result<()> {
    let partial_config = PartialIfpConfig::from_optional_file(args.config.as_deref())?;
    let config = partial_config.merge_with_cli(&CliOverrides::from(&args))?;

    info!("Loading analysis unit from {:?}", &args.input);
    let unit = AnalysisUnit::from_file(&args.input)?;
    let reporter = EventReporter::with_callback(logging_callback(unit.name.clone()));

    let prepared = workflows::ifp::prepare_groups(
        &unit.structure,
        &config,
        &collaborators(&unit),
        None,
        &reporter,
    )
    .map_err(|e| engine_error(&unit, e))?;

    for (feature, count) in prepared.registry.summary() {
        info!("{feature}: {count} group(s)");
    }
    for failure in &prepared.failures {
        println!("  Skipped {}: {}", failure.label, failure.error);
    }

    output::write_groups(&args.output, &unit.structure, &prepared.registry)?;
    println!(
        "✓ {} group(s) of unit '{}' written to: {}",
        prepared.registry.len(),
        unit.name,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TEST_UNIT;
    use crate::commands::fixtures::write_unit;

    fn args(input: std::path::PathBuf, output: std::path::PathBuf, no_merge: bool) -> GroupsArgs {
        GroupsArgs {
            input,
            output,
            config: None,
            no_merge,
        }
    }

    #[test]
    fn merged_groups_include_the_ligand_island() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_unit(dir.path(), "complex.toml", TEST_UNIT);
        let output = dir.path().join("groups.csv");
        run(args(input, output.clone(), false)).unwrap();

        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.starts_with("group,size,atoms,compounds,features,interactions,x,y,z\n"));
        assert!(content.lines().any(|l| l.contains(",10;11,L/LIG1,Hydrophobe,")));
        assert!(content.lines().any(|l| l.contains(",5,A/ALA1,Atom;Hydrophobe,")));
    }

    #[test]
    fn without_merging_ligand_atoms_stay_hydrophobic() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_unit(dir.path(), "complex.toml", TEST_UNIT);
        let output = dir.path().join("groups.csv");
        run(args(input, output.clone(), true)).unwrap();

        let content = std::fs::read_to_string(output).unwrap();
        assert!(!content.contains("Hydrophobe"));
        assert!(content.lines().any(|l| l.contains(",10,L/LIG1,Hydrophobic,")));
    }
}
