use crate::cli::FingerprintArgs;
use crate::commands::{collaborators, engine_error};
use crate::config::{CliOverrides, PartialIfpConfig};
use crate::error::Result;
use crate::events::logging_callback;
use crate::input::AnalysisUnit;
use crate::output;
use ifpkit::engine::config::IfpConfig;
use ifpkit::engine::events::EventReporter;
use ifpkit::engine::fingerprint::FingerprintOutput;
use ifpkit::workflows;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(args: FingerprintArgs) -> Result<()> {
    let partial_config = PartialIfpConfig::from_optional_file(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&CliOverrides::from(&args))?;

    let fingerprints = fingerprint_units(&args.inputs, &config)?;

    info!(
        "Writing {} fingerprint(s) to {:?}",
        fingerprints.len(),
        &args.output
    );
    output::write_fingerprints(&args.output, &fingerprints)?;
    println!(
        "✓ {} fingerprint(s) written to: {}",
        fingerprints.len(),
        args.output.display()
    );
    Ok(())
}

/// Loads and encodes every unit in parallel; results keep the input order.
pub fn fingerprint_units(
    inputs: &[PathBuf],
    config: &IfpConfig,
) -> Result<Vec<(String, FingerprintOutput)>> {
    inputs
        .par_iter()
        .map(|path| {
            let unit = AnalysisUnit::from_file(path)?;
            fingerprint_unit(&unit, config)
        })
        .collect()
}

pub fn fingerprint_unit(
    unit: &AnalysisUnit,
    config: &IfpConfig,
) -> Result<(String, FingerprintOutput)> {
    info!("Encoding unit '{}' from {:?}", unit.name, unit.path);
    let reporter = EventReporter::with_callback(logging_callback(unit.name.clone()));
    let result = workflows::ifp::run(
        &unit.structure,
        config,
        &collaborators(unit),
        None,
        &reporter,
    )
    .map_err(|e| engine_error(unit, e))?;

    if !result.groups.failures.is_empty() {
        warn!(
            "Unit '{}': {} compound(s) could not be perceived.",
            unit.name,
            result.groups.failures.len()
        );
    }
    info!(
        "Unit '{}': {} groups, {} shells, {} on-bits.",
        unit.name,
        result.groups.registry.len(),
        result.shells.len(),
        result.fingerprint.entries().len()
    );
    Ok((unit.name.clone(), result.fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::TEST_UNIT as UNIT;
    use crate::commands::fixtures::write_unit;
    use crate::error::CliError;

    fn config() -> IfpConfig {
        PartialIfpConfig::default()
            .merge_with_cli(&CliOverrides::default())
            .unwrap()
    }

    #[test]
    fn units_are_encoded_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_unit(dir.path(), "first.toml", UNIT);
        let second = write_unit(dir.path(), "second.toml", UNIT);

        let fingerprints = fingerprint_units(&[first, second], &config()).unwrap();
        assert_eq!(fingerprints.len(), 2);
        assert_eq!(fingerprints[0].0, "first");
        assert_eq!(fingerprints[1].0, "second");
        assert_eq!(fingerprints[0].1, fingerprints[1].1);
        assert!(!fingerprints[0].1.entries().is_empty());
    }

    #[test]
    fn unit_without_target_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_unit(
            dir.path(),
            "none.toml",
            &UNIT.replace("target = true", "target = false"),
        );
        let result = fingerprint_units(&[path], &config());
        assert!(matches!(result, Err(CliError::InvalidUnit { .. })));
    }

    #[test]
    fn unresolved_interaction_fails_the_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_unit(
            dir.path(),
            "bad.toml",
            &UNIT.replace("trgt = [10]", "trgt = [10, 11]"),
        );
        let result = fingerprint_units(&[path], &config());
        assert!(matches!(result, Err(CliError::Core(_))));
    }

    #[test]
    fn run_writes_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_unit(dir.path(), "complex.toml", UNIT);
        let output = dir.path().join("fp.csv");
        run(FingerprintArgs {
            inputs: vec![input],
            output: output.clone(),
            config: None,
            levels: None,
            radius: None,
            length: Some(256),
            count: true,
            diff_classes: None,
            no_merge: false,
        })
        .unwrap();

        let content = std::fs::read_to_string(output).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("unit,length,index,value"));
        let rows: Vec<&str> = lines.collect();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row.starts_with("complex,256,")));
    }
}
