use crate::cli::{FingerprintArgs, GroupsArgs};
use crate::error::{CliError, Result};
use ifpkit::core::properties::DefaultProperties;
use ifpkit::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPerceptionConfig {
    #[serde(rename = "keep-hydrogens")]
    keep_hydrogens: Option<bool>,
    #[serde(rename = "expand-selection")]
    expand_selection: Option<bool>,
    #[serde(rename = "search-radius")]
    search_radius: Option<f64>,
    #[serde(rename = "n-terminal-heuristic")]
    n_terminal_heuristic: Option<bool>,
    /// Extra pharmacophore table, layered over the standard one.
    properties: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialShellConfig {
    #[serde(rename = "num-levels")]
    num_levels: Option<usize>,
    #[serde(rename = "radius-step")]
    radius_step: Option<f64>,
    #[serde(rename = "diff-comp-classes")]
    diff_comp_classes: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialFingerprintConfig {
    /// 0 selects an unfolded fingerprint.
    length: Option<u32>,
    #[serde(rename = "unique-shells")]
    unique_shells: Option<bool>,
    count: Option<bool>,
}

/// Values given on the command line; set fields win over the config file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliOverrides {
    pub levels: Option<usize>,
    pub radius: Option<f64>,
    pub length: Option<u32>,
    pub count: bool,
    pub diff_classes: Option<bool>,
    pub no_merge: bool,
}

impl From<&FingerprintArgs> for CliOverrides {
    fn from(args: &FingerprintArgs) -> Self {
        Self {
            levels: args.levels,
            radius: args.radius,
            length: args.length,
            count: args.count,
            diff_classes: args.diff_classes,
            no_merge: args.no_merge,
        }
    }
}

impl From<&GroupsArgs> for CliOverrides {
    fn from(args: &GroupsArgs) -> Self {
        Self {
            no_merge: args.no_merge,
            ..Self::default()
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialIfpConfig {
    perception: Option<PartialPerceptionConfig>,
    shells: Option<PartialShellConfig>,
    fingerprint: Option<PartialFingerprintConfig>,
    #[serde(rename = "merge-hydrophobic")]
    merge_hydrophobic: Option<bool>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl PartialIfpConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Loads `path` when given, otherwise starts from an empty configuration.
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, overrides: &CliOverrides) -> Result<core_config::IfpConfig> {
        let perception = self.merge_perception()?;
        let shells = self.merge_shells(overrides)?;
        let fingerprint = self.merge_fingerprint(overrides)?;

        let merge_hydrophobic = if overrides.no_merge {
            false
        } else {
            self.merge_hydrophobic.unwrap_or(true)
        };

        core_config::IfpConfigBuilder::new()
            .perception(perception)
            .shells(shells)
            .fingerprint(fingerprint)
            .merge_hydrophobic(merge_hydrophobic)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_perception(&mut self) -> Result<core_config::PerceptionConfig> {
        let partial = self.perception.take().unwrap_or_default();
        let mut builder = core_config::PerceptionConfigBuilder::new();
        if let Some(keep) = partial.keep_hydrogens {
            builder = builder.keep_hydrogens(keep);
        }
        if let Some(expand) = partial.expand_selection {
            builder = builder.expand_selection(expand);
        }
        if let Some(radius) = partial.search_radius {
            builder = builder.search_radius(radius);
        }
        if let Some(enabled) = partial.n_terminal_heuristic {
            builder = builder.n_terminal_heuristic(enabled);
        }
        if let Some(path) = partial.properties {
            let path = self.resolve(&path);
            if !path.exists() {
                return Err(CliError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Provided path does not exist: {}", path.display()),
                )));
            }
            let extra = DefaultProperties::load(&path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
            debug!("Loaded {} compound templates from {:?}", extra.len(), path);
            let mut properties = DefaultProperties::standard();
            properties.merge(extra);
            builder = builder.default_properties(properties);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_shells(&mut self, overrides: &CliOverrides) -> Result<core_config::ShellConfig> {
        let partial = self.shells.take().unwrap_or_default();
        let mut builder = core_config::ShellConfigBuilder::new();
        if let Some(levels) = overrides.levels.or(partial.num_levels) {
            builder = builder.num_levels(levels);
        }
        if let Some(step) = overrides.radius.or(partial.radius_step) {
            builder = builder.radius_step(step);
        }
        if let Some(diff) = overrides.diff_classes.or(partial.diff_comp_classes) {
            builder = builder.diff_comp_classes(diff);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_fingerprint(
        &mut self,
        overrides: &CliOverrides,
    ) -> Result<core_config::FingerprintConfig> {
        let partial = self.fingerprint.take().unwrap_or_default();
        let mut builder = core_config::FingerprintConfigBuilder::new();
        if let Some(length) = overrides.length.or(partial.length) {
            builder = builder.fold_to_size((length > 0).then_some(length));
        }
        if let Some(unique) = partial.unique_shells {
            builder = builder.unique_shells(unique);
        }
        let count = overrides.count || partial.count.unwrap_or(false);
        builder
            .count_fp(count)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
