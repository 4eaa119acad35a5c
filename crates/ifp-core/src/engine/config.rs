use crate::core::properties::DefaultProperties;
use thiserror::Error;

pub const DEFAULT_SEARCH_RADIUS: f64 = 2.2;
pub const DEFAULT_NUM_LEVELS: usize = 2;
pub const DEFAULT_RADIUS_STEP: f64 = 5.73171;
pub const DEFAULT_FOLD_SIZE: u32 = 4096;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Unique-shell and count fingerprints are mutually exclusive")]
    ConflictingFingerprintModes,
}

fn positive_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a positive finite number, got {value}"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PerceptionConfig {
    /// Keep hydrogens present in the input for representation building.
    pub keep_hydrogens: bool,
    /// Include spatial neighbors when building a representation on the fly.
    pub expand_selection: bool,
    /// Radius (Angstroms) for covalent and proximal compound searches.
    pub search_radius: f64,
    /// Marks the N of the first compound of every chain as positively ionizable.
    pub n_terminal_heuristic: bool,
    pub default_properties: DefaultProperties,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            keep_hydrogens: true,
            expand_selection: true,
            search_radius: DEFAULT_SEARCH_RADIUS,
            n_terminal_heuristic: true,
            default_properties: DefaultProperties::standard(),
        }
    }
}

#[derive(Default)]
pub struct PerceptionConfigBuilder {
    keep_hydrogens: Option<bool>,
    expand_selection: Option<bool>,
    search_radius: Option<f64>,
    n_terminal_heuristic: Option<bool>,
    default_properties: Option<DefaultProperties>,
}

impl PerceptionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_hydrogens(mut self, keep: bool) -> Self {
        self.keep_hydrogens = Some(keep);
        self
    }
    pub fn expand_selection(mut self, expand: bool) -> Self {
        self.expand_selection = Some(expand);
        self
    }
    pub fn search_radius(mut self, radius: f64) -> Self {
        self.search_radius = Some(radius);
        self
    }
    pub fn n_terminal_heuristic(mut self, enabled: bool) -> Self {
        self.n_terminal_heuristic = Some(enabled);
        self
    }
    pub fn default_properties(mut self, properties: DefaultProperties) -> Self {
        self.default_properties = Some(properties);
        self
    }

    pub fn build(self) -> Result<PerceptionConfig, ConfigError> {
        let defaults = PerceptionConfig::default();
        Ok(PerceptionConfig {
            keep_hydrogens: self.keep_hydrogens.unwrap_or(defaults.keep_hydrogens),
            expand_selection: self.expand_selection.unwrap_or(defaults.expand_selection),
            search_radius: positive_finite(
                "search_radius",
                self.search_radius.unwrap_or(defaults.search_radius),
            )?,
            n_terminal_heuristic: self
                .n_terminal_heuristic
                .unwrap_or(defaults.n_terminal_heuristic),
            default_properties: self
                .default_properties
                .unwrap_or(defaults.default_properties),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    /// Number of shell levels per group, level 0 included.
    pub num_levels: usize,
    /// Width (Angstroms) of each ring of the neighborhood expansion.
    pub radius_step: f64,
    /// Qualify level-0 identifiers by the compound classes of the group.
    pub diff_comp_classes: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            num_levels: DEFAULT_NUM_LEVELS,
            radius_step: DEFAULT_RADIUS_STEP,
            diff_comp_classes: true,
        }
    }
}

#[derive(Default)]
pub struct ShellConfigBuilder {
    num_levels: Option<usize>,
    radius_step: Option<f64>,
    diff_comp_classes: Option<bool>,
}

impl ShellConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_levels(mut self, levels: usize) -> Self {
        self.num_levels = Some(levels);
        self
    }
    pub fn radius_step(mut self, step: f64) -> Self {
        self.radius_step = Some(step);
        self
    }
    pub fn diff_comp_classes(mut self, enabled: bool) -> Self {
        self.diff_comp_classes = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ShellConfig, ConfigError> {
        let defaults = ShellConfig::default();
        let num_levels = self.num_levels.unwrap_or(defaults.num_levels);
        if num_levels == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "num_levels",
                reason: "at least one level is required".to_string(),
            });
        }
        Ok(ShellConfig {
            num_levels,
            radius_step: positive_finite(
                "radius_step",
                self.radius_step.unwrap_or(defaults.radius_step),
            )?,
            diff_comp_classes: self.diff_comp_classes.unwrap_or(defaults.diff_comp_classes),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfpEncoding {
    Binary,
    Count,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Fingerprint length after folding; `None` keeps the 2^32 index space.
    pub fold_to_size: Option<u32>,
    /// Collapse repeated shell identifiers into one on-bit.
    pub unique_shells: bool,
    /// Keep identifier multiplicities as counts.
    pub count_fp: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            fold_to_size: Some(DEFAULT_FOLD_SIZE),
            unique_shells: true,
            count_fp: false,
        }
    }
}

impl FingerprintConfig {
    pub fn encoding(&self) -> IfpEncoding {
        if self.count_fp {
            IfpEncoding::Count
        } else {
            IfpEncoding::Binary
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unique_shells && self.count_fp {
            return Err(ConfigError::ConflictingFingerprintModes);
        }
        if self.fold_to_size == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "fold_to_size",
                reason: "a fingerprint needs at least one bit".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FingerprintConfigBuilder {
    fold_to_size: Option<Option<u32>>,
    unique_shells: Option<bool>,
    count_fp: Option<bool>,
}

impl FingerprintConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold_to_size(mut self, size: Option<u32>) -> Self {
        self.fold_to_size = Some(size);
        self
    }
    pub fn unique_shells(mut self, unique: bool) -> Self {
        self.unique_shells = Some(unique);
        self
    }
    /// Selecting count encoding turns unique shells off unless requested explicitly.
    pub fn count_fp(mut self, count: bool) -> Self {
        self.count_fp = Some(count);
        self
    }

    pub fn build(self) -> Result<FingerprintConfig, ConfigError> {
        let defaults = FingerprintConfig::default();
        let count_fp = self.count_fp.unwrap_or(defaults.count_fp);
        let unique_shells = self
            .unique_shells
            .unwrap_or(if count_fp { false } else { defaults.unique_shells });
        let config = FingerprintConfig {
            fold_to_size: self.fold_to_size.unwrap_or(defaults.fold_to_size),
            unique_shells,
            count_fp,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything one fingerprinting run needs.
#[derive(Debug, Clone)]
pub struct IfpConfig {
    pub perception: PerceptionConfig,
    pub shells: ShellConfig,
    pub fingerprint: FingerprintConfig,
    /// Merge hydrophobic atoms into islands before encoding.
    pub merge_hydrophobic: bool,
}

impl Default for IfpConfig {
    fn default() -> Self {
        Self {
            perception: PerceptionConfig::default(),
            shells: ShellConfig::default(),
            fingerprint: FingerprintConfig::default(),
            merge_hydrophobic: true,
        }
    }
}

#[derive(Default)]
pub struct IfpConfigBuilder {
    perception: Option<PerceptionConfig>,
    shells: Option<ShellConfig>,
    fingerprint: Option<FingerprintConfig>,
    merge_hydrophobic: Option<bool>,
}

impl IfpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn perception(mut self, config: PerceptionConfig) -> Self {
        self.perception = Some(config);
        self
    }
    pub fn shells(mut self, config: ShellConfig) -> Self {
        self.shells = Some(config);
        self
    }
    pub fn fingerprint(mut self, config: FingerprintConfig) -> Self {
        self.fingerprint = Some(config);
        self
    }
    pub fn merge_hydrophobic(mut self, merge: bool) -> Self {
        self.merge_hydrophobic = Some(merge);
        self
    }

    pub fn build(self) -> Result<IfpConfig, ConfigError> {
        let fingerprint = self.fingerprint.unwrap_or_default();
        fingerprint.validate()?;
        Ok(IfpConfig {
            perception: self.perception.unwrap_or_default(),
            shells: self.shells.unwrap_or_default(),
            fingerprint,
            merge_hydrophobic: self.merge_hydrophobic.unwrap_or(true),
        })
    }
}
