//! Default pharmacophore properties keyed by compound name.
//!
//! Each compound maps to a list of group templates: a set of atom names and
//! the features assigned to the group made of those atoms. A built-in table
//! covers the standard amino acids and water; a TOML file can extend or
//! override it per compound:
//!
//! ```toml
//! [SER]
//! groups = [
//!     { atoms = ["OG"], features = ["Atom", "Acceptor", "Donor"] },
//!     { atoms = ["CB"], features = ["Atom"] },
//! ]
//! ```

mod standard;

use crate::core::models::feature::Feature;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTemplate {
    pub atom_names: Vec<String>,
    pub features: BTreeSet<Feature>,
}

impl GroupTemplate {
    fn from_static(atoms: &str, features: &str) -> Self {
        Self {
            atom_names: atoms.split(',').map(|a| a.trim().to_string()).collect(),
            features: features
                .split(',')
                .filter_map(|f| f.parse::<Feature>().ok())
                .collect(),
        }
    }

    /// Comma-joined atom names, as used in log messages.
    pub fn label(&self) -> String {
        self.atom_names.join(",")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplate {
    atoms: Vec<String>,
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompound {
    groups: Vec<RawTemplate>,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultProperties {
    table: HashMap<String, Vec<GroupTemplate>>,
}

impl DefaultProperties {
    /// A table with no entries; every compound goes through feature extraction.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table for the 20 standard amino acids and water.
    pub fn standard() -> Self {
        let mut table = HashMap::new();
        for (name, sidechain) in standard::SIDECHAINS.entries() {
            let backbone = if *name == "PRO" {
                standard::PROLINE_BACKBONE
            } else {
                standard::BACKBONE
            };
            let templates = backbone
                .iter()
                .chain(sidechain.iter())
                .map(|(atoms, features)| GroupTemplate::from_static(atoms, features))
                .collect();
            table.insert(name.to_string(), templates);
        }
        for (name, groups) in standard::WATERS.entries() {
            let templates = groups
                .iter()
                .map(|(atoms, features)| GroupTemplate::from_static(atoms, features))
                .collect();
            table.insert(name.to_string(), templates);
        }
        Self { table }
    }

    pub fn load(path: &Path) -> Result<Self, PropertiesLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| PropertiesLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Parses the TOML table format; `origin` names the source in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, PropertiesLoadError> {
        let raw: HashMap<String, RawCompound> =
            toml::from_str(content).map_err(|e| PropertiesLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;

        let mut table = HashMap::with_capacity(raw.len());
        for (compound, entry) in raw {
            let compound = compound.trim().to_uppercase();
            let mut templates = Vec::with_capacity(entry.groups.len());
            for group in entry.groups {
                if group.atoms.is_empty() {
                    return Err(PropertiesLoadError::EmptyTemplate { compound });
                }
                let mut features = BTreeSet::new();
                for name in &group.features {
                    let feature = name.parse::<Feature>().map_err(|_| {
                        PropertiesLoadError::UnknownFeature {
                            compound: compound.clone(),
                            feature: name.clone(),
                        }
                    })?;
                    features.insert(feature);
                }
                templates.push(GroupTemplate {
                    atom_names: group.atoms.iter().map(|a| a.trim().to_string()).collect(),
                    features,
                });
            }
            table.insert(compound, templates);
        }
        Ok(Self { table })
    }

    pub fn get(&self, compound_name: &str) -> Option<&[GroupTemplate]> {
        self.table.get(compound_name).map(|v| v.as_slice())
    }

    pub fn contains(&self, compound_name: &str) -> bool {
        self.table.contains_key(compound_name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries of `other` replace entries of `self` compound by compound.
    pub fn merge(&mut self, other: DefaultProperties) {
        self.table.extend(other.table);
    }
}

#[derive(Debug, Error)]
pub enum PropertiesLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown feature '{feature}' in properties of compound '{compound}'")]
    UnknownFeature { compound: String, feature: String },
    #[error("A group template of compound '{compound}' lists no atoms")]
    EmptyTemplate { compound: String },
}
