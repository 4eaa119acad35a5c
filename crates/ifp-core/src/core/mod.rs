//! # Core Module
//!
//! Stateless building blocks of interaction fingerprinting: the structure
//! model, atom groups and their registry, the default pharmacophore table,
//! the collaborator traits and small numeric utilities.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, compounds, chains, features, interactions
//! - **Atom Groups** ([`groups`]) - Canonical group registry and spatial group index
//! - **Pharmacophore Knowledge** ([`properties`]) - Per-compound feature templates
//! - **Collaborators** ([`providers`]) - Bonding, representation, extraction and detection seams
//! - **Utilities** ([`utils`]) - Geometry, element data and deterministic hashing

pub mod groups;
pub mod models;
pub mod properties;
pub mod providers;
pub mod utils;
