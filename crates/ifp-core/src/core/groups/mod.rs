//! Atom groups and the registry that keeps them canonical.
//!
//! - [`extended`] - Registry-side atoms with group back-references
//! - [`group`] - The atom group value type and its classification helpers
//! - [`registry`] - Deduplicated group storage, features and interactions
//! - [`neighborhood`] - Centroid k-d tree for spatial group queries

pub mod extended;
pub mod group;
pub mod neighborhood;
pub mod registry;
