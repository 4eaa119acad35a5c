//! # Core Models Module
//!
//! Data structures describing the molecular assembly an interaction
//! fingerprint is computed for.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atoms with serial, name, element and coordinates
//! - [`compound`] - Residues, nucleotides, hetero groups and waters
//! - [`chain`] - Ordered compound lists used for sequence adjacency
//! - [`structure`] - The arena-backed assembly with bonds and spatial queries
//! - [`feature`] - The closed set of pharmacophoric feature tags
//! - [`interaction`] - Typed edges between atom groups
//! - [`ids`] - Unique identifier types shared by structures and registries
//!
//! ## Usage
//!
//! ```ignore
//! use ifpkit::core::models::{atom::Atom, compound::CompoundKind, structure::Structure};
//!
//! let mut structure = Structure::new();
//! let chain_id = structure.add_chain('A');
//! let compound_id = structure.add_compound(chain_id, 1, "ALA", CompoundKind::Residue)?;
//! structure.add_atom(Atom::new(1, "CA", "C", compound_id, Point3::new(0.0, 0.0, 0.0)))?;
//! ```

pub mod atom;
pub mod chain;
pub mod compound;
pub mod feature;
pub mod ids;
pub mod interaction;
pub mod structure;
