//! # IFPkit Core Library
//!
//! Perception of pharmacophoric atom groups on 3-D molecular assemblies,
//! merging of hydrophobic islands and encoding of the group/interaction
//! graph into interaction fingerprints (IFPs).
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** The arena-backed `Structure` model, atom
//!   groups and their registry, the default pharmacophore table and the
//!   collaborator traits through which bonds, chemical representations,
//!   features and interactions are obtained.
//!
//! - **[`engine`]: The Logic Core.** Group perception, hydrophobic island
//!   merging, shell generation and fingerprint encoding, each driven by a
//!   validated configuration and reporting through an injected event callback.
//!
//! - **[`workflows`]: The Public API.** A single entry point running the
//!   complete pipeline on one analysis unit.
//!
//! The library never parses molecular file formats and never decides what
//! counts as an interaction; both are supplied by the caller.

pub mod core;
pub mod engine;
pub mod workflows;
