//! # Workflows Module
//!
//! Top-level entry points chaining the engine stages for one analysis unit.
//!
//! - **IFP Workflow** ([`ifp`]) - Perception, interaction detection, hydrophobic
//!   island merging and fingerprint encoding.

pub mod ifp;
