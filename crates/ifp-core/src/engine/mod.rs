//! # Engine Module
//!
//! The stateful stages that turn a structure into an interaction fingerprint.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated settings and builders for every stage
//! - **Group Perception** ([`perceiver`]) - Atom groups from property templates or feature extraction
//! - **Hydrophobic Islands** ([`islands`]) - Union-find merging of contiguous hydrophobic atoms
//! - **Shells** ([`shells`]) - Iterative neighborhood expansion and shell hashing
//! - **Fingerprints** ([`fingerprint`]) - Binary and count encodings with folding and similarity
//! - **Events** ([`events`]) - Injected callback for structured progress events
//! - **Error Handling** ([`error`]) - The error type aggregated by the workflows
//!
//! Every stage is synchronous and works on one analysis unit at a time;
//! independent units can be processed in parallel by the caller.

pub mod config;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod islands;
pub mod perceiver;
pub mod shells;
