//! Stateless helpers shared by the models, the registry and the engine:
//! element lookups, centroid and plane geometry, and deterministic hashing.

pub mod elements;
pub mod geometry;
pub mod hashing;
