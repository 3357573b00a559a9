//! Cross-crate scenario tests.
//!
//! Exercises the full stack — connectivity graph, network derivation, part
//! containers, aspects and variable evaluation — through the grid facade,
//! the way a host would drive it.
