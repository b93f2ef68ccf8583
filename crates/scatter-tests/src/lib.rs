//! End-to-end scenario tests for Scatterbrain.
//!
//! Scenarios drive the real scheduler against the in-memory wallet and
//! check balances, statistics and the exact backend calls made.

pub mod helpers;
