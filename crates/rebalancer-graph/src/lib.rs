//! In-memory liquidity graph.
//!
//! Nodes are networks, node payloads are per-network liquidity snapshots,
//! and directed edges are the bridge lanes between liquidity managers. The
//! graph is safe for concurrent use (discovery writes while refresh and the
//! algorithms read) and supports deep cloning so the algorithms can run
//! speculative mutations without touching the caller's snapshot.

pub mod data;
pub mod graph;

pub use data::*;
pub use graph::*;
