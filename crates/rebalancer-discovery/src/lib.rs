//! Topology and liquidity discovery.
//!
//! Reconstructs the live liquidity graph by walking the on-chain topology
//! from a known master deployment, and refreshes liquidity figures for an
//! already-known topology with a bounded worker pool. The graph is rebuilt
//! from live chain reads each cycle; nothing is persisted here.

pub mod discoverer;
pub mod factory;

pub use discoverer::*;
pub use factory::*;
