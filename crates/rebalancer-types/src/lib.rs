//! Shared value types for the liquidity rebalancer.
//!
//! Everything that crosses a crate boundary lives here: network identifiers,
//! transfer records and their status lifecycle, the rebalancer configuration,
//! the chain-client trait used by discovery, and the consensus-facing
//! observation/outcome records.

pub mod chains;
pub mod common;
pub mod config;
pub mod errors;
pub mod network;
pub mod observation;
pub mod transfers;

pub use chains::*;
pub use common::*;
pub use config::*;
pub use errors::*;
pub use network::*;
pub use observation::*;
pub use transfers::*;
