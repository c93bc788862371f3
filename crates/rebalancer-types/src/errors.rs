//! Error types for the rebalancer system.

use crate::common::{Address, NetworkSelector};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RebalancerError>;

#[derive(Error, Debug)]
pub enum RebalancerError {
	/// A graph operation referenced a network that is not present.
	#[error("network {0} not found in graph")]
	NetworkNotFound(NetworkSelector),

	/// A caller or discovery-ordering bug corrupted a structural invariant.
	#[error("graph invariant violated: {0}")]
	InvariantViolation(String),

	/// An on-chain query failed during topology discovery. Fatal for the
	/// round; no partial graph is returned.
	#[error("discovery failed at network {network} (liquidity manager {liquidity_manager:?}): {reason}")]
	Discovery {
		network: NetworkSelector,
		liquidity_manager: Address,
		reason: String,
	},

	/// A single on-chain read failed.
	#[error("chain query failed: {0}")]
	Chain(String),

	/// Aggregate of per-network failures during a balance refresh. Networks
	/// that succeeded were still committed to the graph.
	#[error("balance refresh failed for {failed} of {attempted} network(s): {details}")]
	BalanceRefresh {
		failed: usize,
		attempted: usize,
		details: String,
	},

	/// Invalid or unsupported configuration.
	#[error("configuration error: {0}")]
	Config(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
