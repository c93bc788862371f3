//! Network topology records shared by discovery and the graph.

use crate::common::{Address, NetworkSelector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One liquidity-manager deployment on one network.
///
/// Used as the discovery work-queue item; once a network is in the graph it
/// is keyed by selector alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
	pub network: NetworkSelector,
	pub liquidity_manager: Address,
}

impl Vertex {
	pub fn new(network: NetworkSelector, liquidity_manager: Address) -> Self {
		Self {
			network,
			liquidity_manager,
		}
	}
}

impl fmt::Display for Vertex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "network {} @ {:?}", self.network, self.liquidity_manager)
	}
}

/// Bridge wiring needed to execute a transfer to one peer network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XChainLiquidityManagerData {
	/// Liquidity manager deployed on the peer network.
	pub remote_liquidity_manager: Address,
	/// Bridge adapter on the local network used to reach the peer.
	pub local_bridge_adapter: Address,
	/// Token address on the peer network.
	pub remote_token: Address,
}
