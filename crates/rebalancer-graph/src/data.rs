//! Per-network node payload.

use rebalancer_types::{
	Address, ConfigDigest, NetworkSelector, XChainLiquidityManagerData, U256,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Liquidity snapshot and bridge wiring for one network.
///
/// Equality is structural; the peer map is ordered by selector so two nodes
/// built in different insertion orders still compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Data {
	pub network_selector: NetworkSelector,
	/// Current token balance held by the liquidity manager.
	#[serde(with = "rebalancer_types::u256_decimal")]
	pub liquidity: U256,
	/// Floor below which outgoing transfers must not push the balance.
	#[serde(with = "rebalancer_types::u256_decimal")]
	pub minimum_liquidity: U256,
	/// Desired balance. Zero disables automated rebalancing for the network.
	#[serde(with = "rebalancer_types::u256_decimal")]
	pub target_liquidity: U256,
	pub token_address: Address,
	pub liquidity_manager_address: Address,
	/// Bridge wiring per peer network, keyed by the peer's selector.
	pub xchain_liquidity_managers: BTreeMap<NetworkSelector, XChainLiquidityManagerData>,
	pub config_digest: ConfigDigest,
}

impl Data {
	pub fn new(network_selector: NetworkSelector, liquidity: U256, minimum_liquidity: U256) -> Self {
		Self {
			network_selector,
			liquidity,
			minimum_liquidity,
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_equality_ignores_peer_insertion_order() {
		let wiring = XChainLiquidityManagerData {
			remote_liquidity_manager: Address::repeat_byte(0x01),
			local_bridge_adapter: Address::repeat_byte(0x02),
			remote_token: Address::repeat_byte(0x03),
		};

		let mut a = Data::new(NetworkSelector(1), U256::from(100), U256::from(10));
		a.xchain_liquidity_managers.insert(NetworkSelector(2), wiring);
		a.xchain_liquidity_managers.insert(NetworkSelector(3), wiring);

		let mut b = Data::new(NetworkSelector(1), U256::from(100), U256::from(10));
		b.xchain_liquidity_managers.insert(NetworkSelector(3), wiring);
		b.xchain_liquidity_managers.insert(NetworkSelector(2), wiring);

		assert_eq!(a, b);
	}

	#[test]
	fn test_equality_covers_liquidity_fields() {
		let a = Data::new(NetworkSelector(1), U256::from(100), U256::from(10));
		let mut b = a.clone();
		b.liquidity = U256::from(101);
		assert_ne!(a, b);

		let mut c = a.clone();
		c.target_liquidity = U256::from(1);
		assert_ne!(a, c);
	}
}
