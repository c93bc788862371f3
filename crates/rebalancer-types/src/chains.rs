//! Chain-client trait consumed by the topology discoverer.

use crate::common::{Address, ConfigDigest, NetworkSelector, U256};
use crate::errors::Result;
use crate::network::XChainLiquidityManagerData;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Read-only view of liquidity-manager contracts across networks.
///
/// One client instance routes to every network the rebalancer knows about;
/// each call names the `(network, liquidity_manager)` deployment it targets.
/// Cancellation follows the usual Rust model: dropping the returned future
/// aborts the query.
#[async_trait]
pub trait LiquidityManagerClient: Send + Sync {
	/// Current token balance held by the liquidity manager.
	async fn get_liquidity(
		&self,
		network: NetworkSelector,
		liquidity_manager: Address,
	) -> Result<U256>;

	/// Bridge wiring to every cross-chain peer of this deployment.
	async fn get_cross_chain_peers(
		&self,
		network: NetworkSelector,
		liquidity_manager: Address,
	) -> Result<BTreeMap<NetworkSelector, XChainLiquidityManagerData>>;

	/// Token managed by this deployment on its own network.
	async fn get_local_token(
		&self,
		network: NetworkSelector,
		liquidity_manager: Address,
	) -> Result<Address>;

	/// Configured floor below which outgoing transfers must not push the
	/// balance.
	async fn get_minimum_liquidity(
		&self,
		network: NetworkSelector,
		liquidity_manager: Address,
	) -> Result<U256>;

	/// Fingerprint of the consensus configuration currently active for this
	/// deployment.
	async fn get_latest_config_digest(
		&self,
		network: NetworkSelector,
		liquidity_manager: Address,
	) -> Result<ConfigDigest>;
}
