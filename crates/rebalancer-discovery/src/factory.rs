//! Keyed discoverer factory.

use crate::discoverer::{Discoverer, EvmDiscoverer};
use dashmap::DashMap;
use rebalancer_types::{Address, LiquidityManagerClient, NetworkSelector, Result, Vertex};
use std::sync::Arc;
use tracing::debug;

/// Network families a discoverer can be built for.
///
/// Only EVM chains are in scope today; further families plug in here and
/// share the [`Discoverer`] contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkFamily {
	Evm,
}

/// Memoizing factory for discoverers, keyed by their master deployment.
///
/// Explicitly constructed and owned by the caller; the cache is a field of
/// this instance, not process-wide state.
pub struct DiscovererFactory {
	client: Arc<dyn LiquidityManagerClient>,
	cache: DashMap<Vertex, Arc<dyn Discoverer>>,
}

impl DiscovererFactory {
	pub fn new(client: Arc<dyn LiquidityManagerClient>) -> Self {
		Self {
			client,
			cache: DashMap::new(),
		}
	}

	/// Returns the cached discoverer for `(network, liquidity_manager)`,
	/// creating it on first use.
	pub fn get_or_create(
		&self,
		family: NetworkFamily,
		network: NetworkSelector,
		liquidity_manager: Address,
	) -> Result<Arc<dyn Discoverer>> {
		match family {
			NetworkFamily::Evm => {
				let start = Vertex::new(network, liquidity_manager);
				let discoverer = self
					.cache
					.entry(start)
					.or_insert_with(|| {
						debug!("creating evm discoverer for {}", start);
						Arc::new(EvmDiscoverer::new(start, Arc::clone(&self.client)))
							as Arc<dyn Discoverer>
					})
					.clone();
				Ok(discoverer)
			}
		}
	}

	/// Number of cached discoverers.
	pub fn len(&self) -> usize {
		self.cache.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}
}

impl std::fmt::Debug for DiscovererFactory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DiscovererFactory")
			.field("cached", &self.cache.len())
			.finish()
	}
}
