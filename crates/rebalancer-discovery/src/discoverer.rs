//! Breadth-first topology discovery and concurrent balance refresh.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use rebalancer_graph::{Data, Graph};
use rebalancer_types::{
	LiquidityManagerClient, NetworkSelector, RebalancerError, Result, Vertex, U256,
};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upper bound on in-flight liquidity queries during a balance refresh, kept
/// small so a refresh cannot overwhelm chain RPC endpoints.
pub const BALANCE_REFRESH_CONCURRENCY: usize = 4;

/// Rebuilds and refreshes the liquidity graph for one network family.
#[async_trait]
pub trait Discoverer: Send + Sync {
	/// Walks the live topology from the configured master deployment and
	/// returns the fully explored graph. All-or-nothing: the first on-chain
	/// query failure aborts the walk and no partial graph is returned.
	async fn discover(&self) -> Result<Graph>;

	/// Re-queries only the liquidity figure for every network already in
	/// `graph`. Every network is attempted; successes are committed in
	/// place and failures are aggregated into a single error.
	async fn discover_balances(&self, graph: &Graph) -> Result<()>;
}

/// Discoverer for EVM-family networks.
pub struct EvmDiscoverer {
	start: Vertex,
	client: Arc<dyn LiquidityManagerClient>,
}

impl EvmDiscoverer {
	pub fn new(start: Vertex, client: Arc<dyn LiquidityManagerClient>) -> Self {
		Self { start, client }
	}

	/// The master deployment this discoverer starts its walk from.
	pub fn start_vertex(&self) -> Vertex {
		self.start
	}

	/// Fetches the full node payload for one deployment, wrapping any chain
	/// failure with the vertex identity.
	async fn fetch_data(&self, vertex: Vertex) -> Result<Data> {
		let wrap = |e: RebalancerError| RebalancerError::Discovery {
			network: vertex.network,
			liquidity_manager: vertex.liquidity_manager,
			reason: e.to_string(),
		};

		let liquidity = self
			.client
			.get_liquidity(vertex.network, vertex.liquidity_manager)
			.await
			.map_err(wrap)?;
		let token_address = self
			.client
			.get_local_token(vertex.network, vertex.liquidity_manager)
			.await
			.map_err(wrap)?;
		let minimum_liquidity = self
			.client
			.get_minimum_liquidity(vertex.network, vertex.liquidity_manager)
			.await
			.map_err(wrap)?;
		let config_digest = self
			.client
			.get_latest_config_digest(vertex.network, vertex.liquidity_manager)
			.await
			.map_err(wrap)?;
		let xchain_liquidity_managers = self
			.client
			.get_cross_chain_peers(vertex.network, vertex.liquidity_manager)
			.await
			.map_err(wrap)?;

		Ok(Data {
			network_selector: vertex.network,
			liquidity,
			minimum_liquidity,
			target_liquidity: U256::zero(),
			token_address,
			liquidity_manager_address: vertex.liquidity_manager,
			xchain_liquidity_managers,
			config_digest,
		})
	}
}

#[async_trait]
impl Discoverer for EvmDiscoverer {
	async fn discover(&self) -> Result<Graph> {
		info!("starting topology discovery from {}", self.start);

		let graph = Graph::new();
		let mut seen: HashSet<Vertex> = HashSet::new();
		let mut queue: VecDeque<Vertex> = VecDeque::new();
		seen.insert(self.start);
		queue.push_back(self.start);

		// Sequential breadth-first walk: each vertex's peer wiring must be
		// known before its edges can be added, so there is little to gain
		// from parallelizing the traversal itself.
		while let Some(vertex) = queue.pop_front() {
			debug!("exploring {}", vertex);
			let data = self.fetch_data(vertex).await?;
			let peers = data.xchain_liquidity_managers.clone();
			graph.add_network(vertex.network, data);

			for (peer, wiring) in peers {
				let neighbor = Vertex::new(peer, wiring.remote_liquidity_manager);
				// Both endpoints must exist before the edge does.
				if !graph.has_network(peer) {
					let neighbor_data = self.fetch_data(neighbor).await?;
					graph.add_network(peer, neighbor_data);
				}
				graph.add_connection(vertex.network, peer)?;
				if seen.insert(neighbor) {
					queue.push_back(neighbor);
				}
			}
		}

		info!(
			"topology discovery complete: {} network(s), {} edge(s)",
			graph.len(),
			graph.get_edges().len()
		);
		Ok(graph)
	}

	async fn discover_balances(&self, graph: &Graph) -> Result<()> {
		let networks = graph.get_networks();
		let attempted = networks.len();
		debug!("refreshing balances for {} network(s)", attempted);

		let results: Vec<(NetworkSelector, Result<U256>)> = stream::iter(networks)
			.map(|network| {
				let client = Arc::clone(&self.client);
				async move {
					let address = match graph.get_liquidity_manager_address(network) {
						Ok(address) => address,
						Err(e) => return (network, Err(e)),
					};
					(network, client.get_liquidity(network, address).await)
				}
			})
			.buffer_unordered(BALANCE_REFRESH_CONCURRENCY)
			.collect()
			.await;

		let mut failures: Vec<(NetworkSelector, String)> = Vec::new();
		for (network, result) in results {
			match result {
				Ok(liquidity) => {
					// Topology may have changed between discovery and
					// refresh; an unknown network is not an error.
					if !graph.set_liquidity(network, liquidity) {
						debug!("network {} no longer in graph, skipping update", network);
					}
				}
				Err(e) => {
					warn!("balance refresh failed for network {}: {}", network, e);
					failures.push((network, e.to_string()));
				}
			}
		}

		if failures.is_empty() {
			return Ok(());
		}
		failures.sort_by_key(|(network, _)| *network);
		Err(RebalancerError::BalanceRefresh {
			failed: failures.len(),
			attempted,
			details: failures
				.iter()
				.map(|(network, reason)| format!("network {}: {}", network, reason))
				.collect::<Vec<_>>()
				.join("; "),
		})
	}
}
