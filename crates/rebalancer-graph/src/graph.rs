//! Thread-safe directed liquidity graph.

use crate::data::Data;
use rebalancer_types::{
	Address, Edge, NetworkSelector, RebalancerError, Result, XChainLiquidityManagerData, U256,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct GraphInner {
	/// Node payload per network.
	nodes: HashMap<NetworkSelector, Data>,
	/// Directed edges in insertion order. Duplicates are allowed: a repeated
	/// append is a caller bug that must stay visible, not be swallowed.
	adjacency: HashMap<NetworkSelector, Vec<NetworkSelector>>,
}

impl GraphInner {
	/// Bounded depth-first search. The returned path excludes `from` and
	/// includes `to`; empty means no path within the hop budget.
	///
	/// The visit callback is an accept/reject gate on the destination: when
	/// it returns false the direct candidate is discarded and the search
	/// continues through the remaining neighbors.
	fn find_path(
		&self,
		from: NetworkSelector,
		to: NetworkSelector,
		max_hops: usize,
		visit: &mut dyn FnMut(&Data) -> bool,
	) -> Vec<NetworkSelector> {
		if max_hops == 0 || from == to {
			return vec![];
		}
		let Some(neighbors) = self.adjacency.get(&from) else {
			return vec![];
		};
		if neighbors.contains(&to) {
			// An edge may only exist between known nodes; a miss here means
			// the write API was bypassed.
			let data = self
				.nodes
				.get(&to)
				.expect("graph corrupted: edge references unknown network");
			if visit(data) {
				return vec![to];
			}
		}
		for &next in neighbors {
			if next == to || next == from {
				continue;
			}
			let sub = self.find_path(next, to, max_hops - 1, visit);
			if !sub.is_empty() {
				let mut path = Vec::with_capacity(sub.len() + 1);
				path.push(next);
				path.extend(sub);
				return path;
			}
		}
		vec![]
	}
}

/// Directed graph of networks with per-network liquidity payloads.
///
/// A single readers-writer lock guards nodes and edges together, so reads
/// run concurrently and every write excludes all other access. All mutation
/// goes through the write API, which maintains the invariant that an edge
/// only ever connects two known networks.
#[derive(Debug, Default)]
pub struct Graph {
	inner: RwLock<GraphInner>,
}

impl Graph {
	pub fn new() -> Self {
		Self::default()
	}

	fn read(&self) -> RwLockReadGuard<'_, GraphInner> {
		// A poisoned graph is still structurally sound; the write API never
		// leaves partial state behind.
		self.inner.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, GraphInner> {
		self.inner.write().unwrap_or_else(PoisonError::into_inner)
	}

	/// Inserts a new network with an empty edge list. Returns false (and
	/// leaves existing data untouched) if the network is already present.
	pub fn add_network(&self, network: NetworkSelector, data: Data) -> bool {
		let mut inner = self.write();
		if inner.nodes.contains_key(&network) {
			return false;
		}
		inner.nodes.insert(network, data);
		inner.adjacency.entry(network).or_default();
		true
	}

	/// Appends the directed edge `from -> to`. Not idempotent: calling twice
	/// records a duplicate edge.
	pub fn add_connection(&self, from: NetworkSelector, to: NetworkSelector) -> Result<()> {
		let mut inner = self.write();
		if !inner.nodes.contains_key(&from) {
			return Err(RebalancerError::NetworkNotFound(from));
		}
		if !inner.nodes.contains_key(&to) {
			return Err(RebalancerError::NetworkNotFound(to));
		}
		inner.adjacency.entry(from).or_default().push(to);
		Ok(())
	}

	pub fn has_network(&self, network: NetworkSelector) -> bool {
		self.read().nodes.contains_key(&network)
	}

	pub fn get_data(&self, network: NetworkSelector) -> Result<Data> {
		self.read()
			.nodes
			.get(&network)
			.cloned()
			.ok_or(RebalancerError::NetworkNotFound(network))
	}

	pub fn get_liquidity(&self, network: NetworkSelector) -> Result<U256> {
		self.read()
			.nodes
			.get(&network)
			.map(|d| d.liquidity)
			.ok_or(RebalancerError::NetworkNotFound(network))
	}

	pub fn get_token_address(&self, network: NetworkSelector) -> Result<Address> {
		self.read()
			.nodes
			.get(&network)
			.map(|d| d.token_address)
			.ok_or(RebalancerError::NetworkNotFound(network))
	}

	pub fn get_liquidity_manager_address(&self, network: NetworkSelector) -> Result<Address> {
		self.read()
			.nodes
			.get(&network)
			.map(|d| d.liquidity_manager_address)
			.ok_or(RebalancerError::NetworkNotFound(network))
	}

	pub fn get_xchain_liquidity_manager_data(
		&self,
		network: NetworkSelector,
	) -> Result<BTreeMap<NetworkSelector, XChainLiquidityManagerData>> {
		self.read()
			.nodes
			.get(&network)
			.map(|d| d.xchain_liquidity_managers.clone())
			.ok_or(RebalancerError::NetworkNotFound(network))
	}

	/// Updates the liquidity figure in place, preserving all other fields.
	/// Returns false if the network is unknown.
	pub fn set_liquidity(&self, network: NetworkSelector, amount: U256) -> bool {
		match self.write().nodes.get_mut(&network) {
			Some(data) => {
				data.liquidity = amount;
				true
			}
			None => false,
		}
	}

	/// Updates the target liquidity in place. Returns false if the network
	/// is unknown.
	pub fn set_target_liquidity(&self, network: NetworkSelector, amount: U256) -> bool {
		match self.write().nodes.get_mut(&network) {
			Some(data) => {
				data.target_liquidity = amount;
				true
			}
			None => false,
		}
	}

	/// All known networks, ascending by selector.
	pub fn get_networks(&self) -> Vec<NetworkSelector> {
		let inner = self.read();
		let mut networks: Vec<_> = inner.nodes.keys().copied().collect();
		networks.sort();
		networks
	}

	/// Sorted, de-duplicated neighbors of `network`, or None if the network
	/// is unknown. With `bidirectional` set, only peers connected in both
	/// directions are returned.
	pub fn get_neighbors(
		&self,
		network: NetworkSelector,
		bidirectional: bool,
	) -> Option<Vec<NetworkSelector>> {
		let inner = self.read();
		let neighbors = inner.adjacency.get(&network)?;
		let mut result: Vec<_> = neighbors
			.iter()
			.copied()
			.filter(|peer| {
				if !bidirectional {
					return true;
				}
				inner
					.adjacency
					.get(peer)
					.is_some_and(|back| back.contains(&network))
			})
			.collect();
		result.sort();
		result.dedup();
		Some(result)
	}

	/// Every directed edge, ordered by sorted source selector and, per
	/// source, by edge insertion order.
	pub fn get_edges(&self) -> Vec<Edge> {
		let inner = self.read();
		let mut sources: Vec<_> = inner.nodes.keys().copied().collect();
		sources.sort();
		let mut edges = Vec::new();
		for source in sources {
			if let Some(neighbors) = inner.adjacency.get(&source) {
				for &dest in neighbors {
					edges.push(Edge::new(source, dest));
				}
			}
		}
		edges
	}

	/// Bounded-hop path search; see [`GraphInner::find_path`] for the exact
	/// contract. `max_hops` counts edges.
	pub fn find_path<F>(
		&self,
		from: NetworkSelector,
		to: NetworkSelector,
		max_hops: usize,
		mut visit: F,
	) -> Vec<NetworkSelector>
	where
		F: FnMut(&Data) -> bool,
	{
		self.read().find_path(from, to, max_hops, &mut visit)
	}

	/// Number of networks in the graph.
	pub fn len(&self) -> usize {
		self.read().nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.read().nodes.is_empty()
	}

	/// Clears the graph back to empty.
	pub fn reset(&self) {
		let mut inner = self.write();
		inner.nodes.clear();
		inner.adjacency.clear();
	}
}

impl Clone for Graph {
	/// Deep copy: independent edge lists and node payloads, so mutating the
	/// clone never aliases the original.
	fn clone(&self) -> Self {
		let inner = self.read();
		Graph {
			inner: RwLock::new(GraphInner {
				nodes: inner.nodes.clone(),
				adjacency: inner.adjacency.clone(),
			}),
		}
	}
}

impl PartialEq for Graph {
	/// Same node set, node-for-node data equality, and element-wise equal
	/// raw edge lists (insertion order matters).
	fn eq(&self, other: &Self) -> bool {
		let a = self.read();
		let b = other.read();
		if a.nodes.len() != b.nodes.len() {
			return false;
		}
		for (network, data) in &a.nodes {
			match b.nodes.get(network) {
				Some(other_data) if other_data == data => {}
				_ => return false,
			}
			if a.adjacency.get(network) != b.adjacency.get(network) {
				return false;
			}
		}
		true
	}
}

impl Eq for Graph {}
