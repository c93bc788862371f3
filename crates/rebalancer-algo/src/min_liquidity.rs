//! Minimum-liquidity floor restoration.
//!
//! A single-pass strategy that only acts when a network has fallen below its
//! on-chain minimum, both right now and after everything in motion lands.
//! Direct neighbors fund it first; a second phase relays through one
//! intermediate for deficits the neighbors could not cover.

use crate::util::{
	accept_candidates, available_to_send, expected_graph, incoming_neighbors, merge_transfers,
	CommittedOutgoing,
};
use crate::RebalancingStrategy;
use rebalancer_graph::Graph;
use rebalancer_types::{NetworkSelector, ProposedTransfer, Result, UnexecutedTransfer, U256};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct MinimumLiquidity;

impl MinimumLiquidity {
	pub fn new() -> Self {
		Self
	}

	/// Networks below their minimum in BOTH the current and projected graphs,
	/// largest projected shortfall first (ties broken by selector).
	fn shortfalls(now: &Graph, future: &Graph) -> Result<Vec<(NetworkSelector, U256)>> {
		let mut result = Vec::new();
		for network in future.get_networks() {
			let now_data = now.get_data(network)?;
			let future_data = future.get_data(network)?;
			let now_shortfall = now_data
				.minimum_liquidity
				.saturating_sub(now_data.liquidity);
			let future_shortfall = future_data
				.minimum_liquidity
				.saturating_sub(future_data.liquidity);
			// A shortfall that in-motion transfers already cover needs no
			// action, and one that only appears after they land is handled
			// next round with fresher balances.
			if now_shortfall.is_zero() || future_shortfall.is_zero() {
				continue;
			}
			result.push((network, future_shortfall));
		}
		result.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
		Ok(result)
	}
}

impl RebalancingStrategy for MinimumLiquidity {
	fn compute_transfers_to_balance(
		&self,
		graph: &Graph,
		unexecuted: &[Box<dyn UnexecutedTransfer>],
	) -> Result<Vec<ProposedTransfer>> {
		let future = expected_graph(graph, unexecuted.iter().map(|t| t.as_ref()))?;
		let mut committed = CommittedOutgoing::new();
		let mut proposed: Vec<ProposedTransfer> = Vec::new();

		// Phase one: direct neighbors top the shortfall up.
		let mut used_senders: BTreeSet<NetworkSelector> = BTreeSet::new();
		for (target, shortfall) in Self::shortfalls(graph, &future)? {
			debug!("{} is {} below its minimum", target, shortfall);
			let mut candidates = Vec::new();
			for sender in incoming_neighbors(graph, target) {
				if used_senders.contains(&sender) {
					continue;
				}
				let spare = available_to_send(graph, &future, &committed, sender)?;
				if spare.is_zero() {
					continue;
				}
				candidates.push(ProposedTransfer::new(sender, target, spare));
			}
			let accepted =
				accept_candidates(graph, &future, &mut committed, candidates, shortfall)?;
			used_senders.extend(accepted.iter().map(|t| t.from));
			proposed.extend(accepted);
		}

		// Phase two: relay through one intermediate for whatever is still
		// short. The transfer lands on the intermediate; a later round moves
		// it onward once balances refresh.
		let mut used_sources: BTreeSet<NetworkSelector> = BTreeSet::new();
		for (target, shortfall) in Self::shortfalls(graph, &future)? {
			let mut candidates = Vec::new();
			for source in future.get_networks() {
				if source == target || used_sources.contains(&source) {
					continue;
				}
				let spare = available_to_send(graph, &future, &committed, source)?;
				if spare.is_zero() {
					continue;
				}
				let path = future.find_path(source, target, 2, |_| true);
				if path.len() != 2 {
					continue;
				}
				candidates.push(ProposedTransfer::new(source, path[0], spare));
			}
			let accepted =
				accept_candidates(graph, &future, &mut committed, candidates, shortfall)?;
			used_sources.extend(accepted.iter().map(|t| t.from));
			proposed.extend(accepted);
		}

		Ok(merge_transfers(proposed))
	}
}
