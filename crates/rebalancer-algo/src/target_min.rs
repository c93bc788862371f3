//! Target-and-min: steer every network toward a configured target balance.
//!
//! Runs a fixed number of rounds against a freshly projected graph each
//! time. Odd rounds propose direct transfers from neighbors holding a
//! projected surplus; even rounds stage the first leg of a two-hop relay for
//! deficits no direct neighbor can reach. Later odd rounds then see the
//! relayed funds as surplus on the intermediate and propose the onward leg,
//! so a full relay resolves within one computation.

use crate::util::{
	accept_candidates, available_to_send, expected_graph, incoming_neighbors, merge_transfers,
	CommittedOutgoing,
};
use crate::RebalancingStrategy;
use rebalancer_graph::Graph;
use rebalancer_types::{
	NetworkSelector, ProposedTransfer, RebalancerConfig, Result, UnexecutedTransfer, U256,
};
use tracing::debug;

/// Three one-hop rounds interleaved with two relay rounds is enough for any
/// deficit reachable within two hops to resolve.
const ROUNDS: usize = 5;

#[derive(Debug)]
pub struct TargetAndMin {
	config: RebalancerConfig,
}

impl TargetAndMin {
	pub fn new(config: RebalancerConfig) -> Self {
		Self { config }
	}

	/// Deficits below 5% of the target are noise: bridging them costs more
	/// than the imbalance is worth.
	fn worth_funding(deficit: U256, target: U256) -> bool {
		deficit.saturating_mul(U256::from(20)) >= target
	}

	/// Enabled networks sitting meaningfully below their target, largest
	/// deficit first (ties broken by selector). A zero target disables a
	/// network entirely.
	fn funding_order(&self, future: &Graph) -> Result<Vec<(NetworkSelector, U256)>> {
		let mut result = Vec::new();
		for network in future.get_networks() {
			let target = self.config.target_for(network);
			if target.is_zero() {
				continue;
			}
			let deficit = target.saturating_sub(future.get_liquidity(network)?);
			if deficit.is_zero() || !Self::worth_funding(deficit, target) {
				continue;
			}
			result.push((network, deficit));
		}
		result.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
		Ok(result)
	}

	/// Remaining deficit of `network` against the projected graph, zero if
	/// it no longer clears the funding threshold.
	fn live_deficit(&self, future: &Graph, network: NetworkSelector) -> Result<U256> {
		let target = self.config.target_for(network);
		let deficit = target.saturating_sub(future.get_liquidity(network)?);
		if Self::worth_funding(deficit, target) {
			Ok(deficit)
		} else {
			Ok(U256::zero())
		}
	}

	/// Projected amount `network` holds above its own target.
	fn projected_surplus(&self, future: &Graph, network: NetworkSelector) -> Result<U256> {
		Ok(future
			.get_liquidity(network)?
			.saturating_sub(self.config.target_for(network)))
	}

	/// Direct transfers from surplus neighbors into each deficit network.
	fn one_hop_round(
		&self,
		graph: &Graph,
		future: &Graph,
		committed: &mut CommittedOutgoing,
	) -> Result<Vec<ProposedTransfer>> {
		let mut accepted = Vec::new();
		for (target, _) in self.funding_order(future)? {
			let deficit = self.live_deficit(future, target)?;
			if deficit.is_zero() {
				continue;
			}
			let mut candidates = Vec::new();
			for sender in incoming_neighbors(graph, target) {
				if self.config.target_for(sender).is_zero() {
					continue;
				}
				let surplus = self.projected_surplus(future, sender)?;
				if surplus.is_zero() {
					continue;
				}
				let amount = deficit.min(surplus);
				// A sender that cannot cover the full ask today is rejected
				// outright rather than drained partially; a relay round can
				// route around it.
				if amount > available_to_send(graph, future, committed, sender)? {
					continue;
				}
				candidates.push(ProposedTransfer::new(sender, target, amount));
			}
			accepted.extend(accept_candidates(
				graph, future, committed, candidates, deficit,
			)?);
		}
		Ok(accepted)
	}

	/// First legs of two-hop relays toward deficits with no direct surplus
	/// neighbor left. Funds land on the intermediate and move onward in a
	/// later one-hop round.
	fn relay_round(
		&self,
		graph: &Graph,
		future: &Graph,
		committed: &mut CommittedOutgoing,
	) -> Result<Vec<ProposedTransfer>> {
		let mut accepted = Vec::new();
		for (target, _) in self.funding_order(future)? {
			let deficit = self.live_deficit(future, target)?;
			if deficit.is_zero() {
				continue;
			}
			let mut candidates = Vec::new();
			for source in future.get_networks() {
				if source == target || self.config.target_for(source).is_zero() {
					continue;
				}
				let surplus = self.projected_surplus(future, source)?;
				if surplus.is_zero() {
					continue;
				}
				let amount = deficit.min(surplus);
				if amount > available_to_send(graph, future, committed, source)? {
					continue;
				}
				let path = future.find_path(source, target, 2, |_| true);
				if path.len() != 2 {
					continue;
				}
				let intermediate = path[0];
				// The intermediate must be able to forward the whole leg
				// without dipping below its own minimum.
				let data = future.get_data(intermediate)?;
				if data.liquidity.saturating_sub(data.minimum_liquidity) < amount {
					continue;
				}
				candidates.push(ProposedTransfer::new(source, intermediate, amount));
			}
			accepted.extend(accept_candidates(
				graph, future, committed, candidates, deficit,
			)?);
		}
		Ok(accepted)
	}
}

impl RebalancingStrategy for TargetAndMin {
	fn compute_transfers_to_balance(
		&self,
		graph: &Graph,
		unexecuted: &[Box<dyn UnexecutedTransfer>],
	) -> Result<Vec<ProposedTransfer>> {
		let mut proposed: Vec<ProposedTransfer> = Vec::new();
		let mut committed = CommittedOutgoing::new();

		for round in 1..=ROUNDS {
			// Re-project from scratch so each round sees the combined effect
			// of everything in motion plus all rounds before it.
			let future = expected_graph(
				graph,
				unexecuted
					.iter()
					.map(|t| t.as_ref())
					.chain(proposed.iter().map(|t| t as &dyn UnexecutedTransfer)),
			)?;
			let accepted = if round % 2 == 1 {
				self.one_hop_round(graph, &future, &mut committed)?
			} else {
				self.relay_round(graph, &future, &mut committed)?
			};
			if !accepted.is_empty() {
				debug!("round {} accepted {} transfers", round, accepted.len());
			}
			proposed.extend(accepted);
		}

		Ok(merge_transfers(proposed))
	}
}
