//! Ping-pong: a liveness probe, not a balancer.
//!
//! Every network with spendable balance splits it evenly across its
//! bidirectionally-connected peers, skipping any pair that already has a
//! transfer in motion. Running it twice on a two-network graph bounces the
//! whole balance back and forth, which is the point: it exercises the full
//! transfer pipeline on demand.

use crate::util::merge_transfers;
use crate::RebalancingStrategy;
use rebalancer_graph::Graph;
use rebalancer_types::{NetworkSelector, ProposedTransfer, Result, UnexecutedTransfer, U256};
use tracing::debug;

#[derive(Debug, Default)]
pub struct PingPong;

impl PingPong {
	pub fn new() -> Self {
		Self
	}

	/// Sum of non-executed transfer amounts leaving `network`.
	fn outgoing_in_motion(
		network: NetworkSelector,
		unexecuted: &[Box<dyn UnexecutedTransfer>],
	) -> U256 {
		unexecuted
			.iter()
			.filter(|t| !t.transfer_status().is_executed() && t.from_network() == network)
			.fold(U256::zero(), |acc, t| {
				acc.saturating_add(t.transfer_amount())
			})
	}

	/// Whether any transfer (in motion or proposed this round) already links
	/// the pair, in either direction.
	fn pair_busy(
		a: NetworkSelector,
		b: NetworkSelector,
		unexecuted: &[Box<dyn UnexecutedTransfer>],
		proposed: &[ProposedTransfer],
	) -> bool {
		let links = |from: NetworkSelector, to: NetworkSelector| {
			(from == a && to == b) || (from == b && to == a)
		};
		unexecuted.iter().any(|t| {
			!t.transfer_status().is_executed() && links(t.from_network(), t.to_network())
		}) || proposed.iter().any(|t| links(t.from, t.to))
	}
}

impl RebalancingStrategy for PingPong {
	fn compute_transfers_to_balance(
		&self,
		graph: &Graph,
		unexecuted: &[Box<dyn UnexecutedTransfer>],
	) -> Result<Vec<ProposedTransfer>> {
		let mut proposed: Vec<ProposedTransfer> = Vec::new();

		for network in graph.get_networks() {
			let liquidity = graph.get_liquidity(network)?;
			let committed_this_round = proposed
				.iter()
				.filter(|t| t.from == network)
				.fold(U256::zero(), |acc, t| acc.saturating_add(t.amount));
			let balance = liquidity
				.saturating_sub(Self::outgoing_in_motion(network, unexecuted))
				.saturating_sub(committed_this_round);
			if balance.is_zero() {
				continue;
			}

			let Some(peers) = graph.get_neighbors(network, true) else {
				continue;
			};
			let mut eligible: Vec<NetworkSelector> = peers
				.into_iter()
				.filter(|&peer| !Self::pair_busy(network, peer, unexecuted, &proposed))
				.collect();
			// An even split must not round to zero; shed peers from the end
			// of the list until every share is at least one unit.
			while !eligible.is_empty() && balance < U256::from(eligible.len()) {
				eligible.pop();
			}
			if eligible.is_empty() {
				continue;
			}

			let share = balance / U256::from(eligible.len());
			debug!(
				"ping-pong: {} sends {} to each of {} peers",
				network,
				share,
				eligible.len()
			);
			for peer in eligible {
				proposed.push(ProposedTransfer::new(network, peer, share));
			}
		}

		Ok(merge_transfers(proposed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::{assert_transfers, graph, in_motion, ARBITRUM, ETHEREUM, OPTIMISM};
	use rebalancer_types::TransferStatus;

	#[test]
	fn test_full_balance_bounces_between_two_networks() {
		let g = graph(
			&[(ETHEREUM, 100, 0), (ARBITRUM, 0, 0)],
			&[(ETHEREUM, ARBITRUM)],
		);
		let strategy = PingPong::new();

		let first = strategy.compute_transfers_to_balance(&g, &[]).unwrap();
		assert_transfers(&first, &[(ETHEREUM, ARBITRUM, 100)]);

		// Apply the round and run again: the money comes straight back.
		g.set_liquidity(ETHEREUM, U256::zero());
		g.set_liquidity(ARBITRUM, U256::from(100));
		let second = strategy.compute_transfers_to_balance(&g, &[]).unwrap();
		assert_transfers(&second, &[(ARBITRUM, ETHEREUM, 100)]);
	}

	#[test]
	fn test_balance_splits_evenly_across_peers() {
		let g = graph(
			&[(ETHEREUM, 100, 0), (ARBITRUM, 0, 0), (OPTIMISM, 0, 0)],
			&[(ETHEREUM, ARBITRUM), (ETHEREUM, OPTIMISM)],
		);
		let out = PingPong::new()
			.compute_transfers_to_balance(&g, &[])
			.unwrap();
		assert_transfers(
			&out,
			&[(ETHEREUM, OPTIMISM, 50), (ETHEREUM, ARBITRUM, 50)],
		);
	}

	#[test]
	fn test_tiny_balance_sheds_peers_instead_of_rounding_to_zero() {
		let g = graph(
			&[(ETHEREUM, 1, 0), (ARBITRUM, 0, 0), (OPTIMISM, 0, 0)],
			&[(ETHEREUM, ARBITRUM), (ETHEREUM, OPTIMISM)],
		);
		let out = PingPong::new()
			.compute_transfers_to_balance(&g, &[])
			.unwrap();
		// One unit cannot be split two ways; the last peer in selector order
		// is dropped and the first gets the whole unit.
		assert_transfers(&out, &[(ETHEREUM, OPTIMISM, 1)]);
	}

	#[test]
	fn test_pair_with_transfer_in_motion_is_skipped() {
		let g = graph(
			&[(ETHEREUM, 100, 0), (ARBITRUM, 0, 0), (OPTIMISM, 0, 0)],
			&[(ETHEREUM, ARBITRUM), (ETHEREUM, OPTIMISM)],
		);
		let travelling = vec![in_motion(
			ETHEREUM,
			ARBITRUM,
			30,
			TransferStatus::Inflight,
		)];
		let out = PingPong::new()
			.compute_transfers_to_balance(&g, &travelling)
			.unwrap();
		// 30 of the 100 is already travelling toward arbitrum, and that pair
		// is busy; the remaining 70 all goes to optimism.
		assert_transfers(&out, &[(ETHEREUM, OPTIMISM, 70)]);
	}

	#[test]
	fn test_one_way_edges_never_ping_pong() {
		let g = graph(&[(ETHEREUM, 100, 0), (ARBITRUM, 0, 0)], &[]);
		g.add_connection(ETHEREUM, ARBITRUM).unwrap();
		let out = PingPong::new()
			.compute_transfers_to_balance(&g, &[])
			.unwrap();
		assert!(out.is_empty());
	}
}
