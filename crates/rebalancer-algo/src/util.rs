//! Projection and acceptance machinery shared by the strategies.

use rebalancer_graph::Graph;
use rebalancer_types::{NetworkSelector, ProposedTransfer, Result, TransferStatus, UnexecutedTransfer, U256};
use std::collections::BTreeMap;
use tracing::trace;

/// Per-source ledger of amounts already promised by accepted proposals.
pub type CommittedOutgoing = BTreeMap<NetworkSelector, U256>;

/// Projects the effect of one in-motion transfer onto `graph`.
///
/// The destination is credited unconditionally; the source is debited only
/// while its on-chain balance does not yet reflect the transfer.
pub fn apply_transfer(
	graph: &Graph,
	from: NetworkSelector,
	to: NetworkSelector,
	amount: U256,
	status: TransferStatus,
) -> Result<()> {
	let dest = graph.get_liquidity(to)?;
	graph.set_liquidity(to, dest.saturating_add(amount));
	if !status.source_already_debited() {
		let source = graph.get_liquidity(from)?;
		graph.set_liquidity(from, source.saturating_sub(amount));
	}
	Ok(())
}

/// Deep copy of `graph` with every non-executed transfer's effects applied:
/// the liquidity each network will hold once everything in motion lands.
pub fn expected_graph<'a, I>(graph: &Graph, transfers: I) -> Result<Graph>
where
	I: IntoIterator<Item = &'a dyn UnexecutedTransfer>,
{
	let projected = graph.clone();
	for transfer in transfers {
		let status = transfer.transfer_status();
		if status.is_executed() {
			continue;
		}
		apply_transfer(
			&projected,
			transfer.from_network(),
			transfer.to_network(),
			transfer.transfer_amount(),
			status,
		)?;
	}
	Ok(projected)
}

/// Conservative bound on what `network` can send immediately: the smaller of
/// its above-minimum liquidity now (less amounts already committed to earlier
/// proposals) and its above-minimum liquidity once in-motion transfers land.
pub fn available_to_send(
	now: &Graph,
	future: &Graph,
	committed: &CommittedOutgoing,
	network: NetworkSelector,
) -> Result<U256> {
	let now_data = now.get_data(network)?;
	let future_data = future.get_data(network)?;
	let already_committed = committed.get(&network).copied().unwrap_or_default();
	let available_now = now_data
		.liquidity
		.saturating_sub(now_data.minimum_liquidity)
		.saturating_sub(already_committed);
	let available_future = future_data
		.liquidity
		.saturating_sub(future_data.minimum_liquidity);
	Ok(available_now.min(available_future))
}

/// Greedy acceptance of candidate transfers raised for one funding
/// requirement.
///
/// Candidates are taken largest first (ties broken by source then
/// destination), each clamped to what its sender can actually part with and
/// shrunk so the total never overshoots `required`. Every accepted transfer
/// is applied to `future` and recorded in `committed` immediately, so later
/// candidates see its effect.
pub fn accept_candidates(
	now: &Graph,
	future: &Graph,
	committed: &mut CommittedOutgoing,
	mut candidates: Vec<ProposedTransfer>,
	required: U256,
) -> Result<Vec<ProposedTransfer>> {
	candidates.sort_by(|a, b| {
		b.amount
			.cmp(&a.amount)
			.then(a.sort_key().cmp(&b.sort_key()))
	});

	let mut accepted = Vec::new();
	let mut raised = U256::zero();
	for mut candidate in candidates {
		let remaining = required.saturating_sub(raised);
		if remaining.is_zero() {
			break;
		}
		let available = available_to_send(now, future, committed, candidate.from)?;
		candidate.amount = candidate.amount.min(available).min(remaining);
		if candidate.amount.is_zero() {
			continue;
		}
		trace!("accepting candidate transfer {}", candidate);
		apply_transfer(
			future,
			candidate.from,
			candidate.to,
			candidate.amount,
			TransferStatus::Proposed,
		)?;
		let ledger = committed.entry(candidate.from).or_default();
		*ledger = ledger.saturating_add(candidate.amount);
		raised = raised.saturating_add(candidate.amount);
		accepted.push(candidate);
	}
	Ok(accepted)
}

/// Networks with a directed edge into `target`, ascending by selector.
pub fn incoming_neighbors(graph: &Graph, target: NetworkSelector) -> Vec<NetworkSelector> {
	graph
		.get_networks()
		.into_iter()
		.filter(|&network| network != target)
		.filter(|&network| {
			graph
				.get_neighbors(network, false)
				.is_some_and(|peers| peers.contains(&target))
		})
		.collect()
}

/// Collapses duplicate (from, to) pairs by summing their amounts, and emits
/// the result in canonical ascending (from, to) order.
pub fn merge_transfers(transfers: Vec<ProposedTransfer>) -> Vec<ProposedTransfer> {
	let mut merged: BTreeMap<(NetworkSelector, NetworkSelector), U256> = BTreeMap::new();
	for transfer in transfers {
		let slot = merged.entry(transfer.sort_key()).or_default();
		*slot = slot.saturating_add(transfer.amount);
	}
	merged
		.into_iter()
		.map(|((from, to), amount)| ProposedTransfer::new(from, to, amount))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::{graph, in_motion, ARBITRUM, ETHEREUM, OPTIMISM};

	#[test]
	fn test_expected_graph_debits_by_status() {
		let base = graph(
			&[(ETHEREUM, 1000, 0), (ARBITRUM, 1000, 0)],
			&[(ETHEREUM, ARBITRUM)],
		);
		let transfers = vec![
			// Source not yet debited on-chain: both sides move.
			in_motion(ETHEREUM, ARBITRUM, 100, TransferStatus::Inflight),
			// Already debited: only the destination credit is outstanding.
			in_motion(ARBITRUM, ETHEREUM, 50, TransferStatus::Ready),
			// Terminal: ignored entirely.
			in_motion(ETHEREUM, ARBITRUM, 999, TransferStatus::Executed),
		];
		let future =
			expected_graph(&base, transfers.iter().map(|t| t.as_ref())).unwrap();

		assert_eq!(future.get_liquidity(ETHEREUM).unwrap(), U256::from(950));
		assert_eq!(future.get_liquidity(ARBITRUM).unwrap(), U256::from(1100));
		// The input graph stays untouched.
		assert_eq!(base.get_liquidity(ETHEREUM).unwrap(), U256::from(1000));
	}

	#[test]
	fn test_expected_graph_rejects_unknown_network() {
		let base = graph(&[(ETHEREUM, 1000, 0)], &[]);
		let transfers = vec![in_motion(
			ETHEREUM,
			ARBITRUM,
			100,
			TransferStatus::Inflight,
		)];
		assert!(expected_graph(&base, transfers.iter().map(|t| t.as_ref())).is_err());
	}

	#[test]
	fn test_available_to_send_takes_conservative_minimum() {
		let now = graph(&[(ETHEREUM, 1000, 300)], &[]);
		let future = graph(&[(ETHEREUM, 600, 300)], &[]);
		let mut committed = CommittedOutgoing::new();

		// Future bound binds: min(700, 300).
		assert_eq!(
			available_to_send(&now, &future, &committed, ETHEREUM).unwrap(),
			U256::from(300)
		);

		// A prior commitment of 500 flips the binding side: min(200, 300).
		committed.insert(ETHEREUM, U256::from(500));
		assert_eq!(
			available_to_send(&now, &future, &committed, ETHEREUM).unwrap(),
			U256::from(200)
		);
	}

	#[test]
	fn test_accept_candidates_orders_clamps_and_shrinks() {
		let now = graph(
			&[
				(OPTIMISM, 1000, 0),
				(ARBITRUM, 1000, 0),
				(ETHEREUM, 0, 0),
			],
			&[(OPTIMISM, ETHEREUM), (ARBITRUM, ETHEREUM)],
		);
		let future = now.clone();
		let mut committed = CommittedOutgoing::new();
		let candidates = vec![
			ProposedTransfer::new(ARBITRUM, ETHEREUM, U256::from(300)),
			ProposedTransfer::new(OPTIMISM, ETHEREUM, U256::from(400)),
		];

		let accepted =
			accept_candidates(&now, &future, &mut committed, candidates, U256::from(500))
				.unwrap();

		// Largest first; the runner-up is shrunk so the total hits 500 exactly.
		assert_eq!(accepted.len(), 2);
		assert_eq!(accepted[0].from, OPTIMISM);
		assert_eq!(accepted[0].amount, U256::from(400));
		assert_eq!(accepted[1].from, ARBITRUM);
		assert_eq!(accepted[1].amount, U256::from(100));

		// Effects landed on the projected graph and the ledger.
		assert_eq!(future.get_liquidity(ETHEREUM).unwrap(), U256::from(500));
		assert_eq!(committed[&OPTIMISM], U256::from(400));
		assert_eq!(committed[&ARBITRUM], U256::from(100));
	}

	#[test]
	fn test_accept_candidates_equal_amounts_break_ties_by_source() {
		let now = graph(
			&[
				(OPTIMISM, 100, 0),
				(ARBITRUM, 100, 0),
				(ETHEREUM, 0, 0),
			],
			&[(OPTIMISM, ETHEREUM), (ARBITRUM, ETHEREUM)],
		);
		let future = now.clone();
		let mut committed = CommittedOutgoing::new();
		let candidates = vec![
			ProposedTransfer::new(ARBITRUM, ETHEREUM, U256::from(100)),
			ProposedTransfer::new(OPTIMISM, ETHEREUM, U256::from(100)),
		];

		let accepted =
			accept_candidates(&now, &future, &mut committed, candidates, U256::from(100))
				.unwrap();

		// optimism's selector is numerically lower, so it wins the tie and
		// fully satisfies the requirement.
		assert_eq!(accepted.len(), 1);
		assert_eq!(accepted[0].from, OPTIMISM);
	}

	#[test]
	fn test_accept_candidates_skips_senders_with_nothing_available() {
		let now = graph(
			&[(ARBITRUM, 100, 100), (ETHEREUM, 0, 0)],
			&[(ARBITRUM, ETHEREUM)],
		);
		let future = now.clone();
		let mut committed = CommittedOutgoing::new();
		let candidates = vec![ProposedTransfer::new(ARBITRUM, ETHEREUM, U256::from(100))];

		let accepted =
			accept_candidates(&now, &future, &mut committed, candidates, U256::from(100))
				.unwrap();
		assert!(accepted.is_empty());
		assert!(committed.is_empty());
	}

	#[test]
	fn test_incoming_neighbors_follow_edge_direction() {
		let g = graph(&[(OPTIMISM, 0, 0), (ARBITRUM, 0, 0), (ETHEREUM, 0, 0)], &[]);
		g.add_connection(OPTIMISM, ETHEREUM).unwrap();
		g.add_connection(ETHEREUM, ARBITRUM).unwrap();

		assert_eq!(incoming_neighbors(&g, ETHEREUM), vec![OPTIMISM]);
		assert_eq!(incoming_neighbors(&g, ARBITRUM), vec![ETHEREUM]);
		assert!(incoming_neighbors(&g, OPTIMISM).is_empty());
	}

	#[test]
	fn test_merge_transfers_sums_pairs_and_sorts() {
		let merged = merge_transfers(vec![
			ProposedTransfer::new(ETHEREUM, ARBITRUM, U256::from(100)),
			ProposedTransfer::new(OPTIMISM, ETHEREUM, U256::from(50)),
			ProposedTransfer::new(ETHEREUM, ARBITRUM, U256::from(25)),
		]);
		assert_eq!(merged.len(), 2);
		// optimism < arbitrum < ethereum by selector.
		assert_eq!(merged[0].from, OPTIMISM);
		assert_eq!(merged[0].amount, U256::from(50));
		assert_eq!(merged[1].from, ETHEREUM);
		assert_eq!(merged[1].to, ARBITRUM);
		assert_eq!(merged[1].amount, U256::from(125));
	}
}
