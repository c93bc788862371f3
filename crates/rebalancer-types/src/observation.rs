//! Consensus-facing aggregate records.
//!
//! Each participant packages what it saw on-chain into an [`Observation`];
//! the aggregated round result is an [`Outcome`]. Both are plain structural
//! JSON: field order is irrelevant and all big integers are decimal strings,
//! so independently computed encodings compare equal byte-for-byte after
//! canonicalization by the transport.

use crate::common::{ConfigDigest, NetworkSelector, U256};
use crate::transfers::{PendingTransfer, ProposedTransfer, Transfer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One directed edge of the liquidity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
	pub source: NetworkSelector,
	pub dest: NetworkSelector,
}

impl Edge {
	pub fn new(source: NetworkSelector, dest: NetworkSelector) -> Self {
		Self { source, dest }
	}
}

/// Config digest seen on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDigestWithMeta {
	pub network_selector: NetworkSelector,
	pub config_digest: ConfigDigest,
}

/// One participant's view of the system for a consensus round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
	#[serde(with = "crate::common::u256_decimal_map")]
	pub liquidity_per_chain: BTreeMap<NetworkSelector, U256>,
	pub resolved_transfers: Vec<Transfer>,
	pub pending_transfers: Vec<PendingTransfer>,
	pub inflight_transfers: Vec<Transfer>,
	pub edges: Vec<Edge>,
	pub config_digests: Vec<ConfigDigestWithMeta>,
}

/// Agreed round result handed to the report encoder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Outcome {
	pub proposed_transfers: Vec<ProposedTransfer>,
	pub resolved_transfers: Vec<Transfer>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::common::Bytes32;

	#[test]
	fn test_observation_json_round_trip() {
		let mut liquidity = BTreeMap::new();
		liquidity.insert(NetworkSelector(1), U256::from(1400u64));
		liquidity.insert(NetworkSelector(2), U256::from(800u64));

		let observation = Observation {
			liquidity_per_chain: liquidity,
			resolved_transfers: vec![],
			pending_transfers: vec![],
			inflight_transfers: vec![],
			edges: vec![
				Edge::new(NetworkSelector(1), NetworkSelector(2)),
				Edge::new(NetworkSelector(2), NetworkSelector(1)),
			],
			config_digests: vec![ConfigDigestWithMeta {
				network_selector: NetworkSelector(1),
				config_digest: Bytes32::repeat_byte(0xab),
			}],
		};

		let encoded = serde_json::to_string(&observation).unwrap();
		// Big integers travel as decimal strings.
		assert!(encoded.contains("\"1\":\"1400\""));
		let decoded: Observation = serde_json::from_str(&encoded).unwrap();
		assert_eq!(decoded, observation);
	}

	#[test]
	fn test_observation_encoding_is_stable_across_insertion_order() {
		let mut a = BTreeMap::new();
		a.insert(NetworkSelector(2), U256::from(5u64));
		a.insert(NetworkSelector(1), U256::from(7u64));

		let mut b = BTreeMap::new();
		b.insert(NetworkSelector(1), U256::from(7u64));
		b.insert(NetworkSelector(2), U256::from(5u64));

		let obs_a = Observation {
			liquidity_per_chain: a,
			..Default::default()
		};
		let obs_b = Observation {
			liquidity_per_chain: b,
			..Default::default()
		};
		assert_eq!(
			serde_json::to_string(&obs_a).unwrap(),
			serde_json::to_string(&obs_b).unwrap()
		);
	}
}
