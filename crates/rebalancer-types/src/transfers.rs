//! Transfer records and their status lifecycle.
//!
//! A transfer starts life as a [`ProposedTransfer`] (pure algorithm output),
//! becomes a [`Transfer`] once resolved with bridge addresses and fee data,
//! and is tracked as a [`PendingTransfer`] until its status reaches
//! `Executed`, at which point it drops out of all future computations.

use crate::common::{Address, NetworkSelector, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Lifecycle of a cross-chain transfer.
///
/// `Proposed` and `Inflight` mean the source balance has not yet been
/// deducted on-chain; from `NotReady` onward the deduction has landed and
/// only the destination credit is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferStatus {
	Proposed,
	Inflight,
	NotReady,
	Ready,
	Finalized,
	Executed,
}

impl TransferStatus {
	/// Terminal state; executed transfers are filtered out of every
	/// computation input.
	pub fn is_executed(&self) -> bool {
		matches!(self, TransferStatus::Executed)
	}

	/// Whether the sender's on-chain balance already reflects this transfer.
	///
	/// Drives the projected-future-graph calculation: re-subtracting an
	/// already-debited amount would double-count it.
	pub fn source_already_debited(&self) -> bool {
		matches!(
			self,
			TransferStatus::NotReady
				| TransferStatus::Ready
				| TransferStatus::Finalized
				| TransferStatus::Executed
		)
	}
}

impl fmt::Display for TransferStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			TransferStatus::Proposed => "proposed",
			TransferStatus::Inflight => "inflight",
			TransferStatus::NotReady => "not-ready",
			TransferStatus::Ready => "ready",
			TransferStatus::Finalized => "finalized",
			TransferStatus::Executed => "executed",
		};
		write!(f, "{}", s)
	}
}

/// A transfer proposed by a rebalancing algorithm, not yet resolved with
/// bridge addresses or on-chain call data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTransfer {
	pub from: NetworkSelector,
	pub to: NetworkSelector,
	#[serde(with = "crate::common::u256_decimal")]
	pub amount: U256,
	pub status: TransferStatus,
}

impl ProposedTransfer {
	pub fn new(from: NetworkSelector, to: NetworkSelector, amount: U256) -> Self {
		Self {
			from,
			to,
			amount,
			status: TransferStatus::Proposed,
		}
	}

	/// Canonical ordering: ascending by source, then destination. Every
	/// consensus participant must emit proposals in exactly this order.
	pub fn sort_key(&self) -> (NetworkSelector, NetworkSelector) {
		(self.from, self.to)
	}
}

impl PartialOrd for ProposedTransfer {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ProposedTransfer {
	fn cmp(&self, other: &Self) -> Ordering {
		self.sort_key().cmp(&other.sort_key())
	}
}

impl fmt::Display for ProposedTransfer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -> {} = {}", self.from, self.to, self.amount)
	}
}

/// A resolved transfer, carrying everything the execution layer needs to
/// build the on-chain instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
	pub from: NetworkSelector,
	pub to: NetworkSelector,
	#[serde(with = "crate::common::u256_decimal")]
	pub amount: U256,
	pub sender: Address,
	pub receiver: Address,
	pub local_token_address: Address,
	pub remote_token_address: Address,
	/// Opaque payload required by the destination bridge.
	#[serde(with = "crate::common::hex_bytes")]
	pub bridge_data: Vec<u8>,
	#[serde(with = "crate::common::u256_decimal")]
	pub native_bridge_fee: U256,
	pub date: DateTime<Utc>,
	/// Increasing revision counter; only a strictly higher stage may
	/// supersede an earlier instruction for the same logical transfer.
	pub stage: u64,
}

impl Transfer {
	pub fn supersedes(&self, other: &Transfer) -> bool {
		self.stage > other.stage
	}
}

/// A resolved transfer together with its current lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
	pub transfer: Transfer,
	pub status: TransferStatus,
}

/// Anything the algorithms can treat as money already in motion.
///
/// Satisfied by proposed, resolved and pending transfers alike; the
/// algorithms only care about endpoints, amount and status.
pub trait UnexecutedTransfer: Send + Sync {
	fn from_network(&self) -> NetworkSelector;
	fn to_network(&self) -> NetworkSelector;
	fn transfer_amount(&self) -> U256;
	fn transfer_status(&self) -> TransferStatus;
}

impl UnexecutedTransfer for ProposedTransfer {
	fn from_network(&self) -> NetworkSelector {
		self.from
	}

	fn to_network(&self) -> NetworkSelector {
		self.to
	}

	fn transfer_amount(&self) -> U256 {
		self.amount
	}

	fn transfer_status(&self) -> TransferStatus {
		self.status
	}
}

impl UnexecutedTransfer for Transfer {
	fn from_network(&self) -> NetworkSelector {
		self.from
	}

	fn to_network(&self) -> NetworkSelector {
		self.to
	}

	fn transfer_amount(&self) -> U256 {
		self.amount
	}

	fn transfer_status(&self) -> TransferStatus {
		TransferStatus::Proposed
	}
}

impl UnexecutedTransfer for PendingTransfer {
	fn from_network(&self) -> NetworkSelector {
		self.transfer.from
	}

	fn to_network(&self) -> NetworkSelector {
		self.transfer.to
	}

	fn transfer_amount(&self) -> U256 {
		self.transfer.amount
	}

	fn transfer_status(&self) -> TransferStatus {
		self.status
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn transfer(from: u64, to: u64, amount: u64, stage: u64) -> Transfer {
		Transfer {
			from: NetworkSelector(from),
			to: NetworkSelector(to),
			amount: U256::from(amount),
			sender: Address::zero(),
			receiver: Address::zero(),
			local_token_address: Address::zero(),
			remote_token_address: Address::zero(),
			bridge_data: vec![],
			native_bridge_fee: U256::zero(),
			date: DateTime::<Utc>::MIN_UTC,
			stage,
		}
	}

	#[test]
	fn test_status_lifecycle_split() {
		assert!(!TransferStatus::Proposed.source_already_debited());
		assert!(!TransferStatus::Inflight.source_already_debited());
		assert!(TransferStatus::NotReady.source_already_debited());
		assert!(TransferStatus::Ready.source_already_debited());
		assert!(TransferStatus::Finalized.source_already_debited());
		assert!(TransferStatus::Executed.source_already_debited());

		assert!(TransferStatus::Executed.is_executed());
		assert!(!TransferStatus::Finalized.is_executed());
	}

	#[test]
	fn test_status_serde_kebab_case() {
		assert_eq!(
			serde_json::to_string(&TransferStatus::NotReady).unwrap(),
			"\"not-ready\""
		);
		let decoded: TransferStatus = serde_json::from_str("\"inflight\"").unwrap();
		assert_eq!(decoded, TransferStatus::Inflight);
	}

	#[test]
	fn test_proposed_transfer_ordering() {
		let mut transfers = vec![
			ProposedTransfer::new(NetworkSelector(2), NetworkSelector(1), U256::from(5)),
			ProposedTransfer::new(NetworkSelector(1), NetworkSelector(3), U256::from(5)),
			ProposedTransfer::new(NetworkSelector(1), NetworkSelector(2), U256::from(5)),
		];
		transfers.sort();
		assert_eq!(transfers[0].to, NetworkSelector(2));
		assert_eq!(transfers[1].to, NetworkSelector(3));
		assert_eq!(transfers[2].from, NetworkSelector(2));
	}

	#[test]
	fn test_stage_supersession_is_strict() {
		let older = transfer(1, 2, 100, 3);
		let newer = transfer(1, 2, 100, 4);
		assert!(newer.supersedes(&older));
		assert!(!older.supersedes(&newer));
		assert!(!older.supersedes(&older.clone()));
	}

	#[test]
	fn test_pending_transfer_exposes_inner_fields() {
		let pending = PendingTransfer {
			transfer: transfer(7, 8, 42, 0),
			status: TransferStatus::Ready,
		};
		assert_eq!(pending.from_network(), NetworkSelector(7));
		assert_eq!(pending.to_network(), NetworkSelector(8));
		assert_eq!(pending.transfer_amount(), U256::from(42));
		assert_eq!(pending.transfer_status(), TransferStatus::Ready);
	}
}
