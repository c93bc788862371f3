//! Rebalancer configuration.

use crate::common::{NetworkSelector, U256};
use crate::errors::RebalancerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which rebalancing strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RebalancerType {
	TargetAndMin,
	MinLiquidity,
	PingPong,
}

impl fmt::Display for RebalancerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			RebalancerType::TargetAndMin => "target-and-min",
			RebalancerType::MinLiquidity => "min-liquidity",
			RebalancerType::PingPong => "ping-pong",
		};
		write!(f, "{}", s)
	}
}

impl FromStr for RebalancerType {
	type Err = RebalancerError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"target-and-min" => Ok(RebalancerType::TargetAndMin),
			"min-liquidity" => Ok(RebalancerType::MinLiquidity),
			"ping-pong" => Ok(RebalancerType::PingPong),
			other => Err(RebalancerError::Config(format!(
				"unknown rebalancer type: {}",
				other
			))),
		}
	}
}

/// Strategy selection plus per-network target liquidity assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalancerConfig {
	#[serde(rename = "type")]
	pub kind: RebalancerType,
	/// Target applied to any network without an explicit override.
	#[serde(with = "crate::common::u256_decimal")]
	pub default_target: U256,
	#[serde(with = "crate::common::u256_decimal_map")]
	pub network_target_overrides: BTreeMap<NetworkSelector, U256>,
}

impl RebalancerConfig {
	/// Target liquidity assigned to `network` for this round.
	///
	/// A target of exactly zero disables automated rebalancing for that
	/// network.
	pub fn target_for(&self, network: NetworkSelector) -> U256 {
		self.network_target_overrides
			.get(&network)
			.copied()
			.unwrap_or(self.default_target)
	}
}
