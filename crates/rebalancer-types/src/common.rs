//! Common types used throughout the rebalancer system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used ethereum types
pub use ethers_core::types::{Address, H256 as Bytes32, U256};

/// Fingerprint of the on-chain consensus configuration active for a network.
pub type ConfigDigest = Bytes32;

/// Opaque identifier of one blockchain network.
///
/// Selectors order by numeric value; that order is the canonical tie-break
/// everywhere determinism matters (map keys, sorted output, candidate
/// ranking).
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct NetworkSelector(pub u64);

impl fmt::Display for NetworkSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for NetworkSelector {
	type Err = std::num::ParseIntError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(NetworkSelector(s.parse()?))
	}
}

impl From<u64> for NetworkSelector {
	fn from(value: u64) -> Self {
		NetworkSelector(value)
	}
}

/// Serde helpers that encode a `U256` as a decimal string.
///
/// The consensus transport compares observations structurally, and every
/// participant must emit token amounts the same way; hex/decimal ambiguity is
/// removed by always using base-10 strings.
pub mod u256_decimal {
	use super::U256;
	use serde::{de, Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&value.to_string())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
		let s = String::deserialize(deserializer)?;
		U256::from_dec_str(&s).map_err(de::Error::custom)
	}
}

/// Serde helpers for maps with `U256` values, encoded as decimal strings.
pub mod u256_decimal_map {
	use super::{NetworkSelector, U256};
	use serde::{de, Deserialize, Deserializer, Serializer};
	use std::collections::BTreeMap;

	pub fn serialize<S: Serializer>(
		map: &BTreeMap<NetworkSelector, U256>,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		serializer.collect_map(map.iter().map(|(k, v)| (k, v.to_string())))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<BTreeMap<NetworkSelector, U256>, D::Error> {
		let raw = BTreeMap::<NetworkSelector, String>::deserialize(deserializer)?;
		raw.into_iter()
			.map(|(k, v)| Ok((k, U256::from_dec_str(&v).map_err(de::Error::custom)?)))
			.collect()
	}
}

/// Serde helpers that encode opaque byte payloads as 0x-prefixed hex.
pub mod hex_bytes {
	use serde::{de, Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
		let s = String::deserialize(deserializer)?;
		hex::decode(s.trim_start_matches("0x")).map_err(de::Error::custom)
	}
}
