// Copyright 2026 The MWEB Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The `KeyChain` trait (§9) and its full-spend and view-only
//! implementations, backed by a monotonic spend-pubkey cache so repeated
//! scans don't re-derive `Bi` for every candidate output.

use mweb_util::Mutex;
use std::collections::HashMap;

use mweb_secp::{Point, Scalar};

use crate::bip32::MwebKeyTree;
use crate::stealth::{stealth_address_for_index, StealthAddress};

/// Operations a scanner or wallet needs from a key source, independent of
/// whether it holds the spend key.
pub trait KeyChain: Send + Sync {
	/// The stealth address owning index `i`.
	fn stealth_address(&self, index: u32) -> StealthAddress;

	/// The scan scalar `a`, needed to rewind candidate outputs.
	fn scan_key(&self) -> &Scalar;

	/// Look up the address index that owns spend pubkey `Bi`, extending
	/// the cache up to `index` if it hasn't been derived yet. Returns
	/// `None` if `Bi` isn't among the first `max_lookahead` indices.
	fn index_for_spend_pubkey(&self, bi: &Point) -> Option<u32>;
}

/// Builds and caches `Bi` values on demand, insert-only and safe to share
/// across scanning threads (§9: "a dynamic dictionary of pubkeys ...
/// extended lazily as higher indices are requested").
struct PubkeyCache {
	by_pubkey: Mutex<HashMap<[u8; 33], u32>>,
	max_derived: Mutex<u32>,
}

impl PubkeyCache {
	fn new() -> PubkeyCache {
		PubkeyCache {
			by_pubkey: Mutex::new(HashMap::new()),
			max_derived: Mutex::new(0),
		}
	}

	/// Ensure indices `0..=upto` are present, deriving `Bi` via `derive`
	/// for any not yet cached.
	fn extend_to(&self, upto: u32, derive: impl Fn(u32) -> Point) {
		let mut max_derived = self.max_derived.lock();
		if upto < *max_derived {
			return;
		}
		let mut by_pubkey = self.by_pubkey.lock();
		for i in *max_derived..=upto {
			let bi = derive(i);
			by_pubkey.insert(bi.to_compressed(), i);
		}
		*max_derived = upto + 1;
	}

	fn lookup(&self, bi: &Point) -> Option<u32> {
		self.by_pubkey.lock().get(&bi.to_compressed()).copied()
	}
}

/// How many addresses ahead of the last cached index a lookup miss is
/// willing to derive before giving up, per §9's lookahead note.
const DEFAULT_LOOKAHEAD: u32 = 1_000;

/// A key chain holding both the scan key `a` and the spend master `b0`:
/// can build addresses, rewind outputs, and recover spend keys.
pub struct FullKeyChain {
	tree: MwebKeyTree,
	cache: PubkeyCache,
}

impl FullKeyChain {
	pub fn new(tree: MwebKeyTree) -> FullKeyChain {
		FullKeyChain {
			tree,
			cache: PubkeyCache::new(),
		}
	}

	pub fn from_seed(seed: &[u8]) -> crate::error::Result<FullKeyChain> {
		Ok(FullKeyChain::new(MwebKeyTree::from_seed(seed)?))
	}

	/// The private spend key `bi` for `index`, needed to sign a spend.
	pub fn spend_key(&self, index: u32) -> Scalar {
		crate::stealth::spend_key_for_index(&self.tree.spend_master, &self.tree.scan_key, index)
	}

	fn derive_bi(&self, index: u32) -> Point {
		stealth_address_for_index(&self.tree.spend_master, &self.tree.scan_key, index).spend_pubkey
	}
}

impl KeyChain for FullKeyChain {
	fn stealth_address(&self, index: u32) -> StealthAddress {
		stealth_address_for_index(&self.tree.spend_master, &self.tree.scan_key, index)
	}

	fn scan_key(&self) -> &Scalar {
		&self.tree.scan_key
	}

	fn index_for_spend_pubkey(&self, bi: &Point) -> Option<u32> {
		if let Some(index) = self.cache.lookup(bi) {
			return Some(index);
		}
		self.cache
			.extend_to(DEFAULT_LOOKAHEAD, |i| self.derive_bi(i));
		self.cache.lookup(bi)
	}
}

/// A key chain holding only the scan key `a` and the spend master's public
/// key `B0`: can rewind outputs and recognize addresses, but cannot sign a
/// spend.
pub struct ViewKeyChain {
	scan_key: Scalar,
	spend_master_pubkey: Point,
	cache: PubkeyCache,
}

impl ViewKeyChain {
	pub fn new(scan_key: Scalar, spend_master_pubkey: Point) -> ViewKeyChain {
		ViewKeyChain {
			scan_key,
			spend_master_pubkey,
			cache: PubkeyCache::new(),
		}
	}

	fn derive_bi(&self, index: u32) -> Point {
		let digest = mweb_secp::hash::tagged_hash(
			mweb_secp::hash::tag::ADDRESS,
			&[&index.to_le_bytes(), &self.scan_key.to_bytes()],
		);
		let mi = Scalar::reduce_from_bytes(&digest);
		self.spend_master_pubkey.add(&Point::generator().mul(&mi))
	}
}

impl KeyChain for ViewKeyChain {
	fn stealth_address(&self, index: u32) -> StealthAddress {
		let bi = self.derive_bi(index);
		StealthAddress {
			spend_pubkey: bi,
			scan_pubkey: bi.mul(&self.scan_key),
		}
	}

	fn scan_key(&self) -> &Scalar {
		&self.scan_key
	}

	fn index_for_spend_pubkey(&self, bi: &Point) -> Option<u32> {
		if let Some(index) = self.cache.lookup(bi) {
			return Some(index);
		}
		self.cache
			.extend_to(DEFAULT_LOOKAHEAD, |i| self.derive_bi(i));
		self.cache.lookup(bi)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn full_and_view_chains_agree_on_addresses() {
		let tree = MwebKeyTree::from_seed(&[7u8; 32]).unwrap();
		let spend_master_pubkey = tree.spend_master_pubkey();
		let scan_key = tree.scan_key;
		let full = FullKeyChain::new(tree);
		let view = ViewKeyChain::new(scan_key, spend_master_pubkey);

		for i in [0u32, 1, 42] {
			assert!(full.stealth_address(i).spend_pubkey == view.stealth_address(i).spend_pubkey);
		}
	}

	#[test]
	fn lookup_finds_cached_index() {
		let tree = MwebKeyTree::from_seed(&[8u8; 32]).unwrap();
		let full = FullKeyChain::new(tree);
		let addr = full.stealth_address(5);
		assert_eq!(full.index_for_spend_pubkey(&addr.spend_pubkey), Some(5));
	}
}
