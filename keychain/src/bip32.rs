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

//! BIP32 hardened-only key tree used to derive the MWEB scan and spend
//! master keys from a wallet seed (§4.6): `m/0'` (account), `m/0'/100'`
//! (MWEB), with children `m/0'/100'/0'` (scan key `a`) and `m/0'/100'/1'`
//! (spend master `B0`).

use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use mweb_secp::{Point, Scalar};
use sha2::Sha512;
use zeroize::Zeroize;

type HmacSha512 = Hmac<Sha512>;

const HARDENED: u32 = 0x8000_0000;

/// An extended private key: a scalar plus 32 bytes of chain code.
#[derive(Clone)]
pub struct ExtendedKey {
	pub key: Scalar,
	pub chain_code: [u8; 32],
}

impl Drop for ExtendedKey {
	fn drop(&mut self) {
		self.chain_code.zeroize();
	}
}

impl ExtendedKey {
	/// Master key per BIP32: `HMAC-SHA512("Bitcoin seed", seed)`.
	pub fn from_seed(seed: &[u8]) -> Result<ExtendedKey> {
		if seed.len() < 16 {
			return Err(Error::InvalidSeed);
		}
		let mut mac =
			HmacSha512::new_from_slice(b"Bitcoin seed").expect("any length key is valid for HMAC");
		mac.update(seed);
		let i = mac.finalize().into_bytes();

		let key = Scalar::from_bytes(i[0..32].try_into().unwrap()).map_err(Error::Secp)?;
		let mut chain_code = [0u8; 32];
		chain_code.copy_from_slice(&i[32..64]);
		Ok(ExtendedKey { key, chain_code })
	}

	/// Derive the hardened child at `index` (values are taken as hardened;
	/// the tree this crate builds never needs non-hardened children).
	pub fn derive_hardened(&self, index: u32) -> Result<ExtendedKey> {
		let mut mac = HmacSha512::new_from_slice(&self.chain_code)
			.expect("any length key is valid for HMAC");
		mac.update(&[0x00]);
		mac.update(&self.key.to_bytes());
		mac.update(&(index | HARDENED).to_be_bytes());
		let i = mac.finalize().into_bytes();

		let il = Scalar::from_bytes(i[0..32].try_into().unwrap()).map_err(Error::Secp)?;
		let child_key = il.add(&self.key);
		let mut chain_code = [0u8; 32];
		chain_code.copy_from_slice(&i[32..64]);
		Ok(ExtendedKey {
			key: child_key,
			chain_code,
		})
	}

	pub fn public_key(&self) -> Point {
		Point::generator().mul(&self.key)
	}
}

/// The MWEB key tree rooted at `m/0'/100'`: a scan scalar `a` and a spend
/// master scalar `b0` (public `B0 = b0*G`).
pub struct MwebKeyTree {
	pub scan_key: Scalar,
	pub spend_master: Scalar,
}

impl MwebKeyTree {
	pub fn from_seed(seed: &[u8]) -> Result<MwebKeyTree> {
		let master = ExtendedKey::from_seed(seed)?;
		let account = master.derive_hardened(0)?;
		let mweb = account.derive_hardened(100)?;
		let scan = mweb.derive_hardened(0)?;
		let spend = mweb.derive_hardened(1)?;
		Ok(MwebKeyTree {
			scan_key: scan.key,
			spend_master: spend.key,
		})
	}

	pub fn spend_master_pubkey(&self) -> Point {
		Point::generator().mul(&self.spend_master)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn derivation_is_deterministic() {
		let seed = [0u8; 32];
		let a = MwebKeyTree::from_seed(&seed).unwrap();
		let b = MwebKeyTree::from_seed(&seed).unwrap();
		assert_eq!(a.scan_key.to_bytes(), b.scan_key.to_bytes());
		assert_eq!(a.spend_master.to_bytes(), b.spend_master.to_bytes());
	}
}
