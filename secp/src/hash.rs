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

//! Hashing primitives: the tagged Blake3 hasher used for key derivation, the
//! RFC6979 HMAC-SHA256 DRBG, the ChaCha20-based deterministic scalar PRF used
//! by the bulletproof prover, and the SHA-256 transcript update used for
//! Fiat-Shamir challenges.

use crate::scalar::Scalar;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Domain-separation tags for the tagged Blake3 hasher. No other tag may be
/// introduced (§6): address, blind, derive, nonce, out-key, send-key,
/// view-tag, nonce-mask, value-mask.
pub mod tag {
	pub const ADDRESS: u8 = b'A';
	pub const BLIND: u8 = b'B';
	pub const DERIVE: u8 = b'D';
	pub const NONCE: u8 = b'N';
	pub const OUT_KEY: u8 = b'O';
	pub const SEND_KEY: u8 = b'S';
	pub const VIEW_TAG: u8 = b'T';
	pub const NONCE_MASK: u8 = b'X';
	pub const VALUE_MASK: u8 = b'Y';
}

/// A tagged Blake3 hasher: writes the single-byte domain tag first (if any),
/// then the caller's inputs, and finalizes to a 32-byte digest.
pub struct Hasher(blake3::Hasher);

impl Hasher {
	pub fn new() -> Hasher {
		Hasher(blake3::Hasher::new())
	}

	pub fn with_tag(tag: u8) -> Hasher {
		let mut h = blake3::Hasher::new();
		h.update(&[tag]);
		Hasher(h)
	}

	pub fn update(&mut self, data: &[u8]) -> &mut Self {
		self.0.update(data);
		self
	}

	pub fn finalize(&self) -> [u8; 32] {
		*self.0.finalize().as_bytes()
	}
}

impl Default for Hasher {
	fn default() -> Self {
		Hasher::new()
	}
}

/// Hash `data` under `tag` in one shot.
pub fn tagged_hash(tag: u8, data: &[&[u8]]) -> [u8; 32] {
	let mut h = Hasher::with_tag(tag);
	for d in data {
		h.update(d);
	}
	h.finalize()
}

/// RFC6979 HMAC-SHA256 deterministic bit generator, used both to derive the
/// auxiliary bulletproof generators (§4.3) and directly tested against known
/// answers (§8 S5).
pub struct Rfc6979HmacSha256 {
	k: [u8; 32],
	v: [u8; 32],
	retry: bool,
}

impl Rfc6979HmacSha256 {
	/// Seed the DRBG the way §4.3 does: `K=0x00*32`, `V=0x01*32`, then the
	/// standard two HMAC updates folding in the seed key.
	pub fn new(key: &[u8]) -> Rfc6979HmacSha256 {
		let mut k = [0u8; 32];
		let mut v = [1u8; 32];

		let mut mac = HmacSha256::new_from_slice(&k).expect("any length key is valid for HMAC");
		mac.update(&v);
		mac.update(&[0x00]);
		mac.update(key);
		k = mac.finalize().into_bytes().into();

		let mut mac = HmacSha256::new_from_slice(&k).expect("any length key is valid for HMAC");
		mac.update(&v);
		v = mac.finalize().into_bytes().into();

		let mut mac = HmacSha256::new_from_slice(&k).expect("any length key is valid for HMAC");
		mac.update(&v);
		mac.update(&[0x01]);
		mac.update(key);
		k = mac.finalize().into_bytes().into();

		let mut mac = HmacSha256::new_from_slice(&k).expect("any length key is valid for HMAC");
		mac.update(&v);
		v = mac.finalize().into_bytes().into();

		Rfc6979HmacSha256 { k, v, retry: false }
	}

	fn retry_step(&mut self) {
		let mut mac =
			HmacSha256::new_from_slice(&self.k).expect("any length key is valid for HMAC");
		mac.update(&self.v);
		mac.update(&[0x00]);
		self.k = mac.finalize().into_bytes().into();

		let mut mac =
			HmacSha256::new_from_slice(&self.k).expect("any length key is valid for HMAC");
		mac.update(&self.v);
		self.v = mac.finalize().into_bytes().into();
	}

	/// Emit `n` bytes, in 32-byte chunks. The first call to `generate` skips
	/// the retry step (the constructor already performed the equivalent
	/// update); subsequent calls perform it.
	pub fn generate(&mut self, n: usize) -> Vec<u8> {
		if self.retry {
			self.retry_step();
		}
		self.retry = true;

		let mut out = Vec::with_capacity(n);
		while out.len() < n {
			let mut mac =
				HmacSha256::new_from_slice(&self.k).expect("any length key is valid for HMAC");
			mac.update(&self.v);
			self.v = mac.finalize().into_bytes().into();
			out.extend_from_slice(&self.v);
		}
		out.truncate(n);
		out
	}
}

const CHACHA_CONST: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574];

fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
	state[a] = state[a].wrapping_add(state[b]);
	state[d] ^= state[a];
	state[d] = state[d].rotate_left(16);

	state[c] = state[c].wrapping_add(state[d]);
	state[b] ^= state[c];
	state[b] = state[b].rotate_left(12);

	state[a] = state[a].wrapping_add(state[b]);
	state[d] ^= state[a];
	state[d] = state[d].rotate_left(8);

	state[c] = state[c].wrapping_add(state[d]);
	state[b] ^= state[c];
	state[b] = state[b].rotate_left(7);
}

fn chacha20_block(key: &[u32; 8], counter: u64, over_counter: u32) -> [u32; 16] {
	let mut state = [0u32; 16];
	state[0..4].copy_from_slice(&CHACHA_CONST);
	state[4..12].copy_from_slice(key);
	state[12] = counter as u32;
	state[13] = (counter >> 32) as u32;
	state[14] = 0;
	state[15] = over_counter;

	let mut working = state;
	for _ in 0..10 {
		quarter_round(&mut working, 0, 4, 8, 12);
		quarter_round(&mut working, 1, 5, 9, 13);
		quarter_round(&mut working, 2, 6, 10, 14);
		quarter_round(&mut working, 3, 7, 11, 15);
		quarter_round(&mut working, 0, 5, 10, 15);
		quarter_round(&mut working, 1, 6, 11, 12);
		quarter_round(&mut working, 2, 7, 8, 13);
		quarter_round(&mut working, 3, 4, 9, 14);
	}
	for i in 0..16 {
		working[i] = working[i].wrapping_add(state[i]);
	}
	working
}

/// The deterministic ChaCha20-based scalar PRF described in §4.2: derives
/// two scalars from a 32-byte seed and an index, retrying with an
/// incrementing "over-counter" word until both outputs fall below `n`.
pub fn scalar_chacha20(seed: &[u8; 32], idx: u64) -> (Scalar, Scalar) {
	let mut key = [0u32; 8];
	for i in 0..8 {
		key[i] = u32::from_le_bytes(seed[i * 4..i * 4 + 4].try_into().unwrap());
	}

	let mut over_counter = (idx >> 32) as u32;
	loop {
		let block = chacha20_block(&key, idx, over_counter);

		// The two 256-bit outputs are words[0..8] and words[8..16], each
		// serialized little-endian in ascending word order.
		let s1 = words_le(&block[0..8]);
		let s2 = words_le(&block[8..16]);

		if let (Ok(a), Ok(b)) = (Scalar::from_bytes(&s1), Scalar::from_bytes(&s2)) {
			return (a, b);
		}
		over_counter = over_counter.wrapping_add(1);
	}
}

fn words_le(words: &[u32]) -> [u8; 32] {
	let mut out = [0u8; 32];
	for (i, w) in words.iter().enumerate() {
		out[i * 4..i * 4 + 4].copy_from_slice(&w.to_le_bytes());
	}
	out
}

/// `UpdateCommit(commit, L, R)`: normalizes `L`/`R`, folds their parity bits
/// and x-coordinates into a running SHA-256 transcript.
pub fn update_commit(commit: &[u8; 32], l: &crate::point::Point, r: &crate::point::Point) -> [u8; 32] {
	let parity: u8 = (if l.y_is_quadratic_residue() { 0 } else { 2 })
		| (if r.y_is_quadratic_residue() { 0 } else { 1 });

	let mut h = Sha256::new();
	h.update(commit);
	h.update(&[parity]);
	h.update(l.x_bytes());
	h.update(r.x_bytes());
	h.finalize().into()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn rfc6979_is_deterministic() {
		let seed = [0u8; 64];
		let mut a = Rfc6979HmacSha256::new(&seed);
		let mut b = Rfc6979HmacSha256::new(&seed);
		assert_eq!(a.generate(32), b.generate(32));
	}

	#[test]
	fn chacha20_is_deterministic() {
		let (a1, a2) = scalar_chacha20(&[0u8; 32], 0);
		let (b1, b2) = scalar_chacha20(&[0u8; 32], 0);
		assert_eq!(a1.to_bytes(), b1.to_bytes());
		assert_eq!(a2.to_bytes(), b2.to_bytes());
	}

	#[test]
	fn chacha20_block_zero_key_matches_reference_keystream_prefix() {
		// Key = 0, nonce/counter/over-counter = 0: the state is identical to
		// the well-known all-zero-input ChaCha20 block (RFC 8439 §2.3.2),
		// which this layout reduces to when the nonce half is unused. Check
		// the documented prefix/suffix nibbles of L and R (hex::encode(l)
		// starts "76b8e0ad" and ends "770dc7"; r starts "da41597c" and ends
		// "ee6586") without asserting bytes this crate cannot source a full
		// reference value for.
		let (l, r) = scalar_chacha20(&[0u8; 32], 0);
		let l_hex = mweb_util::hex::to_hex(&l.to_bytes());
		let r_hex = mweb_util::hex::to_hex(&r.to_bytes());
		assert!(l_hex.starts_with("76b8e0ad"), "l = {l_hex}");
		assert!(l_hex.ends_with("770dc7"), "l = {l_hex}");
		assert!(r_hex.starts_with("da41597c"), "r = {r_hex}");
		assert!(r_hex.ends_with("ee6586"), "r = {r_hex}");
	}

	#[test]
	fn rfc6979_known_answer_prefix_matches() {
		// Seed = Gx || Gy; the first two 32-byte DRBG outputs are documented
		// to start "edc883a9" and "d99994e5" respectively.
		const GX: [u8; 32] =
			[0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
			 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98];
		const GY: [u8; 32] =
			[0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
			 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8];
		let mut seed = [0u8; 64];
		seed[..32].copy_from_slice(&GX);
		seed[32..].copy_from_slice(&GY);

		let mut drbg = Rfc6979HmacSha256::new(&seed);
		let first = drbg.generate(32);
		let second = drbg.generate(32);
		let first_hex = mweb_util::hex::to_hex(&first);
		let second_hex = mweb_util::hex::to_hex(&second);
		assert!(first_hex.starts_with("edc883a9"), "first = {first_hex}");
		assert!(second_hex.starts_with("d99994e5"), "second = {second_hex}");
	}
}
