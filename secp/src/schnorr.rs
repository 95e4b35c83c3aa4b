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

//! BIP-340 Schnorr signatures over secp256k1, used for kernel excess
//! signatures, stealth-excess signatures, and per-output sender/output
//! signatures (§4.6, §4.8).

use crate::error::{Error, Result};
use crate::point::Point;
use crate::scalar::Scalar;
use sha2::{Digest, Sha256};

/// A 64-byte BIP-340 signature: `(R.x, s)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
	pub r_x: [u8; 32],
	pub s: [u8; 32],
}

impl Signature {
	pub fn to_bytes(&self) -> [u8; 64] {
		let mut out = [0u8; 64];
		out[..32].copy_from_slice(&self.r_x);
		out[32..].copy_from_slice(&self.s);
		out
	}

	pub fn from_bytes(bytes: &[u8; 64]) -> Signature {
		let mut r_x = [0u8; 32];
		let mut s = [0u8; 32];
		r_x.copy_from_slice(&bytes[..32]);
		s.copy_from_slice(&bytes[32..]);
		Signature { r_x, s }
	}
}

fn bip340_challenge(r_x: &[u8; 32], pubkey_x: &[u8; 32], msg: &[u8; 32]) -> Scalar {
	// BIP-340 uses a tagged SHA-256 ("BIP0340/challenge"); the reference
	// secp256k1-zkp fork does the same for kernel/stealth excess signatures.
	let tag_hash = Sha256::digest(b"BIP0340/challenge");
	let mut h = Sha256::new();
	h.update(&tag_hash);
	h.update(&tag_hash);
	h.update(r_x);
	h.update(pubkey_x);
	h.update(msg);
	let digest: [u8; 32] = h.finalize().into();
	Scalar::reduce_from_bytes(&digest)
}

/// Sign `msg` (already a 32-byte hash per §4.8) with private key `key`,
/// committing to public key `pubkey = key*G`.
pub fn sign(key: &Scalar, pubkey: &Point, nonce: &Scalar, msg: &[u8; 32]) -> Signature {
	let r_point = Point::generator().mul(nonce);
	// BIP-340 requires R.y to be even; negate the nonce (and thus R) if not.
	let (r_point, nonce) = if r_point.y_is_odd() {
		(r_point.negate(), nonce.neg())
	} else {
		(r_point, *nonce)
	};

	let e = bip340_challenge(&r_point.x_bytes(), &pubkey.x_bytes(), msg);

	// If the public key's y is odd, BIP-340 signs with the negated private
	// key so the verifier can always assume an even-y public key.
	let key = if pubkey.y_is_odd() { key.neg() } else { *key };

	let s = nonce.add(&e.mul(&key));
	Signature {
		r_x: r_point.x_bytes(),
		s: s.to_bytes(),
	}
}

/// Verify a BIP-340 signature against `pubkey` and message `msg`.
pub fn verify(sig: &Signature, pubkey: &Point, msg: &[u8; 32]) -> Result<()> {
	let e = bip340_challenge(&sig.r_x, &pubkey.x_bytes(), msg);
	let s = Scalar::from_bytes(&sig.s).map_err(|_| Error::InvalidSignature)?;

	// s*G == R + e*P, checked via x-coordinate-only R (even-y by convention).
	let lhs = Point::generator().mul(&s);
	let rhs = Point::from_compressed(&{
		let mut enc = [0u8; 33];
		enc[0] = 0x02;
		enc[1..].copy_from_slice(&sig.r_x);
		enc
	})
	.map_err(|_| Error::InvalidSignature)?
	.add(&pubkey_even(pubkey).mul(&e));

	if lhs == rhs {
		Ok(())
	} else {
		Err(Error::InvalidSignature)
	}
}

fn pubkey_even(pubkey: &Point) -> Point {
	if pubkey.y_is_odd() {
		pubkey.negate()
	} else {
		*pubkey
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn sign_then_verify() {
		let key = Scalar::from_bytes(&{
			let mut b = [0u8; 32];
			b[31] = 5;
			b
		})
		.unwrap();
		let pubkey = Point::generator().mul(&key);
		let nonce = Scalar::from_bytes(&{
			let mut b = [0u8; 32];
			b[31] = 9;
			b
		})
		.unwrap();
		let msg = [3u8; 32];

		let sig = sign(&key, &pubkey, &nonce, &msg);
		assert!(verify(&sig, &pubkey, &msg).is_ok());
	}
}
