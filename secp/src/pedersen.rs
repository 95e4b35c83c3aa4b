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

//! Pedersen commitments and the blinding-factor algebra used to balance
//! transactions (§4.4).

use crate::generators::{h, j};
use crate::hash::{tag, tagged_hash};
use crate::point::Point;
use crate::scalar::Scalar;

/// `Commit(v, r) = v*H + r*G`.
pub fn commit(value: u64, blind: &Scalar) -> Point {
	let v = Scalar::reduce_from_bytes(&{
		let mut b = [0u8; 32];
		b[24..32].copy_from_slice(&value.to_be_bytes());
		b
	});
	h().mul(&v).add(&Point::generator().mul(blind))
}

/// Deterministic re-randomization of a blinding factor, binding it to a
/// specific value so that outputs of different amounts can still be
/// balanced. `r' = r + H_blake3(commit(v,r) || (v*J + r*G))`.
pub fn blind_switch(blind: &Scalar, value: u64) -> Scalar {
	let c = commit(value, blind);

	let v = Scalar::reduce_from_bytes(&{
		let mut b = [0u8; 32];
		b[24..32].copy_from_slice(&value.to_be_bytes());
		b
	});
	let switch_point = j().mul(&v).add(&Point::generator().mul(blind));

	let digest = tagged_hash(
		tag::BLIND,
		&[&c.to_compressed(), &switch_point.to_compressed()],
	);
	let tweak = Scalar::reduce_from_bytes(&digest);
	blind.add(&tweak)
}

/// `AddBlindingFactors(pos, neg) = sum(pos) - sum(neg) mod n`.
pub fn add_blinding_factors(pos: &[Scalar], neg: &[Scalar]) -> Scalar {
	let mut sum = Scalar::ZERO;
	for p in pos {
		sum = sum.add(p);
	}
	for n in neg {
		sum = sum.sub(n);
	}
	sum
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn commit_is_additively_homomorphic() {
		let r1 = Scalar::from_bytes(&[1u8; 32]).unwrap();
		let r2 = Scalar::from_bytes(&[2u8; 32]).unwrap();
		let c1 = commit(10, &r1);
		let c2 = commit(20, &r2);
		let combined = c1.add(&c2);
		let direct = commit(30, &r1.add(&r2));
		assert_eq!(combined, direct);
	}

	#[test]
	fn blind_switch_is_deterministic() {
		let r = Scalar::from_bytes(&[7u8; 32]).unwrap();
		assert_eq!(
			blind_switch(&r, 42).to_bytes(),
			blind_switch(&r, 42).to_bytes()
		);
	}
}
