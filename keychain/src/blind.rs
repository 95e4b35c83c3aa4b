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

//! `BlindingFactor` and the `BlindSum` accumulator, grounded on grin's
//! `keychain::blind` module but built over `mweb_secp::Scalar` instead of a
//! vendored FFI secret key type.

use mweb_secp::pedersen::add_blinding_factors;
use mweb_secp::Scalar;

/// A blinding factor, a `Scalar` carried as `uint256` per §3.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlindingFactor(pub Scalar);

impl BlindingFactor {
	pub fn zero() -> BlindingFactor {
		BlindingFactor(Scalar::ZERO)
	}

	pub fn from_scalar(s: Scalar) -> BlindingFactor {
		BlindingFactor(s)
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	pub fn to_bytes(&self) -> [u8; 32] {
		self.0.to_bytes()
	}
}

/// Accumulates positive and negative blinding factors so a builder can fold
/// many inputs/outputs/offsets into a single excess scalar.
#[derive(Default)]
pub struct BlindSum {
	positive: Vec<Scalar>,
	negative: Vec<Scalar>,
}

impl BlindSum {
	pub fn new() -> BlindSum {
		BlindSum::default()
	}

	pub fn add_blinding_factor(mut self, b: BlindingFactor) -> BlindSum {
		self.positive.push(b.0);
		self
	}

	pub fn sub_blinding_factor(mut self, b: BlindingFactor) -> BlindSum {
		self.negative.push(b.0);
		self
	}

	pub fn sum(&self) -> BlindingFactor {
		BlindingFactor(add_blinding_factors(&self.positive, &self.negative))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn sum_cancels_matching_terms() {
		let r = BlindingFactor::from_scalar(Scalar::from_bytes(&[4u8; 32]).unwrap());
		let sum = BlindSum::new().add_blinding_factor(r).sub_blinding_factor(r).sum();
		assert!(sum.is_zero());
	}
}
