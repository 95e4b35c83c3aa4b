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

//! secp256k1 scalar arithmetic, i.e. integers mod the group order `n`.
//!
//! Wraps `k256::Scalar` rather than hand-rolling Montgomery reduction: the
//! teacher vendors its own field/scalar C code for exactly this, but
//! `k256` is the pure-Rust equivalent already relied on elsewhere in the
//! pack (see DESIGN.md), and `k256::Scalar::from_repr` already performs the
//! canonical-range check §3 requires ("values >= n are rejected").

use crate::error::{Error, Result};
use k256::elliptic_curve::group::ff::PrimeField;
use k256::elliptic_curve::ops::Reduce;
use k256::Scalar as InnerScalar;
use zeroize::Zeroize;

/// A 32-byte big-endian integer modulo the secp256k1 group order `n`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Scalar(pub(crate) InnerScalar);

impl Scalar {
	pub const ZERO: Scalar = Scalar(InnerScalar::ZERO);

	pub fn from_bytes(bytes: &[u8; 32]) -> Result<Scalar> {
		let repr = k256::FieldBytes::clone_from_slice(bytes);
		Option::<InnerScalar>::from(InnerScalar::from_repr(repr))
			.map(Scalar)
			.ok_or(Error::ScalarOutOfRange)
	}

	/// Reduce an arbitrary 32-byte string into `[0, n)`, used by transcript
	/// challenges (`commit mod n`) rather than strict parsing.
	pub fn reduce_from_bytes(bytes: &[u8; 32]) -> Scalar {
		let repr = k256::FieldBytes::clone_from_slice(bytes);
		Scalar(InnerScalar::reduce_bytes(&repr))
	}

	pub fn to_bytes(&self) -> [u8; 32] {
		self.0.to_bytes().into()
	}

	pub fn add(&self, other: &Scalar) -> Scalar {
		Scalar(self.0 + other.0)
	}

	pub fn sub(&self, other: &Scalar) -> Scalar {
		Scalar(self.0 - other.0)
	}

	pub fn mul(&self, other: &Scalar) -> Scalar {
		Scalar(self.0 * other.0)
	}

	pub fn neg(&self) -> Scalar {
		Scalar(self.0.negate())
	}

	pub fn square(&self) -> Scalar {
		Scalar(self.0.square())
	}

	pub fn invert(&self) -> Result<Scalar> {
		Option::<InnerScalar>::from(self.0.invert())
			.map(Scalar)
			.ok_or(Error::InversionFailed)
	}

	pub fn is_zero(&self) -> bool {
		bool::from(k256::elliptic_curve::group::ff::Field::is_zero(&self.0))
	}

	pub(crate) fn inner(&self) -> &InnerScalar {
		&self.0
	}
}

impl std::fmt::Debug for Scalar {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Scalar({})", mweb_util::hex::to_hex(&self.to_bytes()))
	}
}

impl Default for Scalar {
	fn default() -> Scalar {
		Scalar::ZERO
	}
}

impl Zeroize for Scalar {
	fn zeroize(&mut self) {
		self.0 = InnerScalar::ZERO;
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn add_sub_roundtrip() {
		let a = Scalar::from_bytes(&[1u8; 32]).unwrap_or(Scalar::ZERO);
		let b = Scalar::from_bytes(&[2u8; 32]).unwrap_or(Scalar::ZERO);
		let sum = a.add(&b);
		assert_eq!(sum.sub(&b).to_bytes(), a.to_bytes());
	}

	#[test]
	fn invert_of_zero_fails() {
		assert!(Scalar::ZERO.invert().is_err());
	}
}
