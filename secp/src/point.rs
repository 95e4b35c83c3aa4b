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

//! secp256k1 point arithmetic: affine points, compressed encode/decode,
//! addition and scalar multiplication. Thin wrapper over `k256`'s
//! constant-time group implementation.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::Group;
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};

/// An affine secp256k1 point, serialized compressed (33 bytes) per §3.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Point(pub(crate) AffinePoint);

impl Point {
	pub fn generator() -> Point {
		Point(AffinePoint::GENERATOR)
	}

	pub fn identity() -> Point {
		Point(AffinePoint::IDENTITY)
	}

	pub fn from_compressed(bytes: &[u8; 33]) -> Result<Point> {
		let encoded =
			EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidEncoding)?;
		Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
			.map(Point)
			.ok_or(Error::NotOnCurve)
	}

	pub fn to_compressed(&self) -> [u8; 33] {
		let encoded = self.0.to_encoded_point(true);
		let mut out = [0u8; 33];
		out.copy_from_slice(encoded.as_bytes());
		out
	}

	pub fn add(&self, other: &Point) -> Point {
		let sum = ProjectivePoint::from(self.0) + ProjectivePoint::from(other.0);
		Point(sum.to_affine())
	}

	pub fn negate(&self) -> Point {
		Point(-self.0)
	}

	pub fn mul(&self, scalar: &Scalar) -> Point {
		let product = ProjectivePoint::from(self.0) * scalar.inner();
		Point(product.to_affine())
	}

	/// The x-coordinate, used by the transcript hash and as the serialized
	/// form of bulletproof points (§4.5.1: only the x-coordinate is written,
	/// alongside a bitvector of y-parity/quadratic-residue bits).
	pub fn x_bytes(&self) -> [u8; 32] {
		use k256::elliptic_curve::sec1::Coordinates;
		match self.0.to_encoded_point(false).coordinates() {
			Coordinates::Uncompressed { x, .. } => {
				let mut out = [0u8; 32];
				out.copy_from_slice(x.as_slice());
				out
			}
			_ => [0u8; 32],
		}
	}

	/// `y` is odd — the parity bit carried by the 0x02/0x03 compressed
	/// prefix.
	pub fn y_is_odd(&self) -> bool {
		use k256::elliptic_curve::sec1::Coordinates;
		match self.0.to_encoded_point(false).coordinates() {
			Coordinates::Uncompressed { y, .. } => y.as_slice().last().map_or(false, |b| b & 1 == 1),
			_ => false,
		}
	}

	/// Whether `y` is a quadratic residue modulo `p`, used by §4.5.1's
	/// serialization bit vector and §4.2's `UpdateCommit` parity byte.
	pub fn y_is_quadratic_residue(&self) -> bool {
		crate::field::FieldElement::from_bytes(&self.y_bytes())
			.map(|y| y.is_quadratic_residue())
			.unwrap_or(false)
	}

	pub fn y_bytes(&self) -> [u8; 32] {
		use k256::elliptic_curve::sec1::Coordinates;
		match self.0.to_encoded_point(false).coordinates() {
			Coordinates::Uncompressed { y, .. } => {
				let mut out = [0u8; 32];
				out.copy_from_slice(y.as_slice());
				out
			}
			_ => [0u8; 32],
		}
	}

	pub fn is_identity(&self) -> bool {
		bool::from(ProjectivePoint::from(self.0).is_identity())
	}
}

impl std::fmt::Debug for Point {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Point({})", mweb_util::hex::to_hex(&self.to_compressed()))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn compressed_roundtrip() {
		let g = Point::generator();
		let bytes = g.to_compressed();
		let back = Point::from_compressed(&bytes).unwrap();
		assert!(g == back);
	}
}
