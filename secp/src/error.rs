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

use thiserror::Error;

/// Errors raised by the secp256k1 arithmetic, hashing and bulletproof layer.
///
/// Mirrors the `Crypto{...}` family from the core error taxonomy; higher
/// layers (`mweb_core`, `mweb_libtx`) wrap this in their own error enums
/// the way `grin_libtx::Error` wraps `secp::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("point is not on the secp256k1 curve")]
	NotOnCurve,

	#[error("field element is not a quadratic residue")]
	NotQuadraticResidue,

	#[error("scalar is out of range (>= curve order n)")]
	ScalarOutOfRange,

	#[error("modular inversion failed (operand is zero)")]
	InversionFailed,

	#[error("point encoding is malformed or has an invalid length")]
	InvalidEncoding,

	#[error("bulletproof verification failed")]
	InvalidRangeProof,

	#[error("bulletproof has an unexpected serialized length: got {got}, want {want}")]
	BadProofLength { got: usize, want: usize },

	#[error("schnorr signature is invalid")]
	InvalidSignature,
}

pub type Result<T> = std::result::Result<T, Error>;
