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

/// Errors raised while assembling a transaction (§7 `Build{...}`).
#[derive(Error, Debug)]
pub enum BuildError {
	#[error("selected inputs ({available}) do not cover amount + fee ({needed})")]
	InsufficientFunds { available: i64, needed: i64 },

	#[error("input coin has no spend key; wallet is view-only")]
	NoSpendKey,

	#[error("input coin is missing its blinding factor or output pubkey and cannot be spent")]
	IncompleteCoinData,

	#[error("output value {0} is out of the representable [0, 2^64) range")]
	ValueOutOfRange(i64),

	#[error(transparent)]
	Secp(#[from] mweb_secp::Error),
}

/// Errors raised while validating a transaction (§7 `Verify{...}`). Each
/// variant corresponds 1:1 to a validation step in §4.9; none of these
/// indicate corrupted shared state, only that this transaction is
/// rejected.
#[derive(Error, Debug)]
pub enum VerifyError {
	#[error("output range proof failed verification")]
	RangeProofInvalid(#[source] mweb_secp::Error),

	#[error("sender signature failed verification")]
	SenderSigInvalid,

	#[error("output signature failed verification")]
	OutputSigInvalid,

	#[error("kernel signature failed verification")]
	KernelSigInvalid,

	#[error("sum of output commitments does not balance against kernel excess and offset")]
	KernelSumMismatch,

	#[error("sum of stealth pubkeys does not balance against the stealth excess and offset")]
	StealthSumMismatch,

	#[error("transaction is structurally malformed: {0}")]
	MalformedProof(String),
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
pub type VerifyResult<T> = std::result::Result<T, VerifyError>;
