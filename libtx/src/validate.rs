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

//! Transaction validation (§4.9): range proofs, per-output and per-input
//! signatures, and the kernel/stealth sum balance checks.

use mweb_core::{Committed, Transaction};
use mweb_secp::{bulletproof, schnorr, Point};

use crate::error::{VerifyError, VerifyResult};

fn output_sig_message(commitment: &Point, receiver_pubkey: &Point, extra_data: &[u8]) -> [u8; 32] {
	mweb_secp::hash::tagged_hash(
		mweb_secp::hash::tag::NONCE,
		&[&commitment.to_compressed(), &receiver_pubkey.to_compressed(), extra_data],
	)
}

fn input_sig_message(output_id: &[u8; 32], commitment: &Point, extra_data: &[u8]) -> [u8; 32] {
	mweb_secp::hash::tagged_hash(
		mweb_secp::hash::tag::NONCE,
		&[output_id, &commitment.to_compressed(), extra_data],
	)
}

fn kernel_sig_message(features_bits: u8, fee: i64, extra_data: &[u8]) -> [u8; 32] {
	mweb_secp::hash::tagged_hash(
		mweb_secp::hash::tag::NONCE,
		&[&[features_bits], &fee.to_be_bytes(), extra_data],
	)
}

/// Validate every output's range proof and sender/output signature.
fn validate_outputs(tx: &Transaction) -> VerifyResult<()> {
	for output in &tx.body.outputs {
		bulletproof::verify(&output.range_proof, &output.commitment, &[])
			.map_err(VerifyError::RangeProofInvalid)?;

		let message = output
			.message
			.as_ref()
			.ok_or_else(|| VerifyError::MalformedProof("standard output missing message".into()))?;

		let msg = output_sig_message(&output.commitment, &output.receiver_pubkey, &message.extra_data);
		schnorr::verify(&output.signature, &output.sender_pubkey, &msg)
			.map_err(|_| VerifyError::OutputSigInvalid)?;
	}
	Ok(())
}

/// Validate every input's spend signature.
fn validate_inputs(tx: &Transaction) -> VerifyResult<()> {
	for input in &tx.body.inputs {
		let input_pubkey = input
			.input_pubkey
			.as_ref()
			.ok_or_else(|| VerifyError::MalformedProof("stealth input missing input_pubkey".into()))?;
		let msg = input_sig_message(&input.output_id, &input.commitment, &input.extra_data);
		schnorr::verify(&input.signature, input_pubkey, &msg)
			.map_err(|_| VerifyError::SenderSigInvalid)?;
	}
	Ok(())
}

/// Validate every kernel's excess signature.
fn validate_kernels(tx: &Transaction) -> VerifyResult<()> {
	for kernel in &tx.body.kernels {
		let msg = kernel_sig_message(
			kernel.features.bits(),
			kernel.fee.unwrap_or(0),
			&kernel.extra_data,
		);
		schnorr::verify(&kernel.signature, &kernel.excess, &msg)
			.map_err(|_| VerifyError::KernelSigInvalid)?;
	}
	Ok(())
}

/// §4.9 stealth sum, implemented as an input-authorization balance: `Σ
/// input_pubkey == Σ stealth_excess + stealth_offset·G`. See
/// `mweb_libtx::build` for why this implementation doesn't fold output
/// stealth pubkeys into the same equation — a sender never learns the
/// discrete log of a receiver-chosen output stealth pubkey, so it can't be
/// balanced against a single provable excess the way the kernel excess is.
fn validate_stealth_sum(tx: &Transaction) -> VerifyResult<()> {
	let g = Point::generator();
	let mut lhs = Point::identity();
	for input in &tx.body.inputs {
		if let Some(p) = &input.input_pubkey {
			lhs = lhs.add(p);
		}
	}

	let mut rhs = g.mul(&tx.stealth_offset);
	for kernel in &tx.body.kernels {
		if let Some(se) = kernel.stealth_excess {
			rhs = rhs.add(&se);
		}
	}

	if lhs == rhs {
		Ok(())
	} else {
		Err(VerifyError::StealthSumMismatch)
	}
}

/// Run every check in §4.9 against `tx`.
pub fn validate_transaction(tx: &Transaction) -> VerifyResult<()> {
	validate_outputs(tx)?;
	validate_inputs(tx)?;
	validate_kernels(tx)?;
	tx.verify_kernel_sum().map_err(|_| VerifyError::KernelSumMismatch)?;
	validate_stealth_sum(tx)?;
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::build::{build_transaction, AvailableCoin, BuildConfig, BuildRequest, OutputRequest};
	use mweb_keychain::coin::Coin;
	use mweb_keychain::stealth::{spend_key_for_index, stealth_address_for_index};
	use mweb_secp::Scalar;

	fn scalar(b: u8) -> Scalar {
		Scalar::from_bytes(&[b; 32]).unwrap()
	}

	fn sample_tx() -> Transaction {
		let scan_key = scalar(1);
		let spend_master = scalar(2);
		let recipient = stealth_address_for_index(&spend_master, &scan_key, 0);
		let change_address = stealth_address_for_index(&spend_master, &scan_key, 4);
		let spend_key = spend_key_for_index(&spend_master, &scan_key, 3);

		let coin = Coin {
			address_index: 3,
			blind: Some(scalar(5)),
			amount: 10_000,
			output_id: [7u8; 32],
			address: None,
			shared_secret: None,
			spend_key: Some(spend_key),
			sender_key: None,
			output_pubkey: Some(Point::generator().mul(&scalar(9))),
		};

		let request = BuildRequest {
			available_coins: vec![AvailableCoin { coin, sig_nonce: scalar(10) }],
			recipients: vec![OutputRequest {
				address: recipient,
				amount: 6_000,
				nonce: [1u8; 16],
				blind: scalar(6),
				private_nonce: [2u8; 32],
				proof_message: [0u8; 20],
				sig_nonce: scalar(11),
			}],
			pegouts: vec![],
			pegin: None,
			fee: 500,
			change_address,
			change_nonce: [3u8; 16],
			change_blind: scalar(7),
			change_private_nonce: [4u8; 32],
			change_proof_message: [0u8; 20],
			change_sig_nonce: scalar(12),
			kernel_offset: scalar(8),
			stealth_offset: Scalar::ZERO,
			kernel_sig_nonce: scalar(13),
			extra_data: vec![],
			config: BuildConfig::default(),
		};

		build_transaction(&request).expect("build should succeed")
	}

	#[test]
	fn well_formed_transaction_validates() {
		validate_transaction(&sample_tx()).expect("built transaction should validate");
	}

	#[test]
	fn tampered_kernel_signature_is_rejected() {
		let mut tx = sample_tx();
		tx.body.kernels[0].signature = mweb_secp::schnorr::Signature::from_bytes(&[0u8; 64]);
		let err = validate_transaction(&tx).unwrap_err();
		assert!(matches!(err, VerifyError::KernelSigInvalid));
	}

	#[test]
	fn tampered_kernel_offset_breaks_kernel_sum() {
		// `kernel_offset` isn't covered by any of the output/input/kernel
		// signatures, so perturbing it exercises `verify_kernel_sum` alone.
		let mut tx = sample_tx();
		tx.kernel_offset = tx.kernel_offset.add(&scalar(1));
		let err = validate_transaction(&tx).unwrap_err();
		assert!(matches!(err, VerifyError::KernelSumMismatch));
	}

	#[test]
	fn tampered_stealth_offset_breaks_stealth_sum() {
		let mut tx = sample_tx();
		tx.stealth_offset = tx.stealth_offset.add(&scalar(1));
		let err = validate_transaction(&tx).unwrap_err();
		assert!(matches!(err, VerifyError::StealthSumMismatch));
	}
}
