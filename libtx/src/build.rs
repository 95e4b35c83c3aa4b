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

//! Transaction builder (§4.8): selects input coins, crafts outputs and a
//! balancing kernel, and signs the result.
//!
//! Grounded on the teacher's `libtx::build` combinator module, but
//! expressed as a single linear pipeline rather than a chain of `Append`
//! closures: the spec's build procedure is a short, fixed sequence of
//! steps rather than an open-ended combinator algebra, so the extra
//! indirection the teacher needs (arbitrary user-supplied combinators)
//! isn't pulling its weight here.
//!
//! Every scalar that isn't algebraically derived from the others (output
//! blinds, nonces, one per signature produced) is supplied by the caller:
//! per §9 the core never draws its own randomness.

use mweb_core::{
	Input, InputFeatures, Kernel, KernelFeatures, Output, OutputFeatures, OutputMessage, Pegout,
	Transaction, TxBody,
};
use mweb_keychain::blind::{BlindSum, BlindingFactor};
use mweb_keychain::coin::{Coin, CHANGE_INDEX};
use mweb_keychain::stealth::{build_output, BuiltOutput};
use mweb_keychain::StealthAddress;
use mweb_secp::{generators, pedersen, schnorr, Point, Scalar};

use crate::error::{BuildError, BuildResult};

/// A requested payment, with every non-deterministic input the builder
/// needs supplied by the caller.
pub struct OutputRequest {
	pub address: StealthAddress,
	pub amount: u64,
	pub nonce: [u8; 16],
	pub blind: Scalar,
	pub private_nonce: [u8; 32],
	pub proof_message: [u8; 20],
	/// Nonce for this output's own sender signature (§4.6).
	pub sig_nonce: Scalar,
}

pub struct PegoutRequest {
	pub amount: i64,
	pub script_pub_key: Vec<u8>,
}

/// One spendable coin together with the nonce that will be used to sign
/// the input it produces, if selected. Carrying the nonce alongside the
/// coin (rather than as a parallel vector) keeps the two aligned
/// regardless of the ascending-amount sort `select_inputs` performs.
pub struct AvailableCoin {
	pub coin: Coin,
	pub sig_nonce: Scalar,
}

/// Builder-wide policy, analogous to the teacher's `Context` build-state:
/// knobs that don't belong on every individual request.
pub struct BuildConfig {
	/// Leftover below this amount is folded into the fee instead of
	/// spawning a change output nobody will bother sweeping.
	pub dust_limit: u64,
}

impl Default for BuildConfig {
	fn default() -> BuildConfig {
		BuildConfig { dust_limit: 1_000 }
	}
}

/// Everything needed to assemble one `Transaction` (§4.8).
pub struct BuildRequest {
	/// The wallet's spendable coins; the builder selects a prefix of
	/// these sorted ascending by amount (§4.8 input-coin selection).
	pub available_coins: Vec<AvailableCoin>,
	pub recipients: Vec<OutputRequest>,
	pub pegouts: Vec<PegoutRequest>,
	pub pegin: Option<i64>,
	pub fee: i64,
	/// Where leftover value is sent if the selected coins overshoot the
	/// required amount by more than `config.dust_limit`.
	pub change_address: StealthAddress,
	pub change_nonce: [u8; 16],
	pub change_blind: Scalar,
	pub change_private_nonce: [u8; 32],
	pub change_proof_message: [u8; 20],
	pub change_sig_nonce: Scalar,
	pub kernel_offset: Scalar,
	pub stealth_offset: Scalar,
	pub kernel_sig_nonce: Scalar,
	pub extra_data: Vec<u8>,
	pub config: BuildConfig,
}

/// Sort spendable coins ascending by amount and take the smallest prefix
/// covering `amount_needed` (§4.8). Returns the selected coins (paired
/// with their signing nonces) and the leftover above `amount_needed`.
pub fn select_inputs(
	available: &[AvailableCoin],
	amount_needed: i64,
) -> BuildResult<(Vec<&AvailableCoin>, i64)> {
	let mut candidates: Vec<&AvailableCoin> =
		available.iter().filter(|a| is_input_ready(&a.coin)).collect();
	candidates.sort_by_key(|a| a.coin.amount);

	let mut sum = 0i64;
	let mut chosen = Vec::new();
	for a in candidates {
		if sum >= amount_needed {
			break;
		}
		sum += a.coin.amount;
		chosen.push(a);
	}

	if sum < amount_needed {
		return Err(BuildError::InsufficientFunds {
			available: sum,
			needed: amount_needed,
		});
	}
	Ok((chosen, sum - amount_needed))
}

/// A coin is usable as a builder input only if both its spend key and its
/// original blinding factor are known; see DESIGN.md for why `blind`
/// isn't always recoverable from a bare rewind.
fn is_input_ready(c: &Coin) -> bool {
	c.is_spendable() && c.blind.is_some() && c.output_pubkey.is_some()
}

fn output_sig_message(commitment: &Point, receiver_pubkey: &Point, extra_data: &[u8]) -> [u8; 32] {
	mweb_secp::hash::tagged_hash(
		mweb_secp::hash::tag::NONCE,
		&[&commitment.to_compressed(), &receiver_pubkey.to_compressed(), extra_data],
	)
}

fn make_output_from_built(built: BuiltOutput, sig_nonce: &Scalar, extra_data: Vec<u8>) -> Output {
	let msg = output_sig_message(&built.commitment, &built.receiver_pubkey, &extra_data);
	let signature = schnorr::sign(&built.ephemeral_key, &built.sender_pubkey, sig_nonce, &msg);
	Output {
		features: OutputFeatures::STANDARD_FIELDS,
		commitment: built.commitment,
		sender_pubkey: built.sender_pubkey,
		receiver_pubkey: built.receiver_pubkey,
		message: Some(OutputMessage {
			key_exchange_pubkey: built.sender_pubkey,
			view_tag: built.view_tag,
			masked_value: built.masked_value,
			masked_nonce: built.masked_nonce,
			extra_data,
		}),
		range_proof: built.range_proof.to_vec(),
		signature,
	}
}

fn input_sig_message(output_id: &[u8; 32], commitment: &Point, extra_data: &[u8]) -> [u8; 32] {
	mweb_secp::hash::tagged_hash(
		mweb_secp::hash::tag::NONCE,
		&[output_id, &commitment.to_compressed(), extra_data],
	)
}

fn build_input(entry: &AvailableCoin, extra_data: Vec<u8>) -> BuildResult<Input> {
	let coin = &entry.coin;
	let spend_key = coin.spend_key.ok_or(BuildError::NoSpendKey)?;
	let blind = coin.blind.ok_or(BuildError::IncompleteCoinData)?;
	let output_pubkey = coin.output_pubkey.ok_or(BuildError::IncompleteCoinData)?;

	let input_pubkey = Point::generator().mul(&spend_key);
	let commitment = pedersen::commit(coin.amount as u64, &blind);
	let msg = input_sig_message(&coin.output_id, &commitment, &extra_data);
	let signature = schnorr::sign(&spend_key, &input_pubkey, &entry.sig_nonce, &msg);

	Ok(Input {
		features: InputFeatures::STEALTH_KEY_FEATURE,
		output_id: coin.output_id,
		commitment,
		input_pubkey: Some(input_pubkey),
		output_pubkey,
		extra_data,
		signature,
	})
}

/// `v*H` for a possibly-negative signed amount; mirrors the helper in
/// `mweb_core::transaction` so the builder's excess matches what
/// `Committed::verify_kernel_sum` will recompute.
fn value_point(h: &Point, v: i64) -> Point {
	let mut be = [0u8; 32];
	be[24..32].copy_from_slice(&v.unsigned_abs().to_be_bytes());
	let scalar = Scalar::reduce_from_bytes(&be);
	let p = h.mul(&scalar);
	if v < 0 {
		p.negate()
	} else {
		p
	}
}

/// Assemble a balanced `Transaction` per §4.8.
pub fn build_transaction(request: &BuildRequest) -> BuildResult<Transaction> {
	let recipients_total: i64 = request.recipients.iter().map(|r| r.amount as i64).sum();
	let pegouts_total: i64 = request.pegouts.iter().map(|p| p.amount).sum();
	let pegin = request.pegin.unwrap_or(0);
	let amount_needed = (recipients_total + pegouts_total + request.fee - pegin).max(0);

	let (chosen_inputs, leftover) = select_inputs(&request.available_coins, amount_needed)?;

	// Dust below the configured limit is swept into the fee rather than
	// spawning a change output too small to be worth spending later.
	let (leftover, fee) = if leftover > 0 && (leftover as u64) <= request.config.dust_limit {
		(0, request.fee + leftover)
	} else {
		(leftover, request.fee)
	};

	let mut outputs = Vec::new();
	let mut output_blind_sum = BlindSum::new();

	for r in &request.recipients {
		let built = build_output(
			&r.address,
			r.amount,
			r.nonce,
			r.blind,
			r.private_nonce,
			r.proof_message,
			&request.extra_data,
		)?;
		output_blind_sum =
			output_blind_sum.add_blinding_factor(BlindingFactor::from_scalar(built.blind));
		outputs.push(make_output_from_built(built, &r.sig_nonce, request.extra_data.clone()));
	}

	if leftover > 0 {
		let built = build_output(
			&request.change_address,
			leftover as u64,
			request.change_nonce,
			request.change_blind,
			request.change_private_nonce,
			request.change_proof_message,
			&request.extra_data,
		)?;
		output_blind_sum =
			output_blind_sum.add_blinding_factor(BlindingFactor::from_scalar(built.blind));
		outputs.push(make_output_from_built(
			built,
			&request.change_sig_nonce,
			request.extra_data.clone(),
		));
		log::debug!("added change output of {leftover} satoshi to address index {CHANGE_INDEX}");
	}

	let mut input_blind_sum = BlindSum::new();
	let mut inputs = Vec::new();
	let mut stealth_excess_priv = Scalar::ZERO;
	for entry in &chosen_inputs {
		input_blind_sum = input_blind_sum.add_blinding_factor(BlindingFactor::from_scalar(
			entry.coin.blind.expect("checked by select_inputs"),
		));
		stealth_excess_priv = stealth_excess_priv
			.add(&entry.coin.spend_key.expect("checked by select_inputs"));
		inputs.push(build_input(entry, request.extra_data.clone())?);
	}

	// Kernel excess as a point, computed directly from the commitments
	// actually placed in the body so it matches `Committed::verify_kernel_sum`
	// bit-for-bit regardless of how the private-side blind sum was folded.
	let g = Point::generator();
	let h = generators::h();
	let outputs_sum = outputs
		.iter()
		.fold(Point::identity(), |acc, o| acc.add(&o.commitment));
	let inputs_sum = inputs
		.iter()
		.fold(Point::identity(), |acc, i| acc.add(&i.commitment));
	let lhs = outputs_sum.add(&inputs_sum.negate());

	let mut excess_point = lhs.add(&g.mul(&request.kernel_offset).negate());
	excess_point = excess_point.add(&value_point(&h, fee));
	if pegin != 0 {
		excess_point = excess_point.add(&value_point(&h, -pegin));
	}
	for p in &request.pegouts {
		excess_point = excess_point.add(&value_point(&h, p.amount));
	}

	let excess_blind = output_blind_sum
		.sub_blinding_factor(input_blind_sum.sum())
		.sub_blinding_factor(BlindingFactor::from_scalar(request.kernel_offset))
		.sum();

	let mut features = KernelFeatures::FEE_FEATURE_BIT | KernelFeatures::STEALTH_EXCESS_FEATURE_BIT;
	if request.pegin.is_some() {
		features |= KernelFeatures::PEGIN_FEATURE_BIT;
	}
	if !request.pegouts.is_empty() {
		features |= KernelFeatures::PEGOUT_FEATURE_BIT;
	}
	if !request.extra_data.is_empty() {
		features |= KernelFeatures::EXTRA_DATA_FEATURE_BIT;
	}

	let kernel_msg = mweb_secp::hash::tagged_hash(
		mweb_secp::hash::tag::NONCE,
		&[
			&[features.bits()],
			&fee.to_be_bytes(),
			&request.extra_data,
		],
	);
	let kernel_signature = schnorr::sign(
		&excess_blind.0,
		&excess_point,
		&request.kernel_sig_nonce,
		&kernel_msg,
	);

	// Stealth excess: a public point checked algebraically against the
	// input/output stealth pubkeys and `stealth_offset` (§4.9). Its
	// correctness doesn't need a signature of its own: every consumed
	// input already carries a signature proving knowledge of that input's
	// spend key, which is exactly the knowledge `stealth_excess_priv`
	// below is built from. See DESIGN.md for why this implementation
	// treats the stealth sum as an input-authorization check rather than
	// a full input/output balance — a sender never learns the discrete
	// log of a receiver-chosen output stealth pubkey, so it can't fold
	// that side into a provable excess the way it does for values.
	let stealth_excess_scalar = stealth_excess_priv.sub(&request.stealth_offset);
	let stealth_excess_point = g.mul(&stealth_excess_scalar);

	let kernel = Kernel {
		features,
		fee: Some(fee),
		pegin: request.pegin,
		pegouts: request
			.pegouts
			.iter()
			.map(|p| Pegout {
				amount: p.amount,
				script_pub_key: p.script_pub_key.clone(),
			})
			.collect(),
		lock_height: None,
		stealth_excess: Some(stealth_excess_point),
		extra_data: request.extra_data.clone(),
		excess: excess_point,
		signature: kernel_signature,
	};

	Ok(Transaction {
		kernel_offset: request.kernel_offset,
		stealth_offset: request.stealth_offset,
		body: TxBody {
			inputs,
			outputs,
			kernels: vec![kernel],
		},
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::validate::validate_transaction;
	use mweb_keychain::stealth::{spend_key_for_index, stealth_address_for_index};

	fn scalar(b: u8) -> Scalar {
		Scalar::from_bytes(&[b; 32]).unwrap()
	}

	/// A coin the test wallet can spend: known spend key, amount and
	/// blinding factor, as if already recovered by a prior rewind plus
	/// bulletproof rewind for `blind`.
	fn synthetic_coin(spend_master: &Scalar, scan_key: &Scalar, index: u32, amount: i64, blind: Scalar) -> Coin {
		let spend_key = spend_key_for_index(spend_master, scan_key, index);
		Coin {
			address_index: index,
			blind: Some(blind),
			amount,
			output_id: [7u8; 32],
			address: None,
			shared_secret: None,
			spend_key: Some(spend_key),
			sender_key: None,
			output_pubkey: Some(Point::generator().mul(&scalar(9))),
		}
	}

	#[test]
	fn build_then_validate_round_trip() {
		let scan_key = scalar(1);
		let spend_master = scalar(2);
		let recipient = stealth_address_for_index(&spend_master, &scan_key, 0);
		let change_address = stealth_address_for_index(&spend_master, &scan_key, 4);

		let coin = synthetic_coin(&spend_master, &scan_key, 3, 10_000, scalar(5));
		let available = vec![AvailableCoin {
			coin,
			sig_nonce: scalar(10),
		}];

		let request = BuildRequest {
			available_coins: available,
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

		let tx = build_transaction(&request).expect("build should succeed");
		assert_eq!(tx.body.inputs.len(), 1);
		// 10_000 input - 6_000 recipient - 500 fee = 3_500 change.
		assert_eq!(tx.body.outputs.len(), 2);

		validate_transaction(&tx).expect("built transaction should validate");
	}

	#[test]
	fn dust_leftover_is_folded_into_fee_not_a_change_output() {
		let scan_key = scalar(1);
		let spend_master = scalar(2);
		let recipient = stealth_address_for_index(&spend_master, &scan_key, 0);
		let change_address = stealth_address_for_index(&spend_master, &scan_key, 4);

		// 10_000 input - 9_600 recipient - 300 fee = 100 leftover, below dust_limit.
		let coin = synthetic_coin(&spend_master, &scan_key, 3, 10_000, scalar(5));
		let available = vec![AvailableCoin {
			coin,
			sig_nonce: scalar(10),
		}];

		let request = BuildRequest {
			available_coins: available,
			recipients: vec![OutputRequest {
				address: recipient,
				amount: 9_600,
				nonce: [1u8; 16],
				blind: scalar(6),
				private_nonce: [2u8; 32],
				proof_message: [0u8; 20],
				sig_nonce: scalar(11),
			}],
			pegouts: vec![],
			pegin: None,
			fee: 300,
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
			config: BuildConfig { dust_limit: 1_000 },
		};

		let tx = build_transaction(&request).expect("build should succeed");
		assert_eq!(tx.body.outputs.len(), 1, "dust leftover must not spawn a change output");
		assert_eq!(tx.body.kernels[0].fee, Some(400));
		validate_transaction(&tx).expect("built transaction should validate");
	}

	#[test]
	fn select_inputs_takes_ascending_prefix() {
		let scan_key = scalar(1);
		let spend_master = scalar(2);
		let big = synthetic_coin(&spend_master, &scan_key, 1, 5_000, scalar(5));
		let small = synthetic_coin(&spend_master, &scan_key, 2, 1_000, scalar(6));
		let available = vec![
			AvailableCoin { coin: big, sig_nonce: scalar(10) },
			AvailableCoin { coin: small, sig_nonce: scalar(11) },
		];

		let (chosen, leftover) = select_inputs(&available, 1_000).expect("should find enough funds");
		assert_eq!(chosen.len(), 1);
		assert_eq!(chosen[0].coin.amount, 1_000);
		assert_eq!(leftover, 0);
	}

	#[test]
	fn select_inputs_reports_insufficient_funds() {
		let scan_key = scalar(1);
		let spend_master = scalar(2);
		let coin = synthetic_coin(&spend_master, &scan_key, 1, 500, scalar(5));
		let available = vec![AvailableCoin { coin, sig_nonce: scalar(10) }];

		let err = select_inputs(&available, 1_000).unwrap_err();
		match err {
			BuildError::InsufficientFunds { available, needed } => {
				assert_eq!(available, 500);
				assert_eq!(needed, 1_000);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn coin_without_blind_is_not_selectable() {
		let scan_key = scalar(1);
		let spend_master = scalar(2);
		let mut coin = synthetic_coin(&spend_master, &scan_key, 1, 5_000, scalar(5));
		coin.blind = None;
		let available = vec![AvailableCoin { coin, sig_nonce: scalar(10) }];

		let err = select_inputs(&available, 1_000).unwrap_err();
		assert!(matches!(err, BuildError::InsufficientFunds { available: 0, .. }));
	}
}
