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

//! The MWEB data model (§3): inputs, outputs, kernels, the transaction
//! body and the `Committed` trait used to check kernel and stealth sums.

use bitflags::bitflags;
use mweb_secp::bulletproof::PROOF_SIZE;
use mweb_secp::{Point, Scalar};

use crate::error::{Error, Result};
use crate::ser::{Readable, Reader, Writeable, Writer};

/// Caps the number of inputs/outputs/kernels a deserialized body may hold,
/// mirroring the teacher's `MAX_IN_OUT_LEN` guard against memory-exhaustion
/// attacks from a malicious peer.
pub const MAX_TX_BODY_ENTRIES: usize = 50_000;

bitflags! {
	/// Feature bits carried by an `Output`'s message (§3). Only
	/// `STANDARD_FIELDS` is defined by this layer; unknown bits outside
	/// this set are a hard parse error (§4.7).
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct OutputFeatures: u8 {
		const STANDARD_FIELDS = 0b0000_0001;
	}
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct InputFeatures: u8 {
		const STEALTH_KEY_FEATURE = 0b0000_0001;
	}
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct KernelFeatures: u8 {
		const FEE_FEATURE_BIT = 0b0000_0001;
		const PEGIN_FEATURE_BIT = 0b0000_0010;
		const PEGOUT_FEATURE_BIT = 0b0000_0100;
		const HEIGHT_LOCK_FEATURE_BIT = 0b0000_1000;
		const STEALTH_EXCESS_FEATURE_BIT = 0b0001_0000;
		const EXTRA_DATA_FEATURE_BIT = 0b0010_0000;
	}
}

fn read_point(reader: &mut Reader) -> Result<Point> {
	let bytes: [u8; 33] = reader.read_fixed_bytes()?;
	Point::from_compressed(&bytes).map_err(Error::BadPoint)
}

fn write_point(writer: &mut Writer, p: &Point) -> Result<()> {
	writer.write_bytes(&p.to_compressed())
}

fn read_scalar(reader: &mut Reader) -> Result<Scalar> {
	let bytes: [u8; 32] = reader.read_fixed_bytes()?;
	Scalar::from_bytes(&bytes).map_err(Error::BadPoint)
}

fn write_scalar(writer: &mut Writer, s: &Scalar) -> Result<()> {
	writer.write_bytes(&s.to_bytes())
}

fn read_extra_data(reader: &mut Reader) -> Result<Vec<u8>> {
	let len = reader.read_varint()? as usize;
	if len > MAX_TX_BODY_ENTRIES {
		return Err(Error::TruncatedStream);
	}
	reader.read_bytes(len)
}

fn write_extra_data(writer: &mut Writer, data: &[u8]) -> Result<()> {
	writer.write_varint(data.len() as u64)?;
	writer.write_bytes(data)
}

/// The optional fields carried by a standard output (§3 `OutputMessage`).
#[derive(Clone)]
pub struct OutputMessage {
	pub key_exchange_pubkey: Point,
	pub view_tag: u8,
	pub masked_value: u64,
	pub masked_nonce: [u8; 16],
	pub extra_data: Vec<u8>,
}

impl Writeable for OutputMessage {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		write_point(writer, &self.key_exchange_pubkey)?;
		writer.write_u8(self.view_tag)?;
		writer.write_u64(self.masked_value)?;
		writer.write_bytes(&self.masked_nonce)?;
		write_extra_data(writer, &self.extra_data)
	}
}

impl Readable for OutputMessage {
	fn read(reader: &mut Reader) -> Result<Self> {
		let key_exchange_pubkey = read_point(reader)?;
		let view_tag = reader.read_u8()?;
		let masked_value = reader.read_u64()?;
		let masked_nonce = reader.read_fixed_bytes()?;
		let extra_data = read_extra_data(reader)?;
		Ok(OutputMessage {
			key_exchange_pubkey,
			view_tag,
			masked_value,
			masked_nonce,
			extra_data,
		})
	}
}

/// An MWEB output (§3): a Pedersen commitment plus the data needed for the
/// receiver to recognize and spend it.
#[derive(Clone)]
pub struct Output {
	pub features: OutputFeatures,
	pub commitment: Point,
	pub sender_pubkey: Point,
	pub receiver_pubkey: Point,
	pub message: Option<OutputMessage>,
	pub range_proof: Vec<u8>,
	pub signature: mweb_secp::schnorr::Signature,
}

impl Writeable for Output {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		writer.write_u8(self.features.bits())?;
		write_point(writer, &self.commitment)?;
		write_point(writer, &self.sender_pubkey)?;
		write_point(writer, &self.receiver_pubkey)?;
		if self.features.contains(OutputFeatures::STANDARD_FIELDS) {
			self.message
				.as_ref()
				.expect("STANDARD_FIELDS implies message is present")
				.write(writer)?;
		}
		writer.write_varint(self.range_proof.len() as u64)?;
		writer.write_bytes(&self.range_proof)?;
		writer.write_bytes(&self.signature.to_bytes())
	}
}

impl Readable for Output {
	fn read(reader: &mut Reader) -> Result<Self> {
		let bits = reader.read_u8()?;
		let features =
			OutputFeatures::from_bits(bits).ok_or(Error::UnknownFeatureBits(bits))?;
		let commitment = read_point(reader)?;
		let sender_pubkey = read_point(reader)?;
		let receiver_pubkey = read_point(reader)?;
		let message = if features.contains(OutputFeatures::STANDARD_FIELDS) {
			Some(OutputMessage::read(reader)?)
		} else {
			None
		};
		let proof_len = reader.read_varint()? as usize;
		if proof_len > PROOF_SIZE {
			log::warn!("rejecting output with oversized range proof ({proof_len} bytes)");
			return Err(Error::OversizedProof {
				got: proof_len,
				max: PROOF_SIZE,
			});
		}
		let range_proof = reader.read_bytes(proof_len)?;
		let sig_bytes: [u8; 64] = reader.read_fixed_bytes()?;
		let signature = mweb_secp::schnorr::Signature::from_bytes(&sig_bytes);
		Ok(Output {
			features,
			commitment,
			sender_pubkey,
			receiver_pubkey,
			message,
			range_proof,
			signature,
		})
	}
}

/// An MWEB input (§3): spends a previous `Output` by its id.
#[derive(Clone)]
pub struct Input {
	pub features: InputFeatures,
	pub output_id: [u8; 32],
	pub commitment: Point,
	pub input_pubkey: Option<Point>,
	pub output_pubkey: Point,
	pub extra_data: Vec<u8>,
	pub signature: mweb_secp::schnorr::Signature,
}

impl Writeable for Input {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		writer.write_u8(self.features.bits())?;
		writer.write_bytes(&self.output_id)?;
		write_point(writer, &self.commitment)?;
		if self.features.contains(InputFeatures::STEALTH_KEY_FEATURE) {
			write_point(
				writer,
				self.input_pubkey
					.as_ref()
					.expect("STEALTH_KEY_FEATURE implies input_pubkey is present"),
			)?;
		}
		write_point(writer, &self.output_pubkey)?;
		write_extra_data(writer, &self.extra_data)?;
		writer.write_bytes(&self.signature.to_bytes())
	}
}

impl Readable for Input {
	fn read(reader: &mut Reader) -> Result<Self> {
		let bits = reader.read_u8()?;
		let features = InputFeatures::from_bits(bits).ok_or(Error::UnknownFeatureBits(bits))?;
		let output_id = reader.read_fixed_bytes()?;
		let commitment = read_point(reader)?;
		let input_pubkey = if features.contains(InputFeatures::STEALTH_KEY_FEATURE) {
			Some(read_point(reader)?)
		} else {
			None
		};
		let output_pubkey = read_point(reader)?;
		let extra_data = read_extra_data(reader)?;
		let sig_bytes: [u8; 64] = reader.read_fixed_bytes()?;
		let signature = mweb_secp::schnorr::Signature::from_bytes(&sig_bytes);
		Ok(Input {
			features,
			output_id,
			commitment,
			input_pubkey,
			output_pubkey,
			extra_data,
			signature,
		})
	}
}

/// A single pegout (§6): an amount paid to a Litecoin `scriptPubKey`.
#[derive(Clone)]
pub struct Pegout {
	pub amount: i64,
	pub script_pub_key: Vec<u8>,
}

impl Writeable for Pegout {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		writer.write_i64(self.amount)?;
		writer.write_varint(self.script_pub_key.len() as u64)?;
		writer.write_bytes(&self.script_pub_key)
	}
}

impl Readable for Pegout {
	fn read(reader: &mut Reader) -> Result<Self> {
		let amount = reader.read_i64()?;
		let len = reader.read_varint()? as usize;
		if len > MAX_TX_BODY_ENTRIES {
			return Err(Error::TruncatedStream);
		}
		let script_pub_key = reader.read_bytes(len)?;
		Ok(Pegout {
			amount,
			script_pub_key,
		})
	}
}

/// An MWEB kernel (§3): the balance proof for a transaction.
#[derive(Clone)]
pub struct Kernel {
	pub features: KernelFeatures,
	pub fee: Option<i64>,
	pub pegin: Option<i64>,
	pub pegouts: Vec<Pegout>,
	pub lock_height: Option<i64>,
	pub stealth_excess: Option<Point>,
	pub extra_data: Vec<u8>,
	pub excess: Point,
	pub signature: mweb_secp::schnorr::Signature,
}

impl Writeable for Kernel {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		writer.write_u8(self.features.bits())?;
		if self.features.contains(KernelFeatures::FEE_FEATURE_BIT) {
			writer.write_i64(self.fee.expect("FEE_FEATURE_BIT implies fee is present"))?;
		}
		if self.features.contains(KernelFeatures::PEGIN_FEATURE_BIT) {
			writer.write_i64(self.pegin.expect("PEGIN_FEATURE_BIT implies pegin is present"))?;
		}
		if self.features.contains(KernelFeatures::PEGOUT_FEATURE_BIT) {
			writer.write_vec(&self.pegouts)?;
		}
		if self.features.contains(KernelFeatures::HEIGHT_LOCK_FEATURE_BIT) {
			writer.write_i64(
				self.lock_height
					.expect("HEIGHT_LOCK_FEATURE_BIT implies lock_height is present"),
			)?;
		}
		if self
			.features
			.contains(KernelFeatures::STEALTH_EXCESS_FEATURE_BIT)
		{
			write_point(
				writer,
				self.stealth_excess
					.as_ref()
					.expect("STEALTH_EXCESS_FEATURE_BIT implies stealth_excess is present"),
			)?;
		}
		if self.features.contains(KernelFeatures::EXTRA_DATA_FEATURE_BIT) {
			write_extra_data(writer, &self.extra_data)?;
		}
		write_point(writer, &self.excess)?;
		writer.write_bytes(&self.signature.to_bytes())
	}
}

impl Readable for Kernel {
	fn read(reader: &mut Reader) -> Result<Self> {
		let bits = reader.read_u8()?;
		let features = KernelFeatures::from_bits(bits).ok_or(Error::UnknownFeatureBits(bits))?;
		let fee = features
			.contains(KernelFeatures::FEE_FEATURE_BIT)
			.then(|| reader.read_i64())
			.transpose()?;
		let pegin = features
			.contains(KernelFeatures::PEGIN_FEATURE_BIT)
			.then(|| reader.read_i64())
			.transpose()?;
		let pegouts = if features.contains(KernelFeatures::PEGOUT_FEATURE_BIT) {
			reader.read_vec(MAX_TX_BODY_ENTRIES)?
		} else {
			Vec::new()
		};
		let lock_height = features
			.contains(KernelFeatures::HEIGHT_LOCK_FEATURE_BIT)
			.then(|| reader.read_i64())
			.transpose()?;
		let stealth_excess = if features.contains(KernelFeatures::STEALTH_EXCESS_FEATURE_BIT) {
			Some(read_point(reader)?)
		} else {
			None
		};
		let extra_data = if features.contains(KernelFeatures::EXTRA_DATA_FEATURE_BIT) {
			read_extra_data(reader)?
		} else {
			Vec::new()
		};
		let excess = read_point(reader)?;
		let sig_bytes: [u8; 64] = reader.read_fixed_bytes()?;
		let signature = mweb_secp::schnorr::Signature::from_bytes(&sig_bytes);
		Ok(Kernel {
			features,
			fee,
			pegin,
			pegouts,
			lock_height,
			stealth_excess,
			extra_data,
			excess,
			signature,
		})
	}
}

/// The arrays of inputs, outputs and kernels carried by a `Transaction`
/// (§3 `TxBody`).
#[derive(Clone, Default)]
pub struct TxBody {
	pub inputs: Vec<Input>,
	pub outputs: Vec<Output>,
	pub kernels: Vec<Kernel>,
}

impl Writeable for TxBody {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		writer.write_vec(&self.inputs)?;
		writer.write_vec(&self.outputs)?;
		writer.write_vec(&self.kernels)
	}
}

impl Readable for TxBody {
	fn read(reader: &mut Reader) -> Result<Self> {
		Ok(TxBody {
			inputs: reader.read_vec(MAX_TX_BODY_ENTRIES)?,
			outputs: reader.read_vec(MAX_TX_BODY_ENTRIES)?,
			kernels: reader.read_vec(MAX_TX_BODY_ENTRIES)?,
		})
	}
}

/// An MWEB transaction (§3): offsets plus a body.
#[derive(Clone, Default)]
pub struct Transaction {
	pub kernel_offset: Scalar,
	pub stealth_offset: Scalar,
	pub body: TxBody,
}

impl Writeable for Transaction {
	fn write(&self, writer: &mut Writer) -> Result<()> {
		write_scalar(writer, &self.kernel_offset)?;
		write_scalar(writer, &self.stealth_offset)?;
		self.body.write(writer)
	}
}

impl Readable for Transaction {
	fn read(reader: &mut Reader) -> Result<Self> {
		let kernel_offset = read_scalar(reader)?;
		let stealth_offset = read_scalar(reader)?;
		let body = TxBody::read(reader)?;
		Ok(Transaction {
			kernel_offset,
			stealth_offset,
			body,
		})
	}
}

/// Errors from summing and verifying commitments via the `Committed`
/// trait (§4.9), grounded on the teacher's `core::committed` module.
#[derive(thiserror::Error, Debug)]
pub enum CommittedError {
	#[error(transparent)]
	Secp(#[from] mweb_secp::Error),

	#[error("sum of output commitments minus input commitments does not equal the kernel excess")]
	KernelSumMismatch,

	#[error("sum of output stealth pubkeys minus input stealth pubkeys does not equal the stealth excess")]
	StealthSumMismatch,
}

/// Implemented by types (here, `TxBody`/`Transaction`) that hold Pedersen
/// commitments whose sum must balance against a kernel excess and offset.
pub trait Committed {
	fn inputs_committed(&self) -> Vec<Point>;
	fn outputs_committed(&self) -> Vec<Point>;
	fn kernel_excess(&self) -> Point;
	fn kernel_offset(&self) -> Scalar;
	fn fee_and_peg_value(&self) -> (i64, Option<i64>, Vec<i64>);

	/// §4.9 `KernelSum`: `Σ C_out − Σ C_in == E + offset·G + pegin·H −
	/// Σ pegout·H − fee·H`. Pegin behaves as an uncommitted extra input,
	/// fee and pegout as uncommitted extra outputs.
	fn verify_kernel_sum(&self) -> std::result::Result<(), CommittedError> {
		let h = mweb_secp::generators::h();
		let g = Point::generator();

		let mut rhs = self.kernel_excess().add(&g.mul(&self.kernel_offset()));
		let (fee, pegin, pegouts) = self.fee_and_peg_value();
		rhs = rhs.add(&value_point(&h, -fee));
		if let Some(pegin) = pegin {
			rhs = rhs.add(&value_point(&h, pegin));
		}
		for pegout in pegouts {
			rhs = rhs.add(&value_point(&h, -pegout));
		}

		let mut lhs = Point::identity();
		for c in self.outputs_committed() {
			lhs = lhs.add(&c);
		}
		for c in self.inputs_committed() {
			lhs = lhs.add(&c.negate());
		}

		if lhs == rhs {
			Ok(())
		} else {
			Err(CommittedError::KernelSumMismatch)
		}
	}
}

/// `v·H` for a possibly-negative signed amount, used by the fee/peg terms
/// of the kernel-sum equation.
fn value_point(h: &Point, v: i64) -> Point {
	let abs = Scalar::reduce_from_bytes(&{
		let mut be = [0u8; 32];
		be[24..32].copy_from_slice(&(v.unsigned_abs()).to_be_bytes());
		be
	});
	let p = h.mul(&abs);
	if v < 0 {
		p.negate()
	} else {
		p
	}
}

impl Committed for Transaction {
	fn inputs_committed(&self) -> Vec<Point> {
		self.body.inputs.iter().map(|i| i.commitment).collect()
	}

	fn outputs_committed(&self) -> Vec<Point> {
		self.body.outputs.iter().map(|o| o.commitment).collect()
	}

	fn kernel_excess(&self) -> Point {
		self.body
			.kernels
			.iter()
			.fold(Point::identity(), |acc, k| acc.add(&k.excess))
	}

	fn kernel_offset(&self) -> Scalar {
		self.kernel_offset
	}

	fn fee_and_peg_value(&self) -> (i64, Option<i64>, Vec<i64>) {
		let mut fee = 0i64;
		let mut pegin = None;
		let mut pegouts = Vec::new();
		for k in &self.body.kernels {
			if let Some(f) = k.fee {
				fee += f;
			}
			if let Some(p) = k.pegin {
				pegin = Some(pegin.unwrap_or(0) + p);
			}
			for p in &k.pegouts {
				pegouts.push(p.amount);
			}
		}
		(fee, pegin, pegouts)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ser::{deserialize, serialize};
	use mweb_secp::pedersen;

	fn scalar(b: u8) -> Scalar {
		Scalar::from_bytes(&[b; 32]).unwrap()
	}

	fn dummy_signature() -> mweb_secp::schnorr::Signature {
		mweb_secp::schnorr::Signature::from_bytes(&[0u8; 64])
	}

	fn sample_output() -> Output {
		Output {
			features: OutputFeatures::STANDARD_FIELDS,
			commitment: pedersen::commit(500, &scalar(1)),
			sender_pubkey: Point::generator().mul(&scalar(2)),
			receiver_pubkey: Point::generator().mul(&scalar(3)),
			message: Some(OutputMessage {
				key_exchange_pubkey: Point::generator().mul(&scalar(2)),
				view_tag: 7,
				masked_value: 1234,
				masked_nonce: [9u8; 16],
				extra_data: vec![1, 2, 3],
			}),
			range_proof: vec![0u8; mweb_secp::bulletproof::PROOF_SIZE],
			signature: dummy_signature(),
		}
	}

	fn sample_input() -> Input {
		Input {
			features: InputFeatures::STEALTH_KEY_FEATURE,
			output_id: [4u8; 32],
			commitment: pedersen::commit(500, &scalar(1)),
			input_pubkey: Some(Point::generator().mul(&scalar(5))),
			output_pubkey: Point::generator().mul(&scalar(3)),
			extra_data: vec![],
			signature: dummy_signature(),
		}
	}

	fn sample_kernel() -> Kernel {
		Kernel {
			features: KernelFeatures::FEE_FEATURE_BIT,
			fee: Some(10),
			pegin: None,
			pegouts: vec![],
			lock_height: None,
			stealth_excess: None,
			extra_data: vec![],
			excess: Point::generator().mul(&scalar(6)),
			signature: dummy_signature(),
		}
	}

	/// §8 property 8: `parse(serialize(tx)) = tx` for every `Transaction`.
	#[test]
	fn transaction_round_trips_through_serialization() {
		let tx = Transaction {
			kernel_offset: scalar(8),
			stealth_offset: scalar(9),
			body: TxBody {
				inputs: vec![sample_input()],
				outputs: vec![sample_output()],
				kernels: vec![sample_kernel()],
			},
		};

		let mut buf = Vec::new();
		serialize(&mut buf, &tx).unwrap();
		let parsed: Transaction = deserialize(&mut &buf[..]).unwrap();

		assert_eq!(parsed.kernel_offset.to_bytes(), tx.kernel_offset.to_bytes());
		assert_eq!(parsed.stealth_offset.to_bytes(), tx.stealth_offset.to_bytes());
		assert_eq!(parsed.body.inputs.len(), 1);
		assert_eq!(parsed.body.outputs.len(), 1);
		assert_eq!(parsed.body.kernels.len(), 1);
		assert!(parsed.body.outputs[0].commitment == tx.body.outputs[0].commitment);
		assert_eq!(
			parsed.body.outputs[0].message.as_ref().unwrap().extra_data,
			vec![1, 2, 3]
		);
		assert_eq!(parsed.body.kernels[0].fee, Some(10));
	}

	/// §8 property 9: the kernel-sum identity holds for a transaction built
	/// so that `Σoutputs - Σinputs` equals `excess + offset*G + fee*H`.
	#[test]
	fn kernel_sum_holds_when_constructed_to_balance() {
		let g = Point::generator();

		let in_blind = scalar(1);
		let out_blind = scalar(2);
		let offset = scalar(3);
		let fee = 100i64;
		let amount = 10_000u64;

		let input = Input {
			commitment: pedersen::commit(amount, &in_blind),
			..sample_input()
		};
		let output = Output {
			commitment: pedersen::commit(amount - fee as u64, &out_blind),
			..sample_output()
		};

		// Input is worth `amount`, output `amount - fee`: the shortfall is
		// exactly the fee, so `excess = (out_blind - in_blind - offset)*G`
		// with zero H-component satisfies the kernel sum.
		let excess_scalar = out_blind.sub(&in_blind).sub(&offset);
		let kernel = Kernel {
			excess: g.mul(&excess_scalar),
			..sample_kernel()
		};

		let tx = Transaction {
			kernel_offset: offset,
			stealth_offset: Scalar::ZERO,
			body: TxBody {
				inputs: vec![input],
				outputs: vec![output],
				kernels: vec![kernel],
			},
		};

		tx.verify_kernel_sum().expect("kernel sum should balance");
	}
}
