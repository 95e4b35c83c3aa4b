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

//! The `Coin` record produced by rewinding an owned output (§3), and the
//! reserved address indices used for non-wallet pseudo-addresses.

use crate::stealth::StealthAddress;
use mweb_secp::Scalar;

/// Output identifier: the hash of the serialized `Output` it was recovered
/// from. Kept as a bare 32-byte digest here to avoid a dependency cycle
/// with `mweb_core` (which depends on this crate, not the other way round).
pub type OutputId = [u8; 32];

/// Reserved coin indices (u32), drawn from the top of the range per §6.
/// The exact reference values were not recoverable from the distillation
/// this crate was built from; these are placeholders chosen to be disjoint
/// from any realistic wallet address index and from each other. See
/// DESIGN.md.
pub const CHANGE_INDEX: u32 = u32::MAX;
pub const PEGIN_INDEX: u32 = u32::MAX - 1;
pub const UNKNOWN_INDEX: u32 = u32::MAX - 2;
pub const CUSTOM_KEY_INDEX: u32 = u32::MAX - 3;

pub fn is_reserved_index(index: u32) -> bool {
	matches!(
		index,
		CHANGE_INDEX | PEGIN_INDEX | UNKNOWN_INDEX | CUSTOM_KEY_INDEX
	)
}

/// A recovered, wallet-owned MWEB output.
#[derive(Clone)]
pub struct Coin {
	pub address_index: u32,
	pub blind: Option<Scalar>,
	pub amount: i64,
	pub output_id: OutputId,
	pub address: Option<StealthAddress>,
	pub shared_secret: Option<[u8; 32]>,
	pub spend_key: Option<Scalar>,
	pub sender_key: Option<mweb_secp::Point>,
	/// The output's own receiver pubkey `Ko`, carried forward so this coin
	/// can later fill in `Input::output_pubkey` when spent.
	pub output_pubkey: Option<mweb_secp::Point>,
}

impl Coin {
	pub fn is_spendable(&self) -> bool {
		self.spend_key.is_some() && !is_reserved_index(self.address_index)
	}
}
