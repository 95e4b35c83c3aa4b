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

//! The outer Litecoin transaction envelope (§4.7): a standard transaction
//! optionally augmented with the MWEB extension flag `0x08`. Witness data
//! (`0x01`) and the legacy transaction body are outside this crate's scope
//! (no script interpreter, no legacy UTXO model) and are carried through
//! as opaque bytes so a caller higher in the stack can hand them to its
//! own Litecoin codec.

use crate::error::{Error, Result};
use crate::ser::{Readable, Reader, Writeable, Writer};
use crate::transaction::Transaction as MwebTransaction;

const FLAG_WITNESS: u8 = 0x01;
const FLAG_MWEB: u8 = 0x08;
const KNOWN_FLAGS: u8 = FLAG_WITNESS | FLAG_MWEB;

/// The legacy (non-MWEB) portion of a transaction, kept as an opaque byte
/// string. Every outer transaction carries one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTxBytes(pub Vec<u8>);

/// An outer Litecoin transaction: either a plain transaction, or one
/// carrying an MWEB extension block (§4.7).
#[derive(Clone)]
pub enum OuterTransaction {
	Regular {
		legacy: LegacyTxBytes,
		witness: bool,
	},
	WithMweb {
		legacy: LegacyTxBytes,
		witness: bool,
		mweb_version: u8,
		mweb: MwebTransaction,
	},
}

impl OuterTransaction {
	pub fn has_mweb(&self) -> bool {
		matches!(self, OuterTransaction::WithMweb { .. })
	}

	pub fn mweb(&self) -> Option<&MwebTransaction> {
		match self {
			OuterTransaction::WithMweb { mweb, .. } => Some(mweb),
			OuterTransaction::Regular { .. } => None,
		}
	}
}

/// Parse an outer transaction from `legacy_len` bytes of legacy data
/// followed by the flag byte and (if set) the MWEB extension, matching
/// the Litecoin reference's placement of the extension flag where a
/// Bitcoin `SegWit` marker/flag pair would otherwise sit.
///
/// The legacy body itself is opaque to this crate; callers pass its exact
/// byte length (known from their own Litecoin transaction codec) so this
/// function can split the stream without re-parsing scripts.
pub fn read_outer_transaction(
	reader: &mut Reader,
	legacy_len: usize,
) -> Result<OuterTransaction> {
	let legacy = LegacyTxBytes(reader.read_bytes(legacy_len)?);
	let flags = reader.read_u8()?;
	if flags & !KNOWN_FLAGS != 0 {
		log::warn!("rejecting outer transaction with unknown flag bits {flags:#x}");
		return Err(Error::UnknownFlag);
	}

	let witness = flags & FLAG_WITNESS != 0;
	if flags & FLAG_MWEB != 0 {
		let mweb_version = reader.read_u8()?;
		let mweb = MwebTransaction::read(reader)?;
		Ok(OuterTransaction::WithMweb {
			legacy,
			witness,
			mweb_version,
			mweb,
		})
	} else {
		Ok(OuterTransaction::Regular { legacy, witness })
	}
}

pub fn write_outer_transaction(writer: &mut Writer, tx: &OuterTransaction) -> Result<()> {
	match tx {
		OuterTransaction::Regular { legacy, witness } => {
			writer.write_bytes(&legacy.0)?;
			writer.write_u8(if *witness { FLAG_WITNESS } else { 0 })
		}
		OuterTransaction::WithMweb {
			legacy,
			witness,
			mweb_version,
			mweb,
		} => {
			writer.write_bytes(&legacy.0)?;
			let flags = FLAG_MWEB | if *witness { FLAG_WITNESS } else { 0 };
			writer.write_u8(flags)?;
			writer.write_u8(*mweb_version)?;
			mweb.write(writer)
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn unknown_flag_bit_is_rejected() {
		let mut buf = vec![0xAA, 0xBB]; // 2 bytes of "legacy"
		buf.push(0x02); // flag bit outside {0x01, 0x08}
		let mut cursor = Cursor::new(buf);
		let mut reader = Reader::new(&mut cursor);
		assert!(matches!(
			read_outer_transaction(&mut reader, 2),
			Err(Error::UnknownFlag)
		));
	}

	#[test]
	fn regular_transaction_round_trips() {
		let tx = OuterTransaction::Regular {
			legacy: LegacyTxBytes(vec![1, 2, 3]),
			witness: true,
		};
		let mut buf = Vec::new();
		{
			let mut w = Writer::new(&mut buf);
			write_outer_transaction(&mut w, &tx).unwrap();
		}
		let mut cursor = Cursor::new(buf);
		let mut r = Reader::new(&mut cursor);
		let back = read_outer_transaction(&mut r, 3).unwrap();
		assert!(!back.has_mweb());
	}
}
