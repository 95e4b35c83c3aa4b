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

/// Wire-format errors (§7 `Parse{...}`), all fatal to the transaction
/// currently being parsed.
#[derive(Error, Debug)]
pub enum Error {
	#[error("unknown flag bits set outside {{0x01, 0x08}}")]
	UnknownFlag,

	#[error("stream ended before the expected data was read")]
	TruncatedStream,

	#[error("varint is not in canonical (minimal) encoding")]
	BadVarint,

	#[error("point encoding does not decompress to a curve point")]
	BadPoint(#[from] mweb_secp::Error),

	#[error("range proof exceeds the maximum size of {max} bytes: got {got}")]
	OversizedProof { got: usize, max: usize },

	#[error("unknown feature bits set: {0:#x}")]
	UnknownFeatureBits(u8),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
