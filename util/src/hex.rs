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

//! Encode/decode bytes as hex strings. The MWEB wire fixtures used in tests
//! and the external interfaces of the core (§6 of the spec) move candidate
//! transactions around as hex, so this is needed pervasively.

use std::fmt::Write;

/// Encode the provided bytes into a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
	let mut s = String::with_capacity(bytes.len() * 2);
	for byte in bytes {
		write!(&mut s, "{:02x}", byte).expect("String writes never fail");
	}
	s
}

/// Decode a hex string into bytes. Tolerates an optional leading `0x`.
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
	let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
	(0..trimmed.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(&trimmed[i..i + 2], 16))
		.collect()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn roundtrip() {
		let bytes = [0u8, 1, 255, 16, 128];
		let hex = to_hex(&bytes);
		assert_eq!(hex, "0001ff1080");
		assert_eq!(from_hex(&hex).unwrap(), bytes);
		assert_eq!(from_hex("0x0001ff1080").unwrap(), bytes);
	}
}
