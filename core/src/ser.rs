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

//! Binary serialization layer (§4.7): big-endian multi-byte integers, a
//! Bitcoin-style CompactSize varint for array lengths, and the
//! `Writeable`/`Readable` traits every wire type implements.
//!
//! Grounded on the teacher's `ser.rs`, modernized to return `Result`
//! instead of `Option<Error>` and to read/write directly against
//! `std::io::{Read, Write}` rather than a vendored trait-object wrapper.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::{Error, Result};

/// Thin wrapper over any `Write`, offering the primitives the wire format
/// needs.
pub struct Writer<'a> {
	sink: &'a mut dyn Write,
}

impl<'a> Writer<'a> {
	pub fn new(sink: &'a mut dyn Write) -> Writer<'a> {
		Writer { sink }
	}

	pub fn write_u8(&mut self, n: u8) -> Result<()> {
		self.sink.write_u8(n).map_err(Error::from)
	}

	pub fn write_u32(&mut self, n: u32) -> Result<()> {
		self.sink.write_u32::<BigEndian>(n).map_err(Error::from)
	}

	pub fn write_u64(&mut self, n: u64) -> Result<()> {
		self.sink.write_u64::<BigEndian>(n).map_err(Error::from)
	}

	pub fn write_i64(&mut self, n: i64) -> Result<()> {
		self.sink.write_i64::<BigEndian>(n).map_err(Error::from)
	}

	pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
		self.sink.write_all(bytes).map_err(Error::from)
	}

	/// Bitcoin CompactSize: `<0xfd` as one byte; `0xfd` + u16; `0xfe` + u32;
	/// `0xff` + u64, always the minimal form for the value.
	pub fn write_varint(&mut self, n: u64) -> Result<()> {
		if n < 0xfd {
			self.write_u8(n as u8)
		} else if n <= 0xffff {
			self.write_u8(0xfd)?;
			self.sink.write_u16::<BigEndian>(n as u16).map_err(Error::from)
		} else if n <= 0xffff_ffff {
			self.write_u8(0xfe)?;
			self.write_u32(n as u32)
		} else {
			self.write_u8(0xff)?;
			self.write_u64(n)
		}
	}

	pub fn write_vec(&mut self, items: &[impl Writeable]) -> Result<()> {
		self.write_varint(items.len() as u64)?;
		for item in items {
			item.write(self)?;
		}
		Ok(())
	}
}

/// Thin wrapper over any `Read`, rejecting non-canonical varints and
/// truncated streams per §4.7/§7.
pub struct Reader<'a> {
	source: &'a mut dyn Read,
}

impl<'a> Reader<'a> {
	pub fn new(source: &'a mut dyn Read) -> Reader<'a> {
		Reader { source }
	}

	pub fn read_u8(&mut self) -> Result<u8> {
		self.source.read_u8().map_err(map_io)
	}

	pub fn read_u32(&mut self) -> Result<u32> {
		self.source.read_u32::<BigEndian>().map_err(map_io)
	}

	pub fn read_u64(&mut self) -> Result<u64> {
		self.source.read_u64::<BigEndian>().map_err(map_io)
	}

	pub fn read_i64(&mut self) -> Result<i64> {
		self.source.read_i64::<BigEndian>().map_err(map_io)
	}

	pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
		let mut buf = vec![0u8; len];
		self.source.read_exact(&mut buf).map_err(map_io)?;
		Ok(buf)
	}

	pub fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.source.read_exact(&mut buf).map_err(map_io)?;
		Ok(buf)
	}

	pub fn read_varint(&mut self) -> Result<u64> {
		let first = self.read_u8()?;
		let (value, min) = match first {
			0xfd => (self.source.read_u16::<BigEndian>().map_err(map_io)? as u64, 0xfd),
			0xfe => (self.read_u32()? as u64, 0x1_0000),
			0xff => (self.read_u64()?, 0x1_0000_0000),
			n => (n as u64, 0),
		};
		if first >= 0xfd && value < min {
			return Err(Error::BadVarint);
		}
		Ok(value)
	}

	pub fn read_vec<T: Readable>(&mut self, max_len: usize) -> Result<Vec<T>> {
		let len = self.read_varint()? as usize;
		if len > max_len {
			return Err(Error::TruncatedStream);
		}
		let mut out = Vec::with_capacity(len);
		for _ in 0..len {
			out.push(T::read(self)?);
		}
		Ok(out)
	}

	pub fn expect_u8(&mut self, val: u8) -> Result<()> {
		let got = self.read_u8()?;
		if got != val {
			return Err(Error::TruncatedStream);
		}
		Ok(())
	}
}

fn map_io(e: io::Error) -> Error {
	if e.kind() == io::ErrorKind::UnexpectedEof {
		Error::TruncatedStream
	} else {
		Error::Io(e)
	}
}

pub trait Writeable {
	fn write(&self, writer: &mut Writer) -> Result<()>;
}

pub trait Readable: Sized {
	fn read(reader: &mut Reader) -> Result<Self>;
}

pub fn serialize<W: Writeable>(sink: &mut dyn Write, thing: &W) -> Result<()> {
	let mut writer = Writer::new(sink);
	thing.write(&mut writer)
}

pub fn deserialize<R: Readable>(source: &mut dyn Read) -> Result<R> {
	let mut reader = Reader::new(source);
	R::read(&mut reader)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn varint_roundtrips_all_size_classes() {
		for n in [0u64, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, 0x1_0000_0000] {
			let mut buf = Vec::new();
			{
				let mut w = Writer::new(&mut buf);
				w.write_varint(n).unwrap();
			}
			let mut cursor = std::io::Cursor::new(buf);
			let mut r = Reader::new(&mut cursor);
			assert_eq!(r.read_varint().unwrap(), n);
		}
	}

	#[test]
	fn non_canonical_varint_is_rejected() {
		// 0xfd followed by a u16 that fits in a single byte.
		let buf = vec![0xfd, 0x00, 0x05];
		let mut cursor = std::io::Cursor::new(buf);
		let mut r = Reader::new(&mut cursor);
		assert!(matches!(r.read_varint(), Err(Error::BadVarint)));
	}
}
