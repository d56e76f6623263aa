//! Binary encoding for structured (non-raw) cache values.
//!
//! Stores only ever see [`Blob`]s. [`CacheValue`] turns typed values into
//! blobs and back, so that [`Cache::write_value`](crate::Cache::write_value)
//! and [`Cache::read_value`](crate::Cache::read_value) can work with ordinary
//! Rust types. Numbers are little-endian; variable-length data is prefixed
//! with its length.

use crate::Blob;
use anyhow::{Result, anyhow, bail};
use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

/// A value that can be stored as a structured cache entry.
///
/// `read_from_cache` must reconstruct exactly what `write_to_cache` wrote.
pub trait CacheValue: Clone {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()>;
	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self>;
}

/// Encodes `value` into a fresh blob.
pub fn encode<V: CacheValue>(value: &V) -> Result<Blob> {
	let mut buffer = Vec::new();
	value.write_to_cache(&mut buffer)?;
	Ok(Blob::from(buffer))
}

/// Decodes a blob written by [`encode`]. Trailing bytes are an error.
pub fn decode<V: CacheValue>(blob: &Blob) -> Result<V> {
	let mut reader = Cursor::new(blob.as_slice());
	let value = V::read_from_cache(&mut reader)?;
	if reader.position() != blob.len() {
		bail!(
			"{} trailing bytes after decoded value",
			blob.len() - reader.position()
		);
	}
	Ok(value)
}

/// Reads `length` bytes, refusing lengths beyond what is left in the input.
fn read_bytes(reader: &mut Cursor<&[u8]>, length: u64) -> Result<Vec<u8>> {
	let remaining = (reader.get_ref().len() as u64).saturating_sub(reader.position());
	if length > remaining {
		bail!("length prefix {length} exceeds the {remaining} remaining bytes");
	}
	let mut bytes = vec![0u8; usize::try_from(length)?];
	reader.read_exact(&mut bytes)?;
	Ok(bytes)
}

impl CacheValue for u8 {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u8(*self)?;
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(reader.read_u8()?)
	}
}

impl CacheValue for bool {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u8(u8::from(*self))?;
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		match reader.read_u8()? {
			0 => Ok(false),
			1 => Ok(true),
			other => bail!("Invalid bool value: {other}"),
		}
	}
}

impl CacheValue for u32 {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u32::<LE>(*self)?;
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(reader.read_u32::<LE>()?)
	}
}

impl CacheValue for u64 {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u64::<LE>(*self)?;
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(reader.read_u64::<LE>()?)
	}
}

impl CacheValue for i64 {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_i64::<LE>(*self)?;
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(reader.read_i64::<LE>()?)
	}
}

/// Length (`u32`) followed by UTF-8 bytes.
impl CacheValue for String {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		let bytes = self.as_bytes();
		writer.write_u32::<LE>(u32::try_from(bytes.len())?)?;
		writer.extend_from_slice(bytes);
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		let length = reader.read_u32::<LE>()?;
		let bytes = read_bytes(reader, u64::from(length))?;
		String::from_utf8(bytes).map_err(|e| anyhow!(e))
	}
}

/// Length (`u64`) followed by the raw bytes.
impl CacheValue for Blob {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u64::<LE>(self.len())?;
		writer.extend_from_slice(self.as_slice());
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		let length = reader.read_u64::<LE>()?;
		Ok(Blob::from(read_bytes(reader, length)?))
	}
}

impl<T: CacheValue> CacheValue for Vec<T> {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u32::<LE>(u32::try_from(self.len())?)?;
		for item in self {
			item.write_to_cache(writer)?;
		}
		Ok(())
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		let length = reader.read_u32::<LE>()? as usize;
		let mut vec = Vec::with_capacity(length.min(1024));
		for _ in 0..length {
			vec.push(T::read_from_cache(reader)?);
		}
		Ok(vec)
	}
}

impl<A: CacheValue, B: CacheValue> CacheValue for (A, B) {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		self.0.write_to_cache(writer)?;
		self.1.write_to_cache(writer)
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		let a = A::read_from_cache(reader)?;
		let b = B::read_from_cache(reader)?;
		Ok((a, b))
	}
}

/// Presence flag (`0` or `1`), then the value if present.
impl<V: CacheValue> CacheValue for Option<V> {
	fn write_to_cache(&self, writer: &mut Vec<u8>) -> Result<()> {
		if let Some(value) = self {
			writer.write_u8(1)?;
			value.write_to_cache(writer)
		} else {
			writer.write_u8(0)?;
			Ok(())
		}
	}

	fn read_from_cache(reader: &mut Cursor<&[u8]>) -> Result<Self> {
		match reader.read_u8()? {
			0 => Ok(None),
			1 => Ok(Some(V::read_from_cache(reader)?)),
			flag => bail!("Invalid flag value: {flag}"),
		}
	}
}
