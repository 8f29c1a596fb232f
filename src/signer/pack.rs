//! Little-endian packing primitives for the access-token wire format.

// std
use std::collections::BTreeMap;
// self
use crate::error::SigningError;

/// Append-only little-endian buffer.
#[derive(Debug, Default)]
pub(crate) struct Packer(Vec<u8>);
impl Packer {
	pub(crate) fn u16(&mut self, value: u16) {
		self.0.extend_from_slice(&value.to_le_bytes());
	}

	pub(crate) fn u32(&mut self, value: u32) {
		self.0.extend_from_slice(&value.to_le_bytes());
	}

	/// Writes a `u16` length prefix followed by the raw bytes.
	pub(crate) fn bytes(&mut self, field: &'static str, value: &[u8]) -> Result<(), SigningError> {
		let len = u16::try_from(value.len()).map_err(|_| SigningError::FieldTooLarge { field })?;

		self.u16(len);
		self.0.extend_from_slice(value);

		Ok(())
	}

	/// Writes a `u16` entry count followed by `(u16, u32)` pairs in key order.
	pub(crate) fn privileges(&mut self, map: &BTreeMap<u16, u32>) -> Result<(), SigningError> {
		let len = u16::try_from(map.len())
			.map_err(|_| SigningError::FieldTooLarge { field: "privileges" })?;

		self.u16(len);

		for (key, value) in map {
			self.u16(*key);
			self.u32(*value);
		}

		Ok(())
	}

	pub(crate) fn extend(&mut self, raw: &[u8]) {
		self.0.extend_from_slice(raw);
	}

	pub(crate) fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn integers_are_little_endian() {
		let mut packer = Packer::default();

		packer.u16(0x0102);
		packer.u32(0x0304_0506);

		assert_eq!(packer.into_bytes(), vec![0x02, 0x01, 0x06, 0x05, 0x04, 0x03]);
	}

	#[test]
	fn byte_strings_carry_a_length_prefix() {
		let mut packer = Packer::default();

		packer.bytes("channel", b"abc").expect("Short strings should pack.");

		assert_eq!(packer.into_bytes(), vec![3, 0, b'a', b'b', b'c']);
	}

	#[test]
	fn oversize_byte_strings_are_rejected() {
		let mut packer = Packer::default();
		let huge = vec![0_u8; usize::from(u16::MAX) + 1];

		assert_eq!(
			packer.bytes("channel", &huge),
			Err(SigningError::FieldTooLarge { field: "channel" })
		);
	}

	#[test]
	fn privilege_maps_are_sorted_by_key() {
		let mut packer = Packer::default();
		let map = BTreeMap::from([(3_u16, 30_u32), (1, 10)]);

		packer.privileges(&map).expect("Small maps should pack.");

		assert_eq!(packer.into_bytes(), vec![2, 0, 1, 0, 10, 0, 0, 0, 3, 0, 30, 0, 0, 0]);
	}
}
