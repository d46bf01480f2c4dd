//! The 22-byte tree record: typed decode/encode and per-node accessors.
//!
//! The record layout is a fixed contract with the archive producer, all fields
//! big-endian:
//!
//! | offset | width | field                                                        |
//! |--------|-------|--------------------------------------------------------------|
//! | 0      | u32   | name offset, into the name region                            |
//! | 4      | u16   | flags                                                        |
//! | 6      | u32   | directory: child count — file: locale (language, territory)  |
//! | 10     | u32   | directory: first child id — file: data offset                |
//! | 14     | u64   | last-modified timestamp, 0 when unknown                      |
//!
//! A name entry, at a record's name offset: `u16` length in UTF-16 units, `u32`
//! name hash, then that many UTF-16BE units. A data entry, at a leaf's data
//! offset: `u32` payload length, then the payload bytes.

use super::root::ResourceRoot;
use crate::global::{codec, error::*, flags::Flags};

pub(crate) const NAME_OFFSET_FIELD: usize = 0;
pub(crate) const FLAGS_FIELD: usize = 4;
pub(crate) const LOCALE_FIELD: usize = 6;
pub(crate) const DATA_OFFSET_FIELD: usize = 10;
pub(crate) const LAST_MODIFIED_FIELD: usize = 14;

// name entry header: u16 length + u32 hash
const NAME_HEADER_SIZE: usize = 6;
// data entry header: u32 payload length
const DATA_HEADER_SIZE: usize = 4;

/// What a record's two variable fields mean, depending on its `DIRECTORY` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	/// A container node; its children are the `child_count` consecutive records starting at `first_child`
	Directory {
		/// Number of immediate children
		child_count: u32,
		/// Record index of the first child
		first_child: u32,
	},
	/// A leaf node carrying a payload in the data region
	File {
		/// Locale language id, 0 for the locale-neutral entry
		language: u16,
		/// Locale territory id, 0 for the locale-neutral entry
		territory: u16,
		/// Offset of the payload's length-prefixed data entry, into the data region
		data_offset: u32,
	},
}

/// One decoded tree record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
	/// Offset of this node's name entry, into the name region
	pub name_offset: u32,
	/// The record's flag field
	pub flags: Flags,
	/// Directory linkage or payload location, depending on the flags
	pub kind: EntryKind,
	/// Last-modified timestamp in milliseconds since the epoch, 0 when the producer omitted it
	pub last_modified: u64,
}

impl Entry {
	/// Whether this record describes a directory
	#[inline(always)]
	pub fn is_directory(&self) -> bool {
		self.flags.is_directory()
	}

	/// The payload's data-region offset, `None` for directories
	pub fn data_offset(&self) -> Option<u32> {
		match self.kind {
			EntryKind::File { data_offset, .. } => Some(data_offset),
			EntryKind::Directory { .. } => None,
		}
	}

	/// Decodes one record. `record` must be exactly [`TREE_ENTRY_SIZE`](crate::TREE_ENTRY_SIZE) bytes.
	pub(crate) fn decode(record: &[u8]) -> Entry {
		debug_assert_eq!(record.len(), crate::TREE_ENTRY_SIZE);

		let flags = Flags::from_bits(codec::read_u16(record, FLAGS_FIELD));

		let kind = if flags.is_directory() {
			EntryKind::Directory {
				child_count: codec::read_u32(record, LOCALE_FIELD),
				first_child: codec::read_u32(record, DATA_OFFSET_FIELD),
			}
		} else {
			EntryKind::File {
				language: codec::read_u16(record, LOCALE_FIELD),
				territory: codec::read_u16(record, LOCALE_FIELD + 2),
				data_offset: codec::read_u32(record, DATA_OFFSET_FIELD),
			}
		};

		Entry {
			name_offset: codec::read_u32(record, NAME_OFFSET_FIELD),
			flags,
			kind,
			last_modified: codec::read_u64(record, LAST_MODIFIED_FIELD),
		}
	}

	/// Serializes the record back into its wire form. Decoding then re-encoding an
	/// unmodified record yields byte-identical output.
	pub(crate) fn encode(&self) -> [u8; crate::TREE_ENTRY_SIZE] {
		let mut record = [0u8; crate::TREE_ENTRY_SIZE];

		codec::write_u32(&mut record, NAME_OFFSET_FIELD, self.name_offset);
		codec::write_u16(&mut record, FLAGS_FIELD, self.flags.bits());

		match self.kind {
			EntryKind::Directory {
				child_count,
				first_child,
			} => {
				codec::write_u32(&mut record, LOCALE_FIELD, child_count);
				codec::write_u32(&mut record, DATA_OFFSET_FIELD, first_child);
			},
			EntryKind::File {
				language,
				territory,
				data_offset,
			} => {
				codec::write_u16(&mut record, LOCALE_FIELD, language);
				codec::write_u16(&mut record, LOCALE_FIELD + 2, territory);
				codec::write_u32(&mut record, DATA_OFFSET_FIELD, data_offset);
			},
		};

		codec::write_u64(&mut record, LAST_MODIFIED_FIELD, self.last_modified);
		record
	}
}

impl ResourceRoot<'_> {
	/// Byte offset of `node`'s record within the tree region: `node * 22`.
	/// Fails when the record would lie outside the region.
	pub fn node_offset(&self, node: u32) -> InternalResult<usize> {
		let offset = node as usize * crate::TREE_ENTRY_SIZE;

		if offset + crate::TREE_ENTRY_SIZE > self.tree.len() {
			return Err(InternalError::InvalidNode(node, self.tree.len()));
		};

		Ok(offset)
	}

	/// Decodes `node`'s record into a typed [`Entry`]
	pub fn entry(&self, node: u32) -> InternalResult<Entry> {
		let offset = self.node_offset(node)?;
		Ok(Entry::decode(&self.tree[offset..offset + crate::TREE_ENTRY_SIZE]))
	}

	/// Resolves `node`'s name from the name region.
	///
	/// Node 0 is the archive root; it carries no name and resolves to `""`.
	pub fn name_of(&self, node: u32) -> InternalResult<String> {
		if node == 0 {
			return Ok(String::new());
		};

		let entry = self.entry(node)?;
		let offset = entry.name_offset as usize;

		if offset + NAME_HEADER_SIZE > self.name.len() {
			return Err(InternalError::NameOutOfBounds(node, offset));
		};

		let length = codec::read_u16(&self.name, offset) as usize;
		let units = offset + NAME_HEADER_SIZE;

		if units + length * 2 > self.name.len() {
			return Err(InternalError::NameOutOfBounds(node, offset));
		};

		let decoded = (0..length).map(|i| codec::read_u16(&self.name, units + i * 2));
		char::decode_utf16(decoded)
			.collect::<Result<String, _>>()
			.map_err(|_| InternalError::MalformedName(node))
	}

	/// Copies `node`'s name into `buffer` and returns the name's true length in bytes.
	///
	/// When the name does not fit, the leading `buffer.len()` bytes are copied and the
	/// returned length exceeds `buffer.len()`: truncation is always observable to the
	/// caller, never silent.
	pub fn name_into(&self, node: u32, buffer: &mut [u8]) -> InternalResult<usize> {
		let name = self.name_of(node)?;
		let bytes = name.as_bytes();

		let copied = bytes.len().min(buffer.len());
		buffer[..copied].copy_from_slice(&bytes[..copied]);

		Ok(bytes.len())
	}

	/// The raw payload bytes of a leaf node, read through the record's length-prefixed
	/// data entry. Compressed payloads come back still compressed.
	pub fn payload(&self, node: u32) -> InternalResult<&[u8]> {
		let entry = self.entry(node)?;

		let EntryKind::File { data_offset, .. } = entry.kind else {
			return Err(InternalError::NotAFile(node));
		};

		let offset = data_offset as usize;
		if offset + DATA_HEADER_SIZE > self.data.len() {
			return Err(InternalError::DataOutOfBounds(node, offset));
		};

		let length = codec::read_u32(&self.data, offset) as usize;
		let start = offset + DATA_HEADER_SIZE;

		if start + length > self.data.len() {
			return Err(InternalError::DataOutOfBounds(node, offset));
		};

		Ok(&self.data[start..start + length])
	}
}
