//! The `.rcc` container: the external serialization of the three regions.
//!
//! A container starts with the magic `b"qres"`, followed by four big-endian
//! `u32` fields: format version, tree offset, data offset, name offset. From
//! version 3 on, one more `u32` of overall flags follows. The host's embedded
//! archive is the same triple of regions, registered from a mapped copy of
//! exactly this layout, which is what makes a container round-trip useful for
//! tooling and tests.

use std::borrow::Cow;
use std::io::Write;

use crate::global::{codec, error::*};
use crate::loader::root::ResourceRoot;

const BASE_HEADER_SIZE: usize = crate::MAGIC_LENGTH + 4 * 4;

/// Parses a container, borrowing the three regions out of `source`.
///
/// Region extents are not stored in the header; each region runs from its
/// offset to the next region's offset (or the end of the source), which is how
/// the producer lays them out back to back.
pub fn parse(source: &[u8]) -> InternalResult<ResourceRoot<'_>> {
	if source.len() < BASE_HEADER_SIZE {
		return Err(InternalError::TruncatedArchiveSource(source.len()));
	};

	let magic: [u8; crate::MAGIC_LENGTH] = source[..crate::MAGIC_LENGTH].try_into().unwrap();
	if magic != crate::MAGIC {
		return Err(InternalError::MalformedArchiveSource(magic));
	};

	let version = codec::read_u32(source, 4);
	if !(crate::FORMAT_VERSION_MIN..=crate::FORMAT_VERSION_MAX).contains(&version) {
		return Err(InternalError::IncompatibleArchiveVersionError(version));
	};

	let tree_offset = codec::read_u32(source, 8) as usize;
	let data_offset = codec::read_u32(source, 12) as usize;
	let name_offset = codec::read_u32(source, 16) as usize;

	// version >= 3 appends an overall-flags word; nothing in the engine consumes it
	let header_size = if version >= 3 { BASE_HEADER_SIZE + 4 } else { BASE_HEADER_SIZE };

	let offsets = [tree_offset, data_offset, name_offset];
	for offset in offsets {
		if offset < header_size || offset > source.len() {
			return Err(InternalError::TruncatedArchiveSource(source.len()));
		};
	}

	let end_of = |offset: usize| {
		offsets
			.iter()
			.copied()
			.filter(|o| *o > offset)
			.min()
			.unwrap_or(source.len())
	};

	ResourceRoot::from_regions(
		&source[tree_offset..end_of(tree_offset)],
		&source[name_offset..end_of(name_offset)],
		&source[data_offset..end_of(data_offset)],
		version,
	)
}

/// Parses a container into a root that owns copies of its regions, untied from `source`
pub fn parse_owned(source: Vec<u8>) -> InternalResult<ResourceRoot<'static>> {
	let ResourceRoot {
		tree,
		name,
		data,
		version,
		original_data_size,
		entries_affected,
	} = parse(&source)?;

	Ok(ResourceRoot {
		tree: Cow::Owned(tree.into_owned()),
		name: Cow::Owned(name.into_owned()),
		data: Cow::Owned(data.into_owned()),
		version,
		original_data_size,
		entries_affected,
	})
}

/// Serializes `root` back into container form, committed mutations included.
/// Returns the number of bytes written.
pub fn write<W: Write>(root: &ResourceRoot, target: &mut W) -> InternalResult<u64> {
	let header_size = if root.version() >= 3 { BASE_HEADER_SIZE + 4 } else { BASE_HEADER_SIZE };

	let data_offset = header_size;
	let name_offset = data_offset + root.data_size();
	let tree_offset = name_offset + root.name_size();

	if tree_offset + root.tree_size() > u32::MAX as usize {
		return Err(InternalError::DataRegionOverflow);
	};

	target.write_all(&crate::MAGIC)?;
	target.write_all(&root.version().to_be_bytes())?;
	target.write_all(&(tree_offset as u32).to_be_bytes())?;
	target.write_all(&(data_offset as u32).to_be_bytes())?;
	target.write_all(&(name_offset as u32).to_be_bytes())?;

	if root.version() >= 3 {
		target.write_all(&0u32.to_be_bytes())?;
	};

	target.write_all(root.data_bytes())?;
	target.write_all(root.name_bytes())?;
	target.write_all(root.tree_bytes())?;

	Ok((tree_offset + root.tree_size()) as u64)
}
