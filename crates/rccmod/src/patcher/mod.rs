//! The commit step: fold a [`ReplacementLedger`] into a live [`ResourceRoot`].
//!
//! The rebuild is strictly additive on the data region and strictly
//! field-scoped on the tree region. Appending happens at the current end of
//! the data region, so a second commit stacks on top of the first; nothing at
//! an offset below [`original_data_size`](ResourceRoot::original_data_size)
//! is ever rewritten, no matter how a commit fails.

mod ledger;

pub use ledger::{Replacement, ReplacementLedger, ReplacementSource};

use std::borrow::Cow;

use log::warn;

use crate::global::{codec, error::*, flags::Flags};
use crate::loader::node::{DATA_OFFSET_FIELD, FLAGS_FIELD};
use crate::loader::root::ResourceRoot;

/// What one commit did
#[derive(Debug, Default)]
pub struct CommitSummary {
	/// Entries folded into the archive
	pub applied: usize,
	/// Bytes appended to the data region, length prefixes included
	pub bytes_appended: u64,
	/// Entries skipped, with the target node and the reason. The archive is untouched
	/// by a skipped entry.
	pub failures: Vec<(u32, InternalError)>,
}

/// Applies every staged entry in insertion order, then drains the ledger.
///
/// Per entry: validate that the node id denotes a leaf record inside the tree
/// region and that the source is readable, append the length-prefixed payload
/// after the current end of the data region, rewrite the record's data-offset
/// field, and clear its compression bits (the appended bytes are stored raw,
/// whatever the original payload was). Validation runs before any buffer is
/// touched, so a failing entry is an exact no-op; the commit then moves on to
/// the next entry.
///
/// The optional `callback` runs once per applied entry, with the node id and
/// the payload length.
pub fn commit(
	root: &mut ResourceRoot, ledger: &mut ReplacementLedger, mut callback: Option<&mut dyn FnMut(u32, u64)>,
) -> InternalResult<CommitSummary> {
	let mut summary = CommitSummary::default();

	for replacement in ledger.entries() {
		let node = replacement.node;

		let staged = try_stage(root, replacement);
		let (record_offset, flags, bytes) = match staged {
			Ok(staged) => staged,
			Err(err) => {
				warn!("skipping replacement for node {}: {}", node, err);
				summary.failures.push((node, err));
				continue;
			},
		};

		// Past this point the entry is valid; every write below succeeds.
		let new_offset = root.data_size() as u32;
		let length = bytes.len() as u32;

		let data = root.data.to_mut();
		data.reserve(4 + bytes.len());
		data.extend_from_slice(&length.to_be_bytes());
		data.extend_from_slice(&bytes);

		let tree = root.tree.to_mut();
		codec::write_u32(tree, record_offset + DATA_OFFSET_FIELD, new_offset);

		if flags.contains(Flags::COMPRESSION_MASK) {
			codec::write_u16(tree, record_offset + FLAGS_FIELD, flags.bits() & !Flags::COMPRESSION_MASK);
		};

		root.entries_affected += 1;
		summary.applied += 1;
		summary.bytes_appended += 4 + bytes.len() as u64;

		if let Some(callback) = callback.as_mut() {
			callback(node, bytes.len() as u64);
		};
	}

	debug_assert!(root.data_size() >= root.original_data_size());
	ledger.clear();

	Ok(summary)
}

// Everything that can reject an entry, gathered before any buffer mutation
fn try_stage<'a>(root: &ResourceRoot, replacement: &'a Replacement) -> InternalResult<(usize, Flags, Cow<'a, [u8]>)> {
	let record_offset = root.node_offset(replacement.node)?;
	let entry = root.entry(replacement.node)?;

	if entry.is_directory() {
		return Err(InternalError::NotAFile(replacement.node));
	};

	let bytes = replacement.source.read()?;

	if bytes.len() as u64 > u32::MAX as u64 {
		return Err(InternalError::ReplacementTooLarge(bytes.len() as u64));
	};

	if root.data_size() as u64 + 4 + bytes.len() as u64 > u32::MAX as u64 {
		return Err(InternalError::DataRegionOverflow);
	};

	Ok((record_offset, entry.flags, bytes))
}
