use std::path::{Path, PathBuf};
use std::{borrow::Cow, fs};

use crate::global::error::*;

/// Where a replacement payload comes from. In-memory bytes are staged as-is;
/// a file path is read when the commit reaches it, so an unreadable file is a
/// per-entry failure at commit time, not at staging time.
#[derive(Debug, Clone)]
pub enum ReplacementSource {
	/// The payload itself
	Bytes(Vec<u8>),
	/// A file to read the payload from at commit time
	File(PathBuf),
}

impl ReplacementSource {
	pub(crate) fn read(&self) -> InternalResult<Cow<'_, [u8]>> {
		match self {
			ReplacementSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
			ReplacementSource::File(path) => Ok(Cow::Owned(fs::read(path)?)),
		}
	}
}

impl From<Vec<u8>> for ReplacementSource {
	fn from(bytes: Vec<u8>) -> Self {
		ReplacementSource::Bytes(bytes)
	}
}

impl From<&[u8]> for ReplacementSource {
	fn from(bytes: &[u8]) -> Self {
		ReplacementSource::Bytes(bytes.to_vec())
	}
}

impl From<PathBuf> for ReplacementSource {
	fn from(path: PathBuf) -> Self {
		ReplacementSource::File(path)
	}
}

impl From<&Path> for ReplacementSource {
	fn from(path: &Path) -> Self {
		ReplacementSource::File(path.to_path_buf())
	}
}

/// One staged substitution: which node, and what bytes to put behind it
#[derive(Debug, Clone)]
pub struct Replacement {
	/// The record index of the target leaf
	pub node: u32,
	/// Where the payload comes from
	pub source: ReplacementSource,
}

/// The staged list of pending node substitutions, decoupled from any archive buffer.
///
/// Entries keep their insertion order and are applied in that order at commit, so
/// several entries targeting the same node resolve last-writer-wins. The ledger only
/// stages intent; it never touches a [`ResourceRoot`](crate::archive::ResourceRoot)
/// itself. Its lifetime is one patch cycle: the trigger builds it up, hands it to
/// [`commit`](super::commit), and the commit drains it.
///
/// There is no interior synchronization. A trigger that can stage from more than one
/// thread wraps the ledger in a `Mutex` and holds it across the whole commit cycle.
#[derive(Debug, Default)]
pub struct ReplacementLedger {
	entries: Vec<Replacement>,
}

impl ReplacementLedger {
	/// Creates an empty ledger
	pub fn new() -> ReplacementLedger {
		ReplacementLedger::default()
	}

	/// Appends a replacement for `node`
	pub fn add(&mut self, node: u32, source: impl Into<ReplacementSource>) {
		self.entries.push(Replacement {
			node,
			source: source.into(),
		});
	}

	/// Read-only snapshot of the staged entries, in insertion order
	pub fn entries(&self) -> &[Replacement] {
		&self.entries
	}

	/// Drops every staged entry
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Number of staged entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing is staged
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
