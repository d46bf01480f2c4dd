//! Depth-first traversal over the tree region, in the exact child order the
//! records encode. Path composition, subtree statistics and path lookup are
//! all built on the same walk.

use std::ops::Range;

use super::node::{Entry, EntryKind};
use super::root::ResourceRoot;
use crate::global::error::*;

/// Aggregate counts over one subtree, as gathered by [`ResourceRoot::stat`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStat {
	/// Number of file nodes visited
	pub files: u64,
	/// Number of directory nodes visited, the subtree root included
	pub directories: u64,
	/// Total payload bytes across all visited file nodes
	pub bytes: u64,
}

impl ResourceRoot<'_> {
	/// The record indices of `node`'s immediate children, in encoded order.
	///
	/// Children always come after their parent in the tree region; a record that
	/// violates that, or whose range runs past the region, is archive corruption.
	pub fn children(&self, node: u32) -> InternalResult<Range<u32>> {
		let entry = self.entry(node)?;

		let EntryKind::Directory {
			child_count,
			first_child,
		} = entry.kind
		else {
			return Err(InternalError::NotADirectory(node));
		};

		if child_count == 0 {
			return Ok(0..0);
		};

		let end = first_child as u64 + child_count as u64;
		if first_child <= node || end > self.node_count() as u64 {
			return Err(InternalError::MalformedChildRange(node));
		};

		Ok(first_child..end as u32)
	}

	/// Visits `node` and its whole subtree depth-first, children in the exact order the
	/// records encode them. The visitor receives each node's id, its slash-separated
	/// path relative to the walk's starting point, and its decoded record.
	///
	/// The walk aborts on the first structural failure, and on the first error the
	/// visitor returns.
	pub fn walk<F>(&self, node: u32, mut visitor: F) -> InternalResult<()>
	where
		F: FnMut(u32, &str, &Entry) -> InternalResult<()>,
	{
		let mut path = self.name_of(node)?;
		self.walk_inner(node, &mut path, &mut visitor)
	}

	fn walk_inner<F>(&self, node: u32, path: &mut String, visitor: &mut F) -> InternalResult<()>
	where
		F: FnMut(u32, &str, &Entry) -> InternalResult<()>,
	{
		let entry = self.entry(node)?;
		visitor(node, path.as_str(), &entry)?;

		if entry.is_directory() {
			for child in self.children(node)? {
				let name = self.name_of(child)?;
				let parent_len = path.len();

				if !path.is_empty() {
					path.push('/');
				};
				path.push_str(&name);

				self.walk_inner(child, path, visitor)?;
				path.truncate(parent_len);
			}
		};

		Ok(())
	}

	/// Walks `node`'s subtree accumulating file/directory counts and total payload bytes
	pub fn stat(&self, node: u32) -> InternalResult<ArchiveStat> {
		let mut stat = ArchiveStat::default();

		self.walk(node, |id, _, entry| {
			match entry.kind {
				EntryKind::Directory { .. } => stat.directories += 1,
				EntryKind::File { .. } => {
					stat.files += 1;
					stat.bytes += self.payload(id)?.len() as u64;
				},
			};

			Ok(())
		})?;

		Ok(stat)
	}

	/// Resolves a slash-separated path like `"icons/save.svg"` to a record index, walking
	/// children segment by segment. Empty segments are skipped, so `"/icons//save.svg"`
	/// resolves too; the empty path resolves to the root node.
	pub fn node_for_path(&self, path: &str) -> InternalResult<u32> {
		let mut node = 0u32;

		for segment in path.split('/').filter(|s| !s.is_empty()) {
			let children = match self.children(node) {
				Ok(range) => range,
				Err(InternalError::NotADirectory(_)) => return Err(InternalError::MissingResourceError(path.to_string())),
				Err(err) => return Err(err),
			};

			let mut found = None;
			for child in children {
				if self.name_of(child)? == segment {
					found = Some(child);
					break;
				};
			}

			node = match found {
				Some(child) => child,
				None => return Err(InternalError::MissingResourceError(path.to_string())),
			};
		}

		Ok(node)
	}
}
