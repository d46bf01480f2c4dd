use std::{borrow::Cow, fmt};

use super::resource::Resource;
use crate::global::{error::*, flags::Flags};

/// The live view over one resource archive: the `tree`, `name` and `data` regions the
/// host registered, plus the bookkeeping the patcher needs.
///
/// Regions are clone-on-write: construct it over borrowed memory (eg the host's mapped
/// archive) and it stays zero-copy until a commit actually mutates a region. The extents
/// of the regions are the buffer lengths themselves, they are never caller-supplied
/// numbers that could disagree with the memory behind them.
#[derive(Debug)]
pub struct ResourceRoot<'a> {
	pub(crate) tree: Cow<'a, [u8]>,
	pub(crate) name: Cow<'a, [u8]>,
	pub(crate) data: Cow<'a, [u8]>,

	pub(crate) version: u32,
	pub(crate) original_data_size: usize,
	pub(crate) entries_affected: usize,
}

impl<'a> ResourceRoot<'a> {
	/// Builds a [`ResourceRoot`] over three raw regions, as handed over by the trigger
	/// that intercepted the host's archive registration.
	///
	/// The tree region must hold a whole number of records and at least the root record,
	/// and `version` must be a format version this implementation decodes.
	pub fn from_regions(
		tree: impl Into<Cow<'a, [u8]>>, name: impl Into<Cow<'a, [u8]>>, data: impl Into<Cow<'a, [u8]>>, version: u32,
	) -> InternalResult<ResourceRoot<'a>> {
		if !(crate::FORMAT_VERSION_MIN..=crate::FORMAT_VERSION_MAX).contains(&version) {
			return Err(InternalError::IncompatibleArchiveVersionError(version));
		};

		let tree = tree.into();
		if tree.len() < crate::TREE_ENTRY_SIZE || tree.len() % crate::TREE_ENTRY_SIZE != 0 {
			return Err(InternalError::MalformedTreeRegion(tree.len()));
		};

		let data = data.into();
		let original_data_size = data.len();

		Ok(ResourceRoot {
			tree,
			name: name.into(),
			data,
			version,
			original_data_size,
			entries_affected: 0,
		})
	}

	/// Parses a whole `.rcc` container, borrowing its three regions out of `source`.
	pub fn from_rcc(source: &'a [u8]) -> InternalResult<ResourceRoot<'a>> {
		crate::container::parse(source)
	}

	/// Parses a whole `.rcc` container into a root that owns its regions, untying it
	/// from the source buffer's lifetime.
	pub fn from_rcc_owned(source: Vec<u8>) -> InternalResult<ResourceRoot<'static>> {
		crate::container::parse_owned(source)
	}

	/// The archive's format version, as read from the container header or passed at construction
	#[inline(always)]
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Current extent of the tree region in bytes
	#[inline(always)]
	pub fn tree_size(&self) -> usize {
		self.tree.len()
	}

	/// Current extent of the name region in bytes
	#[inline(always)]
	pub fn name_size(&self) -> usize {
		self.name.len()
	}

	/// Current extent of the data region in bytes. Grows with every committed replacement.
	#[inline(always)]
	pub fn data_size(&self) -> usize {
		self.data.len()
	}

	/// The extent of the data region at decode time. Every byte at an offset below this
	/// is original archive content and is never rewritten; every byte at or beyond it is
	/// appended replacement payload.
	#[inline(always)]
	pub fn original_data_size(&self) -> usize {
		self.original_data_size
	}

	/// How many replacements have been committed into this root so far
	#[inline(always)]
	pub fn entries_affected(&self) -> usize {
		self.entries_affected
	}

	/// Number of records the tree region holds
	#[inline(always)]
	pub fn node_count(&self) -> u32 {
		(self.tree.len() / crate::TREE_ENTRY_SIZE) as u32
	}

	/// The tree region as it currently stands, committed field rewrites included.
	/// The trigger copies this back over the host's live tree after a commit.
	#[inline(always)]
	pub fn tree_bytes(&self) -> &[u8] {
		&self.tree
	}

	/// The name region
	#[inline(always)]
	pub fn name_bytes(&self) -> &[u8] {
		&self.name
	}

	/// The data region as it currently stands, appended replacement payloads included
	#[inline(always)]
	pub fn data_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Resolves `path` and reads that leaf's payload into a [`Resource`].
	///
	/// Compressed payloads are expanded when the `compression` feature is enabled,
	/// otherwise they surface [`MissingFeatureError`](InternalError::MissingFeatureError).
	pub fn fetch(&self, path: impl AsRef<str>) -> InternalResult<Resource> {
		let node = self.node_for_path(path.as_ref())?;
		self.fetch_node(node)
	}

	/// Same as [`fetch`](ResourceRoot::fetch), addressing the leaf by node id instead of path
	pub fn fetch_node(&self, node: u32) -> InternalResult<Resource> {
		let entry = self.entry(node)?;
		let raw = self.payload(node)?;

		let data = self.process(node, entry.flags, raw)?;

		Ok(Resource {
			data,
			flags: entry.flags,
			node,
			last_modified: entry.last_modified,
		})
	}

	// Expand a compressed payload. The zlib layout prefixes the deflate stream with its
	// 32-bit expanded size; zstd payloads are a bare frame.
	#[cfg(feature = "compression")]
	fn process(&self, node: u32, flags: Flags, raw: &[u8]) -> InternalResult<Box<[u8]>> {
		use std::io::Read;

		if flags.contains(Flags::COMPRESSED) {
			if raw.len() < 4 {
				return Err(InternalError::DeCompressionError(format!(
					"leaf {} is too short to carry its expanded size",
					node
				)));
			}

			let expected = crate::global::codec::read_u32(raw, 0) as usize;
			let mut target = Vec::with_capacity(expected);

			let mut decoder = flate2::read::ZlibDecoder::new(&raw[4..]);
			decoder
				.read_to_end(&mut target)
				.map_err(|err| InternalError::DeCompressionError(err.to_string()))?;

			Ok(target.into_boxed_slice())
		} else if flags.contains(Flags::COMPRESSED_ZSTD) {
			let target = zstd::stream::decode_all(raw).map_err(|err| InternalError::DeCompressionError(err.to_string()))?;
			Ok(target.into_boxed_slice())
		} else {
			Ok(Box::from(raw))
		}
	}

	#[cfg(not(feature = "compression"))]
	fn process(&self, _node: u32, flags: Flags, raw: &[u8]) -> InternalResult<Box<[u8]>> {
		if flags.contains(Flags::COMPRESSION_MASK) {
			return Err(InternalError::MissingFeatureError("compression"));
		};

		Ok(Box::from(raw))
	}
}

impl fmt::Display for ResourceRoot<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"[ResourceRoot] version: {}, nodes: {}, tree: {}B, names: {}B, data: {}B ({}B original), entries affected: {}",
			self.version,
			self.node_count(),
			self.tree.len(),
			self.name.len(),
			self.data.len(),
			self.original_data_size,
			self.entries_affected,
		)
	}
}
