//! Dump node payloads, or whole subtrees, onto the filesystem.
//!
//! The boundary accepts the trigger's raw option bitmask, decodes it once into
//! a named [`DumpOptions`] and never re-reads the bits afterwards. A failure to
//! write one node is reported for that node and logged; its siblings are still
//! processed. Structural failures (a record or offset outside its region) are
//! archive corruption and abort the whole dump.

use std::{
	fs::{self, File},
	io::Write,
	path::Path,
};

use log::warn;

use crate::global::error::*;
use crate::loader::root::ResourceRoot;

/// Decoded dump behavior. Build one directly, or decode a boundary bitmask with
/// [`from_bits`](DumpOptions::from_bits).
#[derive(Debug, Clone, Copy)]
pub struct DumpOptions {
	/// Descend into subdirectories; off dumps only a directory's immediate file children
	pub recursive: bool,
	/// Replace files that already exist at a target path
	pub overwrite: bool,
	/// Silently skip nodes whose target path already exists
	pub skip_existing: bool,
	/// Expand compressed payloads before writing (needs the `compression` feature)
	pub decompress: bool,
}

impl DumpOptions {
	/// Bitmask bit: descend into subdirectories
	pub const RECURSIVE: u16 = 0x01;
	/// Bitmask bit: replace existing files
	pub const OVERWRITE: u16 = 0x02;
	/// Bitmask bit: skip nodes already present on disk
	pub const SKIP_EXISTING: u16 = 0x04;
	/// Bitmask bit: write payloads exactly as stored, compressed bytes included
	pub const RAW: u16 = 0x08;

	/// Decodes a boundary bitmask into named options
	pub fn from_bits(bits: u16) -> DumpOptions {
		DumpOptions {
			recursive: bits & DumpOptions::RECURSIVE != 0,
			overwrite: bits & DumpOptions::OVERWRITE != 0,
			skip_existing: bits & DumpOptions::SKIP_EXISTING != 0,
			decompress: bits & DumpOptions::RAW == 0,
		}
	}

	/// Setter for the [`recursive`](DumpOptions::recursive) field
	pub fn recursive(mut self, recursive: bool) -> Self {
		self.recursive = recursive;
		self
	}

	/// Setter for the [`overwrite`](DumpOptions::overwrite) field
	pub fn overwrite(mut self, overwrite: bool) -> Self {
		self.overwrite = overwrite;
		self
	}

	/// Setter for the [`skip_existing`](DumpOptions::skip_existing) field
	pub fn skip_existing(mut self, skip_existing: bool) -> Self {
		self.skip_existing = skip_existing;
		self
	}

	/// Setter for the [`decompress`](DumpOptions::decompress) field
	pub fn decompress(mut self, decompress: bool) -> Self {
		self.decompress = decompress;
		self
	}
}

impl Default for DumpOptions {
	fn default() -> DumpOptions {
		DumpOptions {
			recursive: true,
			overwrite: true,
			skip_existing: false,
			decompress: true,
		}
	}
}

/// What one dump call did, per-node failures included
#[derive(Debug, Default)]
pub struct DumpSummary {
	/// Files written out
	pub files_written: usize,
	/// Total payload bytes written
	pub bytes_written: u64,
	/// Nodes skipped because their target already existed
	pub skipped: usize,
	/// Per-node failures: the node's composed path and what went wrong
	pub failures: Vec<(String, InternalError)>,
}

/// Dumps `node` to the filesystem.
///
/// A file node's payload is written to `target` exactly. A directory node is
/// re-created at `target` and its children are written underneath it, descending
/// per [`DumpOptions::recursive`]. `root_name` prefixes the composed paths used
/// in logging and in the summary, mirroring how the archive's own path
/// composition roots at the archive name.
///
/// The optional `callback` runs once per file written, with the node's composed
/// path and the byte count.
pub fn dump_node(
	root: &ResourceRoot, node: u32, root_name: &str, target: &Path, options: &DumpOptions,
	mut callback: Option<&mut dyn FnMut(&str, u64)>,
) -> InternalResult<DumpSummary> {
	let entry = root.entry(node)?;
	let mut summary = DumpSummary::default();

	let mut label = String::from(root_name);
	let name = root.name_of(node)?;
	if !name.is_empty() {
		if !label.is_empty() {
			label.push('/');
		};
		label.push_str(&name);
	};

	if entry.is_directory() {
		dump_directory(root, node, &mut label, target, options, &mut summary, &mut callback)?;
	} else {
		write_leaf(root, node, &label, target, options, &mut summary, &mut callback)?;
	};

	Ok(summary)
}

fn dump_directory(
	root: &ResourceRoot, node: u32, label: &mut String, target: &Path, options: &DumpOptions, summary: &mut DumpSummary,
	callback: &mut Option<&mut dyn FnMut(&str, u64)>,
) -> InternalResult<()> {
	if let Err(err) = fs::create_dir_all(target) {
		warn!("unable to create {}: {}", target.display(), err);
		summary.failures.push((label.to_string(), err.into()));
		return Ok(());
	};

	for child in root.children(node)? {
		let name = root.name_of(child)?;
		let child_target = target.join(&name);

		let parent_len = label.len();
		if !label.is_empty() {
			label.push('/');
		};
		label.push_str(&name);

		if root.entry(child)?.is_directory() {
			if options.recursive {
				dump_directory(root, child, label, &child_target, options, summary, callback)?;
			};
		} else {
			write_leaf(root, child, label, &child_target, options, summary, callback)?;
		};

		label.truncate(parent_len);
	}

	Ok(())
}

// One leaf to one file. IO trouble lands in the summary, bounds/format trouble aborts.
fn write_leaf(
	root: &ResourceRoot, node: u32, label: &str, target: &Path, options: &DumpOptions, summary: &mut DumpSummary,
	callback: &mut Option<&mut dyn FnMut(&str, u64)>,
) -> InternalResult<()> {
	if target.exists() && (options.skip_existing || !options.overwrite) {
		summary.skipped += 1;
		return Ok(());
	};

	let bytes = if options.decompress {
		match root.fetch_node(node) {
			Ok(resource) => resource.data,
			Err(err @ InternalError::MissingFeatureError(_)) | Err(err @ InternalError::DeCompressionError(_)) => {
				warn!("unable to expand {}: {}", label, err);
				summary.failures.push((label.to_string(), err));
				return Ok(());
			},
			Err(err) => return Err(err),
		}
	} else {
		Box::from(root.payload(node)?)
	};

	let written = File::create(target).and_then(|mut file| file.write_all(&bytes));

	match written {
		Ok(()) => {
			summary.files_written += 1;
			summary.bytes_written += bytes.len() as u64;

			if let Some(callback) = callback.as_mut() {
				callback(label, bytes.len() as u64);
			};
		},
		Err(err) => {
			warn!("unable to dump {} to {}: {}", label, target.display(), err);
			summary.failures.push((label.to_string(), err.into()));
		},
	};

	Ok(())
}
