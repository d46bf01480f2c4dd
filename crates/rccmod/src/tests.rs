#![cfg(test)]
// This is meant to mirror as closely as possible, how users should use the crate

use crate::prelude::*;

// A hand-built archive, laid out exactly as the producer would emit it:
//
//   /            (node 0, directory)
//   ├── a.txt    (node 1, 10 bytes of 0xAA)
//   ├── b        (node 2, directory)
//   │   └── d.bin (node 4, 30 bytes of 0xCC)
//   └── c.txt    (node 3, 20 bytes of 0xBB)
//
// Children of one directory are consecutive records, and every child comes
// after its parent, which is how the producer orders the tree.

const PAYLOAD_A: [u8; 10] = [0xAA; 10];
const PAYLOAD_C: [u8; 20] = [0xBB; 20];
const PAYLOAD_D: [u8; 30] = [0xCC; 30];

fn push_name(names: &mut Vec<u8>, name: &str) -> u32 {
	let offset = names.len() as u32;
	let units: Vec<u16> = name.encode_utf16().collect();

	names.extend_from_slice(&(units.len() as u16).to_be_bytes());
	names.extend_from_slice(&0u32.to_be_bytes()); // name hash, unread here

	for unit in units {
		names.extend_from_slice(&unit.to_be_bytes());
	}

	offset
}

fn push_data(data: &mut Vec<u8>, payload: &[u8]) -> u32 {
	let offset = data.len() as u32;
	data.extend_from_slice(&(payload.len() as u32).to_be_bytes());
	data.extend_from_slice(payload);
	offset
}

fn push_directory(tree: &mut Vec<u8>, name_offset: u32, child_count: u32, first_child: u32) {
	tree.extend_from_slice(&name_offset.to_be_bytes());
	tree.extend_from_slice(&Flags::DIRECTORY.to_be_bytes());
	tree.extend_from_slice(&child_count.to_be_bytes());
	tree.extend_from_slice(&first_child.to_be_bytes());
	tree.extend_from_slice(&0u64.to_be_bytes());
}

fn push_file(tree: &mut Vec<u8>, name_offset: u32, flags: u16, data_offset: u32) {
	tree.extend_from_slice(&name_offset.to_be_bytes());
	tree.extend_from_slice(&flags.to_be_bytes());
	tree.extend_from_slice(&0u32.to_be_bytes()); // locale-neutral
	tree.extend_from_slice(&data_offset.to_be_bytes());
	tree.extend_from_slice(&0u64.to_be_bytes());
}

fn sample_regions() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
	let mut names = Vec::new();
	let name_a = push_name(&mut names, "a.txt");
	let name_b = push_name(&mut names, "b");
	let name_c = push_name(&mut names, "c.txt");
	let name_d = push_name(&mut names, "d.bin");

	let mut data = Vec::new();
	let data_a = push_data(&mut data, &PAYLOAD_A);
	let data_c = push_data(&mut data, &PAYLOAD_C);
	let data_d = push_data(&mut data, &PAYLOAD_D);

	let mut tree = Vec::new();
	push_directory(&mut tree, 0, 3, 1);
	push_file(&mut tree, name_a, 0, data_a);
	push_directory(&mut tree, name_b, 1, 4);
	push_file(&mut tree, name_c, 0, data_c);
	push_file(&mut tree, name_d, 0, data_d);

	(tree, names, data)
}

fn sample_root() -> ResourceRoot<'static> {
	let (tree, names, data) = sample_regions();
	ResourceRoot::from_regions(tree, names, data, 2).unwrap()
}

#[test]
fn node_offsets_scale_with_the_record_size() {
	let root = sample_root();

	for node in 0..root.node_count() {
		assert_eq!(root.node_offset(node).unwrap(), node as usize * crate::TREE_ENTRY_SIZE);
	}

	assert!(matches!(root.node_offset(5), Err(InternalError::InvalidNode(5, 110))));
	assert!(matches!(root.node_offset(u32::MAX), Err(InternalError::InvalidNode(..))));
}

#[test]
fn decoding_then_reencoding_is_byte_identical() {
	let root = sample_root();

	for node in 0..root.node_count() {
		let offset = root.node_offset(node).unwrap();
		let record = &root.tree_bytes()[offset..offset + crate::TREE_ENTRY_SIZE];

		let entry = root.entry(node).unwrap();
		assert_eq!(entry.encode().as_slice(), record, "node {} did not round-trip", node);
	}
}

#[test]
fn names_resolve_exactly() {
	let root = sample_root();

	assert_eq!(root.name_of(0).unwrap(), "");
	assert_eq!(root.name_of(1).unwrap(), "a.txt");
	assert_eq!(root.name_of(2).unwrap(), "b");
	assert_eq!(root.name_of(3).unwrap(), "c.txt");
	assert_eq!(root.name_of(4).unwrap(), "d.bin");
}

#[test]
fn name_truncation_is_observable() {
	let root = sample_root();

	// roomy buffer: full copy, true length reported
	let mut buffer = [0u8; 16];
	let length = root.name_into(1, &mut buffer).unwrap();
	assert_eq!(length, 5);
	assert_eq!(&buffer[..length], b"a.txt");

	// short buffer: prefix copied, true length still reported
	let mut small = [0u8; 3];
	let length = root.name_into(1, &mut small).unwrap();
	assert_eq!(length, 5);
	assert!(length > small.len());
	assert_eq!(&small, b"a.t");
}

#[test]
fn walk_visits_in_archive_order() {
	let root = sample_root();
	let mut visited = Vec::new();

	root.walk(0, |node, path, _| {
		visited.push((node, path.to_string()));
		Ok(())
	})
	.unwrap();

	let expected = [
		(0, ""),
		(1, "a.txt"),
		(2, "b"),
		(4, "b/d.bin"),
		(3, "c.txt"),
	];

	assert_eq!(visited.len(), expected.len());
	for ((node, path), (expected_node, expected_path)) in visited.iter().zip(expected) {
		assert_eq!(*node, expected_node);
		assert_eq!(path, expected_path);
	}
}

#[test]
fn walk_from_a_subdirectory_roots_paths_there() {
	let root = sample_root();
	let mut visited = Vec::new();

	root.walk(2, |_, path, _| {
		visited.push(path.to_string());
		Ok(())
	})
	.unwrap();

	assert_eq!(visited, ["b", "b/d.bin"]);
}

#[test]
fn stat_aggregates_sizes_and_counts() {
	let root = sample_root();
	let stat = root.stat(0).unwrap();

	assert_eq!(stat.files, 3);
	assert_eq!(stat.directories, 2);
	assert_eq!(stat.bytes, 60);

	// scoped to the subdirectory
	let stat = root.stat(2).unwrap();
	assert_eq!(stat.files, 1);
	assert_eq!(stat.directories, 1);
	assert_eq!(stat.bytes, 30);
}

#[test]
fn paths_resolve_to_nodes() {
	let root = sample_root();

	assert_eq!(root.node_for_path("").unwrap(), 0);
	assert_eq!(root.node_for_path("a.txt").unwrap(), 1);
	assert_eq!(root.node_for_path("b/d.bin").unwrap(), 4);
	assert_eq!(root.node_for_path("/b//d.bin").unwrap(), 4);

	assert!(matches!(
		root.node_for_path("missing"),
		Err(InternalError::MissingResourceError(_))
	));

	// a file node cannot appear mid-path
	assert!(matches!(
		root.node_for_path("a.txt/nested"),
		Err(InternalError::MissingResourceError(_))
	));
}

#[test]
fn fetch_returns_the_stored_payload() {
	let root = sample_root();

	let resource = root.fetch("a.txt").unwrap();
	assert_eq!(resource.data.as_ref(), &PAYLOAD_A);
	assert_eq!(resource.node, 1);
	assert!(!resource.flags.is_directory());

	assert!(matches!(root.fetch_node(2), Err(InternalError::NotAFile(2))));
}

#[test]
fn corrupt_child_ranges_surface_as_structural_failures() {
	let (mut tree, names, data) = sample_regions();

	// point the subdirectory's children back at the root
	tree[2 * crate::TREE_ENTRY_SIZE + 10..2 * crate::TREE_ENTRY_SIZE + 14].copy_from_slice(&0u32.to_be_bytes());

	let root = ResourceRoot::from_regions(tree, names, data, 2).unwrap();
	assert!(matches!(
		root.walk(0, |_, _, _| Ok(())),
		Err(InternalError::MalformedChildRange(2))
	));
}

#[test]
fn lopsided_tree_regions_are_rejected() {
	let (mut tree, names, data) = sample_regions();
	tree.pop();

	assert!(matches!(
		ResourceRoot::from_regions(tree, names, data, 2),
		Err(InternalError::MalformedTreeRegion(109))
	));
}

#[test]
fn unsupported_versions_are_rejected() {
	let (tree, names, data) = sample_regions();

	assert!(matches!(
		ResourceRoot::from_regions(tree, names, data, 7),
		Err(InternalError::IncompatibleArchiveVersionError(7))
	));
}

#[test]
#[cfg(feature = "dump")]
fn dumped_leaf_matches_its_payload() -> InternalResult {
	use crate::dump::{dump_node, DumpOptions};

	let root = sample_root();
	let workspace = tempfile::tempdir()?;
	let target = workspace.path().join("d.bin");

	let summary = dump_node(&root, 4, "res", &target, &DumpOptions::default(), None)?;
	assert_eq!(summary.files_written, 1);
	assert_eq!(summary.bytes_written, 30);

	let written = std::fs::read(&target)?;
	assert_eq!(written.as_slice(), root.payload(4)?);

	Ok(())
}

#[test]
#[cfg(feature = "dump")]
fn dumping_a_directory_recreates_the_subtree() -> InternalResult {
	use crate::dump::{dump_node, DumpOptions};

	let root = sample_root();
	let workspace = tempfile::tempdir()?;
	let target = workspace.path().to_path_buf();

	let mut seen = Vec::new();
	let mut callback = |path: &str, _: u64| seen.push(path.to_string());

	let summary = dump_node(&root, 0, "res", &target, &DumpOptions::default(), Some(&mut callback))?;
	assert_eq!(summary.files_written, 3);
	assert_eq!(summary.bytes_written, 60);
	assert!(summary.failures.is_empty());
	assert_eq!(seen, ["res/a.txt", "res/b/d.bin", "res/c.txt"]);

	assert_eq!(std::fs::read(target.join("a.txt"))?.as_slice(), &PAYLOAD_A);
	assert_eq!(std::fs::read(target.join("b/d.bin"))?.as_slice(), &PAYLOAD_D);
	assert_eq!(std::fs::read(target.join("c.txt"))?.as_slice(), &PAYLOAD_C);

	// a second pass with skip_existing touches nothing
	let options = DumpOptions::default().skip_existing(true);
	let summary = dump_node(&root, 0, "res", &target, &options, None)?;
	assert_eq!(summary.files_written, 0);
	assert_eq!(summary.skipped, 3);

	Ok(())
}

#[test]
#[cfg(feature = "dump")]
fn non_recursive_dump_stays_shallow() -> InternalResult {
	use crate::dump::{dump_node, DumpOptions};

	let root = sample_root();
	let workspace = tempfile::tempdir()?;
	let target = workspace.path().to_path_buf();

	let options = DumpOptions::default().recursive(false);
	let summary = dump_node(&root, 0, "res", &target, &options, None)?;

	assert_eq!(summary.files_written, 2);
	assert!(!target.join("b/d.bin").exists());

	Ok(())
}

#[test]
#[cfg(feature = "dump")]
fn dump_option_bits_decode_once() {
	use crate::dump::DumpOptions;

	let options = DumpOptions::from_bits(DumpOptions::RECURSIVE | DumpOptions::SKIP_EXISTING | DumpOptions::RAW);
	assert!(options.recursive);
	assert!(!options.overwrite);
	assert!(options.skip_existing);
	assert!(!options.decompress);
}

#[test]
#[cfg(feature = "patch")]
fn commit_applies_a_replacement() -> InternalResult {
	let mut root = sample_root();
	let original_data_size = root.original_data_size();
	let frozen: Vec<u8> = root.data_bytes().to_vec();

	let mut ledger = ReplacementLedger::new();
	ledger.add(1, vec![1, 2, 3]);

	let summary = commit(&mut root, &mut ledger, None)?;
	assert_eq!(summary.applied, 1);
	assert_eq!(summary.bytes_appended, 7);
	assert!(summary.failures.is_empty());
	assert!(ledger.is_empty());

	assert_eq!(root.entries_affected(), 1);
	assert_eq!(root.data_size(), original_data_size + 7);
	assert_eq!(root.fetch("a.txt")?.data.as_ref(), &[1, 2, 3]);

	// the record now points past the original region
	assert_eq!(root.entry(1)?.data_offset(), Some(original_data_size as u32));

	// every original byte is untouched
	assert_eq!(&root.data_bytes()[..original_data_size], frozen.as_slice());

	Ok(())
}

#[test]
#[cfg(feature = "patch")]
fn commit_on_an_invalid_node_is_an_exact_noop() -> InternalResult {
	let mut root = sample_root();
	let frozen_tree: Vec<u8> = root.tree_bytes().to_vec();
	let frozen_data: Vec<u8> = root.data_bytes().to_vec();

	let mut ledger = ReplacementLedger::new();
	ledger.add(99, vec![1, 2, 3]);

	let summary = commit(&mut root, &mut ledger, None)?;
	assert_eq!(summary.applied, 0);
	assert_eq!(summary.failures.len(), 1);
	assert!(matches!(&summary.failures[0], (99, InternalError::InvalidNode(99, _))));

	assert_eq!(root.entries_affected(), 0);
	assert_eq!(root.tree_bytes(), frozen_tree.as_slice());
	assert_eq!(root.data_bytes(), frozen_data.as_slice());

	Ok(())
}

#[test]
#[cfg(feature = "patch")]
fn directories_are_not_replaceable() -> InternalResult {
	let mut root = sample_root();
	let frozen_tree: Vec<u8> = root.tree_bytes().to_vec();

	let mut ledger = ReplacementLedger::new();
	ledger.add(2, vec![0xFF]);

	let summary = commit(&mut root, &mut ledger, None)?;
	assert!(matches!(&summary.failures[0], (2, InternalError::NotAFile(2))));
	assert_eq!(root.entries_affected(), 0);
	assert_eq!(root.tree_bytes(), frozen_tree.as_slice());

	Ok(())
}

#[test]
#[cfg(feature = "patch")]
fn an_unreadable_source_skips_only_its_entry() -> InternalResult {
	let mut root = sample_root();

	let mut ledger = ReplacementLedger::new();
	ledger.add(1, std::path::Path::new("surely/this/file/does/not/exist"));
	ledger.add(3, vec![7; 5]);

	let summary = commit(&mut root, &mut ledger, None)?;
	assert_eq!(summary.applied, 1);
	assert_eq!(summary.failures.len(), 1);
	assert!(matches!(&summary.failures[0], (1, InternalError::IOError(_))));

	// the sibling entry still landed
	assert_eq!(root.entries_affected(), 1);
	assert_eq!(root.fetch("c.txt")?.data.as_ref(), &[7; 5]);
	assert_eq!(root.fetch("a.txt")?.data.as_ref(), &PAYLOAD_A);

	Ok(())
}

#[test]
#[cfg(feature = "patch")]
fn the_last_writer_wins() -> InternalResult {
	let mut root = sample_root();
	let original_data_size = root.original_data_size();

	let mut ledger = ReplacementLedger::new();
	ledger.add(1, vec![0x01; 4]);
	ledger.add(1, vec![0x02; 8]);

	let mut order = Vec::new();
	let mut callback = |node: u32, length: u64| order.push((node, length));

	let summary = commit(&mut root, &mut ledger, Some(&mut callback))?;
	assert_eq!(summary.applied, 2);
	assert_eq!(root.entries_affected(), 2);
	assert_eq!(order, [(1, 4), (1, 8)]);

	// the record points at the second payload, appended after the first
	assert_eq!(root.entry(1)?.data_offset(), Some((original_data_size + 8) as u32));
	assert_eq!(root.fetch("a.txt")?.data.as_ref(), &[0x02; 8]);

	Ok(())
}

#[test]
#[cfg(feature = "patch")]
fn the_original_region_survives_repeated_commits() -> InternalResult {
	let mut root = sample_root();
	let original_data_size = root.original_data_size();
	let frozen: Vec<u8> = root.data_bytes()[..original_data_size].to_vec();

	for round in 0u8..4 {
		let mut ledger = ReplacementLedger::new();
		ledger.add(1, vec![round; 16]);
		ledger.add(4, vec![round ^ 0xFF; 9]);
		commit(&mut root, &mut ledger, None)?;
	}

	assert_eq!(root.entries_affected(), 8);
	assert_eq!(root.original_data_size(), original_data_size);
	assert_eq!(&root.data_bytes()[..original_data_size], frozen.as_slice());

	// the live view reflects the final round
	assert_eq!(root.fetch("a.txt")?.data.as_ref(), &[3; 16]);
	assert_eq!(root.fetch("b/d.bin")?.data.as_ref(), &[3 ^ 0xFF; 9]);

	Ok(())
}

#[test]
fn containers_round_trip() -> InternalResult {
	let root = sample_root();

	let mut buffer = Vec::new();
	let written = container::write(&root, &mut buffer)?;
	assert_eq!(written as usize, buffer.len());

	let reopened = ResourceRoot::from_rcc(&buffer)?;
	assert_eq!(reopened.version(), root.version());
	assert_eq!(reopened.tree_bytes(), root.tree_bytes());
	assert_eq!(reopened.fetch("b/d.bin")?.data.as_ref(), &PAYLOAD_D);

	let stat = reopened.stat(0)?;
	assert_eq!(stat.files, 3);
	assert_eq!(stat.bytes, 60);

	Ok(())
}

#[test]
#[cfg(feature = "patch")]
fn a_patched_container_reopens_with_the_substitution() -> InternalResult {
	let mut root = sample_root();

	let mut ledger = ReplacementLedger::new();
	ledger.add(3, b"substituted".as_slice());
	commit(&mut root, &mut ledger, None)?;

	let mut buffer = Vec::new();
	container::write(&root, &mut buffer)?;

	let reopened = ResourceRoot::from_rcc_owned(buffer)?;
	assert_eq!(reopened.fetch("c.txt")?.data.as_ref(), b"substituted");

	// bookkeeping is per live view, not serialized
	assert_eq!(reopened.entries_affected(), 0);

	Ok(())
}

#[test]
fn malformed_containers_are_rejected() {
	let root = sample_root();
	let mut buffer = Vec::new();
	container::write(&root, &mut buffer).unwrap();

	// clobbered magic
	let mut clobbered = buffer.clone();
	clobbered[0] = b'Q';
	assert!(matches!(
		ResourceRoot::from_rcc(&clobbered),
		Err(InternalError::MalformedArchiveSource(_))
	));

	// version 1 trees use 14-byte records, not decodable here
	let mut ancient = buffer.clone();
	ancient[4..8].copy_from_slice(&1u32.to_be_bytes());
	assert!(matches!(
		ResourceRoot::from_rcc(&ancient),
		Err(InternalError::IncompatibleArchiveVersionError(1))
	));

	// too short to even hold a header
	assert!(matches!(
		ResourceRoot::from_rcc(&buffer[..10]),
		Err(InternalError::TruncatedArchiveSource(10))
	));
}

#[test]
#[cfg(feature = "compression")]
fn compressed_payloads_expand_on_fetch() -> InternalResult {
	use std::io::Write;

	let plain = b"what gets deflated must get inflated".repeat(8);

	// zlib leaves carry their expanded size ahead of the stream
	let mut deflated = Vec::from((plain.len() as u32).to_be_bytes());
	let mut encoder = flate2::write::ZlibEncoder::new(&mut deflated, flate2::Compression::default());
	encoder.write_all(&plain)?;
	encoder.finish()?;

	let zstded = zstd::stream::encode_all(plain.as_slice(), 0).unwrap();

	let mut names = Vec::new();
	let name_z = push_name(&mut names, "z.qml");
	let name_s = push_name(&mut names, "s.qml");

	let mut data = Vec::new();
	let data_z = push_data(&mut data, &deflated);
	let data_s = push_data(&mut data, &zstded);

	let mut tree = Vec::new();
	push_directory(&mut tree, 0, 2, 1);
	push_file(&mut tree, name_z, Flags::COMPRESSED, data_z);
	push_file(&mut tree, name_s, Flags::COMPRESSED_ZSTD, data_s);

	let root = ResourceRoot::from_regions(tree, names, data, 3)?;

	assert_eq!(root.fetch("z.qml")?.data.as_ref(), plain.as_slice());
	assert_eq!(root.fetch("s.qml")?.data.as_ref(), plain.as_slice());

	// the raw payload accessor stays raw
	assert_ne!(root.payload(1)?, plain.as_slice());

	Ok(())
}

#[test]
fn flags_render_compactly() {
	let flags = Flags::from_bits(Flags::DIRECTORY);
	assert_eq!(format!("{}", flags), "Flags[D--]");

	let mut flags = Flags::new();
	flags.force_set(Flags::COMPRESSED | Flags::COMPRESSED_ZSTD, true);
	assert_eq!(format!("{}", flags), "Flags[-CZ]");

	flags.force_set(Flags::COMPRESSED, false);
	assert!(flags.contains(Flags::COMPRESSED_ZSTD));
	assert!(!flags.contains(Flags::COMPRESSED));
}
