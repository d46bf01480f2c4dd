use std::fs::File;

use tabled::{
	Table, Tabled,
	settings::{*, object::Columns},
};
use rccmod::prelude::{EntryKind, Flags, ResourceRoot};
use indicatif::HumanBytes;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.2";

/// This command lists the nodes in an archive in tabulated form
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => {
				anyhow::bail!("Please provide an input archive file using the -i or --input keys!")
			},
		};

		// load file into a memory map and decode the regions in place
		let file = File::open(archive_path)?;
		let mmap = unsafe { memmap2::Mmap::map(&file)? };
		let root = ResourceRoot::from_rcc(mmap.as_ref())?;

		// log basic metadata
		println!("{}", root);

		let start = match args.value_of(key_names::RESOURCE) {
			Some(path) => root.node_for_path(path)?,
			None => 0,
		};

		let mut rows: Vec<(u32, String, &'static str, u64, Flags)> = Vec::new();

		root.walk(start, |node, path, entry| {
			let (kind, size) = match entry.kind {
				EntryKind::Directory { .. } => ("dir", 0),
				EntryKind::File { .. } => ("file", root.payload(node)?.len() as u64),
			};

			rows.push((node, path.to_string(), kind, size, entry.flags));
			Ok(())
		})?;

		// Sort the rows accordingly
		match args.value_of(key_names::SORT) {
			Some("path") => rows.sort_by(|a, b| a.1.cmp(&b.1)),
			Some("path-reversed") => rows.sort_by(|a, b| b.1.cmp(&a.1)),
			Some("size-ascending") => rows.sort_by(|a, b| a.3.cmp(&b.3)),
			Some("size-descending") => rows.sort_by(|a, b| b.3.cmp(&a.3)),
			Some(sort) => anyhow::bail!(
				"Unknown sort option provided: {}. Valid sort types are: 'path' 'path-reversed' 'size-ascending' 'size-descending'",
				sort
			),
			_ => (),
		};

		let table_entries: Vec<NodeTableEntry> = rows
			.into_iter()
			.map(|(node, path, kind, size, flags)| NodeTableEntry {
				node,
				path,
				kind,
				size: HumanBytes(size).to_string(),
				flags,
			})
			.collect();

		let mut table = Table::new(table_entries);
		table
			.with(Style::rounded())
			.with(Modify::list(Columns::new(..2), Alignment::left()));

		println!("{}", table);

		Ok(())
	}
}

#[derive(Tabled)]
struct NodeTableEntry {
	node: u32,
	path: String,
	kind: &'static str,
	size: String,
	flags: Flags,
}
