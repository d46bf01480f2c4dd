use std::fs::File;

use rccmod::prelude::ResourceRoot;
use indicatif::HumanBytes;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

/// This command prints aggregate counts and sizes for an archive or a subtree
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => {
				anyhow::bail!("Please provide an input archive file using the -i or --input keys!")
			},
		};

		let file = File::open(archive_path)?;
		let mmap = unsafe { memmap2::Mmap::map(&file)? };
		let root = ResourceRoot::from_rcc(mmap.as_ref())?;

		println!("{}", root);

		let start = match args.value_of(key_names::RESOURCE) {
			Some(path) => root.node_for_path(path)?,
			None => 0,
		};

		let stat = root.stat(start)?;

		println!(
			"{} files across {} directories, {} of payload",
			stat.files,
			stat.directories,
			HumanBytes(stat.bytes)
		);

		Ok(())
	}
}
