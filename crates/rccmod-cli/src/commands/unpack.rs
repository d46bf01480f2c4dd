use std::{
	fs::File,
	path::PathBuf,
	str::FromStr,
	time::Instant,
};

use rccmod::dump::{dump_node, DumpOptions};
use rccmod::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.2";

/// This command extracts an archive into the specified output folder
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input path using the -i or --input key"),
		};

		let output_path = match args.value_of(key_names::OUTPUT) {
			Some(path) => PathBuf::from_str(path)?,
			None => Default::default(),
		};

		if output_path.is_file() {
			anyhow::bail!("Please provide a directory|folder path as the value of -o | --output")
		};

		// load file into a memory map and decode the regions in place
		let file = File::open(input_path)?;
		let mmap = unsafe { memmap2::Mmap::map(&file)? };
		let root = ResourceRoot::from_rcc(mmap.as_ref())?;

		let node = match args.value_of(key_names::RESOURCE) {
			Some(path) => root.node_for_path(path)?,
			None => 0,
		};

		let root_name = args.value_of(key_names::ROOT_NAME).unwrap_or("");

		let options = DumpOptions::default()
			.recursive(!args.is_present(key_names::FLAT))
			.skip_existing(args.is_present(key_names::SKIP_EXISTING))
			.decompress(!args.is_present(key_names::RAW));

		// a leaf lands as a single file under the output folder, a directory unpacks into it
		let target = if root.entry(node)?.is_directory() {
			output_path.clone()
		} else {
			output_path.join(root.name_of(node)?)
		};

		extract_archive(&root, node, root_name, target, &options)
	}
}

fn extract_archive(
	root: &ResourceRoot, node: u32, root_name: &str, target_folder: PathBuf, options: &DumpOptions,
) -> anyhow::Result<()> {
	// For measuring the time difference
	let time = Instant::now();

	let total = root.stat(node)?;
	let pbar = ProgressBar::new(total.bytes);

	pbar.set_style(
		ProgressStyle::default_bar()
			.template(super::PROGRESS_BAR_STYLE)?
			.progress_chars("█░-"),
	);

	let mut callback = |path: &str, bytes: u64| {
		pbar.set_message(path.to_string());
		pbar.inc(bytes);
	};

	let summary = dump_node(root, node, root_name, &target_folder, options, Some(&mut callback))?;

	// Finished extracting, per-node failures were already logged as they happened
	pbar.finish();

	if !summary.failures.is_empty() {
		warn!("{} nodes failed to dump, see the log above", summary.failures.len());
	};

	println!(
		"Extracted {} files ({}) in {}s, {} skipped, {} failed",
		summary.files_written,
		indicatif::HumanBytes(summary.bytes_written),
		time.elapsed().as_secs_f64(),
		summary.skipped,
		summary.failures.len(),
	);

	Ok(())
}
