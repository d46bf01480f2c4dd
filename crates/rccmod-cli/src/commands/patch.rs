use std::{
	fs::{self, File},
	io::BufWriter,
	path::Path,
	time::Instant,
};

use rccmod::archive::container;
use rccmod::prelude::*;
use indicatif::HumanBytes;
use log::{info, warn};

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.2";

/// This command substitutes node payloads and writes the patched archive back out
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input path using the -i or --input key"),
		};

		let output_path = match args.value_of(key_names::OUTPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an output path using the -o or --output key"),
		};

		let replacements: Vec<&str> = match args.values_of(key_names::REPLACE) {
			Some(values) => values.collect(),
			None => anyhow::bail!("Please provide at least one substitution using the -p or --replace key"),
		};

		let time = Instant::now();

		// the whole source is read up front, the root owns its regions and the
		// output path may then safely equal the input path
		let source = fs::read(input_path)?;
		let mut root = ResourceRoot::from_rcc_owned(source)?;

		// resolve every ARCHIVE_PATH=LOCAL_FILE pair before any mutation
		let mut ledger = ReplacementLedger::new();

		for replacement in replacements {
			let (archive_path, local_file) = match replacement.split_once('=') {
				Some(pair) => pair,
				None => anyhow::bail!("Invalid substitution: {}. Expected ARCHIVE_PATH=LOCAL_FILE", replacement),
			};

			let node = root.node_for_path(archive_path)?;
			ledger.add(node, Path::new(local_file));

			info!("staged {} <- {} (node {})", archive_path, local_file, node);
		}

		let staged = ledger.len();
		let summary = commit(&mut root, &mut ledger, None)?;

		for (node, err) in &summary.failures {
			warn!("substitution of node {} failed: {}", node, err);
		}

		// write the patched container out
		let mut target = BufWriter::new(File::create(output_path)?);
		let written = container::write(&root, &mut target)?;

		println!(
			"Applied {}/{} substitutions ({} appended), wrote {} to {} in {}s",
			summary.applied,
			staged,
			HumanBytes(summary.bytes_appended),
			HumanBytes(written),
			output_path,
			time.elapsed().as_secs_f64(),
		);

		Ok(())
	}
}
