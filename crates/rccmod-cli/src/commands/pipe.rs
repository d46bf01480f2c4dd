use std::{
	fs::File,
	io::{self, Write},
};

use rccmod::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let input_path = match args.value_of(key_names::INPUT) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input path using the -i or --input key"),
		};

		let resource = match args.value_of(key_names::RESOURCE) {
			Some(resource) => resource,
			None => anyhow::bail!("Please provide a resource to extract using the -r or --resource key"),
		};

		let file = match File::open(input_path) {
			Ok(it) => it,
			Err(err) => anyhow::bail!("IOError: {} @ {}", err, input_path),
		};

		let mmap = unsafe { memmap2::Mmap::map(&file)? };

		// Parse then pipe out of the archive
		let root = match ResourceRoot::from_rcc(mmap.as_ref()) {
			Ok(root) => root,
			Err(err) => match err {
				InternalError::MalformedArchiveSource(_) => anyhow::bail!("Unable to validate the archive: {}", err),
				err => anyhow::bail!("Encountered an error: {}", err.to_string()),
			},
		};

		let stdout = io::stdout();
		{
			let mut handle = stdout.lock();

			if args.is_present(key_names::RAW) {
				let node = root.node_for_path(resource)?;
				handle.write_all(root.payload(node)?)?;
			} else {
				let resource = root.fetch(resource)?;
				handle.write_all(&resource.data)?;
			};
		}

		Ok(())
	}
}
