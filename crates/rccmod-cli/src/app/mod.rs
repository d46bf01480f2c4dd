use std::collections::HashMap;
use clap::{Command, Arg};

use crate::keys::key_names;
use crate::commands;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn build_app<'a>(key_map: HashMap<&'static str, Arg<'a>>) -> Command<'a> {
	Command::new("rccmod")
		.about("A command-line interface for inspecting, dumping and patching compiled Qt resource archives")
		.version(self::VERSION)
		.subcommand(
			Command::new("list")
				.version(commands::list::VERSION)
				.about("Lists every node in an archive and its metadata")
				.arg(key_map.get(key_names::INPUT).unwrap())
				.arg(key_map.get(key_names::RESOURCE).unwrap())
				.arg(key_map.get(key_names::SORT).unwrap()),
		)
		.subcommand(
			Command::new("stat")
				.version(commands::stat::VERSION)
				.about("Prints aggregate counts and sizes for an archive or one of its subtrees")
				.arg(key_map.get(key_names::INPUT).unwrap())
				.arg(key_map.get(key_names::RESOURCE).unwrap()),
		)
		.subcommand(
			Command::new("unpack")
				.version(commands::unpack::VERSION)
				.about("Dumps an archive, or one of its subtrees, into a directory")
				.arg(key_map.get(key_names::INPUT).unwrap())
				.arg(key_map.get(key_names::OUTPUT).unwrap())
				.arg(key_map.get(key_names::RESOURCE).unwrap())
				.arg(key_map.get(key_names::ROOT_NAME).unwrap())
				// modifiers
				.arg(key_map.get(key_names::RAW).unwrap())
				.arg(key_map.get(key_names::SKIP_EXISTING).unwrap())
				.arg(key_map.get(key_names::FLAT).unwrap()),
		)
		.subcommand(
			Command::new("pipe")
				.version(commands::pipe::VERSION)
				.about("Pipes one node's payload to stdout")
				.arg(key_map.get(key_names::INPUT).unwrap())
				.arg(key_map.get(key_names::RESOURCE).unwrap())
				.arg(key_map.get(key_names::RAW).unwrap()),
		)
		.subcommand(
			Command::new("patch")
				.version(commands::patch::VERSION)
				.about("Substitutes node payloads and writes the patched archive back out")
				.arg(key_map.get(key_names::INPUT).unwrap())
				.arg(key_map.get(key_names::OUTPUT).unwrap())
				.arg(key_map.get(key_names::REPLACE).unwrap()),
		)
}
