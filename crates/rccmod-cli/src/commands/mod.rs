use std::collections::HashMap;

use clap::ArgMatches;
use anyhow::Result;

// A common progress bar style for all commands
const PROGRESS_BAR_STYLE: &str = "{wide_bar} {pos:>7}/{len:7} ETA {eta_precise}";

// Trait that must be implemented by all subcommands
pub trait CommandTrait: Sync {
	fn evaluate(&self, args: &ArgMatches) -> Result<()>;
}

// All sub-commands are defined in the below modules
pub mod list;
pub mod patch;
pub mod pipe;
pub mod stat;
pub mod unpack;

pub fn build_commands() -> HashMap<&'static str, Box<dyn CommandTrait>> {
	let mut map: HashMap<&'static str, Box<dyn CommandTrait>> = HashMap::new();

	map.insert("list", Box::new(list::Evaluator));
	map.insert("stat", Box::new(stat::Evaluator));
	map.insert("unpack", Box::new(unpack::Evaluator));
	map.insert("pipe", Box::new(pipe::Evaluator));
	map.insert("patch", Box::new(patch::Evaluator));

	map
}
