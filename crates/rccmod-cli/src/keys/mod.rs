use clap::Arg;
use std::collections::HashMap;

pub mod key_names {
	pub(crate) const OUTPUT: &str = "OUTPUT";
	pub(crate) const INPUT: &str = "INPUT";
	pub(crate) const RESOURCE: &str = "RESOURCE";

	pub(crate) const REPLACE: &str = "REPLACE";
	pub(crate) const ROOT_NAME: &str = "ROOT_NAME";

	pub(crate) const RAW: &str = "RAW";
	pub(crate) const SKIP_EXISTING: &str = "SKIP_EXISTING";
	pub(crate) const FLAT: &str = "FLAT";

	pub(crate) const SORT: &str = "SORT";
}

pub fn build_keys<'a>() -> HashMap<&'static str, Arg<'a>> {
	/* please only use this function once during the lifecycle of the program */
	let mut map = HashMap::with_capacity(10);

	/* The various keys usable in the CLI */
	// A general input source
	map.insert(
		key_names::INPUT,
		Arg::new(key_names::INPUT)
			.long("input")
			.short('i')
			.value_name(key_names::INPUT)
			.help("The archive to operate on, a path to a .rcc file")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// A general output target
	map.insert(
		key_names::OUTPUT,
		Arg::new(key_names::OUTPUT)
			.short('o')
			.long("output")
			.value_name(key_names::OUTPUT)
			.help("A general output target, for example a directory to unpack into or a file to write to")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// A resource path inside the archive to focus on
	map.insert(
		key_names::RESOURCE,
		Arg::new(key_names::RESOURCE)
			.short('r')
			.long("resource")
			.value_name(key_names::RESOURCE)
			.help("A slash-separated path inside the archive, eg qml/Main.qml")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// node substitutions for the patch subcommand
	map.insert(
		key_names::REPLACE,
		Arg::new(key_names::REPLACE)
			.long("replace")
			.short('p')
			.value_name(key_names::REPLACE)
			.help("A substitution as ARCHIVE_PATH=LOCAL_FILE, repeatable; later entries win on the same node")
			.required(false)
			.takes_value(true)
			.multiple_values(true),
	);

	// prefix for composed paths in logs and summaries
	map.insert(
		key_names::ROOT_NAME,
		Arg::new(key_names::ROOT_NAME)
			.long("root-name")
			.value_name(key_names::ROOT_NAME)
			.help("Prefix for composed archive paths in logs and summaries")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// dump payloads exactly as stored
	map.insert(
		key_names::RAW,
		Arg::new(key_names::RAW)
			.long("raw")
			.help("Write payloads exactly as stored, without expanding compressed leaves")
			.required(false)
			.takes_value(false),
	);

	// leave already-dumped files alone
	map.insert(
		key_names::SKIP_EXISTING,
		Arg::new(key_names::SKIP_EXISTING)
			.long("skip-existing")
			.help("Skip nodes whose target file already exists on disk")
			.required(false)
			.takes_value(false),
	);

	// do not descend into subdirectories
	map.insert(
		key_names::FLAT,
		Arg::new(key_names::FLAT)
			.long("flat")
			.help("Only process a directory's immediate file children, do not descend")
			.required(false)
			.takes_value(false),
	);

	// listing sort order
	map.insert(
		key_names::SORT,
		Arg::new(key_names::SORT)
			.long("sort")
			.value_name(key_names::SORT)
			.help("Sort order for the listing: 'path' 'path-reversed' 'size-ascending' 'size-descending'")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	map
}
