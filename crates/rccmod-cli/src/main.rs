use std::env;

use log::error;

mod app;
mod commands;
mod keys;

fn main() {
	if env::var("RUST_LOG").is_err() {
		// log level not explicitly set by the user
		env::set_var("RUST_LOG", "info");
	};
	pretty_env_logger::init();

	let keys = keys::build_keys();
	let app = app::build_app(keys);
	let matches = app.get_matches();

	let commands = commands::build_commands();

	match matches.subcommand() {
		Some((name, args)) => {
			// every subcommand registered in the app exists in the command map
			let command = commands.get(name).unwrap();

			if let Err(err) = command.evaluate(args) {
				error!("An error occurred while executing the command: {}", err);
				std::process::exit(1);
			};
		},
		None => {
			error!("No action specified! Run with --help to list the available subcommands");
			std::process::exit(1);
		},
	};
}
