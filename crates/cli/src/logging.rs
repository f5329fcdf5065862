use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Filter directives for a `-v` count; `RUST_LOG` wins when set.
pub fn filter_for(verbosity: u8) -> &'static str {
	// 0: errors only, HTTP stack silenced
	// 1 (-v): info for our crates
	// 2+ (-vv): debug everywhere
	match verbosity {
		0 => "error,hyper=off,reqwest=off",
		1 => "warn,courtside=info,courtside_cli=info",
		_ => "debug,hyper=info",
	}
}

pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	let _ = tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_level_parses() {
		for verbosity in 0..4 {
			assert!(EnvFilter::try_new(filter_for(verbosity)).is_ok(), "verbosity {verbosity}");
		}
	}
}
