use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

use crate::config::{PASSWORD_ENV, USER_ENV};
use crate::output::OutputFormat;
use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "courtside")]
#[command(about = "Badminton court availability, booking links and a chat assistant for PerfectGym clubs")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Local user whose vendor credentials are used
	#[arg(short, long, global = true, env = USER_ENV, value_name = "NAME")]
	pub user: Option<String>,

	/// Config file (data files are kept next to it)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Manage local users
	User {
		#[command(subcommand)]
		action: UserAction,
	},

	/// Manage stored vendor credentials
	Creds {
		#[command(subcommand)]
		action: CredsAction,
	},

	/// Check that the stored vendor login works
	Login,

	/// List bookable slots
	#[command(alias = "ls")]
	Schedule {
		/// First day to show (YYYY-MM-DD), default today
		#[arg(short, long, value_parser = parse_date)]
		date: Option<NaiveDate>,

		/// Number of days to show
		#[arg(short = 'n', long, default_value_t = courtside::DEFAULT_DAYS)]
		days: u32,
	},

	/// Print the browser booking page URL
	Link {
		/// Slot start (accepted for reference, the page opens on the calendar)
		#[arg(long, value_name = "TIME")]
		start: Option<String>,

		/// Court zone id
		#[arg(long, value_name = "ZONE")]
		zone: Option<u32>,
	},

	/// Book a court through the vendor's booking wizard
	Book {
		/// Court zone id
		#[arg(long, value_name = "ZONE")]
		zone: u32,

		/// Slot start, e.g. 2025-10-10T18:00:00
		#[arg(long, value_name = "TIME", value_parser = parse_start)]
		start: NaiveDateTime,

		/// Length in minutes
		#[arg(long, value_name = "MINUTES", default_value_t = courtside::DEFAULT_BOOKING_MINUTES)]
		duration: u32,
	},

	/// List your upcoming bookings
	Bookings,

	/// Cancel a booking
	Cancel {
		/// Booking id as shown by `bookings`
		id: String,
	},

	/// Ask the assistant (interactive when no message is given)
	Chat {
		message: Option<String>,
	},

	/// Show or create the config file
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},

	/// Encryption key management
	Key {
		#[command(subcommand)]
		action: KeyAction,
	},
}

impl Commands {
	/// Name reported in the result envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::User { action } => match action {
				UserAction::Register { .. } => "user.register",
				UserAction::Verify { .. } => "user.verify",
				UserAction::Passwd { .. } => "user.passwd",
			},
			Commands::Creds { action } => match action {
				CredsAction::Set { .. } => "creds.set",
				CredsAction::Show => "creds.show",
				CredsAction::Remove => "creds.remove",
			},
			Commands::Login => "login",
			Commands::Schedule { .. } => "schedule",
			Commands::Link { .. } => "link",
			Commands::Book { .. } => "book",
			Commands::Bookings => "bookings",
			Commands::Cancel { .. } => "cancel",
			Commands::Chat { .. } => "chat",
			Commands::Config { action } => match action {
				ConfigAction::Show => "config.show",
				ConfigAction::Init { .. } => "config.init",
			},
			Commands::Key { .. } => "key.generate",
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
	/// Create a local user
	Register {
		name: String,
		#[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
		password: String,
	},
	/// Check a local user's password
	Verify {
		name: String,
		#[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
		password: String,
	},
	/// Change a local user's password
	Passwd {
		name: String,
		#[arg(long)]
		old: String,
		#[arg(long)]
		new: String,
	},
}

#[derive(Subcommand, Debug)]
pub enum CredsAction {
	/// Verify and store the vendor login for the current user
	Set {
		#[arg(long)]
		email: String,
		#[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
		password: String,
		/// Store without checking the login against the vendor
		#[arg(long)]
		no_verify: bool,
	},
	/// Show the stored login (password hidden)
	Show,
	/// Delete the stored login
	Remove,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
	/// Print the effective configuration
	Show,
	/// Write the default configuration file
	Init {
		/// Overwrite an existing file
		#[arg(long)]
		force: bool,
	},
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
	/// Print a fresh vault encryption key
	Generate,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
	NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_start(raw: &str) -> Result<NaiveDateTime, String> {
	["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
		.iter()
		.find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
		.ok_or_else(|| "expected YYYY-MM-DDTHH:MM[:SS]".to_string())
}
