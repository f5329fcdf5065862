mod chat;
mod config;
mod creds;
mod key;
mod user;
mod vendor;

use std::time::Instant;

use serde_json::Value;

use crate::cli::{Cli, Commands, ConfigAction, CredsAction, KeyAction, UserAction};
use crate::config::{AppConfig, StatePaths};
use crate::context::AppContext;
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, Timings, print_result};

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let started = Instant::now();
	let paths = StatePaths::new(cli.config.as_deref());
	let config = AppConfig::load(&paths.config);
	let ctx = AppContext::new(paths, config, cli.user);
	let command = cli.command.name();

	let data = match cli.command {
		Commands::User { action } => match action {
			UserAction::Register { name, password } => user::register(&ctx, &name, &password)?,
			UserAction::Verify { name, password } => user::verify(&ctx, &name, &password)?,
			UserAction::Passwd { name, old, new } => user::passwd(&ctx, &name, &old, &new)?,
		},
		Commands::Creds { action } => match action {
			CredsAction::Set {
				email,
				password,
				no_verify,
			} => creds::set(&ctx, &email, &password, !no_verify).await?,
			CredsAction::Show => creds::show(&ctx)?,
			CredsAction::Remove => creds::remove(&ctx)?,
		},
		Commands::Login => vendor::login(&ctx).await?,
		Commands::Schedule { date, days } => vendor::schedule(&ctx, date, days, format).await?,
		Commands::Link { start, zone } => vendor::link(&ctx, start.as_deref(), zone),
		Commands::Book { zone, start, duration } => vendor::book(&ctx, zone, start, duration).await?,
		Commands::Bookings => vendor::bookings(&ctx).await?,
		Commands::Cancel { id } => vendor::cancel(&ctx, &id).await?,
		Commands::Chat { message: Some(message) } => chat::one_shot(&ctx, &message).await?,
		Commands::Chat { message: None } => return chat::repl(&ctx, format).await,
		Commands::Config { action } => match action {
			ConfigAction::Show => config::show(&ctx)?,
			ConfigAction::Init { force } => config::init(&ctx, force)?,
		},
		Commands::Key { action: KeyAction::Generate } => key::generate()?,
	};

	emit(command, data, started, format);
	Ok(())
}

pub(crate) fn emit(command: &str, data: Value, started: Instant, format: OutputFormat) {
	let result = ResultBuilder::<Value>::new(command)
		.data(data)
		.timings(Timings::from(started.elapsed()))
		.build();
	print_result(&result, format);
}
