use std::time::Instant;

use colored::Colorize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::assistant::{ChatResponder, GeminiParser, VendorLookup};
use crate::config::gemini_key_from_env;
use crate::context::AppContext;
use crate::error::Result;
use crate::output::OutputFormat;

type Responder = ChatResponder<GeminiParser, VendorLookup>;

fn responder(ctx: &AppContext) -> Result<Responder> {
	let parser = GeminiParser::new(gemini_key_from_env());
	if !parser.is_enabled() {
		warn!(target = "courtside_cli", "GEMINI_API_KEY not set, the assistant can only answer with suggestions");
	}

	let credentials = match ctx.credentials() {
		Ok(creds) => Some(creds),
		Err(err) => {
			debug!(target = "courtside_cli", error = %err, "chat without vendor credentials");
			None
		}
	};
	Ok(ChatResponder::new(parser, VendorLookup::new(ctx.client()?, credentials)))
}

pub async fn one_shot(ctx: &AppContext, message: &str) -> Result<Value> {
	let mut chat = responder(ctx)?;
	let reply = chat.respond(message).await;
	Ok(serde_json::to_value(reply)?)
}

/// Reads messages line by line until EOF or `exit`.
pub async fn repl(ctx: &AppContext, format: OutputFormat) -> Result<()> {
	let mut chat = responder(ctx)?;
	let mut lines = BufReader::new(tokio::io::stdin()).lines();

	eprintln!("{}", "Ask about court availability. Type `exit` to leave.".dimmed());
	loop {
		eprint!("{} ", "you>".cyan().bold());
		let Some(line) = lines.next_line().await? else {
			break;
		};
		let message = line.trim();
		if message.is_empty() {
			continue;
		}
		if matches!(message, "exit" | "quit") {
			break;
		}

		let started = Instant::now();
		let reply = chat.respond(message).await;
		if format == OutputFormat::Text {
			println!("{} {}\n", "assistant>".green().bold(), reply.text);
		} else {
			super::emit("chat", serde_json::to_value(reply)?, started, format);
		}
	}
	Ok(())
}
